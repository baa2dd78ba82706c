pub mod assembler;
pub mod batch;
pub mod corpus;
pub mod index;
pub mod meter;
pub mod normalize;
pub mod rhymes;
pub mod songwriter;
pub mod syllables;
