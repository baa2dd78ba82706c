pub mod line;
pub mod scheme;
pub mod verse;
