//! Songwriter: rhymed, metered song verses mined from source text.
//!
//! Splits a body of text into candidate lines, indexes them by ending word
//! with their perfect rhymes attached, and runs a bounded randomized search
//! that assembles verses matching a syllable pattern and a rhyme pattern.

pub mod core;
pub mod schema;
