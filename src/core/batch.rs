/// Batch verse generation.
use rand::rngs::StdRng;
use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::core::assembler::{AssemblyError, VerseAssembler};
use crate::schema::verse::Verse;

/// What to do when one verse of a batch runs out of attempts.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum FailurePolicy {
    /// Log it, record it and move on to the next verse.
    #[default]
    Skip,
    /// Stop the batch and return the error.
    Abort,
}

/// Result of a batch: the verses that were assembled and the ones that were not.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BatchReport {
    pub verses: Vec<Verse>,
    /// `(verse number, error)` for each skipped verse.
    pub failures: Vec<(usize, AssemblyError)>,
}

impl BatchReport {
    pub fn requested(&self) -> usize {
        self.verses.len() + self.failures.len()
    }
}

/// Run the assembler `count` times.
///
/// An empty index or an invalid scheme stops the batch before the first
/// attempt regardless of policy; only exhausted searches are subject to it.
pub fn write_batch(
    assembler: &VerseAssembler<'_>,
    count: usize,
    policy: FailurePolicy,
    rng: &mut StdRng,
) -> Result<BatchReport, AssemblyError> {
    assembler.check()?;

    let mut report = BatchReport::default();
    for n in 0..count {
        match assembler.assemble(rng) {
            Ok(verse) => report.verses.push(verse),
            Err(e @ AssemblyError::SearchExhausted { .. }) if policy == FailurePolicy::Skip => {
                warn!("verse {} skipped: {}", n + 1, e);
                report.failures.push((n, e));
            }
            Err(e) => return Err(e),
        }
    }
    Ok(report)
}
