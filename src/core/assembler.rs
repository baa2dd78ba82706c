/// Verse assembly: bounded randomized search for lines that fit a scheme.
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::Rng;
use thiserror::Error;
use tracing::debug;

use crate::core::index::{EndingWordEntry, RhymeIndex};
use crate::core::meter::lines_in_meter;
use crate::schema::line::Line;
use crate::schema::scheme::{RhymeGroup, VerseScheme};
use crate::schema::verse::Verse;

/// Seed attempts allowed per rhyme group before a verse is abandoned.
pub const DEFAULT_RETRY_LIMIT: u32 = 1000;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AssemblyError {
    #[error("rhyme index is empty")]
    EmptyIndex,
    #[error("no lines found for rhyme group '{rhyme}' after {attempts} attempts")]
    SearchExhausted { rhyme: String, attempts: u32 },
    #[error("invalid scheme: {0}")]
    InvalidScheme(String),
}

/// Assembles single verses from a finished `RhymeIndex`.
///
/// Each rhyme group of the scheme is filled in turn: a seed line is drawn
/// from a uniformly random ending word, then one partner line per remaining
/// position is drawn from the seed word's rhymes. Any dead end restarts the
/// group from a fresh seed; the retry limit bounds those restarts.
pub struct VerseAssembler<'a> {
    index: &'a RhymeIndex,
    scheme: &'a VerseScheme,
    retry_limit: u32,
}

impl<'a> VerseAssembler<'a> {
    pub fn new(index: &'a RhymeIndex, scheme: &'a VerseScheme) -> Self {
        Self {
            index,
            scheme,
            retry_limit: DEFAULT_RETRY_LIMIT,
        }
    }

    /// Zero is treated as one attempt.
    pub fn retry_limit(mut self, limit: u32) -> Self {
        self.retry_limit = limit.max(1);
        self
    }

    /// Check the scheme and the index before any search.
    pub fn check(&self) -> Result<(), AssemblyError> {
        self.scheme.validate().map_err(AssemblyError::InvalidScheme)?;
        if self.index.is_empty() {
            return Err(AssemblyError::EmptyIndex);
        }
        Ok(())
    }

    /// Assemble one verse, lines in the scheme's presentation order.
    pub fn assemble(&self, rng: &mut StdRng) -> Result<Verse, AssemblyError> {
        self.check()?;

        // filled in rhyme-group order, then placed by position
        let mut collected: Vec<(usize, Line)> = Vec::with_capacity(self.scheme.len());
        for group in self.scheme.rhyme_groups() {
            let lines = self.fill_group(&group, rng)?;
            collected.extend(group.positions.iter().copied().zip(lines));
        }

        collected.sort_by_key(|(pos, _)| *pos);
        Ok(Verse {
            lines: collected.into_iter().map(|(_, line)| line).collect(),
        })
    }

    fn fill_group(
        &self,
        group: &RhymeGroup,
        rng: &mut StdRng,
    ) -> Result<Vec<Line>, AssemblyError> {
        for attempt in 1..=self.retry_limit {
            let Some((seed_entry, seed)) = self.pick_seed(group.positions[0], rng) else {
                continue;
            };

            match self.pick_partners(group, seed_entry, seed, rng) {
                Some(mut partners) => {
                    partners.insert(0, seed.clone());
                    return Ok(partners);
                }
                None => {
                    debug!(
                        "rhyme group '{}': no partners for '{}' (attempt {})",
                        group.label, seed_entry.word, attempt
                    );
                }
            }
        }

        Err(AssemblyError::SearchExhausted {
            rhyme: group.label.clone(),
            attempts: self.retry_limit,
        })
    }

    /// Uniform over ending words, then uniform over that word's lines in meter.
    fn pick_seed(
        &self,
        position: usize,
        rng: &mut StdRng,
    ) -> Option<(&'a EndingWordEntry, &'a Line)> {
        let target = self.scheme.target_at(position)?;
        let entries = self.index.entries();
        let entry = &entries[rng.gen_range(0..entries.len())];
        let fitting = lines_in_meter(&entry.lines, target, self.scheme.padding);
        let line = fitting.choose(rng)?;
        Some((entry, *line))
    }

    /// One partner line per remaining position of the group, each ending in a
    /// different word. Every pair of chosen words rhymes both ways, not just
    /// each partner with the seed.
    fn pick_partners(
        &self,
        group: &RhymeGroup,
        seed_entry: &'a EndingWordEntry,
        seed: &'a Line,
        rng: &mut StdRng,
    ) -> Option<Vec<Line>> {
        let mut candidates = self.rhyme_candidates(seed_entry);
        let mut partners = Vec::with_capacity(group.positions.len().saturating_sub(1));

        for &position in &group.positions[1..] {
            if candidates.is_empty() {
                return None;
            }
            let target = self.scheme.target_at(position)?;

            let pick = rng.gen_range(0..candidates.len());
            let entry = candidates.swap_remove(pick);
            let fitting: Vec<&Line> = lines_in_meter(&entry.lines, target, self.scheme.padding)
                .into_iter()
                .filter(|l| l.text != seed.text)
                .collect();
            let line = fitting.choose(rng)?;
            partners.push((*line).clone());

            // rhyme is not transitive across pronunciations
            candidates
                .retain(|c| entry.rhymes.contains(&c.word) && c.rhymes.contains(&entry.word));
        }

        Some(partners)
    }

    /// Entries for the seed word's rhymes, excluding the seed word itself and
    /// any word whose own rhymes do not include the seed word.
    fn rhyme_candidates(&self, seed_entry: &EndingWordEntry) -> Vec<&'a EndingWordEntry> {
        let mut words: Vec<&String> = seed_entry
            .rhymes
            .iter()
            .filter(|w| **w != seed_entry.word)
            .collect();
        // set iteration order depends on insertion history
        words.sort();

        words
            .into_iter()
            .filter_map(|w| self.index.get(w))
            .filter(|e| e.rhymes.contains(&seed_entry.word))
            .collect()
    }
}
