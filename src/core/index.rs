/// Rhyme index: candidate lines grouped by ending word, with perfect rhymes attached.
use rustc_hash::{FxHashMap, FxHashSet};
use serde::Serialize;
use tracing::{debug, info};

use crate::core::meter::fits_scheme;
use crate::core::normalize::normalize_line;
use crate::core::rhymes::RhymeSource;
use crate::core::syllables::SyllableEstimator;
use crate::schema::line::Line;
use crate::schema::scheme::VerseScheme;

/// Every known line ending in `word`, and the words that perfectly rhyme with it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EndingWordEntry {
    pub word: String,
    pub lines: Vec<Line>,
    /// As reported by the rhyme source. May contain `word` itself.
    pub rhymes: FxHashSet<String>,
}

/// Lines indexed by ending word.
///
/// Every entry has at least one line and a rhyme set. Words the rhyme source
/// knows nothing about never get an entry. Entries keep first-seen order so
/// seeded generation is reproducible.
#[derive(Debug, Clone, Default)]
pub struct RhymeIndex {
    entries: Vec<EndingWordEntry>,
    positions: FxHashMap<String, usize>,
}

impl RhymeIndex {
    /// Build an index from raw sentences in one pass.
    pub fn build<'s, I, E, R>(
        sentences: I,
        estimator: &E,
        rhymes: &R,
        options: IndexOptions,
    ) -> (RhymeIndex, BuildStats)
    where
        I: IntoIterator<Item = &'s str>,
        E: SyllableEstimator + ?Sized,
        R: RhymeSource + ?Sized,
    {
        let mut builder = RhymeIndexBuilder::new(estimator, rhymes, options);
        for sentence in sentences {
            builder.push(sentence);
        }
        builder.finish()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn contains(&self, word: &str) -> bool {
        self.positions.contains_key(word)
    }

    pub fn get(&self, word: &str) -> Option<&EndingWordEntry> {
        self.positions.get(word).map(|&pos| &self.entries[pos])
    }

    /// Entries in first-seen order.
    pub fn entries(&self) -> &[EndingWordEntry] {
        &self.entries
    }

    /// Total number of lines across all entries.
    pub fn line_count(&self) -> usize {
        self.entries.iter().map(|e| e.lines.len()).sum()
    }
}

/// Choices that affect which ending words share an entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IndexOptions {
    /// Lowercase ending words (and the rhymes reported for them) before
    /// indexing, so "Night" and "night" share an entry. Line text is kept as written.
    pub fold_case: bool,
    /// Skip lines that cannot fit any position of this scheme, before any rhyme lookup.
    pub prefilter: Option<VerseScheme>,
}

impl Default for IndexOptions {
    fn default() -> Self {
        Self {
            fold_case: true,
            prefilter: None,
        }
    }
}

/// What happened to one sentence pushed into the builder.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Insertion {
    /// Stored under its ending word.
    Added,
    /// Same text and syllable count already stored under this ending word.
    Duplicate,
    /// Empty or single-character sentence.
    Degenerate,
    /// The rhyme source has no data for the ending word.
    Unrhymable,
    /// Cannot fit any position of the prefilter scheme.
    OutOfMeter,
}

/// Counters collected while building an index.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct BuildStats {
    pub sentences_seen: usize,
    pub degenerate: usize,
    pub words_processed: usize,
    pub syllables_seen: u64,
    pub duplicates: usize,
    pub unrhymable: usize,
    pub out_of_meter: usize,
    pub unique_lines: usize,
    pub ending_words: usize,
}

/// Incrementally builds a `RhymeIndex`.
///
/// The rhyme source is consulted once per distinct ending word. A word it
/// has no data for is remembered and stays excluded for the rest of the build.
pub struct RhymeIndexBuilder<'a, E: ?Sized, R: ?Sized> {
    estimator: &'a E,
    rhymes: &'a R,
    options: IndexOptions,
    index: RhymeIndex,
    unrhymable: FxHashSet<String>,
    stats: BuildStats,
}

impl<'a, E, R> RhymeIndexBuilder<'a, E, R>
where
    E: SyllableEstimator + ?Sized,
    R: RhymeSource + ?Sized,
{
    pub fn new(estimator: &'a E, rhymes: &'a R, options: IndexOptions) -> Self {
        Self {
            estimator,
            rhymes,
            options,
            index: RhymeIndex::default(),
            unrhymable: FxHashSet::default(),
            stats: BuildStats::default(),
        }
    }

    pub fn stats(&self) -> &BuildStats {
        &self.stats
    }

    /// Normalize one raw sentence and file it under its ending word.
    pub fn push(&mut self, raw: &str) -> Insertion {
        self.stats.sentences_seen += 1;

        let Some(line) = normalize_line(raw, self.estimator) else {
            self.stats.degenerate += 1;
            return Insertion::Degenerate;
        };
        self.stats.words_processed += line.text.split_whitespace().count();
        self.stats.syllables_seen += u64::from(line.syllables);

        if let Some(scheme) = &self.options.prefilter {
            if !fits_scheme(line.syllables, scheme) {
                self.stats.out_of_meter += 1;
                return Insertion::OutOfMeter;
            }
        }

        let Some(last_word) = line.last_word() else {
            self.stats.degenerate += 1;
            return Insertion::Degenerate;
        };
        let key = if self.options.fold_case {
            last_word.to_lowercase()
        } else {
            last_word.to_string()
        };

        if let Some(&pos) = self.index.positions.get(&key) {
            let entry = &mut self.index.entries[pos];
            if entry.lines.contains(&line) {
                self.stats.duplicates += 1;
                return Insertion::Duplicate;
            }
            entry.lines.push(line);
            self.stats.unique_lines += 1;
            return Insertion::Added;
        }

        if self.unrhymable.contains(&key) {
            self.stats.unrhymable += 1;
            return Insertion::Unrhymable;
        }

        let Some(found) = self.rhymes.perfect_rhymes(&key) else {
            debug!("no rhyme data for '{}'", key);
            self.stats.unrhymable += 1;
            self.unrhymable.insert(key);
            return Insertion::Unrhymable;
        };
        let rhymes = if self.options.fold_case {
            found.into_iter().map(|w| w.to_lowercase()).collect()
        } else {
            found
        };

        self.index.positions.insert(key.clone(), self.index.entries.len());
        self.index.entries.push(EndingWordEntry {
            word: key,
            lines: vec![line],
            rhymes,
        });
        self.stats.ending_words += 1;
        self.stats.unique_lines += 1;
        Insertion::Added
    }

    /// Finish the build phase. The index is read-only from here on.
    pub fn finish(self) -> (RhymeIndex, BuildStats) {
        let stats = self.stats;
        info!(
            "rhyme index built: {} sentences, {} words, {} syllables",
            stats.sentences_seen, stats.words_processed, stats.syllables_seen
        );
        info!(
            "{} lines under {} ending words \
             ({} duplicate, {} unrhymable, {} degenerate, {} out of meter)",
            stats.unique_lines,
            stats.ending_words,
            stats.duplicates,
            stats.unrhymable,
            stats.degenerate,
            stats.out_of_meter
        );
        (self.index, stats)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::syllables::HeuristicSyllables;

    fn table(entries: &[(&str, &[&str])]) -> impl Fn(&str) -> Option<FxHashSet<String>> {
        let map: FxHashMap<String, FxHashSet<String>> = entries
            .iter()
            .map(|(word, rhymes)| {
                (
                    word.to_string(),
                    rhymes.iter().map(|r| r.to_string()).collect(),
                )
            })
            .collect();
        move |word: &str| map.get(word).cloned()
    }

    #[test]
    fn unrhymable_words_are_left_out() {
        let rhymes = table(&[("sat", &["rat"]), ("rat", &["sat"])]);
        let (index, stats) = RhymeIndex::build(
            ["a cat sat", "a big fat rat", "the dog barks"],
            &HeuristicSyllables,
            &rhymes,
            IndexOptions::default(),
        );
        assert_eq!(index.len(), 2);
        assert!(index.contains("sat"));
        assert!(index.contains("rat"));
        assert!(!index.contains("barks"));
        assert_eq!(stats.unrhymable, 1);
        assert_eq!(index.get("sat").unwrap().lines, vec![Line::new("a cat sat", 3)]);
        assert!(index.get("rat").unwrap().rhymes.contains("sat"));
    }

    #[test]
    fn rhyme_lookup_happens_once_per_word() {
        let calls = std::cell::Cell::new(0);
        let rhymes = |word: &str| -> Option<FxHashSet<String>> {
            calls.set(calls.get() + 1);
            (word == "sat").then(FxHashSet::default)
        };
        let mut builder =
            RhymeIndexBuilder::new(&HeuristicSyllables, &rhymes, IndexOptions::default());
        assert_eq!(builder.push("the cat sat"), Insertion::Added);
        assert_eq!(builder.push("and there she sat"), Insertion::Added);
        assert_eq!(builder.push("the dog barks"), Insertion::Unrhymable);
        assert_eq!(builder.push("a seal barks"), Insertion::Unrhymable);
        assert_eq!(calls.get(), 2);
        let (index, stats) = builder.finish();
        assert_eq!(index.get("sat").unwrap().lines.len(), 2);
        assert_eq!(stats.unrhymable, 2);
    }

    #[test]
    fn duplicate_lines_are_not_repeated() {
        let rhymes = table(&[("sat", &[])]);
        let mut builder =
            RhymeIndexBuilder::new(&HeuristicSyllables, &rhymes, IndexOptions::default());
        assert_eq!(builder.push("a cat sat"), Insertion::Added);
        assert_eq!(builder.push("  a cat sat "), Insertion::Duplicate);
        let (index, stats) = builder.finish();
        assert_eq!(index.get("sat").unwrap().lines.len(), 1);
        assert_eq!(stats.duplicates, 1);
        assert_eq!(stats.unique_lines, 1);
    }

    #[test]
    fn degenerate_sentences_counted() {
        let rhymes = table(&[]);
        let (index, stats) = RhymeIndex::build(
            ["", " ", "x"],
            &HeuristicSyllables,
            &rhymes,
            IndexOptions::default(),
        );
        assert!(index.is_empty());
        assert_eq!(stats.degenerate, 3);
        assert_eq!(stats.sentences_seen, 3);
    }

    #[test]
    fn case_folding_merges_ending_words() {
        let rhymes = table(&[("night", &["Light"])]);
        let (index, _) = RhymeIndex::build(
            ["into the Night", "through the night"],
            &HeuristicSyllables,
            &rhymes,
            IndexOptions::default(),
        );
        assert_eq!(index.len(), 1);
        let entry = index.get("night").unwrap();
        assert_eq!(entry.lines.len(), 2);
        assert_eq!(entry.lines[0].text, "into the Night");
        assert!(entry.rhymes.contains("light"));
    }

    #[test]
    fn case_sensitive_keeps_words_apart() {
        let rhymes = table(&[("night", &[]), ("Night", &[])]);
        let options = IndexOptions {
            fold_case: false,
            prefilter: None,
        };
        let (index, _) = RhymeIndex::build(
            ["into the Night", "through the night"],
            &HeuristicSyllables,
            &rhymes,
            options,
        );
        assert_eq!(index.len(), 2);
        assert!(index.contains("Night"));
        assert!(index.contains("night"));
    }

    #[test]
    fn prefilter_skips_lookup_for_unusable_lines() {
        let calls = std::cell::Cell::new(0);
        let rhymes = |_: &str| -> Option<FxHashSet<String>> {
            calls.set(calls.get() + 1);
            Some(FxHashSet::default())
        };
        let options = IndexOptions {
            fold_case: true,
            prefilter: Some(VerseScheme::from_pattern("AA", &[("A", 3)], 0)),
        };
        let mut builder = RhymeIndexBuilder::new(&HeuristicSyllables, &rhymes, options);
        assert_eq!(builder.push("a cat sat"), Insertion::Added);
        assert_eq!(builder.push("a big fat rat"), Insertion::OutOfMeter);
        assert_eq!(calls.get(), 1);
        assert_eq!(builder.stats().out_of_meter, 1);
    }

    #[test]
    fn counters_track_words_and_syllables() {
        let rhymes = table(&[("sat", &["rat"]), ("rat", &["sat"])]);
        let (index, stats) = RhymeIndex::build(
            ["a cat sat", "a big fat rat"],
            &HeuristicSyllables,
            &rhymes,
            IndexOptions::default(),
        );
        assert_eq!(stats.words_processed, 7);
        assert_eq!(stats.syllables_seen, 7);
        assert_eq!(stats.ending_words, 2);
        assert_eq!(index.line_count(), 2);
    }
}
