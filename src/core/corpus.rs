/// Source text ingestion: sentence splitting and de-duplication.
use rustc_hash::FxHashSet;

/// Characters at which source text is broken into candidate lines.
pub const LINE_BREAKS: &[char] = &[',', '.', '!', '?', ';', ':'];

/// Candidate sentences in first-seen order, with exact duplicates removed.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Sentences {
    pub sentences: Vec<String>,
    /// How many exact repeats were dropped.
    pub duplicates: usize,
}

impl Sentences {
    pub fn len(&self) -> usize {
        self.sentences.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sentences.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.sentences.iter().map(String::as_str)
    }
}

/// Split raw text into candidate sentences.
///
/// Newlines are treated as spaces, so a sentence may span several lines of
/// the source. Fragments are not trimmed here; the normalizer does that.
pub fn split_sentences(text: &str) -> Sentences {
    let flattened = text.replace(['\r', '\n'], " ");

    let mut seen: FxHashSet<&str> = FxHashSet::default();
    let mut sentences = Vec::new();
    let mut duplicates = 0;
    for fragment in flattened.split(LINE_BREAKS) {
        if seen.insert(fragment) {
            sentences.push(fragment.to_string());
        } else {
            duplicates += 1;
        }
    }

    Sentences {
        sentences,
        duplicates,
    }
}
