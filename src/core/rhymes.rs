/// Perfect rhyme lookup: the `RhymeSource` seam and a CMU pronouncing dictionary.
use rustc_hash::{FxHashMap, FxHashSet};
use std::collections::BTreeMap;
use std::path::Path;
use thiserror::Error;

use crate::core::syllables::{estimate_syllables, SyllableEstimator};

#[derive(Debug, Error)]
pub enum DictionaryError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("line {line}: {reason}")]
    Parse { line: usize, reason: String },
}

/// Looks up the words that perfectly rhyme with a word.
///
/// `None` means the source knows nothing about the word. `Some` with an
/// empty set means the word is known but has no perfect rhymes.
pub trait RhymeSource {
    fn perfect_rhymes(&self, word: &str) -> Option<FxHashSet<String>>;
}

impl<F> RhymeSource for F
where
    F: Fn(&str) -> Option<FxHashSet<String>>,
{
    fn perfect_rhymes(&self, word: &str) -> Option<FxHashSet<String>> {
        self(word)
    }
}

/// A pronouncing dictionary in CMU format.
///
/// ```text
/// ;;; comment
/// night N AY1 T
/// read R EH1 D
/// read(2) R IY1 D
/// ```
///
/// Words are stored lowercased and looked up case-insensitively. Two words
/// rhyme perfectly when some pronunciation of each shares every phoneme from
/// the last stressed vowel to the end.
#[derive(Debug, Clone, Default)]
pub struct PronouncingDictionary {
    pronunciations: FxHashMap<String, Vec<Vec<String>>>,
    /// Rhyme part (stress-free phonemes joined by spaces) → words, in load order.
    rhyme_parts: FxHashMap<String, Vec<String>>,
}

impl PronouncingDictionary {
    pub fn new() -> Self {
        Self::default()
    }

    /// Load a dictionary from a CMU-format file.
    pub fn load(path: &Path) -> Result<Self, DictionaryError> {
        let contents = std::fs::read_to_string(path)?;
        Self::parse(&contents)
    }

    /// Parse a dictionary from CMU-format text.
    pub fn parse(input: &str) -> Result<Self, DictionaryError> {
        let mut dict = Self::new();
        for (i, raw) in input.lines().enumerate() {
            let entry = parse_entry(raw).map_err(|reason| DictionaryError::Parse {
                line: i + 1,
                reason,
            })?;
            if let Some((word, phonemes)) = entry {
                dict.insert(&word, phonemes);
            }
        }
        Ok(dict)
    }

    /// Add one pronunciation of `word`.
    pub fn insert(&mut self, word: &str, phonemes: Vec<String>) {
        let word = word.to_lowercase();
        if let Some(part) = rhyme_part(&phonemes) {
            let words = self.rhyme_parts.entry(part).or_default();
            if !words.contains(&word) {
                words.push(word.clone());
            }
        }
        self.pronunciations.entry(word).or_default().push(phonemes);
    }

    pub fn contains(&self, word: &str) -> bool {
        self.pronunciations.contains_key(&word.to_lowercase())
    }

    pub fn len(&self) -> usize {
        self.pronunciations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pronunciations.is_empty()
    }

    /// Syllable count of the word's first pronunciation.
    pub fn syllables(&self, word: &str) -> Option<u32> {
        let prons = self.pronunciations.get(&word.to_lowercase())?;
        prons.first().map(|p| vowel_count(p))
    }

    /// Perfect rhymes of `word`, grouped by the rhyme's syllable count.
    ///
    /// Returns `None` for words not in the dictionary.
    pub fn perfect_rhymes_by_syllables(&self, word: &str) -> Option<BTreeMap<u32, Vec<String>>> {
        let word = word.to_lowercase();
        let prons = self.pronunciations.get(&word)?;

        let mut grouped: BTreeMap<u32, Vec<String>> = BTreeMap::new();
        let mut seen: FxHashSet<&str> = FxHashSet::default();
        for pron in prons {
            let Some(part) = rhyme_part(pron) else {
                continue;
            };
            let Some(candidates) = self.rhyme_parts.get(&part) else {
                continue;
            };
            for candidate in candidates {
                if *candidate == word || !seen.insert(candidate.as_str()) {
                    continue;
                }
                let count = self.syllables(candidate).unwrap_or(0);
                grouped.entry(count).or_default().push(candidate.clone());
            }
        }
        Some(grouped)
    }
}

impl RhymeSource for PronouncingDictionary {
    fn perfect_rhymes(&self, word: &str) -> Option<FxHashSet<String>> {
        let grouped = self.perfect_rhymes_by_syllables(word)?;
        Some(grouped.into_values().flatten().collect())
    }
}

/// Dictionary syllable counts, with the vowel-group heuristic for unknown words.
impl SyllableEstimator for PronouncingDictionary {
    fn estimate(&self, word: &str) -> u32 {
        let cleaned = word.trim_matches(|c: char| !c.is_alphanumeric() && c != '\'');
        self.syllables(cleaned)
            .unwrap_or_else(|| estimate_syllables(word))
    }
}

/// Parse one dictionary line. `Ok(None)` for blank and comment lines.
fn parse_entry(raw: &str) -> Result<Option<(String, Vec<String>)>, String> {
    let line = match raw.find('#') {
        Some(pos) => &raw[..pos],
        None => raw,
    };
    let line = line.trim();
    if line.is_empty() || line.starts_with(";;;") {
        return Ok(None);
    }

    let mut tokens = line.split_whitespace();
    let term = tokens.next().ok_or_else(|| "missing word".to_string())?;
    let word = strip_variant(term);
    if word.is_empty() {
        return Err(format!("invalid word '{}'", term));
    }

    let mut phonemes = Vec::new();
    for ph in tokens {
        if !is_phoneme(ph) {
            return Err(format!("invalid phoneme '{}' for '{}'", ph, word));
        }
        phonemes.push(ph.to_string());
    }
    if phonemes.is_empty() {
        return Err(format!("no phonemes for '{}'", word));
    }

    Ok(Some((word.to_string(), phonemes)))
}

/// `read(2)` → `read`.
fn strip_variant(term: &str) -> &str {
    if let Some(open) = term.rfind('(') {
        let suffix = &term[open + 1..];
        if let Some(digits) = suffix.strip_suffix(')') {
            if !digits.is_empty() && digits.bytes().all(|b| b.is_ascii_digit()) {
                return &term[..open];
            }
        }
    }
    term
}

/// ARPABET symbol: uppercase letters, with an optional trailing stress digit.
fn is_phoneme(ph: &str) -> bool {
    let base = ph.trim_end_matches(|c: char| c.is_ascii_digit());
    let stress = &ph[base.len()..];
    !base.is_empty() && base.bytes().all(|b| b.is_ascii_uppercase()) && stress.len() <= 1
}

fn stress_of(ph: &str) -> Option<u8> {
    ph.bytes().last().filter(u8::is_ascii_digit).map(|b| b - b'0')
}

fn vowel_count(phonemes: &[String]) -> u32 {
    phonemes.iter().filter(|p| stress_of(p).is_some()).count() as u32
}

/// Stress-free phonemes from the last primary-stressed vowel onward.
///
/// Falls back to the last secondary-stressed vowel, then the last vowel.
fn rhyme_part(phonemes: &[String]) -> Option<String> {
    let last_with = |stress: u8| phonemes.iter().rposition(|p| stress_of(p) == Some(stress));
    let start = last_with(1)
        .or_else(|| last_with(2))
        .or_else(|| phonemes.iter().rposition(|p| stress_of(p).is_some()))?;

    let part: Vec<&str> = phonemes[start..]
        .iter()
        .map(|p| p.trim_end_matches(|c: char| c.is_ascii_digit()))
        .collect();
    Some(part.join(" "))
}
