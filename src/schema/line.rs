/// Candidate lyric lines.
use serde::{Deserialize, Serialize};

/// A candidate line of lyric text with its estimated syllable count.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Line {
    pub text: String,
    pub syllables: u32,
}

impl Line {
    pub fn new(text: impl Into<String>, syllables: u32) -> Self {
        Self {
            text: text.into(),
            syllables,
        }
    }

    /// The final whitespace-delimited token, exactly as written.
    pub fn last_word(&self) -> Option<&str> {
        self.text.split_whitespace().next_back()
    }
}

impl std::fmt::Display for Line {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.text)
    }
}
