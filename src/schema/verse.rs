/// Finished verses.
use serde::{Deserialize, Serialize};

use crate::schema::line::Line;

/// An assembled verse, lines in presentation order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Verse {
    pub lines: Vec<Line>,
}

impl Verse {
    pub fn texts(&self) -> Vec<&str> {
        self.lines.iter().map(|l| l.text.as_str()).collect()
    }

    pub fn len(&self) -> usize {
        self.lines.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }
}

impl std::fmt::Display for Verse {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        for (i, line) in self.lines.iter().enumerate() {
            if i > 0 {
                writeln!(f)?;
            }
            write!(f, "{}", line.text)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_joins_lines() {
        let verse = Verse {
            lines: vec![Line::new("a cat sat", 3), Line::new("a big fat rat", 4)],
        };
        assert_eq!(verse.to_string(), "a cat sat\na big fat rat");
        assert_eq!(verse.texts(), vec!["a cat sat", "a big fat rat"]);
    }
}
