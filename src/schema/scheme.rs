/// Verse schemes: the meter targets and rhyme pattern a verse must satisfy.
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// One position in a verse: which meter slot it uses and which rhyme group it belongs to.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LineSlot {
    pub meter: String,
    pub rhyme: String,
}

/// Positions of a verse that must all rhyme with one another.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RhymeGroup {
    pub label: String,
    /// Presentation positions, ascending. The first one holds the seed line.
    pub positions: Vec<usize>,
}

/// A meter and rhyme scheme, fixed for the duration of a generation run.
///
/// `lines` is the presentation order. Each line looks up its syllable target
/// in `meter` by name; `padding` is the shared tolerance.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VerseScheme {
    #[serde(default)]
    pub padding: u32,
    pub meter: BTreeMap<String, u32>,
    pub lines: Vec<LineSlot>,
}

impl VerseScheme {
    /// Build a scheme whose meter slot names double as rhyme labels,
    /// e.g. `from_pattern("ABAB", &[("A", 8), ("B", 6)], 1)`.
    pub fn from_pattern(pattern: &str, targets: &[(&str, u32)], padding: u32) -> Self {
        let lines = pattern
            .chars()
            .filter(|c| !c.is_whitespace())
            .map(|c| LineSlot {
                meter: c.to_string(),
                rhyme: c.to_string(),
            })
            .collect();
        Self {
            padding,
            meter: targets
                .iter()
                .map(|(name, target)| (name.to_string(), *target))
                .collect(),
            lines,
        }
    }

    /// Common meter: alternating eight and six syllable lines, rhymed ABAB.
    pub fn ballad() -> Self {
        Self::from_pattern("ABAB", &[("A", 8), ("B", 6)], 1)
    }

    pub fn len(&self) -> usize {
        self.lines.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    /// Syllable target for the line at `position`.
    pub fn target_at(&self, position: usize) -> Option<u32> {
        let slot = self.lines.get(position)?;
        self.meter.get(&slot.meter).copied()
    }

    /// Every distinct syllable target used by some line of the scheme.
    pub fn targets(&self) -> Vec<u32> {
        let mut targets: Vec<u32> = (0..self.lines.len())
            .filter_map(|pos| self.target_at(pos))
            .collect();
        targets.sort_unstable();
        targets.dedup();
        targets
    }

    /// Rhyme groups in order of first appearance.
    pub fn rhyme_groups(&self) -> Vec<RhymeGroup> {
        let mut groups: Vec<RhymeGroup> = Vec::new();
        for (pos, slot) in self.lines.iter().enumerate() {
            match groups.iter_mut().find(|g| g.label == slot.rhyme) {
                Some(group) => group.positions.push(pos),
                None => groups.push(RhymeGroup {
                    label: slot.rhyme.clone(),
                    positions: vec![pos],
                }),
            }
        }
        groups
    }

    /// Check that the scheme has lines and that every line names a known meter slot.
    pub fn validate(&self) -> Result<(), String> {
        if self.lines.is_empty() {
            return Err("scheme has no lines".to_string());
        }
        for (pos, slot) in self.lines.iter().enumerate() {
            if !self.meter.contains_key(&slot.meter) {
                return Err(format!(
                    "line {} uses meter slot '{}' which has no syllable target",
                    pos, slot.meter
                ));
            }
        }
        Ok(())
    }
}

impl Default for VerseScheme {
    fn default() -> Self {
        Self::ballad()
    }
}
