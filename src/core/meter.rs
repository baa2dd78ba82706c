/// Meter filtering.
use crate::schema::line::Line;
use crate::schema::scheme::VerseScheme;

/// Whether `syllables` falls within `target ± padding`, bounds inclusive.
pub fn in_meter(syllables: u32, target: u32, padding: u32) -> bool {
    target.saturating_sub(padding) <= syllables && syllables <= target.saturating_add(padding)
}

/// Lines of `lines` that fit `target ± padding`.
pub fn lines_in_meter<'a>(lines: &'a [Line], target: u32, padding: u32) -> Vec<&'a Line> {
    lines
        .iter()
        .filter(|l| in_meter(l.syllables, target, padding))
        .collect()
}

/// Whether a line of this length could fill any position of the scheme.
pub fn fits_scheme(syllables: u32, scheme: &VerseScheme) -> bool {
    scheme
        .targets()
        .into_iter()
        .any(|target| in_meter(syllables, target, scheme.padding))
}
