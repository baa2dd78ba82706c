/// Line normalization: raw sentence to candidate `Line`.
use crate::core::syllables::SyllableEstimator;
use crate::schema::line::Line;

/// Trim a raw sentence into a candidate line and count its syllables.
///
/// Returns `None` for degenerate sentences: one character or less after
/// trimming, or no whitespace-delimited tokens. The syllable count is the
/// sum of the estimator's output over every token.
pub fn normalize_line<E>(raw: &str, estimator: &E) -> Option<Line>
where
    E: SyllableEstimator + ?Sized,
{
    let text = raw.trim();
    if text.chars().count() <= 1 {
        return None;
    }

    let mut tokens = text.split_whitespace().peekable();
    tokens.peek()?;
    let syllables = tokens.map(|word| estimator.estimate(word)).sum();

    Some(Line::new(text, syllables))
}
