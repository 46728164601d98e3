use tracing::warn;

use crate::matching::{fold_plain, FuzzyMatcher};
use crate::record::{FieldState, RawValue};

/// First entry equal to `matched` once accents and case are ignored. Keeps
/// the dataset's own spelling when several entries fold together.
fn resolve_canonical<'v>(matched: &'v str, vocabulary: &'v [String]) -> &'v str {
    let key = fold_plain(matched);
    vocabulary
        .iter()
        .find(|option| fold_plain(option) == key)
        .map(String::as_str)
        .unwrap_or(matched)
}

/// Blank input and a bare numeric zero stay absent; an unmatched value
/// becomes `Invalid` carrying the text as given.
pub fn match_categorical(
    raw: Option<&RawValue>,
    vocabulary: &[String],
    matcher: &FuzzyMatcher,
) -> FieldState<String> {
    let raw = match raw {
        None => return FieldState::Absent,
        Some(RawValue::Number(n)) if *n == 0.0 => return FieldState::Absent,
        Some(raw) => raw,
    };
    let text = raw.to_string();
    if text.trim().is_empty() {
        return FieldState::Absent;
    }

    match matcher.best_match(&text, vocabulary) {
        Some(hit) => FieldState::Valid(resolve_canonical(hit, vocabulary).to_string()),
        None => {
            warn!(value = %text, "no vocabulary entry close enough");
            FieldState::Invalid(text)
        }
    }
}
