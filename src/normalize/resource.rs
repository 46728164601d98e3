use crate::matching::fold_plain;
use crate::record::{RawValue, ResourceLevel};

/// Accent-free, lowercase word forms. Portuguese gender/number variants plus
/// the English level names the prompt uses.
const WORDS: &[(&str, ResourceLevel)] = &[
    ("baixo", ResourceLevel::Low),
    ("baixa", ResourceLevel::Low),
    ("baixos", ResourceLevel::Low),
    ("baixas", ResourceLevel::Low),
    ("low", ResourceLevel::Low),
    ("medio", ResourceLevel::Medium),
    ("media", ResourceLevel::Medium),
    ("medios", ResourceLevel::Medium),
    ("medias", ResourceLevel::Medium),
    ("medium", ResourceLevel::Medium),
    ("alto", ResourceLevel::High),
    ("alta", ResourceLevel::High),
    ("altos", ResourceLevel::High),
    ("altas", ResourceLevel::High),
    ("high", ResourceLevel::High),
];

/// "2", 2, "Alta", "MÉDIAS" → level. An integer outside 0..=2 is rejected
/// outright rather than looked up as a word.
pub fn parse_resource_level(raw: &RawValue) -> Option<ResourceLevel> {
    match raw {
        RawValue::Number(n) if n.is_finite() => ResourceLevel::from_index(n.trunc() as i64),
        RawValue::Number(_) => None,
        RawValue::Text(s) => {
            if let Ok(n) = s.trim().parse::<i64>() {
                return ResourceLevel::from_index(n);
            }
            let word = fold_plain(s);
            WORDS
                .iter()
                .find(|(w, _)| *w == word)
                .map(|&(_, level)| level)
        }
    }
}
