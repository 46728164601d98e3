use once_cell::sync::Lazy;
use regex::Regex;

use crate::matching::strip_accents;
use crate::record::RawValue;

/// Unit words removed before reading a count. Longer forms first so that
/// "meses" is not left behind as "es".
pub const DURATION_UNITS: &[&str] = &["meses", "mês", "mes", "months", "month"];
pub const DELIVERY_UNITS: &[&str] = &["entregas", "entrega", "deliveries", "delivery"];
pub const TEAM_UNITS: &[&str] = &["pessoas", "pessoa", "people", "person", "equipe", "team"];

const CURRENCY_MARKERS: &[&str] = &["r$", "reais"];
const MILLION_WORDS: &[&str] = &["milhoes", "milhao", "millions", "million"];
const THOUSAND_WORDS: &[&str] = &["thousand", "mil"];

static NUMBER: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\d+[.,]?\d*").expect("number pattern should compile"));
static K_SUFFIX: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\d\s*k\b").expect("k-suffix pattern should compile"));

fn strip_tokens(text: &str, tokens: &[&str]) -> String {
    tokens
        .iter()
        .fold(text.to_lowercase(), |acc, t| acc.replace(t, ""))
        .trim()
        .to_string()
}

/// Counts are whole and non-negative.
fn truncate(n: f64) -> Option<i64> {
    if !n.is_finite() || n < 0.0 {
        return None;
    }
    let t = n.trunc();
    if t < i64::MIN as f64 || t > i64::MAX as f64 {
        return None;
    }
    Some(t as i64)
}

/// Count with optional unit words: "12 meses" → 12, "3.9" → 3.
/// Whatever remains after stripping units must be a single number.
pub fn parse_count(raw: &RawValue, units: &[&str]) -> Option<i64> {
    match raw {
        RawValue::Number(n) => truncate(*n),
        RawValue::Text(s) => {
            let cleaned = strip_tokens(s, units);
            cleaned.parse::<f64>().ok().and_then(truncate)
        }
    }
}

/// Scale implied by the text: million beats thousand beats a "k" suffix.
fn multiplier(text: &str) -> f64 {
    if MILLION_WORDS.iter().any(|w| text.contains(w)) {
        1_000_000.0
    } else if THOUSAND_WORDS.iter().any(|w| text.contains(w)) {
        1_000.0
    } else if K_SUFFIX.is_match(text) {
        1_000.0
    } else {
        1.0
    }
}

/// Money amount: "R$ 100000" → 100000.0, "200 mil" → 200000.0,
/// "1,5 milhão" → 1500000.0. Only the first number in the text is read.
pub fn parse_budget(raw: &RawValue) -> Option<f64> {
    match raw {
        RawValue::Number(n) if n.is_finite() && *n >= 0.0 => Some(*n),
        RawValue::Number(_) => None,
        RawValue::Text(s) => {
            let text = strip_accents(&strip_tokens(s, CURRENCY_MARKERS));
            let mult = multiplier(&text);
            let found = NUMBER.find(&text)?;
            if text[..found.start()].trim_end().ends_with('-') {
                return None;
            }
            let literal = found.as_str().replace(',', ".");
            let value = literal.parse::<f64>().ok()? * mult;
            value.is_finite().then_some(value)
        }
    }
}
