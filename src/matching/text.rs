use unicode_normalization::{char::is_combining_mark, UnicodeNormalization};

/// Decompose and drop combining marks: "Média" → "Media".
pub fn strip_accents(s: &str) -> String {
    s.nfd().filter(|c| !is_combining_mark(*c)).collect()
}

/// Trim + lowercase. The form every fuzzy comparison runs on.
pub fn fold(s: &str) -> String {
    s.trim().to_lowercase()
}

/// Trim, lowercase and strip accents.
pub fn fold_plain(s: &str) -> String {
    strip_accents(&fold(s))
}
