// src/matching/mod.rs

pub mod gestalt;
pub mod text;

pub use text::{fold, fold_plain, strip_accents};

use serde::{Deserialize, Serialize};
use tracing::debug;

pub const DEFAULT_CUTOFF: f64 = 0.6;

/// String similarity used to score candidates. All variants return [0, 1].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Similarity {
    /// Ratcliff/Obershelp matching-blocks ratio.
    #[default]
    Gestalt,
    Levenshtein,
    JaroWinkler,
}

impl Similarity {
    pub fn score(self, a: &str, b: &str) -> f64 {
        match self {
            Similarity::Gestalt => gestalt::ratio(a, b),
            Similarity::Levenshtein => strsim::normalized_levenshtein(a, b),
            Similarity::JaroWinkler => strsim::jaro_winkler(a, b),
        }
    }
}

/// Approximate matcher over an ordered vocabulary.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FuzzyMatcher {
    pub cutoff: f64,
    pub similarity: Similarity,
}

impl Default for FuzzyMatcher {
    fn default() -> Self {
        Self {
            cutoff: DEFAULT_CUTOFF,
            similarity: Similarity::default(),
        }
    }
}

impl FuzzyMatcher {
    pub fn new(cutoff: f64, similarity: Similarity) -> Self {
        Self { cutoff, similarity }
    }

    /// Index of the best-scoring entry, if it reaches the cutoff.
    /// Ties keep the entry seen first.
    pub fn best_index(&self, candidate: &str, vocabulary: &[String]) -> Option<usize> {
        let needle = fold(candidate);
        let mut best: Option<(usize, f64)> = None;

        for (idx, entry) in vocabulary.iter().enumerate() {
            // vocabulary entry on the left, candidate on the right
            let score = self.similarity.score(&fold(entry), &needle);
            if score < self.cutoff {
                continue;
            }
            match best {
                Some((_, best_score)) if score <= best_score => {}
                _ => best = Some((idx, score)),
            }
        }

        debug!(
            candidate = %candidate,
            best = ?best.map(|(i, s)| (&vocabulary[i], s)),
            "fuzzy match"
        );
        best.map(|(idx, _)| idx)
    }

    /// The vocabulary entry closest to `candidate`, or `None` when unmatched.
    pub fn best_match<'v>(&self, candidate: &str, vocabulary: &'v [String]) -> Option<&'v str> {
        self.best_index(candidate, vocabulary)
            .map(|idx| vocabulary[idx].as_str())
    }
}
