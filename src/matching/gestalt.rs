//! Ratcliff/Obershelp "gestalt" similarity: twice the number of matched
//! characters over the total length, where matches are found by repeatedly
//! taking the longest common block and recursing on both sides of it.
//!
//! Block selection follows the usual convention (earliest block in `a`,
//! then earliest in `b`), so scores line up with difflib-style matchers.
//! No junk heuristics are applied; vocabulary strings are short.

/// Longest common block of `a[alo..ahi]` and `b[blo..bhi]` as `(i, j, size)`.
fn longest_block(
    a: &[char],
    b: &[char],
    alo: usize,
    ahi: usize,
    blo: usize,
    bhi: usize,
) -> (usize, usize, usize) {
    let (mut best_i, mut best_j, mut best_size) = (alo, blo, 0);
    // prev[j + 1] = length of the common run ending at a[i - 1], b[j]
    let mut prev = vec![0usize; b.len() + 1];
    let mut cur = vec![0usize; b.len() + 1];

    for i in alo..ahi {
        for j in blo..bhi {
            if a[i] == b[j] {
                let k = prev[j] + 1;
                cur[j + 1] = k;
                if k > best_size {
                    best_i = i + 1 - k;
                    best_j = j + 1 - k;
                    best_size = k;
                }
            } else {
                cur[j + 1] = 0;
            }
        }
        std::mem::swap(&mut prev, &mut cur);
    }

    (best_i, best_j, best_size)
}

/// Total size of all matching blocks between `a` and `b`.
fn matched_chars(a: &[char], b: &[char]) -> usize {
    let mut total = 0;
    let mut pending = vec![(0, a.len(), 0, b.len())];

    while let Some((alo, ahi, blo, bhi)) = pending.pop() {
        let (i, j, k) = longest_block(a, b, alo, ahi, blo, bhi);
        if k == 0 {
            continue;
        }
        total += k;
        if alo < i && blo < j {
            pending.push((alo, i, blo, j));
        }
        if i + k < ahi && j + k < bhi {
            pending.push((i + k, ahi, j + k, bhi));
        }
    }

    total
}

/// Similarity in [0, 1]. Two empty strings are identical.
pub fn ratio(a: &str, b: &str) -> f64 {
    let a: Vec<char> = a.chars().collect();
    let b: Vec<char> = b.chars().collect();
    let total = a.len() + b.len();
    if total == 0 {
        return 1.0;
    }
    2.0 * matched_chars(&a, &b) as f64 / total as f64
}

#[cfg(test)]
mod tests {
    use super::*;

    fn close(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-9
    }

    #[test]
    fn test_identical_and_disjoint() {
        assert!(close(ratio("scrum", "scrum"), 1.0));
        assert!(close(ratio("abc", "xyz"), 0.0));
        assert!(close(ratio("", ""), 1.0));
        assert!(close(ratio("", "abc"), 0.0));
    }

    #[test]
    fn test_known_scores() {
        // "scrum" is fully contained in "scrumm": 2*5 / 11
        assert!(close(ratio("scrum", "scrumm"), 10.0 / 11.0));
        // classic example: "abcd" vs "bcde" share "bcd"
        assert!(close(ratio("abcd", "bcde"), 0.75));
        // blocks on both sides of the longest one are counted
        assert!(close(ratio("agile", "agil e"), 10.0 / 11.0));
    }

    #[test]
    fn test_longest_block_prefers_earliest() {
        let a: Vec<char> = "abab".chars().collect();
        let b: Vec<char> = "ab".chars().collect();
        assert_eq!(longest_block(&a, &b, 0, a.len(), 0, b.len()), (0, 0, 2));
    }
}
