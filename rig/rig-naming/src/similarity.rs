//! Sequence similarity for bone names.
//!
//! Implements the classic longest-matching-blocks ratio: find the longest
//! common contiguous run of characters, recurse on the pieces to its left
//! and right, and score `2 * matched / (len_a + len_b)`. Identical strings
//! score 1.0, fully disjoint strings 0.0.

use hashbrown::HashMap;

/// Computes the similarity ratio of two strings in `[0.0, 1.0]`.
///
/// Comparison is case-sensitive and operates on Unicode scalar values.
/// Two empty strings are considered identical.
///
/// # Example
///
/// ```
/// use rig_naming::similarity_ratio;
///
/// assert_eq!(similarity_ratio("abcd", "abcd"), 1.0);
/// assert_eq!(similarity_ratio("abcd", "bcde"), 0.75);
/// ```
#[must_use]
pub fn similarity_ratio(a: &str, b: &str) -> f64 {
    let a: Vec<char> = a.chars().collect();
    let b: Vec<char> = b.chars().collect();
    let total = a.len() + b.len();
    if total == 0 {
        return 1.0;
    }
    let matched = matching_chars(&a, &b);
    2.0 * matched as f64 / total as f64
}

/// Total characters covered by all matching blocks.
fn matching_chars(a: &[char], b: &[char]) -> usize {
    let (start_a, start_b, len) = longest_block(a, b);
    if len == 0 {
        return 0;
    }
    len + matching_chars(&a[..start_a], &b[..start_b])
        + matching_chars(&a[start_a + len..], &b[start_b + len..])
}

/// Finds the longest common contiguous block of `a` and `b`.
///
/// Returns `(start_a, start_b, length)`. Ties resolve to the earliest
/// start in `a`, then the earliest start in `b`.
fn longest_block(a: &[char], b: &[char]) -> (usize, usize, usize) {
    let mut positions: HashMap<char, Vec<usize>> = HashMap::new();
    for (j, &ch) in b.iter().enumerate() {
        positions.entry(ch).or_default().push(j);
    }

    let mut best = (0, 0, 0);
    // lengths[j] = length of the common block ending at a[i], b[j]
    let mut lengths: HashMap<usize, usize> = HashMap::new();
    for (i, ch) in a.iter().enumerate() {
        let mut row: HashMap<usize, usize> = HashMap::new();
        if let Some(js) = positions.get(ch) {
            for &j in js {
                let len = if j == 0 {
                    1
                } else {
                    lengths.get(&(j - 1)).copied().unwrap_or(0) + 1
                };
                row.insert(j, len);
                if len > best.2 {
                    best = (i + 1 - len, j + 1 - len, len);
                }
            }
        }
        lengths = row;
    }
    best
}
