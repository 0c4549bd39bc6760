//! Direction-affix stripping for relative-time phrases.
//!
//! Given a future and a past rendering of the same magnitude and unit
//! ("in 2 months" / "2 months ago"), the longest run of grapheme clusters the
//! two share is taken as the direction-neutral core. No grammar is involved,
//! so phrasings that share incidental text outside the core can pick up part
//! of it ("dentro de 2 m" / "hace 2 m" yields "e 2 m").

use crate::graphemes;

/// Longest common contiguous run of grapheme clusters, as a slice of `first`.
///
/// Ties go to the run that ends earliest in `first`.
pub fn longest_common_run<'a>(first: &'a str, second: &str) -> &'a str {
    let left = graphemes::split(first);
    let right = graphemes::split(second);
    if left.is_empty() || right.is_empty() {
        return "";
    }

    // Rolling rows of the O(n·m) table; `current[j + 1]` is the length of the
    // common run ending at left[i] and right[j].
    let mut previous = vec![0usize; right.len() + 1];
    let mut current = vec![0usize; right.len() + 1];
    let mut best_len = 0;
    let mut best_end = 0;

    for (i, left_cluster) in left.iter().enumerate() {
        for (j, right_cluster) in right.iter().enumerate() {
            current[j + 1] = if left_cluster == right_cluster {
                previous[j] + 1
            } else {
                0
            };
            if current[j + 1] > best_len {
                best_len = current[j + 1];
                best_end = i + 1;
            }
        }
        std::mem::swap(&mut previous, &mut current);
    }

    if best_len == 0 {
        return "";
    }

    let start: usize = left[..best_end - best_len].iter().map(|g| g.len()).sum();
    let len: usize = left[best_end - best_len..best_end]
        .iter()
        .map(|g| g.len())
        .sum();
    &first[start..start + len]
}

/// The shared core of a future/past phrase pair, trimmed of surrounding
/// whitespace.
pub fn strip_direction(future: &str, past: &str) -> String {
    longest_common_run(future, past).trim().to_string()
}
