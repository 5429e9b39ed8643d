// File: src/fuzzy/matcher.rs
//! Character-overlap and edit-distance similarity primitives.
//!
//! Everything here is a pure function over two words, so the ranker can call
//! them from any thread without coordination.

use std::collections::HashMap;

/// Parameters for [`fuzzy_match`], taken from the ranker configuration.
#[derive(Debug, Clone, Copy)]
pub struct FuzzyParams {
    pub char_threshold: f32,
    pub max_len_diff: usize,
    pub prefix_len: usize,
    pub min_word_len: usize,
}

/// Boolean gate: lengths close enough, both words long enough, same leading
/// `prefix_len` characters, and enough shared characters.
///
/// The cheap length and prefix gates run before anything is allocated; the
/// rescue pass calls this for every word in several length buckets.
pub fn fuzzy_match(a: &str, b: &str, params: &FuzzyParams) -> bool {
    let (len_a, len_b) = (a.chars().count(), b.chars().count());

    if len_a.abs_diff(len_b) > params.max_len_diff {
        return false;
    }
    if len_a.min(len_b) < params.min_word_len {
        return false;
    }
    if params.prefix_len > 0 {
        if len_a < params.prefix_len || len_b < params.prefix_len {
            return false;
        }
        if !a.chars().take(params.prefix_len).eq(b.chars().take(params.prefix_len)) {
            return false;
        }
    }
    let a: Vec<char> = a.chars().collect();
    let b: Vec<char> = b.chars().collect();
    char_overlap_ratio(&a, &b) >= params.char_threshold
}

/// Continuous similarity in `[0, 1]`.
pub fn match_quality(a: &str, b: &str, use_edit_distance: bool) -> f32 {
    let a: Vec<char> = a.chars().collect();
    let b: Vec<char> = b.chars().collect();
    let longest = a.len().max(b.len());
    if longest == 0 {
        return 1.0;
    }
    if use_edit_distance {
        1.0 - edit_distance(&a, &b) as f32 / longest as f32
    } else {
        positional_match_ratio(&a, &b)
    }
}

/// Multiset intersection of characters over the longer length.
pub fn char_overlap_ratio(a: &[char], b: &[char]) -> f32 {
    let longest = a.len().max(b.len());
    if longest == 0 {
        return 1.0;
    }
    let mut counts: HashMap<char, usize> = HashMap::new();
    for &c in a {
        *counts.entry(c).or_insert(0) += 1;
    }
    let mut shared = 0usize;
    for c in b {
        if let Some(count) = counts.get_mut(c) {
            if *count > 0 {
                *count -= 1;
                shared += 1;
            }
        }
    }
    shared as f32 / longest as f32
}

/// Equal characters at equal positions over the longer length.
pub fn positional_match_ratio(a: &[char], b: &[char]) -> f32 {
    let longest = a.len().max(b.len());
    if longest == 0 {
        return 1.0;
    }
    let same = a.iter().zip(b.iter()).filter(|(x, y)| x == y).count();
    same as f32 / longest as f32
}

/// Levenshtein distance with two rolling rows.
/// O(n*m) time, O(m) memory.
pub fn edit_distance(a: &[char], b: &[char]) -> usize {
    if a.is_empty() {
        return b.len();
    }
    if b.is_empty() {
        return a.len();
    }

    let mut prev: Vec<usize> = (0..=b.len()).collect();
    let mut curr: Vec<usize> = vec![0; b.len() + 1];

    for (i, ca) in a.iter().enumerate() {
        curr[0] = i + 1;
        for (j, cb) in b.iter().enumerate() {
            let cost = usize::from(ca != cb);
            curr[j + 1] = (curr[j] + 1).min(prev[j + 1] + 1).min(prev[j] + cost);
        }
        std::mem::swap(&mut prev, &mut curr);
    }
    prev[b.len()]
}

#[cfg(test)]
mod tests {
    use super::*;

    fn chars(s: &str) -> Vec<char> {
        s.chars().collect()
    }

    fn params(threshold: f32, max_len_diff: usize, prefix_len: usize) -> FuzzyParams {
        FuzzyParams {
            char_threshold: threshold,
            max_len_diff,
            prefix_len,
            min_word_len: 3,
        }
    }

    #[test]
    fn edit_distance_basics() {
        assert_eq!(edit_distance(&chars("qick"), &chars("quick")), 1);
        assert_eq!(edit_distance(&chars("kitten"), &chars("sitting")), 3);
        assert_eq!(edit_distance(&chars(""), &chars("abc")), 3);
        assert_eq!(edit_distance(&chars("same"), &chars("same")), 0);
    }

    #[test]
    fn overlap_counts_repeated_letters_once_each() {
        // "aab" vs "abb": shared multiset is {a, b}
        assert!((char_overlap_ratio(&chars("aab"), &chars("abb")) - 2.0 / 3.0).abs() < 1e-6);
        assert_eq!(char_overlap_ratio(&chars("qick"), &chars("quick")), 0.8);
    }

    #[test]
    fn fuzzy_gate_checks_each_condition() {
        assert!(fuzzy_match("qick", "quick", &params(0.6, 1, 1)));
        // length difference
        assert!(!fuzzy_match("qick", "quickly", &params(0.6, 1, 1)));
        // prefix
        assert!(!fuzzy_match("qick", "quick", &params(0.6, 1, 2)));
        // minimum length
        assert!(!fuzzy_match("qi", "qu", &params(0.0, 1, 0)));
        // overlap threshold
        assert!(!fuzzy_match("qxyz", "quick", &params(0.6, 1, 1)));
    }

    #[test]
    fn quality_modes() {
        assert!((match_quality("qick", "quick", true) - 0.8).abs() < 1e-6);
        // positional: q matches, i/u, c/i, k/c -> 1 of 5
        assert!((match_quality("qick", "quick", false) - 0.2).abs() < 1e-6);
        assert_eq!(match_quality("", "", true), 1.0);
        assert_eq!(match_quality("word", "word", false), 1.0);
    }
}
