//! Property-based tests for the fuzzy primitives and accent folding.
//!
//! 1. **Symmetry**: overlap, quality and the fuzzy gate don't care about
//!    argument order.
//! 2. **Identity**: a word always matches itself with quality 1.0.
//! 3. **Bounds**: every ratio stays in `[0, 1]`.
//! 4. **Idempotence**: folding an already folded word changes nothing.

use proptest::prelude::*;
use ranker_core::core::normalize::normalize;
use ranker_core::core::types::is_lowercase_ascii_word;
use ranker_core::fuzzy::matcher::{char_overlap_ratio, edit_distance, fuzzy_match, match_quality, FuzzyParams};

fn arb_word() -> impl Strategy<Value = String> {
    prop::string::string_regex("[a-z]{0,12}").unwrap()
}

fn arb_unicode_word() -> impl Strategy<Value = String> {
    prop::collection::vec(any::<char>(), 0..16).prop_map(|chars| chars.into_iter().collect())
}

fn chars(s: &str) -> Vec<char> {
    s.chars().collect()
}

fn params(prefix_len: usize) -> FuzzyParams {
    FuzzyParams {
        char_threshold: 0.6,
        max_len_diff: 2,
        prefix_len,
        min_word_len: 3,
    }
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(500))]

    #[test]
    fn overlap_is_symmetric_and_bounded(a in arb_word(), b in arb_word()) {
        let ab = char_overlap_ratio(&chars(&a), &chars(&b));
        let ba = char_overlap_ratio(&chars(&b), &chars(&a));
        prop_assert!((ab - ba).abs() < 1e-6);
        prop_assert!((0.0..=1.0).contains(&ab));
    }

    #[test]
    fn quality_is_symmetric_and_bounded(a in arb_word(), b in arb_word(), edit in any::<bool>()) {
        let ab = match_quality(&a, &b, edit);
        let ba = match_quality(&b, &a, edit);
        prop_assert!((ab - ba).abs() < 1e-6);
        prop_assert!((0.0..=1.0).contains(&ab));
    }

    #[test]
    fn word_matches_itself(a in arb_word(), edit in any::<bool>()) {
        prop_assert_eq!(match_quality(&a, &a, edit), 1.0);
        prop_assert_eq!(edit_distance(&chars(&a), &chars(&a)), 0);
        prop_assert_eq!(fuzzy_match(&a, &a, &params(1)), a.len() >= 3);
    }

    #[test]
    fn fuzzy_gate_is_symmetric(a in arb_word(), b in arb_word(), prefix in 0usize..3) {
        prop_assert_eq!(fuzzy_match(&a, &b, &params(prefix)), fuzzy_match(&b, &a, &params(prefix)));
    }

    #[test]
    fn edit_distance_bounded_by_longer_word(a in arb_word(), b in arb_word()) {
        let d = edit_distance(&chars(&a), &chars(&b));
        prop_assert!(d <= a.len().max(b.len()));
        prop_assert!(d >= a.len().abs_diff(b.len()));
    }

    #[test]
    fn folding_is_idempotent_and_ascii(word in arb_unicode_word()) {
        let folded = normalize(&word);
        prop_assert_eq!(normalize(&folded), folded.clone());
        prop_assert!(folded.is_empty() || is_lowercase_ascii_word(&folded));
    }
}
