// File: src/core/ranker.rs
//! Multi-pass candidate ranking.
//!
//! A ranking call runs against one published [`LanguageSnapshot`] and one
//! configuration value:
//!
//! 1. primary filter/score pass over the raw decoder candidates,
//! 2. custom-word autocorrect,
//! 3. dictionary fuzzy rescue (only when the list is short),
//! 4. contraction application,
//! 5. bilingual merge,
//! 6. final length-based selection.
//!
//! Passes 2-5 each run isolated: a pass that panics is logged and skipped,
//! and the list it was given carries on to the next pass.

use crate::config::RankerConfig;
use crate::core::contractions::{strip_apostrophes, CONTRACTION_KEY_FREQUENCY};
use crate::core::normalize::normalize;
use crate::core::snapshot::LanguageSnapshot;
use crate::core::tiers::FrequencyTierTable;
use crate::core::types::{
    is_lowercase_ascii_word, sort_by_score, CandidateWord, FilteredPrediction, PredictionSource, SwipeStats,
    Tier, WordInfo,
};
use crate::fuzzy::matcher::{fuzzy_match, match_quality, FuzzyParams};
use std::collections::HashSet;
use std::panic::{catch_unwind, AssertUnwindSafe};

/// Score multiplier for words found by dictionary fuzzy rescue.
pub const RESCUE_PENALTY: f32 = 0.8;
/// Paired contraction variants score this fraction of their base word.
pub const CONTRACTION_VARIANT_FACTOR: f32 = 0.95;
pub const BILINGUAL_CONFIDENCE_WEIGHT: f32 = 0.6;
pub const BILINGUAL_FREQUENCY_WEIGHT: f32 = 0.3;
/// Dictionary rescue only runs below this many predictions.
pub const RESCUE_MIN_PREDICTIONS: usize = 3;
pub const MAX_PREDICTIONS: usize = 10;
/// Size of the unfiltered fallback when the length filter empties the list.
pub const LENGTH_FALLBACK_PREDICTIONS: usize = 5;
pub const EXPECTED_LENGTH_TOLERANCE: usize = 2;

/// `(cw * confidence + fw * frequency) * boost`.
///
/// Monotonic in confidence and frequency for non-negative weights; the
/// boost scales the whole blend.
pub fn combined_score(confidence: f32, frequency: f32, boost: f32, confidence_weight: f32, frequency_weight: f32) -> f32 {
    (confidence_weight * confidence + frequency_weight * frequency) * boost
}

/// Borrowed view over a snapshot and a config; cheap to build per call.
pub struct CandidateRanker<'a> {
    config: &'a RankerConfig,
    snapshot: &'a LanguageSnapshot,
}

/// How the primary pass resolved a candidate.
enum Resolution {
    PrimaryIndex,
    Dictionary,
    ContractionKey,
}

impl<'a> CandidateRanker<'a> {
    pub fn new(config: &'a RankerConfig, snapshot: &'a LanguageSnapshot) -> Self {
        Self { config, snapshot }
    }

    /// Runs the whole pipeline. Never panics past this boundary: every pass
    /// after the primary one is isolated.
    pub fn rank(&self, candidates: &[CandidateWord], stats: &SwipeStats) -> Vec<FilteredPrediction> {
        let _span = tracing::debug_span!("rank", candidates = candidates.len()).entered();

        let (mut predictions, resolved) = self.filter_and_score(candidates, stats);
        sort_by_score(&mut predictions);
        tracing::trace!(count = predictions.len(), "primary pass");

        if self.config.autocorrect_enabled && !candidates.is_empty() {
            predictions = run_isolated("custom_autocorrect", predictions, |list| {
                self.custom_word_autocorrect(candidates, list)
            });
            if predictions.len() < RESCUE_MIN_PREDICTIONS && self.snapshot.language().allows_english_dictionary() {
                predictions = run_isolated("dictionary_rescue", predictions, |list| {
                    self.dictionary_rescue(candidates, stats, &resolved, list)
                });
            }
        }

        if !self.snapshot.contractions().is_empty() {
            predictions = run_isolated("contractions", predictions, |list| self.apply_contractions(candidates, list));
        }

        if self.snapshot.secondary_index().is_some() {
            predictions = run_isolated("bilingual_merge", predictions, |list| {
                self.bilingual_merge(candidates, stats, list)
            });
        }

        let selected = select_final(predictions, stats);
        tracing::debug!(returned = selected.len(), "ranking finished");
        selected
    }

    // -- Primary pass -----------------------------------------------------

    /// Returns the scored predictions and the set of raw words that resolved.
    fn filter_and_score(
        &self,
        candidates: &[CandidateWord],
        stats: &SwipeStats,
    ) -> (Vec<FilteredPrediction>, HashSet<String>) {
        let mut predictions = Vec::with_capacity(candidates.len());
        let mut seen: HashSet<&str> = HashSet::with_capacity(candidates.len());
        let mut resolved = HashSet::new();

        for candidate in candidates {
            // the decoder may emit a word twice; the first one is the stronger
            if !seen.insert(candidate.word.as_str()) {
                continue;
            }
            if let Some(prediction) = self.score_candidate(candidate, stats) {
                resolved.insert(candidate.word.clone());
                predictions.push(prediction);
            }
        }
        (predictions, resolved)
    }

    fn score_candidate(&self, candidate: &CandidateWord, stats: &SwipeStats) -> Option<FilteredPrediction> {
        let word = candidate.word.as_str();
        if !is_lowercase_ascii_word(word) || !self.passes_prefix_check(word, stats) {
            return None;
        }
        let store = self.snapshot.store();
        if store.is_disabled(word) {
            return None;
        }

        let (info, display, resolution) = self.resolve(word)?;

        let boost = match info.tier {
            Tier::Regular => {
                if !FrequencyTierTable::passes_threshold(word.len(), info.frequency, self.config.min_frequency) {
                    return None;
                }
                self.config.rare_penalty
            }
            tier => self.tier_boost(tier),
        };

        let confidence = sanitize(candidate.confidence);
        let score = combined_score(
            confidence,
            info.frequency,
            boost,
            self.config.confidence_weight,
            self.config.effective_frequency_weight(),
        );
        let source = match resolution {
            Resolution::PrimaryIndex => PredictionSource::Primary,
            Resolution::Dictionary => tier_source(info.tier),
            Resolution::ContractionKey => {
                PredictionSource::Contraction(self.snapshot.language().primary().to_string())
            }
        };
        Some(FilteredPrediction::new(word, display, score, confidence, info.frequency, source))
    }

    /// Primary index, then the composite dictionary (when the language
    /// context allows it), then the bare contraction keys.
    fn resolve(&self, word: &str) -> Option<(WordInfo, String, Resolution)> {
        if let Some(entry) = self.snapshot.primary_index().and_then(|index| index.best(word)) {
            return Some((
                WordInfo::new(entry.frequency(), Tier::Top),
                entry.canonical.clone(),
                Resolution::PrimaryIndex,
            ));
        }
        if self.snapshot.language().allows_english_dictionary() {
            if let Some(info) = self.snapshot.store().lookup(word) {
                return Some((info, word.to_string(), Resolution::Dictionary));
            }
        }
        self.snapshot
            .contractions()
            .non_paired_target(word)
            .map(|target| {
                (
                    WordInfo::new(CONTRACTION_KEY_FREQUENCY, Tier::Top),
                    target.to_string(),
                    Resolution::ContractionKey,
                )
            })
    }

    // -- Rescue pass 1: custom words --------------------------------------

    fn custom_word_autocorrect(&self, candidates: &[CandidateWord], predictions: &mut Vec<FilteredPrediction>) {
        let store = self.snapshot.store();
        let overlay = store.overlay();
        let params = self.fuzzy_params();
        let beam = self.beam(candidates);

        for custom in overlay.custom_words() {
            if store.is_disabled(custom) {
                continue;
            }
            let Some(info) = overlay.words().get(custom) else {
                continue;
            };
            let Some(candidate) = beam
                .iter()
                .filter(|c| is_lowercase_ascii_word(&c.word))
                .find(|c| fuzzy_match(&c.word, custom, &params))
            else {
                continue;
            };

            let confidence = sanitize(candidate.confidence);
            let quality = match_quality(&candidate.word, custom, self.config.use_edit_distance);
            let score = confidence * quality.powi(3) * self.tier_boost(info.tier);
            tracing::trace!(raw = %candidate.word, %custom, score, "custom word match");
            upsert(
                predictions,
                FilteredPrediction::new(
                    custom.as_str(),
                    custom.as_str(),
                    score,
                    confidence,
                    info.frequency,
                    PredictionSource::Custom,
                ),
            );
        }
    }

    // -- Rescue pass 2: dictionary fuzzy rescue ---------------------------

    fn dictionary_rescue(
        &self,
        candidates: &[CandidateWord],
        stats: &SwipeStats,
        resolved: &HashSet<String>,
        predictions: &mut Vec<FilteredPrediction>,
    ) {
        let store = self.snapshot.store();
        let params = self.fuzzy_params();
        let confidence_weight = self.config.confidence_weight;
        let frequency_weight = self.config.effective_frequency_weight();

        for candidate in self.beam(candidates) {
            if resolved.contains(&candidate.word) || !is_lowercase_ascii_word(&candidate.word) {
                continue;
            }
            let confidence = sanitize(candidate.confidence);
            let mut best: Option<(f32, &str, WordInfo)> = None;

            for word in store.words_near(candidate.word.len(), self.config.max_length_diff) {
                if word == candidate.word || store.is_disabled(word) || predictions.iter().any(|p| p.word == word) {
                    continue;
                }
                if !fuzzy_match(&candidate.word, word, &params) {
                    continue;
                }
                let Some(info) = store.lookup(word) else {
                    continue;
                };
                if info.tier == Tier::Regular
                    && !FrequencyTierTable::passes_threshold(word.len(), info.frequency, self.config.min_frequency)
                {
                    continue;
                }
                let quality = match_quality(&candidate.word, word, self.config.use_edit_distance);
                let score = RESCUE_PENALTY
                    * combined_score(confidence, info.frequency, 1.0, confidence_weight, frequency_weight)
                    * quality.powi(3)
                    * self.tier_boost(info.tier);
                if best.map_or(true, |(top, _, _)| score > top) {
                    best = Some((score, word, info));
                }
            }

            let Some((score, word, info)) = best else {
                continue;
            };
            if !self.passes_prefix_check(word, stats) {
                continue;
            }
            tracing::trace!(raw = %candidate.word, rescued = word, score, "dictionary rescue");
            predictions.push(FilteredPrediction::new(
                word,
                word,
                score,
                confidence,
                info.frequency,
                PredictionSource::Autocorrect,
            ));
        }
    }

    // -- Contractions -----------------------------------------------------

    fn apply_contractions(&self, candidates: &[CandidateWord], predictions: &mut Vec<FilteredPrediction>) {
        let table = self.snapshot.contractions();
        let raw_words: HashSet<&str> = candidates.iter().map(|c| c.word.as_str()).collect();
        let mut variants = Vec::new();

        for prediction in predictions.iter_mut() {
            if let Some(target) = table.non_paired_target(&prediction.word) {
                prediction.set_text(target);
                continue;
            }
            let Some(forms) = table.paired_variants(&prediction.word) else {
                continue;
            };
            for form in forms {
                let key = strip_apostrophes(form);
                if !raw_words.contains(key.as_str()) {
                    continue;
                }
                variants.push(FilteredPrediction::new(
                    key,
                    form.as_str(),
                    prediction.score * CONTRACTION_VARIANT_FACTOR,
                    prediction.confidence,
                    prediction.frequency,
                    PredictionSource::Contraction(prediction.source_label()),
                ));
            }
        }

        for variant in variants {
            if !predictions.iter().any(|p| p.display_text == variant.display_text) {
                predictions.push(variant);
            }
        }
    }

    // -- Bilingual merge --------------------------------------------------

    fn bilingual_merge(&self, candidates: &[CandidateWord], stats: &SwipeStats, predictions: &mut Vec<FilteredPrediction>) {
        let Some(index) = self.snapshot.secondary_index() else {
            return;
        };
        let store = self.snapshot.store();
        let multiplier = self.snapshot.language().language_multiplier();
        let mut present: HashSet<String> = predictions.iter().map(|p| normalize(&p.display_text)).collect();

        for candidate in candidates {
            let word = candidate.word.as_str();
            if !is_lowercase_ascii_word(word) || store.is_disabled(word) {
                continue;
            }
            if self.config.bilingual_prefix_gating && !self.passes_prefix_check(word, stats) {
                continue;
            }
            let confidence = sanitize(candidate.confidence);
            for entry in index.lookup_exact(word) {
                if !present.insert(normalize(&entry.canonical)) {
                    continue;
                }
                let score = (BILINGUAL_CONFIDENCE_WEIGHT * confidence
                    + BILINGUAL_FREQUENCY_WEIGHT * entry.frequency() * multiplier)
                    * self.config.secondary_prediction_weight;
                predictions.push(FilteredPrediction::new(
                    word,
                    entry.canonical.as_str(),
                    score,
                    confidence,
                    entry.frequency(),
                    PredictionSource::Secondary,
                ));
            }
        }
    }

    // -- Helpers ----------------------------------------------------------

    fn passes_prefix_check(&self, word: &str, stats: &SwipeStats) -> bool {
        if self.config.prefix_length == 0 {
            return true;
        }
        match stats.first_char {
            Some(first) => word
                .chars()
                .next()
                .is_some_and(|c| c.to_lowercase().eq(first.to_lowercase())),
            None => true,
        }
    }

    fn tier_boost(&self, tier: Tier) -> f32 {
        match tier {
            Tier::Common => self.config.common_boost,
            Tier::Top => self.config.top5000_boost,
            Tier::Regular => self.config.rare_penalty,
        }
    }

    fn fuzzy_params(&self) -> FuzzyParams {
        FuzzyParams {
            char_threshold: self.config.char_match_threshold,
            max_len_diff: self.config.max_length_diff,
            prefix_len: self.config.prefix_length,
            min_word_len: self.config.min_word_length,
        }
    }

    fn beam<'c>(&self, candidates: &'c [CandidateWord]) -> &'c [CandidateWord] {
        &candidates[..candidates.len().min(self.config.max_beam_candidates)]
    }
}

/// Used while no dictionary is loaded: format-checked candidates scored by
/// their own confidence, labelled `raw`.
pub fn raw_passthrough(candidates: &[CandidateWord], stats: &SwipeStats) -> Vec<FilteredPrediction> {
    let mut seen = HashSet::new();
    let mut predictions: Vec<FilteredPrediction> = candidates
        .iter()
        .filter(|c| is_lowercase_ascii_word(&c.word) && seen.insert(c.word.as_str()))
        .map(|c| {
            let confidence = sanitize(c.confidence);
            FilteredPrediction::new(c.word.as_str(), c.word.as_str(), confidence, confidence, 0.0, PredictionSource::Raw)
        })
        .collect();
    sort_by_score(&mut predictions);
    select_final(predictions, stats)
}

/// Length filter around the expected length, then the size cap.
pub fn select_final(predictions: Vec<FilteredPrediction>, stats: &SwipeStats) -> Vec<FilteredPrediction> {
    let Some(expected) = stats.expected_length else {
        return predictions.into_iter().take(MAX_PREDICTIONS).collect();
    };
    let near: Vec<FilteredPrediction> = predictions
        .iter()
        .filter(|p| p.display_text.chars().count().abs_diff(expected) <= EXPECTED_LENGTH_TOLERANCE)
        .take(MAX_PREDICTIONS)
        .cloned()
        .collect();
    if near.is_empty() {
        predictions.into_iter().take(LENGTH_FALLBACK_PREDICTIONS).collect()
    } else {
        near
    }
}

/// Runs one pass on a copy of the list. On panic the original list is kept.
fn run_isolated<F>(pass: &'static str, predictions: Vec<FilteredPrediction>, f: F) -> Vec<FilteredPrediction>
where
    F: FnOnce(&mut Vec<FilteredPrediction>),
{
    let mut working = predictions.clone();
    let result = catch_unwind(AssertUnwindSafe(move || {
        f(&mut working);
        working
    }));
    match result {
        Ok(mut updated) => {
            sort_by_score(&mut updated);
            tracing::trace!(pass, count = updated.len(), "pass finished");
            updated
        }
        Err(_) => {
            tracing::warn!(pass, "ranking pass panicked, keeping previous predictions");
            predictions
        }
    }
}

/// Keeps the higher-scoring entry when the word is already predicted.
fn upsert(predictions: &mut Vec<FilteredPrediction>, prediction: FilteredPrediction) {
    match predictions.iter_mut().find(|p| p.word == prediction.word) {
        Some(existing) => {
            if prediction.score > existing.score {
                *existing = prediction;
            }
        }
        None => predictions.push(prediction),
    }
}

fn tier_source(tier: Tier) -> PredictionSource {
    match tier {
        Tier::Common => PredictionSource::Common,
        Tier::Top => PredictionSource::Top5000,
        Tier::Regular => PredictionSource::Vocabulary,
    }
}

fn sanitize(confidence: f32) -> f32 {
    if confidence.is_finite() {
        confidence.clamp(0.0, 1.0)
    } else {
        0.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::contractions::{ContractionMappings, ContractionTable};
    use crate::core::language::LanguageState;
    use crate::core::prefix_index::NormalizedPrefixIndex;
    use crate::core::vocabulary::Vocabulary;
    use crate::overlay::Overlay;
    use std::collections::HashMap;
    use std::sync::Arc;

    fn c(word: &str, confidence: f32) -> CandidateWord {
        CandidateWord::new(word, confidence)
    }

    /// "the" Common, "quick" Common, "zzyzx" deep in the Regular tier.
    fn english() -> Arc<Vocabulary> {
        let mut entries: Vec<(String, u32)> = vec![("the".into(), 100_000), ("quick".into(), 90_000)];
        for i in 0..3200u32 {
            let a = (b'a' + (i / 676 % 26) as u8) as char;
            let b = (b'a' + (i / 26 % 26) as u8) as char;
            let d = (b'a' + (i % 26) as u8) as char;
            entries.push((format!("x{}{}{}", a, b, d), 50_000 - i));
        }
        entries.push(("zzyzx".into(), 1));
        Arc::new(Vocabulary::from_ranked("en", entries).unwrap())
    }

    fn snapshot() -> LanguageSnapshot {
        LanguageSnapshot::new(LanguageState::new("en", false), english())
    }

    fn words(predictions: &[FilteredPrediction]) -> Vec<&str> {
        predictions.iter().map(|p| p.display_text.as_str()).collect()
    }

    #[test]
    fn combined_score_blends_then_boosts() {
        assert!((combined_score(1.0, 0.5, 2.0, 0.6, 0.4) - 1.6).abs() < 1e-6);
        assert!(combined_score(0.9, 0.5, 1.0, 0.6, 0.4) > combined_score(0.8, 0.5, 1.0, 0.6, 0.4));
    }

    #[test]
    fn primary_pass_filters_format_prefix_and_rarity() {
        let config = RankerConfig::default();
        let snapshot = snapshot();
        let ranker = CandidateRanker::new(&config, &snapshot);
        let stats = SwipeStats { first_char: Some('t'), expected_length: None };

        let out = ranker.rank(&[c("the", 0.9), c("The", 0.9), c("quick", 0.9), c("zzyzx", 0.9)], &stats);
        assert_eq!(words(&out), ["the"]);
        assert_eq!(out[0].source_label(), "common");
    }

    #[test]
    fn regular_words_below_length_threshold_are_rejected() {
        let config = RankerConfig { autocorrect_enabled: false, ..RankerConfig::default() };
        let snapshot = snapshot();
        let ranker = CandidateRanker::new(&config, &snapshot);
        let out = ranker.rank(&[c("zzyzx", 1.0)], &SwipeStats::default());
        assert!(out.is_empty());
    }

    #[test]
    fn duplicate_candidates_keep_first() {
        let config = RankerConfig::default();
        let snapshot = snapshot();
        let out = CandidateRanker::new(&config, &snapshot).rank(&[c("the", 0.9), c("the", 0.1)], &SwipeStats::default());
        assert_eq!(out.iter().filter(|p| p.word == "the").count(), 1);
        assert_eq!(out[0].confidence, 0.9);
    }

    #[test]
    fn rescue_finds_nearby_word() {
        let config = RankerConfig::default();
        let snapshot = snapshot();
        let out = CandidateRanker::new(&config, &snapshot).rank(&[c("the", 0.9), c("qick", 0.4)], &SwipeStats::default());
        assert_eq!(out[0].word, "the");
        let quick = out.iter().find(|p| p.word == "quick").unwrap();
        assert_eq!(quick.source, PredictionSource::Autocorrect);
        // 0.8 * (0.6*0.4 + 0.4*f) * 0.8^3 * 1.3
        let expected = 0.8 * (0.6 * 0.4 + 0.4 * quick.frequency) * 0.512 * 1.3;
        assert!((quick.score - expected).abs() < 1e-5);
    }

    #[test]
    fn rescue_is_skipped_with_three_predictions() {
        let vocab = Arc::new(
            Vocabulary::from_ranked(
                "en",
                vec![("the".into(), 10), ("cat".into(), 9), ("sat".into(), 8), ("quick".into(), 7)],
            )
            .unwrap(),
        );
        let snapshot = LanguageSnapshot::new(LanguageState::new("en", false), vocab);
        let config = RankerConfig::default();
        let out = CandidateRanker::new(&config, &snapshot).rank(
            &[c("the", 0.9), c("cat", 0.8), c("sat", 0.7), c("qick", 0.6)],
            &SwipeStats::default(),
        );
        assert_eq!(out.len(), 3);
        assert!(out.iter().all(|p| p.source != PredictionSource::Autocorrect));
    }

    #[test]
    fn custom_words_autocorrect_and_keep_higher_score() {
        let mut overlay = Overlay::empty();
        overlay.add_custom_word("ferris", 9000);
        let snapshot = snapshot().with_overlay(Arc::new(overlay));
        let config = RankerConfig::default();
        let out = CandidateRanker::new(&config, &snapshot).rank(&[c("feris", 0.5)], &SwipeStats::default());
        let ferris = out.iter().find(|p| p.word == "ferris").unwrap();
        assert_eq!(ferris.source, PredictionSource::Custom);
        let quality: f32 = 1.0 - 1.0 / 6.0;
        assert!((ferris.score - 0.5 * quality.powi(3) * 1.3).abs() < 1e-5);
    }

    #[test]
    fn disabled_words_never_surface() {
        let mut overlay = Overlay::empty();
        overlay.disable("the");
        let snapshot = snapshot().with_overlay(Arc::new(overlay));
        let config = RankerConfig::default();
        let out = CandidateRanker::new(&config, &snapshot).rank(&[c("the", 0.9), c("thw", 0.5)], &SwipeStats::default());
        assert!(out.iter().all(|p| p.word != "the"));
    }

    #[test]
    fn contraction_keys_and_paired_variants() {
        let mut paired = HashMap::new();
        paired.insert("the".to_string(), vec!["the'd".to_string()]);
        let mut non_paired = HashMap::new();
        non_paired.insert("dont".to_string(), "don't".to_string());
        let table = ContractionTable::build("en", ContractionMappings { paired, non_paired }, |_| true);
        let snapshot = snapshot().with_contractions(Arc::new(table));
        let config = RankerConfig::default();
        let out = CandidateRanker::new(&config, &snapshot).rank(
            &[c("the", 0.9), c("dont", 0.8), c("thed", 0.1)],
            &SwipeStats::default(),
        );
        let dont = out.iter().find(|p| p.word == "dont").unwrap();
        assert_eq!(dont.display_text, "don't");
        assert_eq!(dont.insertion_text, "don't");
        let the = out.iter().find(|p| p.display_text == "the").unwrap();
        let variant = out.iter().find(|p| p.display_text == "the'd").unwrap();
        assert!((variant.score - the.score * 0.95).abs() < 1e-6);
        assert_eq!(variant.source_label(), "common-contraction");
    }

    #[test]
    fn bilingual_merge_dedups_by_normalized_form() {
        let secondary = Arc::new(NormalizedPrefixIndex::build(
            "es",
            vec![("the".into(), 0), ("qué".into(), 2), ("que".into(), 9)],
        ));
        let snapshot = snapshot().with_secondary_index(Some(secondary));
        let config = RankerConfig::default();
        let out = CandidateRanker::new(&config, &snapshot).rank(&[c("the", 0.9), c("que", 0.5)], &SwipeStats::default());
        assert_eq!(out.iter().filter(|p| normalize(&p.display_text) == "the").count(), 1);
        let que: Vec<_> = out.iter().filter(|p| p.word == "que").collect();
        assert_eq!(que.len(), 1);
        assert_eq!(que[0].display_text, "qué");
        assert_eq!(que[0].source, PredictionSource::Secondary);
        let expected = 0.6 * 0.5 + 0.3 * (1.0 - 2.0 / 255.0);
        assert!((que[0].score - expected).abs() < 1e-6);
    }

    #[test]
    fn final_selection_filters_by_length_with_fallback() {
        let list: Vec<FilteredPrediction> = ["a", "abcdefghij", "abcdefghijk", "ab", "abc", "abcd", "abcdefg"]
            .iter()
            .enumerate()
            .map(|(i, w)| FilteredPrediction::new(*w, *w, 1.0 - i as f32 * 0.1, 0.5, 0.5, PredictionSource::Raw))
            .collect();
        let near = select_final(list.clone(), &SwipeStats { first_char: None, expected_length: Some(3) });
        assert_eq!(words(&near), ["a", "ab", "abc", "abcd"]);
        let none = select_final(list.clone(), &SwipeStats { first_char: None, expected_length: Some(30) });
        assert_eq!(none.len(), 5);
        let uncapped: Vec<_> = list.iter().cycle().take(25).cloned().collect();
        assert_eq!(select_final(uncapped, &SwipeStats::default()).len(), 10);
    }

    #[test]
    fn raw_passthrough_scores_by_confidence() {
        let out = raw_passthrough(&[c("low", 0.2), c("Bad", 0.9), c("high", 0.8)], &SwipeStats::default());
        assert_eq!(words(&out), ["high", "low"]);
        assert!(out.iter().all(|p| p.source_label() == "raw"));
        assert_eq!(out[0].score, 0.8);
    }

    #[test]
    fn panicking_pass_keeps_previous_list() {
        let before = vec![FilteredPrediction::new("a", "a", 1.0, 1.0, 0.0, PredictionSource::Raw)];
        let after = run_isolated("boom", before.clone(), |_| panic!("pass failure"));
        assert_eq!(after, before);
    }
}
