// File: src/core/language.rs
use crate::core::sources::normalize_language_code;
use std::collections::HashMap;

/// Lower bound of the bilingual multiplier, reached when the user writes
/// only in the primary language.
pub const PRIMARY_DOMINANT_PENALTY: f32 = 0.6;
/// Upper bound, reached when the user writes only in the secondary language.
pub const SECONDARY_DOMINANT_BOOST: f32 = 1.4;
pub const BALANCED_MULTIPLIER: f32 = 1.0;

pub const ENGLISH: &str = "en";

/// Language codes, English-fallback flag and the detection multiplier used
/// by the bilingual merge pass. Published as part of a snapshot; every
/// change produces a new value rather than mutating a shared one.
#[derive(Debug, Clone, PartialEq)]
pub struct LanguageState {
    primary: String,
    secondary: Option<String>,
    english_fallback: bool,
    /// Set when a non-English primary has no usable language pack.
    primary_pack_missing: bool,
    language_multiplier: f32,
}

impl LanguageState {
    pub fn new(primary: &str, english_fallback: bool) -> Self {
        Self {
            primary: normalize_language_code(primary),
            secondary: None,
            english_fallback,
            primary_pack_missing: false,
            language_multiplier: BALANCED_MULTIPLIER,
        }
    }

    pub fn primary(&self) -> &str {
        &self.primary
    }

    pub fn secondary(&self) -> Option<&str> {
        self.secondary.as_deref()
    }

    pub fn language_multiplier(&self) -> f32 {
        self.language_multiplier
    }

    pub fn is_english_primary(&self) -> bool {
        self.primary == ENGLISH
    }

    pub fn primary_pack_missing(&self) -> bool {
        self.primary_pack_missing
    }

    /// Whether the English tiered dictionary may contribute: always for an
    /// English primary, otherwise with fallback enabled or when the primary
    /// language pack could not be loaded.
    pub fn allows_english_dictionary(&self) -> bool {
        self.is_english_primary() || self.english_fallback || self.primary_pack_missing
    }

    pub fn with_primary_pack_missing(mut self, missing: bool) -> Self {
        self.primary_pack_missing = missing && !self.is_english_primary();
        self
    }

    pub fn with_secondary(mut self, secondary: Option<&str>) -> Self {
        self.secondary = secondary.map(normalize_language_code);
        self.language_multiplier = BALANCED_MULTIPLIER;
        self
    }

    /// Recomputes the multiplier from per-language detection scores.
    ///
    /// The secondary language's share of the combined score interpolates
    /// linearly from the penalty (share 0) through 1.0 (share 0.5) to the
    /// boost (share 1). With auto-switching enabled a share past the
    /// threshold snaps straight to the bound.
    pub fn update_language_multiplier(
        &mut self,
        scores: &HashMap<String, f32>,
        auto_switch_enabled: bool,
        auto_switch_threshold: f32,
    ) {
        let Some(secondary) = self.secondary.as_deref() else {
            self.language_multiplier = BALANCED_MULTIPLIER;
            return;
        };

        let score_for = |code: &str| -> f32 {
            scores
                .iter()
                .filter(|(lang, _)| normalize_language_code(lang) == code)
                .map(|(_, &s)| s.max(0.0))
                .sum()
        };
        let primary_score = score_for(&self.primary);
        let secondary_score = score_for(secondary);
        let total = primary_score + secondary_score;
        if total <= 0.0 {
            self.language_multiplier = BALANCED_MULTIPLIER;
            return;
        }

        let share = secondary_score / total;
        let multiplier = if auto_switch_enabled && share >= auto_switch_threshold {
            SECONDARY_DOMINANT_BOOST
        } else if auto_switch_enabled && share <= 1.0 - auto_switch_threshold {
            PRIMARY_DOMINANT_PENALTY
        } else if share >= 0.5 {
            BALANCED_MULTIPLIER + (share - 0.5) * 2.0 * (SECONDARY_DOMINANT_BOOST - BALANCED_MULTIPLIER)
        } else {
            BALANCED_MULTIPLIER - (0.5 - share) * 2.0 * (BALANCED_MULTIPLIER - PRIMARY_DOMINANT_PENALTY)
        };

        tracing::trace!(primary_score, secondary_score, multiplier, "language multiplier updated");
        self.language_multiplier = multiplier.clamp(PRIMARY_DOMINANT_PENALTY, SECONDARY_DOMINANT_BOOST);
    }
}
