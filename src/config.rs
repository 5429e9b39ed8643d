// File: src/config.rs
use crate::error::RankerError;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Tunable options for the ranking pipeline.
///
/// Every field has a default, so a JSON file only needs to name the options
/// it overrides.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RankerConfig {
    pub confidence_weight: f32,
    pub frequency_weight: f32,
    pub common_boost: f32,
    pub top5000_boost: f32,
    pub rare_penalty: f32,
    pub max_length_diff: usize,
    /// Minimum prefix length enforced by the prefix-accuracy check and by
    /// fuzzy matching. 0 disables the first-character check.
    pub prefix_length: usize,
    pub max_beam_candidates: usize,
    pub min_word_length: usize,
    pub char_match_threshold: f32,
    pub use_edit_distance: bool,
    pub autocorrect_enabled: bool,
    /// Multiplier applied to `frequency_weight` for decoder candidates.
    pub neural_frequency_weight: f32,
    pub secondary_prediction_weight: f32,
    pub auto_switch_enabled: bool,
    pub auto_switch_threshold: f32,
    /// Minimum frequency on the 1..=10000 scale; 0 leaves only the
    /// per-length table in force.
    pub min_frequency: u32,
    /// Apply the prefix-accuracy check to bilingual merge entries too.
    pub bilingual_prefix_gating: bool,
    /// Language of the tiered fallback dictionary.
    pub fallback_language: String,
}

impl Default for RankerConfig {
    fn default() -> Self {
        Self {
            confidence_weight: 0.6,
            frequency_weight: 0.4,
            common_boost: 1.3,
            top5000_boost: 1.0,
            rare_penalty: 0.75,
            max_length_diff: 2,
            prefix_length: 1,
            max_beam_candidates: 5,
            min_word_length: 3,
            char_match_threshold: 0.6,
            use_edit_distance: true,
            autocorrect_enabled: true,
            neural_frequency_weight: 1.0,
            secondary_prediction_weight: 1.0,
            auto_switch_enabled: false,
            auto_switch_threshold: 0.7,
            min_frequency: 0,
            bilingual_prefix_gating: false,
            fallback_language: "en".to_string(),
        }
    }
}

impl RankerConfig {
    pub fn from_json_str(json: &str) -> Result<Self, RankerError> {
        let config: RankerConfig = serde_json::from_str(json)?;
        Ok(config.validate())
    }

    pub fn from_json_file(path: &Path) -> Result<Self, RankerError> {
        let content = std::fs::read_to_string(path)?;
        Self::from_json_str(&content)
    }

    /// Clamps out-of-range values into their usable ranges.
    pub fn validate(mut self) -> Self {
        fn clamp_logged(name: &str, value: &mut f32, min: f32, max: f32) {
            let clamped = value.clamp(min, max);
            if clamped != *value || value.is_nan() {
                tracing::warn!(option = name, value = *value, clamped, "config value out of range");
                *value = if value.is_nan() { min } else { clamped };
            }
        }

        clamp_logged("confidence_weight", &mut self.confidence_weight, 0.0, 10.0);
        clamp_logged("frequency_weight", &mut self.frequency_weight, 0.0, 10.0);
        clamp_logged("common_boost", &mut self.common_boost, 0.0, 10.0);
        clamp_logged("top5000_boost", &mut self.top5000_boost, 0.0, 10.0);
        clamp_logged("rare_penalty", &mut self.rare_penalty, 0.0, 10.0);
        clamp_logged("char_match_threshold", &mut self.char_match_threshold, 0.0, 1.0);
        clamp_logged("neural_frequency_weight", &mut self.neural_frequency_weight, 0.0, 10.0);
        clamp_logged("secondary_prediction_weight", &mut self.secondary_prediction_weight, 0.0, 10.0);
        clamp_logged("auto_switch_threshold", &mut self.auto_switch_threshold, 0.5, 1.0);
        self.min_frequency = self.min_frequency.min(10_000);
        if self.fallback_language.trim().is_empty() {
            self.fallback_language = "en".to_string();
        }
        self
    }

    /// Frequency weight as seen by decoder candidates.
    pub fn effective_frequency_weight(&self) -> f32 {
        self.frequency_weight * self.neural_frequency_weight
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn partial_json_keeps_defaults() {
        let config = RankerConfig::from_json_str(r#"{"common_boost": 2.0, "prefix_length": 0}"#).unwrap();
        assert_eq!(config.common_boost, 2.0);
        assert_eq!(config.prefix_length, 0);
        assert_eq!(config.max_beam_candidates, 5);
        assert_eq!(config.fallback_language, "en");
    }

    #[test]
    fn out_of_range_values_are_clamped() {
        let config = RankerConfig::from_json_str(
            r#"{"char_match_threshold": 3.5, "min_frequency": 50000, "auto_switch_threshold": 0.1}"#,
        )
        .unwrap();
        assert_eq!(config.char_match_threshold, 1.0);
        assert_eq!(config.min_frequency, 10_000);
        assert_eq!(config.auto_switch_threshold, 0.5);
    }

    #[test]
    fn malformed_json_is_an_error() {
        assert!(matches!(
            RankerConfig::from_json_str("{not json"),
            Err(RankerError::Json(_))
        ));
    }
}
