// src/core/types.rs
use serde::{Deserialize, Serialize};
use std::fmt;

/// Coarse frequency class selecting the multiplicative boost or penalty.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Tier {
    Common,
    Top,
    Regular,
}

/// Dictionary metadata for a single vocabulary word.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct WordInfo {
    /// Normalized frequency in `[0, 1]`.
    pub frequency: f32,
    pub tier: Tier,
}

impl WordInfo {
    pub fn new(frequency: f32, tier: Tier) -> Self {
        Self {
            frequency: frequency.clamp(0.0, 1.0),
            tier,
        }
    }
}

/// A raw `(word, confidence)` pair emitted by the gesture decoder.
#[derive(Debug, Clone, PartialEq)]
pub struct CandidateWord {
    pub word: String,
    pub confidence: f32,
}

impl CandidateWord {
    pub fn new(word: impl Into<String>, confidence: f32) -> Self {
        Self {
            word: word.into(),
            confidence,
        }
    }
}

/// Optional hints from the gesture layer.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SwipeStats {
    pub first_char: Option<char>,
    pub expected_length: Option<usize>,
}

/// Which branch of the pipeline produced a prediction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PredictionSource {
    Common,
    Top5000,
    Vocabulary,
    Primary,
    /// Contraction output; carries the label of whatever resolved it
    /// (a language code for bare contraction keys, a base label for
    /// paired variants).
    Contraction(String),
    Custom,
    Autocorrect,
    Secondary,
    /// Degraded pass-through used while no dictionary is loaded.
    Raw,
}

impl fmt::Display for PredictionSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PredictionSource::Common => f.write_str("common"),
            PredictionSource::Top5000 => f.write_str("top5000"),
            PredictionSource::Vocabulary => f.write_str("vocabulary"),
            PredictionSource::Primary => f.write_str("primary"),
            PredictionSource::Contraction(origin) => write!(f, "{}-contraction", origin),
            PredictionSource::Custom => f.write_str("custom"),
            PredictionSource::Autocorrect => f.write_str("autocorrect"),
            PredictionSource::Secondary => f.write_str("secondary"),
            PredictionSource::Raw => f.write_str("raw"),
        }
    }
}

/// A display-ready prediction.
///
/// `word` is the lookup key (apostrophe-free, unaccented); the insertion
/// and display texts are always identical.
#[derive(Debug, Clone, PartialEq)]
pub struct FilteredPrediction {
    pub word: String,
    pub insertion_text: String,
    pub display_text: String,
    pub score: f32,
    pub confidence: f32,
    pub frequency: f32,
    pub source: PredictionSource,
}

impl FilteredPrediction {
    pub fn new(
        word: impl Into<String>,
        text: impl Into<String>,
        score: f32,
        confidence: f32,
        frequency: f32,
        source: PredictionSource,
    ) -> Self {
        let text = text.into();
        Self {
            word: word.into(),
            insertion_text: text.clone(),
            display_text: text,
            score,
            confidence,
            frequency,
            source,
        }
    }

    pub fn source_label(&self) -> String {
        self.source.to_string()
    }

    /// Rewrites both texts together so they never diverge.
    pub fn set_text(&mut self, text: &str) {
        self.insertion_text = text.to_string();
        self.display_text = text.to_string();
    }
}

/// Sorts predictions by descending score; ties keep their current order.
pub fn sort_by_score(predictions: &mut [FilteredPrediction]) {
    predictions.sort_by(|a, b| b.score.total_cmp(&a.score));
}

/// True for words made only of `a`-`z`.
pub fn is_lowercase_ascii_word(word: &str) -> bool {
    !word.is_empty() && word.bytes().all(|b| b.is_ascii_lowercase())
}
