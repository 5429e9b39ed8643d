// src/lib.rs

pub mod config;
pub mod core;
pub mod error;
pub mod fuzzy;
pub mod loaders;
pub mod overlay;
pub mod persistence;

pub use crate::config::RankerConfig;
pub use crate::core::engine::PredictionEngine;
pub use crate::core::types::{CandidateWord, FilteredPrediction, PredictionSource, SwipeStats};
pub use crate::error::RankerError;
