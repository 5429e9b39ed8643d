// File: src/error.rs
use std::path::PathBuf;

/// Errors raised while loading dictionaries, language packs, preferences
/// or cached snapshots.
#[derive(Debug, thiserror::Error)]
pub enum RankerError {
    #[error("i/o error: {0}")]
    Io(#[from] std::io::Error),

    #[error("{source_name}:{line}: {reason}")]
    Parse {
        source_name: String,
        line: usize,
        reason: String,
    },

    #[error("invalid json: {0}")]
    Json(#[from] serde_json::Error),

    #[error("snapshot encoding failed: {0}")]
    Snapshot(#[from] bincode::Error),

    /// The dictionary source produced no usable words.
    #[error("dictionary for '{0}' contains no usable words")]
    EmptyDictionary(String),

    #[error("no language pack for '{language}' (looked in {path:?})")]
    MissingLanguagePack {
        language: String,
        path: Option<PathBuf>,
    },

    /// The primary dictionary has not been loaded yet.
    #[error("primary dictionary not loaded")]
    NotLoaded,
}

impl RankerError {
    pub fn parse(source_name: impl Into<String>, line: usize, reason: impl Into<String>) -> Self {
        RankerError::Parse {
            source_name: source_name.into(),
            line,
            reason: reason.into(),
        }
    }
}
