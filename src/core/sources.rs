// File: src/core/sources.rs
//! Interfaces of the collaborators the ranking core consumes. The crate's
//! file-backed implementations live in [`crate::loaders`].

use crate::core::contractions::ContractionMappings;
use crate::error::RankerError;
use crate::loaders;
use std::collections::HashSet;
use std::path::PathBuf;

/// A word from the system user dictionary.
#[derive(Debug, Clone, PartialEq)]
pub struct UserWord {
    pub word: String,
    pub frequency: u32,
    /// `None` or empty applies to every language.
    pub locale: Option<String>,
}

/// Produces the ranked `(word, raw frequency)` list for a language.
pub trait DictionarySource: Send + Sync {
    fn load(&self, language: &str) -> Result<Vec<(String, u32)>, RankerError>;
}

/// Locates language-pack files.
pub trait LanguagePackResolver: Send + Sync {
    fn dictionary_path(&self, language: &str) -> Option<PathBuf>;

    fn contractions_path(&self, language: &str) -> Option<PathBuf>;

    /// Accent-aware `(canonical, frequency rank)` entries for `language`.
    fn load_accent_dictionary(&self, language: &str) -> Result<Vec<(String, u8)>, RankerError> {
        match self.dictionary_path(language) {
            Some(path) if path.exists() => loaders::read_accent_dictionary(&path),
            path => Err(RankerError::MissingLanguagePack {
                language: language.to_string(),
                path,
            }),
        }
    }

    /// Contraction mappings for `language`; `Ok(None)` when the language has
    /// no contraction file, which is the normal case for most languages.
    fn load_contractions(&self, language: &str) -> Result<Option<ContractionMappings>, RankerError> {
        match self.contractions_path(language) {
            Some(path) if path.exists() => loaders::read_contractions(&path).map(Some),
            _ => Ok(None),
        }
    }
}

/// Key-value preference store holding the user's word overlays.
pub trait PreferenceStore: Send + Sync {
    fn custom_words(&self, language: &str) -> Result<Vec<(String, u32)>, RankerError>;

    fn disabled_words(&self, language: &str) -> Result<HashSet<String>, RankerError>;

    fn user_dictionary_words(&self) -> Result<Vec<UserWord>, RankerError>;
}

/// A preference store with nothing in it.
pub struct NoPreferences;

impl PreferenceStore for NoPreferences {
    fn custom_words(&self, _language: &str) -> Result<Vec<(String, u32)>, RankerError> {
        Ok(Vec::new())
    }

    fn disabled_words(&self, _language: &str) -> Result<HashSet<String>, RankerError> {
        Ok(HashSet::new())
    }

    fn user_dictionary_words(&self) -> Result<Vec<UserWord>, RankerError> {
        Ok(Vec::new())
    }
}

/// A resolver that knows no language packs.
pub struct NoLanguagePacks;

impl LanguagePackResolver for NoLanguagePacks {
    fn dictionary_path(&self, _language: &str) -> Option<PathBuf> {
        None
    }

    fn contractions_path(&self, _language: &str) -> Option<PathBuf> {
        None
    }
}

/// `"fr-FR"`, `"fr_fr"` and `"FR"` all become `"fr"`.
pub fn normalize_language_code(code: &str) -> String {
    code.trim()
        .split(['-', '_'])
        .next()
        .unwrap_or("")
        .to_ascii_lowercase()
}
