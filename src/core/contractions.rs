// File: src/core/contractions.rs
use crate::core::types::{is_lowercase_ascii_word, Tier, WordInfo};
use crate::core::vocabulary::Vocabulary;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Frequency given to non-paired contraction keys so they survive filtering.
pub const CONTRACTION_KEY_FREQUENCY: f32 = 0.6;

/// Raw mappings as read from a language pack.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ContractionMappings {
    /// Real word → its apostrophe variants ("they" → ["they'd", "they're"]).
    #[serde(default)]
    pub paired: HashMap<String, Vec<String>>,
    /// Apostrophe-free non-word → apostrophe form ("dont" → "don't").
    #[serde(default)]
    pub non_paired: HashMap<String, String>,
}

/// Apostrophe-form resolution for one language.
///
/// A table is built whole for a language and never edited afterwards; a
/// language switch builds a new one, so keys from the previous language
/// cannot leak into the new snapshot.
#[derive(Debug, Clone, Default)]
pub struct ContractionTable {
    language: String,
    paired: HashMap<String, Vec<String>>,
    non_paired: HashMap<String, String>,
}

impl ContractionTable {
    pub fn empty(language: &str) -> Self {
        Self {
            language: language.to_string(),
            ..Self::default()
        }
    }

    /// Builds the table, dropping paired entries whose base word is unknown
    /// to `base_exists` and non-paired keys that are not `[a-z]+`.
    pub fn build(language: &str, mappings: ContractionMappings, base_exists: impl Fn(&str) -> bool) -> Self {
        let mut table = Self::empty(language);
        let mut dropped = 0usize;

        for (base, variants) in mappings.paired {
            let base = base.trim().to_lowercase();
            if !base_exists(&base) {
                dropped += 1;
                continue;
            }
            let mut forms: Vec<String> = Vec::with_capacity(variants.len());
            for variant in variants {
                let variant = canonical_apostrophes(&variant.trim().to_lowercase());
                if is_lowercase_ascii_word(&strip_apostrophes(&variant)) && !forms.contains(&variant) {
                    forms.push(variant);
                }
            }
            if !forms.is_empty() {
                table.paired.insert(base, forms);
            }
        }

        for (key, target) in mappings.non_paired {
            let key = key.trim().to_lowercase();
            if !is_lowercase_ascii_word(&key) {
                dropped += 1;
                continue;
            }
            table
                .non_paired
                .insert(key, canonical_apostrophes(&target.trim().to_lowercase()));
        }

        tracing::debug!(
            language,
            paired = table.paired.len(),
            non_paired = table.non_paired.len(),
            dropped,
            "contraction table built"
        );
        table
    }

    pub fn language(&self) -> &str {
        &self.language
    }

    pub fn paired_variants(&self, base: &str) -> Option<&[String]> {
        self.paired.get(base).map(Vec::as_slice)
    }

    pub fn non_paired_target(&self, key: &str) -> Option<&str> {
        self.non_paired.get(key).map(String::as_str)
    }

    /// Non-paired keys as a vocabulary layer (Top tier, fixed frequency), so
    /// they pass dictionary lookup and appear in the constraint trie.
    pub fn key_vocabulary(&self) -> Vocabulary {
        let mut vocabulary = Vocabulary::new();
        for key in self.non_paired.keys() {
            vocabulary.insert(key, WordInfo::new(CONTRACTION_KEY_FREQUENCY, Tier::Top));
        }
        vocabulary
    }

    pub fn is_empty(&self) -> bool {
        self.paired.is_empty() && self.non_paired.is_empty()
    }
}

/// "they've" → "theyve".
pub fn strip_apostrophes(form: &str) -> String {
    form.chars().filter(|&c| c != '\'' && c != '\u{2019}').collect()
}

fn canonical_apostrophes(form: &str) -> String {
    form.replace('\u{2019}', "'")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn mappings() -> ContractionMappings {
        serde_json::from_str(
            r#"{
                "paired": {"they": ["they'd", "they’re", "they'd"], "ghost": ["ghost's"]},
                "non_paired": {"dont": "don't", "Cant": "can't", "o'clock": "o'clock"}
            }"#,
        )
        .unwrap()
    }

    #[test]
    fn builds_and_validates() {
        let table = ContractionTable::build("en", mappings(), |w| w == "they");
        assert_eq!(table.paired_variants("they").unwrap(), ["they'd", "they're"]);
        assert!(table.paired_variants("ghost").is_none());
        assert_eq!(table.non_paired_target("cant"), Some("can't"));
        assert!(table.non_paired_target("o'clock").is_none());
    }

    #[test]
    fn key_vocabulary_holds_non_paired_keys() {
        let table = ContractionTable::build("en", mappings(), |_| true);
        let keys = table.key_vocabulary();
        assert_eq!(keys.len(), 2);
        assert_eq!(keys.get("dont"), Some(&WordInfo::new(0.6, Tier::Top)));
        assert!(keys.trie().contains("cant"));
    }

    #[test]
    fn missing_sections_default_to_empty() {
        let mappings: ContractionMappings = serde_json::from_str(r#"{"non_paired": {"im": "i'm"}}"#).unwrap();
        let table = ContractionTable::build("en", mappings, |_| false);
        assert!(!table.is_empty());
        assert!(ContractionTable::empty("fr").is_empty());
    }

    #[test]
    fn strips_both_apostrophe_styles() {
        assert_eq!(strip_apostrophes("they've"), "theyve");
        assert_eq!(strip_apostrophes("they’re"), "theyre");
    }
}
