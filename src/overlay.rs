// File: src/overlay.rs
use crate::core::sources::{normalize_language_code, PreferenceStore};
use crate::core::types::is_lowercase_ascii_word;
use crate::core::vocabulary::Vocabulary;
use std::collections::HashSet;

/// Custom words, user-dictionary words and disabled words for one language.
///
/// Rebuilt on every overlay reload without touching the tiered dictionary.
#[derive(Debug, Clone, Default)]
pub struct Overlay {
    words: Vocabulary,
    /// Custom and user words in the order they were added; rescue pass 1
    /// walks them in this order.
    custom_order: Vec<String>,
    disabled: HashSet<String>,
}

impl Overlay {
    pub fn empty() -> Self {
        Self::default()
    }

    /// Reads every overlay source for `language`. A source that fails is
    /// logged and contributes nothing; the other sources still apply.
    pub fn load(prefs: &dyn PreferenceStore, language: &str) -> Self {
        let language = normalize_language_code(language);
        let mut overlay = Self::empty();

        match prefs.custom_words(&language) {
            Ok(words) => {
                for (word, frequency) in words {
                    overlay.add_custom_word(&word, frequency);
                }
            }
            Err(e) => tracing::warn!(%language, error = %e, "custom words unreadable, overlay left empty"),
        }

        match prefs.user_dictionary_words() {
            Ok(words) => {
                for user_word in words {
                    let applies = user_word
                        .locale
                        .as_deref()
                        .map(|locale| locale.is_empty() || normalize_language_code(locale) == language)
                        .unwrap_or(true);
                    if applies {
                        overlay.add_custom_word(&user_word.word, user_word.frequency);
                    }
                }
            }
            Err(e) => tracing::warn!(error = %e, "user dictionary unreadable"),
        }

        match prefs.disabled_words(&language) {
            Ok(words) => {
                for word in words {
                    overlay.disable(&word);
                }
            }
            Err(e) => tracing::warn!(%language, error = %e, "disabled words unreadable"),
        }

        tracing::debug!(
            %language,
            custom = overlay.custom_order.len(),
            disabled = overlay.disabled.len(),
            "overlay loaded"
        );
        overlay
    }

    /// Adds a custom/user word. Returns `false` for words that are not
    /// `[a-z]+` after lowercasing.
    pub fn add_custom_word(&mut self, word: &str, raw_frequency: u32) -> bool {
        let word = word.trim().to_lowercase();
        if !is_lowercase_ascii_word(&word) {
            tracing::debug!(%word, "custom word rejected");
            return false;
        }
        if !self.words.contains(&word) {
            self.custom_order.push(word.clone());
        }
        self.words.insert_overlay(&word, raw_frequency);
        true
    }

    pub fn disable(&mut self, word: &str) {
        let word = word.trim().to_lowercase();
        if !word.is_empty() {
            self.disabled.insert(word);
        }
    }

    pub fn words(&self) -> &Vocabulary {
        &self.words
    }

    pub fn custom_words(&self) -> &[String] {
        &self.custom_order
    }

    pub fn is_disabled(&self, word: &str) -> bool {
        self.disabled.contains(word)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::sources::UserWord;
    use crate::core::types::Tier;
    use crate::error::RankerError;

    struct Prefs {
        fail_custom: bool,
    }

    impl PreferenceStore for Prefs {
        fn custom_words(&self, language: &str) -> Result<Vec<(String, u32)>, RankerError> {
            if self.fail_custom {
                return Err(RankerError::parse("prefs", 1, "bad blob"));
            }
            assert_eq!(language, "en");
            Ok(vec![("Rustacean".into(), 9000), ("x-ray".into(), 5000), ("ferris".into(), 500)])
        }

        fn disabled_words(&self, _language: &str) -> Result<HashSet<String>, RankerError> {
            Ok(HashSet::from(["damn".to_string()]))
        }

        fn user_dictionary_words(&self) -> Result<Vec<UserWord>, RankerError> {
            Ok(vec![
                UserWord { word: "tokio".into(), frequency: 3000, locale: Some("en_US".into()) },
                UserWord { word: "bonjourno".into(), frequency: 3000, locale: Some("fr".into()) },
                UserWord { word: "serde".into(), frequency: 3000, locale: None },
            ])
        }
    }

    #[test]
    fn loads_all_sources_for_language() {
        let overlay = Overlay::load(&Prefs { fail_custom: false }, "en-GB");
        assert_eq!(overlay.custom_words(), ["rustacean", "ferris", "tokio", "serde"]);
        assert_eq!(overlay.words().get("rustacean").unwrap().tier, Tier::Common);
        assert_eq!(overlay.words().get("ferris").unwrap().tier, Tier::Top);
        assert!(overlay.is_disabled("damn"));
        assert!(!overlay.words().contains("bonjourno"));
    }

    #[test]
    fn failing_source_clears_only_its_part() {
        let overlay = Overlay::load(&Prefs { fail_custom: true }, "en");
        assert_eq!(overlay.custom_words(), ["tokio", "serde"]);
        assert!(overlay.is_disabled("damn"));
    }

    #[test]
    fn re_adding_keeps_order() {
        let mut overlay = Overlay::empty();
        overlay.add_custom_word("alpha", 10);
        overlay.add_custom_word("beta", 10);
        overlay.add_custom_word("alpha", 9500);
        assert_eq!(overlay.custom_words(), ["alpha", "beta"]);
        assert_eq!(overlay.words().get("alpha").unwrap().tier, Tier::Common);
    }
}
