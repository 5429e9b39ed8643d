// File: src/core/snapshot.rs
use crate::core::contractions::ContractionTable;
use crate::core::language::LanguageState;
use crate::core::prefix_index::NormalizedPrefixIndex;
use crate::core::vocabulary::{Vocabulary, VocabularyStore};
use crate::overlay::Overlay;
use std::collections::BTreeSet;
use std::sync::Arc;

/// Everything a ranking call or a decoder constraint query reads, bundled
/// into one immutable record.
///
/// The engine publishes a whole snapshot at a time, so the language codes a
/// reader sees always belong to the trie, index and contraction keys it
/// sees next to them.
#[derive(Debug, Clone)]
pub struct LanguageSnapshot {
    language: LanguageState,
    store: VocabularyStore,
    contractions: Arc<ContractionTable>,
    primary_index: Option<Arc<NormalizedPrefixIndex>>,
    secondary_index: Option<Arc<NormalizedPrefixIndex>>,
}

impl LanguageSnapshot {
    pub fn new(language: LanguageState, main: Arc<Vocabulary>) -> Self {
        let contractions = Arc::new(ContractionTable::empty(language.primary()));
        Self {
            language,
            store: VocabularyStore::new(main),
            contractions,
            primary_index: None,
            secondary_index: None,
        }
    }

    /// Installs a contraction table and rebuilds the contraction-key layer
    /// from it; the previous table's keys are discarded with it.
    pub fn with_contractions(mut self, table: Arc<ContractionTable>) -> Self {
        self.store = self
            .store
            .with_contraction_keys(Arc::new(table.key_vocabulary()));
        self.contractions = table;
        self
    }

    /// Accent index for a non-English primary; ignored for English.
    pub fn with_primary_index(mut self, index: Option<Arc<NormalizedPrefixIndex>>) -> Self {
        self.primary_index = index.filter(|_| !self.language.is_english_primary());
        self
    }

    pub fn with_secondary_index(mut self, index: Option<Arc<NormalizedPrefixIndex>>) -> Self {
        let code = index.as_ref().map(|i| i.language().to_string());
        self.language = self.language.with_secondary(code.as_deref());
        self.secondary_index = index;
        self
    }

    pub fn with_overlay(mut self, overlay: Arc<Overlay>) -> Self {
        self.store = self.store.with_overlay(overlay);
        self
    }

    pub fn with_language_state(mut self, language: LanguageState) -> Self {
        self.language = language;
        self
    }

    pub fn language(&self) -> &LanguageState {
        &self.language
    }

    pub fn store(&self) -> &VocabularyStore {
        &self.store
    }

    pub fn contractions(&self) -> &ContractionTable {
        &self.contractions
    }

    pub fn primary_index(&self) -> Option<&NormalizedPrefixIndex> {
        self.primary_index.as_deref()
    }

    pub fn secondary_index(&self) -> Option<&NormalizedPrefixIndex> {
        self.secondary_index.as_deref()
    }

    /// Shared handle to the secondary index, for carrying it into a rebuilt
    /// snapshot.
    pub fn shared_secondary_index(&self) -> Option<Arc<NormalizedPrefixIndex>> {
        self.secondary_index.clone()
    }

    // -- Decoder constraint view ------------------------------------------
    //
    // Union of: the primary accent index, the English tiered dictionary when
    // the language context allows it, the contraction keys and the overlay.
    // Disabled words stay reachable here; they are filtered after decoding.

    pub fn contains_word(&self, word: &str) -> bool {
        self.primary_index.as_ref().is_some_and(|i| i.contains_key(word))
            || (self.language.allows_english_dictionary() && self.store.main().trie().contains(word))
            || self.store.contraction_keys().trie().contains(word)
            || self.store.overlay().words().trie().contains(word)
    }

    pub fn is_valid_prefix(&self, prefix: &str) -> bool {
        self.primary_index.as_ref().is_some_and(|i| i.has_prefix(prefix))
            || (self.language.allows_english_dictionary() && self.store.main().trie().is_valid_prefix(prefix))
            || self.store.contraction_keys().trie().is_valid_prefix(prefix)
            || self.store.overlay().words().trie().is_valid_prefix(prefix)
    }

    pub fn allowed_next_chars(&self, prefix: &str) -> BTreeSet<char> {
        let mut allowed = BTreeSet::new();
        if let Some(index) = &self.primary_index {
            allowed.extend(index.allowed_next_chars(prefix));
        }
        if self.language.allows_english_dictionary() {
            allowed.extend(self.store.main().trie().allowed_next_chars(prefix));
        }
        allowed.extend(self.store.contraction_keys().trie().allowed_next_chars(prefix));
        allowed.extend(self.store.overlay().words().trie().allowed_next_chars(prefix));
        allowed
    }
}
