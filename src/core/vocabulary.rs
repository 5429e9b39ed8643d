// File: src/core/vocabulary.rs
use crate::core::tiers::FrequencyTierTable;
use crate::core::trie::VocabularyTrie;
use crate::core::types::{is_lowercase_ascii_word, Tier, WordInfo};
use crate::error::RankerError;
use crate::fuzzy::length_index::LengthBucketIndex;
use crate::overlay::Overlay;
use serde::{Deserialize, Serialize};
use std::cmp::Reverse;
use std::collections::HashMap;
use std::sync::Arc;

/// Word → metadata map together with its two derived views, kept in sync on
/// every insertion: the length buckets used by fuzzy rescue and the prefix
/// trie used to constrain the decoder.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Vocabulary {
    words: HashMap<String, WordInfo>,
    lengths: LengthBucketIndex,
    trie: VocabularyTrie,
}

impl Vocabulary {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds the tiered dictionary from `(word, raw frequency)` pairs.
    ///
    /// Entries are sorted by descending raw frequency (ties keep source
    /// order); the sorted rank picks the tier and the raw value is min-max
    /// normalized into `[0, 1]`. Words that are not `[a-z]+` after
    /// lowercasing are skipped.
    pub fn from_ranked(language: &str, entries: Vec<(String, u32)>) -> Result<Self, RankerError> {
        let total = entries.len();
        let mut seen: HashMap<String, usize> = HashMap::with_capacity(total);
        let mut ranked: Vec<(String, u32)> = Vec::with_capacity(total);

        for (word, raw) in entries {
            let word = word.trim().to_lowercase();
            if !is_lowercase_ascii_word(&word) {
                continue;
            }
            match seen.get(&word) {
                Some(&idx) => ranked[idx].1 = ranked[idx].1.max(raw),
                None => {
                    seen.insert(word.clone(), ranked.len());
                    ranked.push((word, raw));
                }
            }
        }

        if ranked.is_empty() {
            return Err(RankerError::EmptyDictionary(language.to_string()));
        }

        ranked.sort_by_key(|(_, raw)| Reverse(*raw));
        let max_raw = ranked[0].1 as f32;
        let min_raw = ranked[ranked.len() - 1].1 as f32;
        let span = max_raw - min_raw;

        let mut vocabulary = Self::new();
        for (rank, (word, raw)) in ranked.iter().enumerate() {
            let frequency = if span > 0.0 { (*raw as f32 - min_raw) / span } else { 1.0 };
            vocabulary.insert(word, WordInfo::new(frequency, FrequencyTierTable::tier_for_rank(rank)));
        }

        let (common, top, regular) = vocabulary.tier_counts();
        tracing::info!(
            language,
            words = vocabulary.len(),
            skipped = total - ranked.len(),
            common,
            top,
            regular,
            "tiered dictionary built"
        );
        Ok(vocabulary)
    }

    /// Inserts or overwrites a word and updates both derived views.
    pub fn insert(&mut self, word: &str, info: WordInfo) {
        if self.words.insert(word.to_string(), info).is_none() {
            self.lengths.insert(word);
            self.trie.insert(word);
        }
    }

    /// Inserts a custom or user word on the 1..=10000 frequency scale.
    pub fn insert_overlay(&mut self, word: &str, raw_frequency: u32) {
        let (tier, frequency) = FrequencyTierTable::overlay_entry(raw_frequency);
        self.insert(word, WordInfo::new(frequency, tier));
    }

    pub fn get(&self, word: &str) -> Option<&WordInfo> {
        self.words.get(word)
    }

    pub fn contains(&self, word: &str) -> bool {
        self.words.contains_key(word)
    }

    pub fn len(&self) -> usize {
        self.words.len()
    }

    pub fn is_empty(&self) -> bool {
        self.words.is_empty()
    }

    pub fn words_near(&self, len: usize, max_diff: usize) -> impl Iterator<Item = &str> {
        self.lengths.words_near(len, max_diff)
    }

    pub fn trie(&self) -> &VocabularyTrie {
        &self.trie
    }

    /// Number of (Common, Top, Regular) words.
    pub fn tier_counts(&self) -> (usize, usize, usize) {
        self.words.values().fold((0, 0, 0), |(c, t, r), info| match info.tier {
            Tier::Common => (c + 1, t, r),
            Tier::Top => (c, t + 1, r),
            Tier::Regular => (c, t, r + 1),
        })
    }
}

/// The layered vocabulary a ranking call sees: user overlay first, then the
/// active language's contraction keys, then the shared tiered dictionary.
///
/// Every layer sits behind an `Arc`, so swapping one layer (an overlay
/// reload, a language switch) never copies the others.
#[derive(Debug, Clone)]
pub struct VocabularyStore {
    main: Arc<Vocabulary>,
    contraction_keys: Arc<Vocabulary>,
    overlay: Arc<Overlay>,
}

impl VocabularyStore {
    pub fn new(main: Arc<Vocabulary>) -> Self {
        Self {
            main,
            contraction_keys: Arc::new(Vocabulary::new()),
            overlay: Arc::new(Overlay::empty()),
        }
    }

    pub fn with_contraction_keys(mut self, keys: Arc<Vocabulary>) -> Self {
        self.contraction_keys = keys;
        self
    }

    pub fn with_overlay(mut self, overlay: Arc<Overlay>) -> Self {
        self.overlay = overlay;
        self
    }

    pub fn main(&self) -> &Arc<Vocabulary> {
        &self.main
    }

    pub fn contraction_keys(&self) -> &Vocabulary {
        &self.contraction_keys
    }

    pub fn overlay(&self) -> &Overlay {
        &self.overlay
    }

    /// Composite lookup: overlay, then contraction keys, then main dictionary.
    pub fn lookup(&self, word: &str) -> Option<WordInfo> {
        self.overlay
            .words()
            .get(word)
            .or_else(|| self.contraction_keys.get(word))
            .or_else(|| self.main.get(word))
            .copied()
    }

    pub fn is_disabled(&self, word: &str) -> bool {
        self.overlay.is_disabled(word)
    }

    /// Rescue candidates from every layer. A word present in several layers
    /// may be yielded more than once; callers resolve it through `lookup`.
    pub fn words_near(&self, len: usize, max_diff: usize) -> impl Iterator<Item = &str> {
        self.overlay
            .words()
            .words_near(len, max_diff)
            .chain(self.contraction_keys.words_near(len, max_diff))
            .chain(self.main.words_near(len, max_diff))
    }
}
