// File: src/core/engine.rs
use crate::config::RankerConfig;
use crate::core::contractions::ContractionTable;
use crate::core::language::LanguageState;
use crate::core::normalize::normalize;
use crate::core::prefix_index::NormalizedPrefixIndex;
use crate::core::ranker::{raw_passthrough, CandidateRanker};
use crate::core::snapshot::LanguageSnapshot;
use crate::core::sources::{normalize_language_code, DictionarySource, LanguagePackResolver, PreferenceStore};
use crate::core::types::{CandidateWord, FilteredPrediction, SwipeStats};
use crate::core::vocabulary::Vocabulary;
use crate::error::RankerError;
use crate::overlay::Overlay;
use parking_lot::{Mutex, RwLock};
use std::collections::{BTreeSet, HashMap};
use std::sync::Arc;

/// The prediction engine: owns the collaborators, the configuration and the
/// currently published [`LanguageSnapshot`].
///
/// Readers (`rank` and the constraint queries) clone the snapshot `Arc` and
/// drop the lock straight away. Writers build a complete replacement while
/// holding the build lock, then publish it in one store; a reader therefore
/// sees either the old language or the new one, never a mix.
pub struct PredictionEngine {
    config: RwLock<Arc<RankerConfig>>,
    dictionaries: Box<dyn DictionarySource>,
    packs: Box<dyn LanguagePackResolver>,
    preferences: Box<dyn PreferenceStore>,
    snapshot: RwLock<Option<Arc<LanguageSnapshot>>>,
    /// Build lock. Also holds the language configuration staged for the
    /// next build.
    staged: Mutex<LanguageState>,
}

impl PredictionEngine {
    pub fn new(
        config: RankerConfig,
        dictionaries: Box<dyn DictionarySource>,
        packs: Box<dyn LanguagePackResolver>,
        preferences: Box<dyn PreferenceStore>,
    ) -> Self {
        let config = config.validate();
        let staged = LanguageState::new(&config.fallback_language, false);
        Self {
            config: RwLock::new(Arc::new(config)),
            dictionaries,
            packs,
            preferences,
            snapshot: RwLock::new(None),
            staged: Mutex::new(staged),
        }
    }

    // -- Reads ------------------------------------------------------------

    /// Ranks one gesture's candidates. Without a loaded dictionary the
    /// candidates pass through, format-checked and scored by confidence.
    pub fn rank(&self, candidates: &[CandidateWord], stats: &SwipeStats) -> Vec<FilteredPrediction> {
        let config = self.config();
        match self.snapshot() {
            Some(snapshot) => CandidateRanker::new(&config, &snapshot).rank(candidates, stats),
            None => {
                tracing::debug!("dictionary not loaded, passing raw candidates through");
                raw_passthrough(candidates, stats)
            }
        }
    }

    pub fn snapshot(&self) -> Option<Arc<LanguageSnapshot>> {
        self.snapshot.read().clone()
    }

    pub fn config(&self) -> Arc<RankerConfig> {
        self.config.read().clone()
    }

    pub fn is_loaded(&self) -> bool {
        self.snapshot.read().is_some()
    }

    /// The tiered dictionary of the published snapshot, e.g. for caching.
    pub fn vocabulary(&self) -> Option<Arc<Vocabulary>> {
        self.snapshot().map(|s| s.store().main().clone())
    }

    /// Language state of the published snapshot, or the staged one before
    /// anything was loaded.
    pub fn language_state(&self) -> LanguageState {
        match self.snapshot() {
            Some(snapshot) => snapshot.language().clone(),
            None => self.staged.lock().clone(),
        }
    }

    pub fn contains_word(&self, word: &str) -> bool {
        self.snapshot().is_some_and(|s| s.contains_word(word))
    }

    pub fn is_valid_prefix(&self, prefix: &str) -> bool {
        self.snapshot().is_some_and(|s| s.is_valid_prefix(prefix))
    }

    pub fn allowed_next_chars(&self, prefix: &str) -> BTreeSet<char> {
        self.snapshot()
            .map(|s| s.allowed_next_chars(prefix))
            .unwrap_or_default()
    }

    // -- Writes -----------------------------------------------------------

    pub fn update_config(&self, config: RankerConfig) {
        *self.config.write() = Arc::new(config.validate());
        tracing::debug!("configuration updated");
    }

    /// Stages the primary language. If a dictionary is already loaded, the
    /// language switch is published right away, reusing it.
    pub fn set_primary_language_config(&self, primary: &str, english_fallback: bool) {
        let mut staged = self.staged.lock();
        *staged = LanguageState::new(primary, english_fallback);
        tracing::info!(primary = staged.primary(), english_fallback, "primary language configured");

        if let Some(current) = self.snapshot() {
            let secondary = current
                .shared_secondary_index()
                .filter(|index| index.language() != staged.primary());
            let snapshot = self.build_snapshot(&staged, current.store().main().clone(), secondary);
            self.publish(snapshot);
        }
    }

    /// Loads and tiers the fallback dictionary, then publishes a snapshot
    /// for the staged language. On failure nothing is published.
    pub fn load_primary_dictionary(&self) -> Result<(), RankerError> {
        let language = self.config().fallback_language.clone();
        let entries = self.dictionaries.load(&language)?;
        let vocabulary = Vocabulary::from_ranked(&language, entries)?;
        self.install_vocabulary(vocabulary);
        Ok(())
    }

    /// Publishes a snapshot around an already-built dictionary (for
    /// instance one restored from the on-disk cache).
    pub fn install_vocabulary(&self, vocabulary: Vocabulary) {
        let staged = self.staged.lock();
        let secondary = self.snapshot().and_then(|s| s.shared_secondary_index());
        let snapshot = self.build_snapshot(&staged, Arc::new(vocabulary), secondary);
        self.publish(snapshot);
    }

    /// Activates a secondary language for bilingual merging. Returns `false`
    /// (and keeps the current snapshot) if it cannot be loaded.
    pub fn load_secondary_dictionary(&self, language: &str) -> bool {
        match self.try_load_secondary(language) {
            Ok(()) => true,
            Err(e) => {
                tracing::warn!(language, error = %e, "secondary dictionary unavailable");
                false
            }
        }
    }

    fn try_load_secondary(&self, language: &str) -> Result<(), RankerError> {
        let _build = self.staged.lock();
        let current = self.snapshot().ok_or(RankerError::NotLoaded)?;
        let language = normalize_language_code(language);
        if language == current.language().primary() {
            return Err(RankerError::MissingLanguagePack { language, path: None });
        }
        let words = self.packs.load_accent_dictionary(&language)?;
        let index = NormalizedPrefixIndex::build(&language, words);
        if index.key_count() == 0 {
            return Err(RankerError::EmptyDictionary(language));
        }
        self.publish(current.as_ref().clone().with_secondary_index(Some(Arc::new(index))));
        Ok(())
    }

    pub fn unload_secondary_dictionary(&self) {
        let _build = self.staged.lock();
        if let Some(current) = self.snapshot() {
            if current.secondary_index().is_some() {
                self.publish(current.as_ref().clone().with_secondary_index(None));
            }
        }
    }

    /// Re-reads custom, user and disabled words. The dictionary, indices
    /// and contractions are shared with the previous snapshot.
    pub fn reload_overlay(&self) {
        let _build = self.staged.lock();
        if let Some(current) = self.snapshot() {
            let overlay = Overlay::load(self.preferences.as_ref(), current.language().primary());
            self.publish(current.as_ref().clone().with_overlay(Arc::new(overlay)));
        }
    }

    /// Feeds per-language detection scores into the bilingual multiplier.
    pub fn update_language_multiplier(&self, scores: &HashMap<String, f32>) {
        let _build = self.staged.lock();
        let Some(current) = self.snapshot() else {
            return;
        };
        let config = self.config();
        let mut language = current.language().clone();
        language.update_language_multiplier(scores, config.auto_switch_enabled, config.auto_switch_threshold);
        if language != *current.language() {
            self.publish(current.as_ref().clone().with_language_state(language));
        }
    }

    // -- Building ---------------------------------------------------------

    /// Assembles a full snapshot for `state`. Language-pack problems are
    /// logged and leave that feature off; they never fail the build.
    fn build_snapshot(
        &self,
        state: &LanguageState,
        main: Arc<Vocabulary>,
        secondary: Option<Arc<NormalizedPrefixIndex>>,
    ) -> LanguageSnapshot {
        let primary = state.primary();

        let primary_index = if state.is_english_primary() {
            None
        } else {
            match self.packs.load_accent_dictionary(primary) {
                Ok(words) => {
                    let index = NormalizedPrefixIndex::build(primary, words);
                    if index.key_count() == 0 {
                        tracing::warn!(language = primary, "primary language pack is empty, using English");
                        None
                    } else {
                        Some(Arc::new(index))
                    }
                }
                Err(e) => {
                    tracing::warn!(language = primary, error = %e, "primary language pack unavailable, using English");
                    None
                }
            }
        };
        let language = state
            .clone()
            .with_primary_pack_missing(!state.is_english_primary() && primary_index.is_none());

        let contractions = match self.packs.load_contractions(primary) {
            Ok(Some(mappings)) => ContractionTable::build(primary, mappings, |base| {
                main.contains(base)
                    || primary_index
                        .as_ref()
                        .is_some_and(|index| index.contains_key(&normalize(base)))
            }),
            Ok(None) => {
                tracing::debug!(language = primary, "no contraction file");
                ContractionTable::empty(primary)
            }
            Err(e) => {
                tracing::warn!(language = primary, error = %e, "contractions unreadable");
                ContractionTable::empty(primary)
            }
        };

        let overlay = Overlay::load(self.preferences.as_ref(), primary);

        LanguageSnapshot::new(language, main)
            .with_primary_index(primary_index)
            .with_contractions(Arc::new(contractions))
            .with_overlay(Arc::new(overlay))
            .with_secondary_index(secondary)
    }

    fn publish(&self, snapshot: LanguageSnapshot) {
        tracing::info!(
            primary = snapshot.language().primary(),
            secondary = snapshot.language().secondary().unwrap_or("-"),
            words = snapshot.store().main().len(),
            "snapshot published"
        );
        *self.snapshot.write() = Some(Arc::new(snapshot));
    }
}
