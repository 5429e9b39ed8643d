// File: src/fuzzy/length_index.rs
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};

/// Words grouped by character length, used by the fuzzy rescue pass to scan
/// only plausible neighbours instead of the whole dictionary.
///
/// Buckets are ordered sets so a scan visits words in a stable order.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct LengthBucketIndex {
    buckets: BTreeMap<usize, BTreeSet<String>>,
}

impl LengthBucketIndex {
    pub fn new() -> Self {
        Self::default()
    }

    /// O(log n) insertion; re-inserting a word is a no-op.
    pub fn insert(&mut self, word: &str) {
        self.buckets
            .entry(word.chars().count())
            .or_default()
            .insert(word.to_string());
    }

    /// Words whose length lies within `len ± max_diff`, shortest buckets first.
    pub fn words_near(&self, len: usize, max_diff: usize) -> impl Iterator<Item = &str> {
        let low = len.saturating_sub(max_diff);
        let high = len.saturating_add(max_diff);
        self.buckets
            .range(low..=high)
            .flat_map(|(_, words)| words.iter().map(String::as_str))
    }

    pub fn len(&self) -> usize {
        self.buckets.values().map(BTreeSet::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.buckets.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn scans_only_neighbouring_lengths() {
        let mut index = LengthBucketIndex::new();
        for w in ["a", "the", "fox", "quick", "quickly", "jumps"] {
            index.insert(w);
        }
        let near: Vec<&str> = index.words_near(4, 1).collect();
        assert_eq!(near, ["fox", "the", "jumps", "quick"]);
        assert_eq!(index.words_near(1, 0).collect::<Vec<_>>(), ["a"]);
    }

    #[test]
    fn insert_is_idempotent() {
        let mut index = LengthBucketIndex::new();
        assert!(index.is_empty());
        index.insert("word");
        index.insert("word");
        assert_eq!(index.len(), 1);
    }
}
