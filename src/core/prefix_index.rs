// File: src/core/prefix_index.rs
use crate::core::normalize::normalize;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};

/// One accented surface form behind a normalized key.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IndexEntry {
    pub canonical: String,
    /// 0 = most frequent.
    pub frequency_rank: u8,
}

impl IndexEntry {
    /// Continuous frequency derived from the rank.
    pub fn frequency(&self) -> f32 {
        1.0 - self.frequency_rank as f32 / 255.0
    }
}

/// Accent-folding dictionary: normalized key → accented canonical forms.
///
/// Keys live in an ordered map, so exact lookups and prefix walks both run
/// on the same structure. Several canonicals can share a key ("a" → "a",
/// "à"); they are kept sorted by rank, most frequent first.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct NormalizedPrefixIndex {
    language: String,
    entries: BTreeMap<String, Vec<IndexEntry>>,
    canonical_count: usize,
}

impl NormalizedPrefixIndex {
    pub fn build(language: &str, words: Vec<(String, u8)>) -> Self {
        let mut entries: BTreeMap<String, Vec<IndexEntry>> = BTreeMap::new();
        let mut skipped = 0usize;

        for (canonical, frequency_rank) in words {
            let canonical = canonical.trim().to_lowercase();
            let key = normalize(&canonical);
            if key.is_empty() {
                skipped += 1;
                continue;
            }
            let bucket = entries.entry(key).or_default();
            match bucket.iter_mut().find(|e| e.canonical == canonical) {
                Some(existing) => existing.frequency_rank = existing.frequency_rank.min(frequency_rank),
                None => bucket.push(IndexEntry { canonical, frequency_rank }),
            }
        }

        let mut canonical_count = 0;
        for bucket in entries.values_mut() {
            bucket.sort_by(|a, b| {
                a.frequency_rank
                    .cmp(&b.frequency_rank)
                    .then_with(|| a.canonical.cmp(&b.canonical))
            });
            canonical_count += bucket.len();
        }

        tracing::info!(
            language,
            keys = entries.len(),
            canonicals = canonical_count,
            skipped,
            "normalized index built"
        );
        Self {
            language: language.to_string(),
            entries,
            canonical_count,
        }
    }

    pub fn language(&self) -> &str {
        &self.language
    }

    /// Entries whose normalized key equals `normalized` exactly.
    pub fn lookup_exact(&self, normalized: &str) -> &[IndexEntry] {
        self.entries.get(normalized).map(Vec::as_slice).unwrap_or(&[])
    }

    /// The most frequent canonical form for `normalized`.
    pub fn best(&self, normalized: &str) -> Option<&IndexEntry> {
        self.lookup_exact(normalized).first()
    }

    pub fn contains_key(&self, normalized: &str) -> bool {
        self.entries.contains_key(normalized)
    }

    /// True if some key starts with `prefix`.
    pub fn has_prefix(&self, prefix: &str) -> bool {
        self.entries
            .range(prefix.to_string()..)
            .next()
            .is_some_and(|(key, _)| key.starts_with(prefix))
    }

    /// Letters that may follow `prefix`. Jumps from one sibling letter to the
    /// next instead of visiting every key under the prefix.
    pub fn allowed_next_chars(&self, prefix: &str) -> BTreeSet<char> {
        let mut allowed = BTreeSet::new();
        let mut cursor = prefix.to_string();
        loop {
            let next = self
                .entries
                .range(cursor.clone()..)
                .map(|(key, _)| key)
                .take_while(|key| key.starts_with(prefix))
                .find(|key| key.len() > prefix.len());
            let Some(key) = next else { break };
            let Some(c) = key[prefix.len()..].chars().next() else { break };
            allowed.insert(c);
            if c >= 'z' {
                break;
            }
            cursor = format!("{}{}", prefix, (c as u8 + 1) as char);
        }
        allowed
    }

    pub fn key_count(&self) -> usize {
        self.entries.len()
    }

    pub fn canonical_count(&self) -> usize {
        self.canonical_count
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn french() -> NormalizedPrefixIndex {
        NormalizedPrefixIndex::build(
            "fr",
            vec![
                ("café".into(), 20),
                ("cafe".into(), 200),
                ("à".into(), 1),
                ("a".into(), 0),
                ("élève".into(), 90),
                ("être".into(), 5),
                ("cafés".into(), 60),
            ],
        )
    }

    #[test]
    fn exact_lookup_returns_ranked_canonicals() {
        let index = french();
        let entries = index.lookup_exact("cafe");
        assert_eq!(entries.len(), 2);
        assert_eq!(entries[0].canonical, "café");
        assert_eq!(index.best("a").unwrap().canonical, "a");
        assert!(index.lookup_exact("caf").is_empty());
        assert_eq!(index.canonical_count(), 7);
    }

    #[test]
    fn rank_maps_to_frequency() {
        let index = french();
        assert_eq!(index.best("etre").unwrap().frequency(), 1.0 - 5.0 / 255.0);
        let zero = IndexEntry { canonical: "x".into(), frequency_rank: 255 };
        assert_eq!(zero.frequency(), 0.0);
    }

    #[test]
    fn prefix_queries() {
        let index = french();
        assert!(index.has_prefix("caf"));
        assert!(index.has_prefix("el"));
        assert!(!index.has_prefix("cz"));
        assert_eq!(index.allowed_next_chars("cafe"), BTreeSet::from(['s']));
        assert_eq!(index.allowed_next_chars(""), BTreeSet::from(['a', 'c', 'e']));
        assert_eq!(index.allowed_next_chars("e"), BTreeSet::from(['l', 't']));
        assert!(index.allowed_next_chars("cafes").is_empty());
    }

    #[test]
    fn duplicate_canonicals_keep_best_rank() {
        let index = NormalizedPrefixIndex::build("es", vec![("año".into(), 40), ("año".into(), 10)]);
        assert_eq!(index.lookup_exact("ano").len(), 1);
        assert_eq!(index.best("ano").unwrap().frequency_rank, 10);
    }
}
