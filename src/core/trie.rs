// --- File: src/core/trie.rs
use serde::{Deserialize, Serialize};
use std::collections::{BTreeSet, HashMap};

#[derive(Clone, Debug, Serialize, Deserialize)]
struct TrieNode {
    children: HashMap<u8, usize>,
    is_word: bool,
}

impl TrieNode {
    fn new() -> Self {
        Self { children: HashMap::new(), is_word: false }
    }
}

/// Arena-backed prefix tree over the vocabulary and contraction keys.
///
/// The external decoder consults it to prune letter sequences that cannot
/// lead to a known word. Nodes are never removed; a rebuilt vocabulary gets
/// a fresh trie.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct VocabularyTrie {
    nodes: Vec<TrieNode>,
    word_count: usize,
}

impl Default for VocabularyTrie {
    fn default() -> Self {
        Self::new()
    }
}

impl VocabularyTrie {
    pub fn new() -> Self {
        Self { nodes: vec![TrieNode::new()], word_count: 0 }
    }

    /// O(k) where k is the key length.
    pub fn insert(&mut self, key: &str) {
        let mut node_idx = 0;
        for &byte in key.as_bytes() {
            let next_idx = if let Some(&id) = self.nodes[node_idx].children.get(&byte) {
                id
            } else {
                let new_node_id = self.nodes.len();
                self.nodes.push(TrieNode::new());
                self.nodes[node_idx].children.insert(byte, new_node_id);
                new_node_id
            };
            node_idx = next_idx;
        }
        if !self.nodes[node_idx].is_word {
            self.nodes[node_idx].is_word = true;
            self.word_count += 1;
        }
    }

    fn find(&self, prefix: &str) -> Option<usize> {
        let mut node_idx = 0;
        for &byte in prefix.as_bytes() {
            node_idx = *self.nodes[node_idx].children.get(&byte)?;
        }
        Some(node_idx)
    }

    pub fn contains(&self, word: &str) -> bool {
        self.find(word).is_some_and(|idx| self.nodes[idx].is_word)
    }

    /// True if at least one stored key starts with `prefix`. An empty trie
    /// has no valid prefix, not even "".
    pub fn is_valid_prefix(&self, prefix: &str) -> bool {
        self.word_count > 0 && self.find(prefix).is_some()
    }

    /// Letters that may follow `prefix` on the way to a stored key.
    pub fn allowed_next_chars(&self, prefix: &str) -> BTreeSet<char> {
        match self.find(prefix) {
            Some(idx) => self.nodes[idx]
                .children
                .keys()
                .map(|&b| b as char)
                .collect(),
            None => BTreeSet::new(),
        }
    }

    pub fn word_count(&self) -> usize {
        self.word_count
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn prefixes_and_words() {
        let mut trie = VocabularyTrie::new();
        trie.insert("the");
        trie.insert("they");
        trie.insert("theyd");

        assert!(trie.contains("they"));
        assert!(!trie.contains("th"));
        assert!(trie.is_valid_prefix("th"));
        assert!(!trie.is_valid_prefix("tx"));
        assert!(trie.is_valid_prefix(""));
        assert_eq!(trie.allowed_next_chars("the"), BTreeSet::from(['y']));
        assert!(trie.allowed_next_chars("zzz").is_empty());
    }

    #[test]
    fn empty_trie_rejects_empty_prefix() {
        let trie = VocabularyTrie::new();
        assert!(!trie.is_valid_prefix(""));
        assert!(trie.allowed_next_chars("").is_empty());
    }

    #[test]
    fn duplicate_insert_counts_once() {
        let mut trie = VocabularyTrie::new();
        trie.insert("fox");
        trie.insert("fox");
        assert_eq!(trie.word_count(), 1);
        assert_eq!(trie.allowed_next_chars("fo"), BTreeSet::from(['x']));
    }
}
