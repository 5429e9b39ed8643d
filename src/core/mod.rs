// File: src/core/mod.rs
pub mod contractions;
pub mod engine;
pub mod language;
pub mod normalize;
pub mod prefix_index;
pub mod ranker;
pub mod snapshot;
pub mod sources;
pub mod tiers;
pub mod trie;
pub mod types;
pub mod vocabulary;
