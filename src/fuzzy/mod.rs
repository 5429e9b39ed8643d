// File: src/fuzzy/mod.rs
pub mod length_index;
pub mod matcher;
