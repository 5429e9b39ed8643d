// File: src/core/tiers.rs
use crate::core::types::Tier;

/// Words ranked below this are `Common`.
pub const COMMON_RANK_LIMIT: usize = 100;
/// Words ranked below this (and not `Common`) are `Top`.
pub const TOP_RANK_LIMIT: usize = 3000;
/// Overlay words at or above this raw frequency are `Common`.
pub const COMMON_OVERLAY_FREQUENCY: u32 = 8000;
pub const MAX_OVERLAY_FREQUENCY: u32 = 10_000;

/// Minimum normalized frequency for a `Regular` word, by length.
/// Index is the word length; the last entry covers every longer word.
const LENGTH_THRESHOLDS: [f32; 10] = [
    0.20, // 0 (unused)
    0.20, 0.20, 0.15, 0.10, 0.08, 0.06, 0.045, 0.035, 0.025,
];

/// Static frequency tier table.
pub struct FrequencyTierTable;

impl FrequencyTierTable {
    /// Hardcoded threshold for a word of `len` characters.
    pub fn threshold_for_length(len: usize) -> f32 {
        LENGTH_THRESHOLDS[len.min(LENGTH_THRESHOLDS.len() - 1)]
    }

    /// Effective threshold once the configured floor (1..=10000 scale) is applied.
    pub fn min_frequency(len: usize, configured_min: u32) -> f32 {
        Self::threshold_for_length(len).max(configured_min as f32 / 10_000.0)
    }

    /// A `Regular` word is acceptable only strictly above its threshold.
    pub fn passes_threshold(len: usize, frequency: f32, configured_min: u32) -> bool {
        frequency > Self::min_frequency(len, configured_min)
    }

    /// Tier for a word's position in the frequency-sorted dictionary.
    pub fn tier_for_rank(rank: usize) -> Tier {
        if rank < COMMON_RANK_LIMIT {
            Tier::Common
        } else if rank < TOP_RANK_LIMIT {
            Tier::Top
        } else {
            Tier::Regular
        }
    }

    /// Tier and normalized frequency for a custom or user word.
    pub fn overlay_entry(raw_frequency: u32) -> (Tier, f32) {
        let raw = raw_frequency.clamp(1, MAX_OVERLAY_FREQUENCY);
        let tier = if raw >= COMMON_OVERLAY_FREQUENCY {
            Tier::Common
        } else {
            Tier::Top
        };
        (tier, (raw - 1) as f32 / (MAX_OVERLAY_FREQUENCY - 1) as f32)
    }
}
