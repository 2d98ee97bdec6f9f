use serde::{Deserialize, Serialize};

use crate::scoring::judgment::{JudgmentPolicy, Tier};
use crate::scoring::types::Tick;

/// Timing deviation (in relative time units) the beginner tier tolerates.
/// Untuned starting point; callers are expected to override it per lesson.
pub const DEFAULT_TIMING_THRESHOLD: Tick = 100;

/// Largest sequence accepted per side before alignment. The DP table grows
/// with the product of both lengths.
pub const DEFAULT_MAX_NOTES: usize = 4096;

/// Engine settings, deserializable from a partial JS object.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
#[serde(default)]
pub struct AnalyzerConfig {
    pub tier: Tier,
    pub timing_threshold: Tick,
    /// `None` disables the length check.
    pub max_notes: Option<usize>,
}

impl Default for AnalyzerConfig {
    fn default() -> Self {
        AnalyzerConfig {
            tier: Tier::Beginner,
            timing_threshold: DEFAULT_TIMING_THRESHOLD,
            max_notes: Some(DEFAULT_MAX_NOTES),
        }
    }
}

impl AnalyzerConfig {
    pub fn with_tier(tier: Tier) -> Self {
        AnalyzerConfig {
            tier,
            ..Self::default()
        }
    }

    pub fn policy(&self) -> JudgmentPolicy {
        JudgmentPolicy {
            tier: self.tier,
            timing_threshold: self.timing_threshold,
        }
    }
}
