use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::AnalysisError;
use crate::scoring::types::{ErrorSet, Tick};

#[derive(Serialize, Deserialize, Clone, Copy, Debug, Default, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum Tier {
    #[default]
    Beginner,
    Intermediate,
}

impl FromStr for Tier {
    type Err = AnalysisError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "beginner" => Ok(Tier::Beginner),
            "intermediate" => Ok(Tier::Intermediate),
            other => Err(AnalysisError::UnknownTier(other.to_string())),
        }
    }
}

/// Pass/fail rule for an attempt.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct JudgmentPolicy {
    pub tier: Tier,
    /// Largest timing deviation a beginner may show once several timing
    /// issues are present.
    pub timing_threshold: Tick,
}

impl JudgmentPolicy {
    /// Whether the attempt is good enough to move on.
    ///
    /// Beginners fail on any wrong pitch, or when more than one timing issue
    /// exists and one of them exceeds the threshold. Missing and extra notes
    /// do not count against any tier. Intermediate always passes.
    pub fn judge(&self, errors: &ErrorSet) -> bool {
        match self.tier {
            Tier::Beginner => {
                if !errors.substitutions.is_empty() {
                    return false;
                }
                !(errors.timing_issues.len() > 1
                    && errors
                        .timing_issues
                        .iter()
                        .any(|t| t.deviation() > self.timing_threshold))
            }
            // TODO: stricter intermediate rules (missing/extra note limits) once the
            // lesson controller defines them.
            Tier::Intermediate => true,
        }
    }
}
