use thiserror::Error;

use crate::scoring::types::{Pitch, Tick};

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum AnalysisError {
    /// The severity selector was asked for the worst mistake of a clean attempt.
    #[error("no mistakes to select from: the error timeline is empty")]
    EmptyTimeline,

    #[error("note {index} has pitch {pitch}, outside the MIDI range 0..=127")]
    PitchOutOfRange { index: usize, pitch: Pitch },

    #[error("note {index} starts at {onset}, before the previous note at {previous}")]
    NonMonotonicOnset {
        index: usize,
        previous: Tick,
        onset: Tick,
    },

    #[error("sequence of {len} notes exceeds the configured limit of {max}")]
    SequenceTooLong { len: usize, max: usize },

    #[error("unknown judgment tier: {0}")]
    UnknownTier(String),
}

pub type Result<T> = std::result::Result<T, AnalysisError>;
