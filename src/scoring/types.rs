use serde::{Deserialize, Serialize};

use crate::error::AnalysisError;

/// MIDI note number.
pub type Pitch = u8;

/// Relative, already-quantized time units.
pub type Tick = u64;

pub const MAX_PITCH: Pitch = 127;

#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq, Eq)]
pub struct NoteEvent {
    pub pitch: Pitch,
    pub onset: Tick,
}

/// Ordered, validated note events of one performance. Chord tones sharing
/// pitch and onset stay as separate entries.
#[derive(Serialize, Deserialize, Clone, Debug, Default, PartialEq, Eq)]
#[serde(try_from = "Vec<NoteEvent>", into = "Vec<NoteEvent>")]
pub struct NoteSequence {
    events: Vec<NoteEvent>,
}

impl NoteSequence {
    pub fn new(events: Vec<NoteEvent>) -> Result<Self, AnalysisError> {
        let mut previous: Option<Tick> = None;
        for (index, event) in events.iter().enumerate() {
            if event.pitch > MAX_PITCH {
                return Err(AnalysisError::PitchOutOfRange {
                    index,
                    pitch: event.pitch,
                });
            }
            if let Some(prev) = previous {
                if event.onset < prev {
                    return Err(AnalysisError::NonMonotonicOnset {
                        index,
                        previous: prev,
                        onset: event.onset,
                    });
                }
            }
            previous = Some(event.onset);
        }
        Ok(NoteSequence { events })
    }

    /// Build from `(pitch, onset)` pairs.
    pub fn from_pairs(pairs: &[(Pitch, Tick)]) -> Result<Self, AnalysisError> {
        Self::new(
            pairs
                .iter()
                .map(|&(pitch, onset)| NoteEvent { pitch, onset })
                .collect(),
        )
    }

    pub fn events(&self) -> &[NoteEvent] {
        &self.events
    }

    pub fn len(&self) -> usize {
        self.events.len()
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    pub fn pitches(&self) -> impl Iterator<Item = Pitch> + '_ {
        self.events.iter().map(|e| e.pitch)
    }

    /// Running onset total per note: entry `k` is the sum of the onsets of
    /// notes `0..=k`. Gap times are read from here.
    pub fn cumulative_times(&self) -> Vec<Tick> {
        self.events
            .iter()
            .scan(0, |total: &mut Tick, e| {
                *total = total.saturating_add(e.onset);
                Some(*total)
            })
            .collect()
    }
}

impl TryFrom<Vec<NoteEvent>> for NoteSequence {
    type Error = AnalysisError;

    fn try_from(events: Vec<NoteEvent>) -> Result<Self, Self::Error> {
        NoteSequence::new(events)
    }
}

impl From<NoteSequence> for Vec<NoteEvent> {
    fn from(seq: NoteSequence) -> Self {
        seq.events
    }
}

/// A note consumed from only one side during alignment traceback.
#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq, Eq)]
#[serde(tag = "side", rename_all = "snake_case")]
pub enum RawGap {
    /// Reference note with no counterpart in the attempt.
    Reference { pitch: Pitch, time: Tick },
    /// Played note with no counterpart in the reference.
    User { pitch: Pitch, time: Tick },
}

impl RawGap {
    pub fn time(&self) -> Tick {
        match self {
            RawGap::Reference { time, .. } | RawGap::User { time, .. } => *time,
        }
    }

    pub fn pitch(&self) -> Pitch {
        match self {
            RawGap::Reference { pitch, .. } | RawGap::User { pitch, .. } => *pitch,
        }
    }

    pub fn is_reference(&self) -> bool {
        matches!(self, RawGap::Reference { .. })
    }
}

#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq, Eq)]
pub struct Substitution {
    pub reference_pitch: Pitch,
    pub user_pitch: Pitch,
    pub time: Tick,
}

impl Substitution {
    /// `reference_pitch - user_pitch`; positive when the attempt is lower.
    pub fn offset(&self) -> i16 {
        i16::from(self.reference_pitch) - i16::from(self.user_pitch)
    }
}

#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq, Eq)]
pub struct MissingNote {
    pub reference_pitch: Pitch,
    pub time: Tick,
}

#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq, Eq)]
pub struct ExtraNote {
    pub user_pitch: Pitch,
    pub time: Tick,
}

#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq, Eq)]
pub struct TimingIssue {
    pub reference_pitch: Pitch,
    pub reference_time: Tick,
    pub user_time: Tick,
}

impl TimingIssue {
    pub fn deviation(&self) -> Tick {
        self.reference_time.abs_diff(self.user_time)
    }
}

#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq, Eq)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ClassifiedError {
    Substitution(Substitution),
    MissingNote(MissingNote),
    ExtraNote(ExtraNote),
    TimingIssue(TimingIssue),
}

impl ClassifiedError {
    /// Timeline key. Timing issues are placed where the user played them.
    pub fn time(&self) -> Tick {
        match self {
            ClassifiedError::Substitution(s) => s.time,
            ClassifiedError::MissingNote(m) => m.time,
            ClassifiedError::ExtraNote(e) => e.time,
            ClassifiedError::TimingIssue(t) => t.user_time,
        }
    }

    /// Label used when a bucket holds only this kind of error.
    pub fn category(&self) -> MistakeCategory {
        match self {
            ClassifiedError::Substitution(_) => MistakeCategory::WrongNotes,
            ClassifiedError::MissingNote(_) => MistakeCategory::MissingNotes,
            ClassifiedError::ExtraNote(_) => MistakeCategory::ExtraNotes,
            ClassifiedError::TimingIssue(t) => {
                if t.reference_time < t.user_time {
                    MistakeCategory::EarlyTiming
                } else {
                    MistakeCategory::LateTiming
                }
            }
        }
    }

    fn same_kind(&self, other: &ClassifiedError) -> bool {
        std::mem::discriminant(self) == std::mem::discriminant(other)
    }
}

/// Durable output of one comparison.
#[derive(Serialize, Deserialize, Clone, Debug, Default, PartialEq, Eq)]
pub struct ErrorSet {
    #[serde(rename = "incorrect_pitches", alias = "substitutions")]
    pub substitutions: Vec<Substitution>,
    pub missing_notes: Vec<MissingNote>,
    pub extra_notes: Vec<ExtraNote>,
    #[serde(default)]
    pub timing_issues: Vec<TimingIssue>,
}

impl ErrorSet {
    pub fn is_empty(&self) -> bool {
        self.total() == 0
    }

    pub fn total(&self) -> usize {
        self.substitutions.len()
            + self.missing_notes.len()
            + self.extra_notes.len()
            + self.timing_issues.len()
    }

    /// All errors, substitutions first, then missing, extra and timing.
    pub fn iter(&self) -> impl Iterator<Item = ClassifiedError> + '_ {
        self.substitutions
            .iter()
            .copied()
            .map(ClassifiedError::Substitution)
            .chain(self.missing_notes.iter().copied().map(ClassifiedError::MissingNote))
            .chain(self.extra_notes.iter().copied().map(ClassifiedError::ExtraNote))
            .chain(self.timing_issues.iter().copied().map(ClassifiedError::TimingIssue))
    }

    /// The same diagnosis seen from the other side: reference and attempt
    /// trade places, so missing notes become extra notes and vice versa.
    pub fn swapped(&self) -> ErrorSet {
        ErrorSet {
            substitutions: self
                .substitutions
                .iter()
                .map(|s| Substitution {
                    reference_pitch: s.user_pitch,
                    user_pitch: s.reference_pitch,
                    time: s.time,
                })
                .collect(),
            missing_notes: self
                .extra_notes
                .iter()
                .map(|e| MissingNote {
                    reference_pitch: e.user_pitch,
                    time: e.time,
                })
                .collect(),
            extra_notes: self
                .missing_notes
                .iter()
                .map(|m| ExtraNote {
                    user_pitch: m.reference_pitch,
                    time: m.time,
                })
                .collect(),
            timing_issues: self
                .timing_issues
                .iter()
                .map(|t| TimingIssue {
                    reference_pitch: t.reference_pitch,
                    reference_time: t.user_time,
                    user_time: t.reference_time,
                })
                .collect(),
        }
    }
}

#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum MistakeCategory {
    WrongNotes,
    MissingNotes,
    ExtraNotes,
    EarlyTiming,
    LateTiming,
}

impl MistakeCategory {
    /// Higher wins when bucket sizes tie. Early and late timing rank equal.
    pub fn priority(&self) -> u8 {
        match self {
            MistakeCategory::WrongNotes => 3,
            MistakeCategory::MissingNotes => 2,
            MistakeCategory::ExtraNotes => 1,
            MistakeCategory::EarlyTiming | MistakeCategory::LateTiming => 0,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            MistakeCategory::WrongNotes => "wrong_notes",
            MistakeCategory::MissingNotes => "missing_notes",
            MistakeCategory::ExtraNotes => "extra_notes",
            MistakeCategory::EarlyTiming => "early_timing",
            MistakeCategory::LateTiming => "late_timing",
        }
    }
}

impl std::fmt::Display for MistakeCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

/// Errors sharing one exact onset time.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
pub struct ErrorBucket {
    pub time: Tick,
    pub errors: Vec<ClassifiedError>,
    pub category: MistakeCategory,
}

impl ErrorBucket {
    /// Bucket with its category derived from the contained errors.
    /// A bucket mixing kinds is labelled `wrong_notes`.
    pub fn new(time: Tick, errors: Vec<ClassifiedError>) -> Self {
        let category = match errors.split_first() {
            Some((first, rest)) if rest.iter().all(|e| e.same_kind(first)) => first.category(),
            _ => MistakeCategory::WrongNotes,
        };
        ErrorBucket {
            time,
            errors,
            category,
        }
    }

    pub fn len(&self) -> usize {
        self.errors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.errors.is_empty()
    }

    pub fn substitutions(&self) -> impl Iterator<Item = &Substitution> + '_ {
        self.errors.iter().filter_map(|e| match e {
            ClassifiedError::Substitution(s) => Some(s),
            _ => None,
        })
    }
}
