use serde::Serialize;

use crate::error::{AnalysisError, Result};
use crate::scoring::types::{ClassifiedError, ErrorBucket, MistakeCategory, Tick};
use crate::transposition::{midi_to_name, Shift};

/// The single correction surfaced to the player.
#[derive(Serialize, Clone, Debug, PartialEq, Eq)]
pub struct Advice {
    pub time: Tick,
    pub category: MistakeCategory,
    pub message: String,
}

/// Pick the bucket most worth correcting.
///
/// A bucket holding strictly more errors than every other wins outright.
/// Otherwise the first bucket of the highest-priority category present is
/// chosen (`wrong_notes > missing_notes > extra_notes > timing`).
pub fn select_worst(buckets: &[ErrorBucket]) -> Result<&ErrorBucket> {
    let first = buckets.first().ok_or(AnalysisError::EmptyTimeline)?;

    let max_count = buckets.iter().map(ErrorBucket::len).max().unwrap_or(0);
    let mut at_max = buckets.iter().filter(|b| b.len() == max_count);
    if let (Some(largest), None) = (at_max.next(), at_max.next()) {
        return Ok(largest);
    }

    let top_priority = buckets.iter().map(|b| b.category.priority()).max();
    Ok(buckets
        .iter()
        .find(|b| Some(b.category.priority()) == top_priority)
        .unwrap_or(first))
}

/// Human-readable correction for one bucket.
pub fn describe(bucket: &ErrorBucket) -> String {
    let count = bucket.len();
    match bucket.category {
        MistakeCategory::WrongNotes => describe_wrong_notes(bucket),
        MistakeCategory::MissingNotes => {
            if count == 1 {
                match bucket.errors.first() {
                    Some(ClassifiedError::MissingNote(m)) => {
                        format!("You missed a note here ({}).", midi_to_name(m.reference_pitch))
                    }
                    _ => "You missed a note here.".to_string(),
                }
            } else {
                format!("You missed {} notes here.", count)
            }
        }
        MistakeCategory::ExtraNotes => {
            if count == 1 {
                match bucket.errors.first() {
                    Some(ClassifiedError::ExtraNote(e)) => format!(
                        "You played an extra note here ({}).",
                        midi_to_name(e.user_pitch)
                    ),
                    _ => "You played an extra note here.".to_string(),
                }
            } else {
                format!("You played {} extra notes here.", count)
            }
        }
        MistakeCategory::EarlyTiming => {
            if count == 1 {
                "You played a note too early.".to_string()
            } else {
                format!("You played {} notes too early.", count)
            }
        }
        MistakeCategory::LateTiming => {
            if count == 1 {
                "You played a note too late.".to_string()
            } else {
                format!("You played {} notes too late.", count)
            }
        }
    }
}

fn describe_wrong_notes(bucket: &ErrorBucket) -> String {
    let offsets: Vec<i16> = bucket.substitutions().map(|s| s.offset()).collect();
    let shift = match offsets.split_first() {
        Some((first, rest)) if rest.iter().all(|o| o == first) => Shift::from_offset(*first),
        _ => None,
    };

    match shift {
        Some(shift) => {
            let subs: Vec<_> = bucket.substitutions().collect();
            match subs.as_slice() {
                [only] => format!(
                    "You played {} instead of {}, {} from the reference.",
                    midi_to_name(only.user_pitch),
                    midi_to_name(only.reference_pitch),
                    shift
                ),
                _ => format!("You played these notes {} from the reference.", shift),
            }
        }
        None => "Some of the notes here are off.".to_string(),
    }
}

/// Select the worst bucket and render it.
pub fn advise(buckets: &[ErrorBucket]) -> Result<Advice> {
    let worst = select_worst(buckets)?;
    Ok(Advice {
        time: worst.time,
        category: worst.category,
        message: describe(worst),
    })
}
