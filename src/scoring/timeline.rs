use std::collections::BTreeMap;

use crate::scoring::types::{ClassifiedError, ErrorBucket, ErrorSet, Tick};

/// Group every classified error by its exact time.
///
/// Buckets come back in ascending time order and keep the error order of the
/// `ErrorSet` (substitutions, missing, extra, timing).
pub fn build_timeline(errors: &ErrorSet) -> Vec<ErrorBucket> {
    let mut grouped: BTreeMap<Tick, Vec<ClassifiedError>> = BTreeMap::new();
    for error in errors.iter() {
        grouped.entry(error.time()).or_default().push(error);
    }

    grouped
        .into_iter()
        .map(|(time, errors)| ErrorBucket::new(time, errors))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scoring::types::{ExtraNote, MistakeCategory, MissingNote, Substitution, TimingIssue};
    use pretty_assertions::assert_eq;

    fn sub(reference_pitch: u8, user_pitch: u8, time: Tick) -> Substitution {
        Substitution {
            reference_pitch,
            user_pitch,
            time,
        }
    }

    #[test]
    fn test_empty_errors_empty_timeline() {
        assert!(build_timeline(&ErrorSet::default()).is_empty());
    }

    #[test]
    fn test_groups_by_exact_time() {
        let errors = ErrorSet {
            substitutions: vec![sub(60, 61, 4), sub(64, 65, 4)],
            missing_notes: vec![MissingNote {
                reference_pitch: 67,
                time: 8,
            }],
            extra_notes: vec![ExtraNote {
                user_pitch: 70,
                time: 2,
            }],
            timing_issues: vec![],
        };
        let timeline = build_timeline(&errors);

        let times: Vec<Tick> = timeline.iter().map(|b| b.time).collect();
        assert_eq!(times, vec![2, 4, 8]);

        assert_eq!(timeline[0].category, MistakeCategory::ExtraNotes);
        assert_eq!(timeline[1].category, MistakeCategory::WrongNotes);
        assert_eq!(timeline[1].len(), 2);
        assert_eq!(timeline[2].category, MistakeCategory::MissingNotes);
    }

    #[test]
    fn test_mixed_bucket_is_wrong_notes() {
        let errors = ErrorSet {
            missing_notes: vec![MissingNote {
                reference_pitch: 60,
                time: 3,
            }],
            extra_notes: vec![ExtraNote {
                user_pitch: 72,
                time: 3,
            }],
            ..Default::default()
        };
        let timeline = build_timeline(&errors);
        assert_eq!(timeline.len(), 1);
        assert_eq!(timeline[0].category, MistakeCategory::WrongNotes);
    }

    #[test]
    fn test_timing_only_buckets_split_early_and_late() {
        let errors = ErrorSet {
            timing_issues: vec![
                TimingIssue {
                    reference_pitch: 60,
                    reference_time: 4,
                    user_time: 6,
                },
                TimingIssue {
                    reference_pitch: 62,
                    reference_time: 12,
                    user_time: 10,
                },
            ],
            ..Default::default()
        };
        let timeline = build_timeline(&errors);
        assert_eq!(timeline[0].time, 6);
        assert_eq!(timeline[0].category, MistakeCategory::EarlyTiming);
        assert_eq!(timeline[1].time, 10);
        assert_eq!(timeline[1].category, MistakeCategory::LateTiming);
    }

    #[test]
    fn test_every_error_lands_in_one_bucket() {
        let errors = ErrorSet {
            substitutions: vec![sub(60, 62, 0), sub(64, 63, 5)],
            missing_notes: vec![MissingNote {
                reference_pitch: 65,
                time: 5,
            }],
            extra_notes: vec![ExtraNote {
                user_pitch: 50,
                time: 9,
            }],
            timing_issues: vec![],
        };
        let timeline = build_timeline(&errors);
        let flattened: Vec<ClassifiedError> =
            timeline.iter().flat_map(|b| b.errors.iter().copied()).collect();
        assert_eq!(flattened.len(), errors.total());
        for error in errors.iter() {
            assert!(flattened.contains(&error));
        }
    }
}
