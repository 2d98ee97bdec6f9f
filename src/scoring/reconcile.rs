use tracing::debug;

use crate::scoring::types::{ErrorSet, ExtraNote, MissingNote, RawGap, Substitution};

/// Turn raw alignment gaps into classified errors.
///
/// Gaps are taken in list order. A gap is paired with the remaining gap from
/// the opposite side at the same exact time whose pitch is closest (first one
/// wins on equal distance) and reported as a substitution; unpaired reference
/// gaps become missing notes and unpaired user gaps extra notes. A pair whose
/// pitches are identical cancels out and reports nothing.
pub fn reconcile(gaps: Vec<RawGap>) -> ErrorSet {
    let total = gaps.len();
    let mut pool: Vec<Option<RawGap>> = gaps.into_iter().map(Some).collect();
    let mut errors = ErrorSet::default();
    let mut merges = 0usize;

    for idx in 0..pool.len() {
        let Some(gap) = pool[idx].take() else {
            continue;
        };

        let partner = nearest_partner(&pool[idx + 1..], &gap).map(|offset| idx + 1 + offset);

        match (gap, partner.and_then(|p| pool[p].take())) {
            (
                RawGap::Reference {
                    pitch: reference_pitch,
                    time,
                },
                Some(RawGap::User {
                    pitch: user_pitch, ..
                }),
            )
            | (
                RawGap::User {
                    pitch: user_pitch,
                    time,
                },
                Some(RawGap::Reference {
                    pitch: reference_pitch,
                    ..
                }),
            ) => {
                merges += 1;
                if reference_pitch != user_pitch {
                    errors.substitutions.push(Substitution {
                        reference_pitch,
                        user_pitch,
                        time,
                    });
                }
            }
            (RawGap::Reference { pitch, time }, _) => {
                errors.missing_notes.push(MissingNote {
                    reference_pitch: pitch,
                    time,
                });
            }
            (RawGap::User { pitch, time }, _) => {
                errors.extra_notes.push(ExtraNote {
                    user_pitch: pitch,
                    time,
                });
            }
        }
    }

    debug!(
        gaps = total,
        merges,
        substitutions = errors.substitutions.len(),
        missing = errors.missing_notes.len(),
        extra = errors.extra_notes.len(),
        "reconciled alignment gaps"
    );

    errors
}

/// Index into `rest` of the opposite-side gap at the same time with the
/// closest pitch.
fn nearest_partner(rest: &[Option<RawGap>], gap: &RawGap) -> Option<usize> {
    let mut best: Option<(usize, u8)> = None;
    for (i, candidate) in rest.iter().enumerate() {
        let Some(candidate) = candidate else {
            continue;
        };
        if candidate.is_reference() == gap.is_reference() || candidate.time() != gap.time() {
            continue;
        }
        let distance = candidate.pitch().abs_diff(gap.pitch());
        if best.map_or(true, |(_, d)| distance < d) {
            best = Some((i, distance));
        }
    }
    best.map(|(i, _)| i)
}
