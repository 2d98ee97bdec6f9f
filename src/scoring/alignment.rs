use tracing::trace;

use crate::scoring::types::{NoteSequence, Pitch, RawGap};

/// Edit-distance table over note pitches. Onsets play no part in the cost.
///
/// `cell(i, j)` is the minimum number of mismatches needed to align the first
/// `i` reference notes with the first `j` played notes.
pub struct AlignmentTable<'a> {
    reference: &'a NoteSequence,
    user: &'a NoteSequence,
    width: usize,
    cells: Vec<usize>,
}

impl<'a> AlignmentTable<'a> {
    pub fn build(reference: &'a NoteSequence, user: &'a NoteSequence) -> Self {
        let ref_pitches: Vec<Pitch> = reference.pitches().collect();
        let user_pitches: Vec<Pitch> = user.pitches().collect();
        let width = user_pitches.len() + 1;
        let mut cells = vec![0usize; (ref_pitches.len() + 1) * width];

        for i in 0..=ref_pitches.len() {
            for j in 0..=user_pitches.len() {
                cells[i * width + j] = if i == 0 || j == 0 {
                    i + j
                } else if ref_pitches[i - 1] == user_pitches[j - 1] {
                    cells[(i - 1) * width + (j - 1)]
                } else {
                    1 + cells[(i - 1) * width + j]
                        .min(cells[i * width + (j - 1)])
                        .min(cells[(i - 1) * width + (j - 1)])
                };
            }
        }

        AlignmentTable {
            reference,
            user,
            width,
            cells,
        }
    }

    fn cell(&self, i: usize, j: usize) -> usize {
        self.cells[i * self.width + j]
    }

    /// Minimum mismatch count for the full sequences.
    pub fn cost(&self) -> usize {
        self.cell(self.reference.len(), self.user.len())
    }

    /// Walk back from the last cell, emitting one gap per note consumed from
    /// a single side. Gaps come out end-first.
    ///
    /// On a pitch mismatch a reference note is consumed whenever
    /// `cell(i, j-1) >= cell(i-1, j)`, so ties are reported as missing notes.
    pub fn traceback(&self) -> Vec<RawGap> {
        let ref_events = self.reference.events();
        let user_events = self.user.events();
        let ref_times = self.reference.cumulative_times();
        let user_times = self.user.cumulative_times();

        let mut gaps = Vec::new();
        let (mut i, mut j) = (ref_events.len(), user_events.len());

        while i > 0 || j > 0 {
            if i > 0 && j > 0 && ref_events[i - 1].pitch == user_events[j - 1].pitch {
                i -= 1;
                j -= 1;
                continue;
            }

            let consume_reference = if j == 0 {
                true
            } else if i == 0 {
                false
            } else {
                self.cell(i, j - 1) >= self.cell(i - 1, j)
            };

            if consume_reference {
                let gap = RawGap::Reference {
                    pitch: ref_events[i - 1].pitch,
                    time: ref_times[i - 1],
                };
                trace!(?gap, i, j, "unmatched reference note");
                gaps.push(gap);
                i -= 1;
            } else {
                let gap = RawGap::User {
                    pitch: user_events[j - 1].pitch,
                    time: user_times[j - 1],
                };
                trace!(?gap, i, j, "unmatched played note");
                gaps.push(gap);
                j -= 1;
            }
        }

        gaps
    }
}

/// Align two performances by pitch and return the unmatched notes.
pub fn align(reference: &NoteSequence, user: &NoteSequence) -> Vec<RawGap> {
    AlignmentTable::build(reference, user).traceback()
}

pub fn mismatch_cost(reference: &NoteSequence, user: &NoteSequence) -> usize {
    AlignmentTable::build(reference, user).cost()
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn seq(pairs: &[(Pitch, u64)]) -> NoteSequence {
        NoteSequence::from_pairs(pairs).unwrap()
    }

    #[test]
    fn test_identical_sequences_have_no_gaps() {
        let s = seq(&[(60, 0), (62, 1), (64, 2), (64, 2), (67, 4)]);
        assert!(align(&s, &s).is_empty());
        assert_eq!(mismatch_cost(&s, &s), 0);
    }

    #[test]
    fn test_empty_sequences() {
        let empty = NoteSequence::default();
        assert!(align(&empty, &empty).is_empty());
        assert_eq!(mismatch_cost(&empty, &empty), 0);
    }

    #[test]
    fn test_empty_attempt_misses_everything() {
        let reference = seq(&[(60, 0), (62, 1), (64, 2)]);
        let gaps = align(&reference, &NoteSequence::default());
        assert_eq!(
            gaps,
            vec![
                RawGap::Reference { pitch: 64, time: 3 },
                RawGap::Reference { pitch: 62, time: 1 },
                RawGap::Reference { pitch: 60, time: 0 },
            ]
        );
    }

    #[test]
    fn test_attempt_without_reference_is_all_extra() {
        let user = seq(&[(60, 0), (61, 2)]);
        let gaps = align(&NoteSequence::default(), &user);
        assert_eq!(
            gaps,
            vec![
                RawGap::User { pitch: 61, time: 2 },
                RawGap::User { pitch: 60, time: 0 },
            ]
        );
    }

    #[test]
    fn test_wrong_note_yields_gap_on_each_side() {
        let reference = seq(&[(60, 0), (62, 1), (64, 1)]);
        let user = seq(&[(60, 0), (65, 1), (64, 1)]);
        let gaps = align(&reference, &user);
        // Tie at (2, 2) resolves towards the reference side first.
        assert_eq!(
            gaps,
            vec![
                RawGap::Reference { pitch: 62, time: 1 },
                RawGap::User { pitch: 65, time: 1 },
            ]
        );
        assert_eq!(mismatch_cost(&reference, &user), 1);
    }

    #[test]
    fn test_skipped_note_is_reference_gap() {
        let reference = seq(&[(60, 0), (62, 1), (64, 2)]);
        let user = seq(&[(60, 0), (64, 1)]);
        assert_eq!(
            align(&reference, &user),
            vec![RawGap::Reference { pitch: 62, time: 1 }]
        );
    }

    #[test]
    fn test_added_note_is_user_gap_with_own_time() {
        let reference = seq(&[(60, 0)]);
        let user = seq(&[(60, 0), (67, 1)]);
        assert_eq!(align(&reference, &user), vec![RawGap::User { pitch: 67, time: 1 }]);
    }

    #[test]
    fn test_cost_table_boundaries() {
        let reference = seq(&[(60, 0), (62, 1), (64, 2)]);
        let user = seq(&[(70, 0), (71, 1)]);
        let table = AlignmentTable::build(&reference, &user);
        for i in 0..=3 {
            assert_eq!(table.cell(i, 0), i);
        }
        for j in 0..=2 {
            assert_eq!(table.cell(0, j), j);
        }
        assert_eq!(table.cost(), 3);
    }

    #[test]
    fn test_cost_is_symmetric() {
        let a = seq(&[(60, 0), (62, 1), (64, 1), (65, 1), (67, 1)]);
        let b = seq(&[(60, 0), (63, 1), (65, 1), (67, 2)]);
        assert_eq!(mismatch_cost(&a, &b), mismatch_cost(&b, &a));
    }
}
