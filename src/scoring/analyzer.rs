use serde::Serialize;
use tracing::{debug, info};

use crate::config::AnalyzerConfig;
use crate::error::{AnalysisError, Result};
use crate::scoring::alignment::AlignmentTable;
use crate::scoring::judgment::JudgmentPolicy;
use crate::scoring::reconcile::reconcile;
use crate::scoring::severity::{advise, Advice};
use crate::scoring::timeline::build_timeline;
use crate::scoring::types::{ErrorBucket, ErrorSet, NoteSequence};

/// Result of judging one attempt.
#[derive(Serialize, Clone, Debug, PartialEq, Eq)]
pub struct Attempt {
    pub sufficient: bool,
    pub errors: ErrorSet,
}

/// Everything the lesson controller needs after an attempt: whether to move
/// on and, if not, the one correction to show.
#[derive(Serialize, Clone, Debug, PartialEq, Eq)]
pub struct Feedback {
    pub sufficient: bool,
    pub errors: ErrorSet,
    pub advice: Option<Advice>,
}

/// Compares attempts against a reference under one configuration.
#[derive(Clone, Debug, Default)]
pub struct Analyzer {
    config: AnalyzerConfig,
}

impl Analyzer {
    pub fn new(config: AnalyzerConfig) -> Self {
        Analyzer { config }
    }

    pub fn config(&self) -> &AnalyzerConfig {
        &self.config
    }

    pub fn policy(&self) -> JudgmentPolicy {
        self.config.policy()
    }

    fn check_len(&self, seq: &NoteSequence) -> Result<()> {
        match self.config.max_notes {
            Some(max) if seq.len() > max => Err(AnalysisError::SequenceTooLong {
                len: seq.len(),
                max,
            }),
            _ => Ok(()),
        }
    }

    /// Align both performances and classify every difference.
    pub fn compare(&self, reference: &NoteSequence, user: &NoteSequence) -> Result<ErrorSet> {
        self.check_len(reference)?;
        self.check_len(user)?;

        let table = AlignmentTable::build(reference, user);
        let gaps = table.traceback();
        debug!(
            reference_notes = reference.len(),
            user_notes = user.len(),
            cost = table.cost(),
            gaps = gaps.len(),
            "aligned performances"
        );

        Ok(reconcile(gaps))
    }

    pub fn judge(&self, errors: &ErrorSet) -> bool {
        self.policy().judge(errors)
    }

    pub fn judge_attempt(&self, reference: &NoteSequence, user: &NoteSequence) -> Result<Attempt> {
        let errors = self.compare(reference, user)?;
        let sufficient = self.judge(&errors);
        info!(
            tier = ?self.config.tier,
            sufficient,
            errors = errors.total(),
            "judged attempt"
        );
        Ok(Attempt { sufficient, errors })
    }

    pub fn timeline(&self, errors: &ErrorSet) -> Vec<ErrorBucket> {
        build_timeline(errors)
    }

    /// The single most useful correction. Fails with `EmptyTimeline` when
    /// there is nothing to correct.
    pub fn worst_mistake(&self, errors: &ErrorSet) -> Result<Advice> {
        advise(&self.timeline(errors))
    }

    /// Judge the attempt and, when it falls short, pick the correction.
    pub fn feedback(&self, reference: &NoteSequence, user: &NoteSequence) -> Result<Feedback> {
        let Attempt { sufficient, errors } = self.judge_attempt(reference, user)?;
        let advice = if sufficient {
            None
        } else {
            Some(self.worst_mistake(&errors)?)
        };
        Ok(Feedback {
            sufficient,
            errors,
            advice,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scoring::judgment::Tier;
    use crate::scoring::types::{ExtraNote, MissingNote, MistakeCategory, Substitution};
    use pretty_assertions::assert_eq;

    fn seq(pairs: &[(u8, u64)]) -> NoteSequence {
        NoteSequence::from_pairs(pairs).unwrap()
    }

    #[test]
    fn test_perfect_attempt() {
        let reference = seq(&[(60, 0), (62, 1), (64, 1)]);
        let attempt = Analyzer::default()
            .judge_attempt(&reference, &reference)
            .unwrap();
        assert!(attempt.sufficient);
        assert!(attempt.errors.is_empty());
    }

    #[test]
    fn test_wrong_note_fails_beginner() {
        let reference = seq(&[(60, 0), (62, 1), (64, 1)]);
        let user = seq(&[(60, 0), (65, 1), (64, 1)]);
        let attempt = Analyzer::default().judge_attempt(&reference, &user).unwrap();
        assert!(!attempt.sufficient);
        assert_eq!(
            attempt.errors,
            ErrorSet {
                substitutions: vec![Substitution {
                    reference_pitch: 62,
                    user_pitch: 65,
                    time: 1
                }],
                ..Default::default()
            }
        );
    }

    #[test]
    fn test_wrong_note_passes_intermediate() {
        let reference = seq(&[(60, 0), (62, 1), (64, 1)]);
        let user = seq(&[(60, 0), (65, 1), (64, 1)]);
        let analyzer = Analyzer::new(AnalyzerConfig::with_tier(Tier::Intermediate));
        let feedback = analyzer.feedback(&reference, &user).unwrap();
        assert!(feedback.sufficient);
        assert_eq!(feedback.advice, None);
        assert_eq!(feedback.errors.substitutions.len(), 1);
    }

    #[test]
    fn test_missing_note_is_not_judged() {
        let reference = seq(&[(60, 0), (62, 1), (64, 1)]);
        let user = seq(&[(60, 0), (64, 1)]);
        let attempt = Analyzer::default().judge_attempt(&reference, &user).unwrap();
        assert!(attempt.sufficient);
        assert_eq!(
            attempt.errors.missing_notes,
            vec![MissingNote {
                reference_pitch: 62,
                time: 1
            }]
        );
    }

    #[test]
    fn test_feedback_reports_worst_bucket() {
        // Opening dyad played a whole tone low.
        let reference = seq(&[(64, 0), (67, 0), (72, 1)]);
        let user = seq(&[(62, 0), (65, 0), (72, 1)]);
        let feedback = Analyzer::default().feedback(&reference, &user).unwrap();
        assert!(!feedback.sufficient);
        assert_eq!(feedback.errors.substitutions.len(), 2);
        let advice = feedback.advice.unwrap();
        assert_eq!(advice.time, 0);
        assert_eq!(advice.category, MistakeCategory::WrongNotes);
        assert!(advice.message.contains("down by 2 semitones"), "{}", advice.message);
    }

    #[test]
    fn test_worst_mistake_on_clean_errors_is_an_error() {
        let analyzer = Analyzer::default();
        assert_eq!(
            analyzer.worst_mistake(&ErrorSet::default()),
            Err(AnalysisError::EmptyTimeline)
        );
    }

    #[test]
    fn test_extra_note_timeline() {
        let reference = seq(&[(60, 0)]);
        let user = seq(&[(60, 0), (67, 1)]);
        let analyzer = Analyzer::default();
        let errors = analyzer.compare(&reference, &user).unwrap();
        assert_eq!(
            errors.extra_notes,
            vec![ExtraNote {
                user_pitch: 67,
                time: 1
            }]
        );
        let timeline = analyzer.timeline(&errors);
        assert_eq!(timeline.len(), 1);
        assert_eq!(timeline[0].category, MistakeCategory::ExtraNotes);
    }

    #[test]
    fn test_size_limit_rejects_long_sequences() {
        let analyzer = Analyzer::new(AnalyzerConfig {
            max_notes: Some(2),
            ..AnalyzerConfig::default()
        });
        let reference = seq(&[(60, 0), (62, 1)]);
        let user = seq(&[(60, 0), (62, 1), (64, 1)]);
        assert_eq!(
            analyzer.compare(&reference, &user),
            Err(AnalysisError::SequenceTooLong { len: 3, max: 2 })
        );

        let unlimited = Analyzer::new(AnalyzerConfig {
            max_notes: None,
            ..AnalyzerConfig::default()
        });
        assert!(unlimited.compare(&reference, &user).is_ok());
    }
}
