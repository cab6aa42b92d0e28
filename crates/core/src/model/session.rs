use chrono::{DateTime, Utc};
use serde::Serialize;
use thiserror::Error;

use crate::model::{QuestionResult, SessionId};

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum SessionSummaryError {
    #[error("completed_at is before started_at")]
    InvalidTimeRange,

    #[error("session of {total} questions has {resolved} resolved results")]
    CountMismatch { total: u32, resolved: usize },

    #[error("session must contain at least one question")]
    Empty,
}

/// End-of-session message, chosen by accuracy band.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Encouragement {
    Superstar,
    Great,
    Good,
    NiceTry,
    KeepLearning,
}

impl Encouragement {
    #[must_use]
    pub fn for_accuracy(accuracy: u8) -> Self {
        match accuracy {
            90.. => Self::Superstar,
            75..=89 => Self::Great,
            60..=74 => Self::Good,
            40..=59 => Self::NiceTry,
            _ => Self::KeepLearning,
        }
    }

    #[must_use]
    pub fn message(self) -> &'static str {
        match self {
            Self::Superstar => "Amazing! You're a shapes superstar!",
            Self::Great => "Great job! You really know your shapes and colors!",
            Self::Good => "Good work! A little more practice and you'll be a star!",
            Self::NiceTry => "Nice try! Practice makes perfect!",
            Self::KeepLearning => "Keep learning! Every game makes you better!",
        }
    }
}

/// Aggregate results of a finished session.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SessionSummary {
    session_id: SessionId,
    started_at: DateTime<Utc>,
    completed_at: DateTime<Utc>,
    total_questions: u32,
    score: u64,
    correct: u32,
    incorrect: u32,
    timed_out: u32,
    best_streak: u32,
    accuracy: u8,
    encouragement: Encouragement,
}

impl SessionSummary {
    /// Build a summary from the per-question results of a completed session.
    ///
    /// # Errors
    ///
    /// - `InvalidTimeRange` if `completed_at` is before `started_at`
    /// - `Empty` if `total_questions` is zero
    /// - `CountMismatch` unless every question has exactly one result
    pub fn from_results(
        session_id: SessionId,
        started_at: DateTime<Utc>,
        completed_at: DateTime<Utc>,
        total_questions: u32,
        results: &[QuestionResult],
    ) -> Result<Self, SessionSummaryError> {
        if completed_at < started_at {
            return Err(SessionSummaryError::InvalidTimeRange);
        }
        if total_questions == 0 {
            return Err(SessionSummaryError::Empty);
        }
        if u32::try_from(results.len()).ok() != Some(total_questions) {
            return Err(SessionSummaryError::CountMismatch {
                total: total_questions,
                resolved: results.len(),
            });
        }

        let mut score = 0_u64;
        let mut correct = 0_u32;
        let mut timed_out = 0_u32;
        let mut best_streak = 0_u32;
        for result in results {
            score += u64::from(result.points);
            if result.outcome.is_correct() {
                correct += 1;
            }
            if result.submitted.is_none() {
                timed_out += 1;
            }
            best_streak = best_streak.max(result.streak_after);
        }

        let accuracy = accuracy_percent(correct, total_questions);

        Ok(Self {
            session_id,
            started_at,
            completed_at,
            total_questions,
            score,
            correct,
            incorrect: total_questions - correct,
            timed_out,
            best_streak,
            accuracy,
            encouragement: Encouragement::for_accuracy(accuracy),
        })
    }

    #[must_use]
    pub fn session_id(&self) -> SessionId {
        self.session_id
    }

    #[must_use]
    pub fn started_at(&self) -> DateTime<Utc> {
        self.started_at
    }

    #[must_use]
    pub fn completed_at(&self) -> DateTime<Utc> {
        self.completed_at
    }

    #[must_use]
    pub fn total_questions(&self) -> u32 {
        self.total_questions
    }

    #[must_use]
    pub fn score(&self) -> u64 {
        self.score
    }

    #[must_use]
    pub fn correct(&self) -> u32 {
        self.correct
    }

    /// Wrong answers and timeouts together.
    #[must_use]
    pub fn incorrect(&self) -> u32 {
        self.incorrect
    }

    #[must_use]
    pub fn timed_out(&self) -> u32 {
        self.timed_out
    }

    #[must_use]
    pub fn best_streak(&self) -> u32 {
        self.best_streak
    }

    /// Percentage of correct answers, rounded.
    #[must_use]
    pub fn accuracy(&self) -> u8 {
        self.accuracy
    }

    #[must_use]
    pub fn encouragement(&self) -> Encouragement {
        self.encouragement
    }

    #[must_use]
    pub fn message(&self) -> &'static str {
        self.encouragement.message()
    }
}

#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
fn accuracy_percent(correct: u32, total: u32) -> u8 {
    let ratio = f64::from(correct) / f64::from(total);
    (ratio * 100.0).round().clamp(0.0, 100.0) as u8
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{AnswerOutcome, QuestionKind};
    use crate::time::fixed_now;

    fn result(index: u32, outcome: AnswerOutcome, points: u32, streak_after: u32) -> QuestionResult {
        QuestionResult {
            index,
            kind: QuestionKind::CountingColor,
            submitted: (outcome != AnswerOutcome::TimedOut).then(|| "3".to_string()),
            correct_answer: "3".into(),
            outcome,
            points,
            streak_after,
        }
    }

    #[test]
    fn summary_counts_outcomes() {
        let now = fixed_now();
        let results = vec![
            result(1, AnswerOutcome::Correct, 40, 1),
            result(2, AnswerOutcome::Correct, 45, 2),
            result(3, AnswerOutcome::TimedOut, 0, 0),
            result(4, AnswerOutcome::Incorrect, 0, 0),
        ];

        let summary =
            SessionSummary::from_results(SessionId::new_v4(), now, now, 4, &results).unwrap();

        assert_eq!(summary.score(), 85);
        assert_eq!(summary.correct(), 2);
        assert_eq!(summary.incorrect(), 2);
        assert_eq!(summary.timed_out(), 1);
        assert_eq!(summary.best_streak(), 2);
        assert_eq!(summary.accuracy(), 50);
        assert_eq!(summary.encouragement(), Encouragement::NiceTry);
    }

    #[test]
    fn summary_requires_one_result_per_question() {
        let now = fixed_now();
        let results = vec![result(1, AnswerOutcome::Correct, 40, 1)];
        let err = SessionSummary::from_results(SessionId::new_v4(), now, now, 2, &results)
            .unwrap_err();
        assert_eq!(err, SessionSummaryError::CountMismatch { total: 2, resolved: 1 });
    }

    #[test]
    fn accuracy_rounds_to_nearest_percent() {
        assert_eq!(accuracy_percent(2, 3), 67);
        assert_eq!(accuracy_percent(1, 3), 33);
        assert_eq!(accuracy_percent(20, 20), 100);
    }

    #[test]
    fn encouragement_bands() {
        assert_eq!(Encouragement::for_accuracy(100), Encouragement::Superstar);
        assert_eq!(Encouragement::for_accuracy(90), Encouragement::Superstar);
        assert_eq!(Encouragement::for_accuracy(89), Encouragement::Great);
        assert_eq!(Encouragement::for_accuracy(75), Encouragement::Great);
        assert_eq!(Encouragement::for_accuracy(60), Encouragement::Good);
        assert_eq!(Encouragement::for_accuracy(40), Encouragement::NiceTry);
        assert_eq!(Encouragement::for_accuracy(39), Encouragement::KeepLearning);
    }
}
