use serde::{Deserialize, Serialize};

use crate::model::question::QuestionKind;

/// How a question was resolved.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AnswerOutcome {
    Correct,
    Incorrect,
    TimedOut,
}

impl AnswerOutcome {
    #[must_use]
    pub fn is_correct(self) -> bool {
        matches!(self, AnswerOutcome::Correct)
    }
}

/// Record of one resolved question.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuestionResult {
    /// 1-based position in the session.
    pub index: u32,
    pub kind: QuestionKind,
    /// `None` when the countdown ran out.
    pub submitted: Option<String>,
    pub correct_answer: String,
    pub outcome: AnswerOutcome,
    pub points: u32,
    pub streak_after: u32,
}
