use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fmt;
use thiserror::Error;

/// Every question offers exactly this many choices.
pub const ANSWER_OPTIONS: usize = 4;

//
// ─── ERRORS ────────────────────────────────────────────────────────────────────
//

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum QuestionError {
    #[error("expected {expected} answer options, found {found}")]
    WrongOptionCount { expected: usize, found: usize },

    #[error("answer option listed twice: {0}")]
    DuplicateOption(String),

    #[error("correct answer {0:?} is not among the options")]
    MissingCorrectAnswer(String),

    #[error("question has no figures to display")]
    EmptyDisplay,

    #[error("figure index {index} is out of range for {len} figures")]
    IndexOutOfRange { index: usize, len: usize },
}

//
// ─── KIND ──────────────────────────────────────────────────────────────────────
//

/// The five question formats, roughly ordered from easiest to hardest.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum QuestionKind {
    /// Name the single figure's shape.
    ShapeIdentification,
    /// Name the single figure's size.
    SizeRecognition,
    /// Name the color of a given shape within a scene.
    ColorShape,
    /// Count the figures of a given color.
    CountingColor,
    /// Count the figures matching both a size and a color.
    LogicalChallenge,
}

impl QuestionKind {
    pub const ALL: [QuestionKind; 5] = [
        QuestionKind::ShapeIdentification,
        QuestionKind::SizeRecognition,
        QuestionKind::ColorShape,
        QuestionKind::CountingColor,
        QuestionKind::LogicalChallenge,
    ];

    #[must_use]
    pub fn label(self) -> &'static str {
        match self {
            QuestionKind::ShapeIdentification => "shape identification",
            QuestionKind::SizeRecognition => "size recognition",
            QuestionKind::ColorShape => "color and shape",
            QuestionKind::CountingColor => "counting colors",
            QuestionKind::LogicalChallenge => "logical challenge",
        }
    }

    /// Single-figure kinds show one emphasised figure.
    #[must_use]
    pub fn is_single_figure(self) -> bool {
        matches!(
            self,
            QuestionKind::ShapeIdentification | QuestionKind::SizeRecognition
        )
    }
}

impl fmt::Display for QuestionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

//
// ─── FIGURES ───────────────────────────────────────────────────────────────────
//

/// A single displayed figure. Two figures with the same attributes are
/// indistinguishable.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ShapeInstance {
    pub shape: String,
    pub color: String,
    pub size: String,
}

impl ShapeInstance {
    #[must_use]
    pub fn new(shape: impl Into<String>, color: impl Into<String>, size: impl Into<String>) -> Self {
        Self {
            shape: shape.into(),
            color: color.into(),
            size: size.into(),
        }
    }
}

/// Identity of a question for repetition tracking: its kind plus the figures
/// the answer depends on, in a canonical order.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct QuestionSignature {
    kind: QuestionKind,
    figures: Vec<ShapeInstance>,
}

impl QuestionSignature {
    #[must_use]
    pub fn new(kind: QuestionKind, mut figures: Vec<ShapeInstance>) -> Self {
        figures.sort();
        Self { kind, figures }
    }

    #[must_use]
    pub fn kind(&self) -> QuestionKind {
        self.kind
    }
}

//
// ─── QUESTION ──────────────────────────────────────────────────────────────────
//

/// Unvalidated question parts as assembled by the generator.
#[derive(Debug, Clone)]
pub struct QuestionDraft {
    pub kind: QuestionKind,
    pub prompt: String,
    pub display: Vec<ShapeInstance>,
    pub options: Vec<String>,
    pub correct_answer: String,
    pub highlight: Option<usize>,
    pub hint: String,
    /// Indexes of the figures the answer is computed from.
    pub focus: Vec<usize>,
}

impl QuestionDraft {
    /// Check the option and index invariants and freeze the question.
    ///
    /// # Errors
    ///
    /// - `WrongOptionCount` unless there are exactly [`ANSWER_OPTIONS`] options
    /// - `DuplicateOption` if any option text repeats
    /// - `MissingCorrectAnswer` if the correct answer is not an option
    /// - `EmptyDisplay` if there is nothing to show
    /// - `IndexOutOfRange` if the highlight or a focus index misses the display
    pub fn validate(self) -> Result<Question, QuestionError> {
        if self.options.len() != ANSWER_OPTIONS {
            return Err(QuestionError::WrongOptionCount {
                expected: ANSWER_OPTIONS,
                found: self.options.len(),
            });
        }

        let mut seen = HashSet::new();
        for option in &self.options {
            if !seen.insert(option.as_str()) {
                return Err(QuestionError::DuplicateOption(option.clone()));
            }
        }

        if !seen.contains(self.correct_answer.as_str()) {
            return Err(QuestionError::MissingCorrectAnswer(self.correct_answer));
        }

        if self.display.is_empty() {
            return Err(QuestionError::EmptyDisplay);
        }

        let len = self.display.len();
        if let Some(index) = self
            .highlight
            .into_iter()
            .chain(self.focus.iter().copied())
            .find(|index| *index >= len)
        {
            return Err(QuestionError::IndexOutOfRange { index, len });
        }

        let signature = QuestionSignature::new(
            self.kind,
            self.focus.iter().map(|i| self.display[*i].clone()).collect(),
        );

        Ok(Question {
            kind: self.kind,
            prompt: self.prompt,
            display: self.display,
            options: self.options,
            correct_answer: self.correct_answer,
            highlight: self.highlight,
            hint: self.hint,
            signature,
        })
    }
}

/// A fully formed multiple-choice question.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Question {
    kind: QuestionKind,
    prompt: String,
    display: Vec<ShapeInstance>,
    options: Vec<String>,
    correct_answer: String,
    highlight: Option<usize>,
    hint: String,
    #[serde(skip)]
    signature: QuestionSignature,
}

impl Question {
    #[must_use]
    pub fn kind(&self) -> QuestionKind {
        self.kind
    }

    #[must_use]
    pub fn prompt(&self) -> &str {
        &self.prompt
    }

    /// Figures in rendering order.
    #[must_use]
    pub fn display(&self) -> &[ShapeInstance] {
        &self.display
    }

    #[must_use]
    pub fn options(&self) -> &[String] {
        &self.options
    }

    #[must_use]
    pub fn correct_answer(&self) -> &str {
        &self.correct_answer
    }

    #[must_use]
    pub fn highlight(&self) -> Option<usize> {
        self.highlight
    }

    #[must_use]
    pub fn hint(&self) -> &str {
        &self.hint
    }

    #[must_use]
    pub fn signature(&self) -> &QuestionSignature {
        &self.signature
    }

    /// Exact string comparison against the correct answer.
    #[must_use]
    pub fn is_correct(&self, answer: &str) -> bool {
        self.correct_answer == answer
    }
}

//
// ─── TESTS ─────────────────────────────────────────────────────────────────────
//

#[cfg(test)]
mod tests {
    use super::*;

    fn draft() -> QuestionDraft {
        QuestionDraft {
            kind: QuestionKind::ShapeIdentification,
            prompt: "What shape is this?".into(),
            display: vec![ShapeInstance::new("circle", "red", "big")],
            options: vec!["Circle".into(), "Square".into(), "Star".into(), "Heart".into()],
            correct_answer: "Circle".into(),
            highlight: Some(0),
            hint: "It's a circle.".into(),
            focus: vec![0],
        }
    }

    #[test]
    fn valid_draft_becomes_question() {
        let question = draft().validate().unwrap();
        assert_eq!(question.options().len(), ANSWER_OPTIONS);
        assert!(question.is_correct("Circle"));
        assert!(!question.is_correct("circle"));
        assert_eq!(question.signature().kind(), QuestionKind::ShapeIdentification);
    }

    #[test]
    fn rejects_wrong_option_count() {
        let mut d = draft();
        d.options.pop();
        assert_eq!(
            d.validate().unwrap_err(),
            QuestionError::WrongOptionCount { expected: 4, found: 3 }
        );
    }

    #[test]
    fn rejects_duplicate_options() {
        let mut d = draft();
        d.options[3] = "Square".into();
        assert_eq!(
            d.validate().unwrap_err(),
            QuestionError::DuplicateOption("Square".into())
        );
    }

    #[test]
    fn rejects_missing_correct_answer() {
        let mut d = draft();
        d.correct_answer = "Oval".into();
        assert!(matches!(
            d.validate(),
            Err(QuestionError::MissingCorrectAnswer(_))
        ));
    }

    #[test]
    fn rejects_highlight_out_of_range() {
        let mut d = draft();
        d.highlight = Some(1);
        assert_eq!(
            d.validate().unwrap_err(),
            QuestionError::IndexOutOfRange { index: 1, len: 1 }
        );
    }

    #[test]
    fn signature_ignores_display_order() {
        let a = QuestionSignature::new(
            QuestionKind::CountingColor,
            vec![
                ShapeInstance::new("star", "red", "big"),
                ShapeInstance::new("oval", "red", "tiny"),
            ],
        );
        let b = QuestionSignature::new(
            QuestionKind::CountingColor,
            vec![
                ShapeInstance::new("oval", "red", "tiny"),
                ShapeInstance::new("star", "red", "big"),
            ],
        );
        assert_eq!(a, b);
    }
}
