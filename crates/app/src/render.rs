//! Plain-text rendering for the terminal front end.

use std::fmt::Write as _;

use services::AnswerFeedback;
use shapes_core::model::{AnswerOutcome, Question, SessionSummary, ShapeInstance};
use shapes_core::{AttributeCatalog, AttributeKind};

pub fn question(
    catalog: &AttributeCatalog,
    question: &Question,
    index: u32,
    total: u32,
    timer_secs: u32,
) -> String {
    let mut out = String::new();
    let _ = writeln!(
        out,
        "\nQuestion {index}/{total} · {} · {timer_secs}s",
        question.kind().label()
    );
    let _ = writeln!(out, "{}", question.prompt());
    for (i, figure) in question.display().iter().enumerate() {
        let marker = if question.highlight() == Some(i) { '>' } else { '-' };
        let _ = writeln!(out, "  {marker} {}", figure_label(catalog, figure));
    }
    for (i, option) in question.options().iter().enumerate() {
        let _ = writeln!(out, "    {}) {option}", i + 1);
    }
    out
}

/// "big red circle", falling back to raw ids for anything the catalog lacks.
pub fn figure_label(catalog: &AttributeCatalog, figure: &ShapeInstance) -> String {
    let name = |kind, id: &str| {
        catalog
            .display_name(kind, id)
            .map_or_else(|_| id.to_string(), str::to_lowercase)
    };
    format!(
        "{} {} {}",
        name(AttributeKind::Size, &figure.size),
        name(AttributeKind::Color, &figure.color),
        name(AttributeKind::Shape, &figure.shape)
    )
}

pub fn feedback(feedback: &AnswerFeedback) -> String {
    let mut out = match feedback.outcome {
        AnswerOutcome::Correct => format!("Correct! +{} points", feedback.points),
        AnswerOutcome::Incorrect => {
            format!("Not quite. The answer was {}.", feedback.correct_answer)
        }
        AnswerOutcome::TimedOut => {
            format!("Time's up! The answer was {}.", feedback.correct_answer)
        }
    };
    if feedback.outcome.is_correct() && feedback.streak_bonus > 0 {
        let _ = write!(out, " (streak x{})", feedback.streak);
    }
    let _ = write!(out, "\n  Hint: {}", feedback.hint);
    let _ = write!(out, "\n  Score: {}", feedback.total_score);
    out
}

pub fn summary(summary: &SessionSummary) -> String {
    format!(
        "\n{}\n  Score:       {}\n  Correct:     {}/{}\n  Timed out:   {}\n  Accuracy:    {}%\n  Best streak: {}\n",
        summary.message(),
        summary.score(),
        summary.correct(),
        summary.total_questions(),
        summary.timed_out(),
        summary.accuracy(),
        summary.best_streak(),
    )
}

/// Map player input to one of the options.
///
/// Option text wins over position, so typing "2" on a counting question picks
/// the answer "2" rather than the second option.
pub fn parse_choice(input: &str, options: &[String]) -> Option<String> {
    let input = input.trim();
    if input.is_empty() {
        return None;
    }
    if let Some(option) = options.iter().find(|option| option.eq_ignore_ascii_case(input)) {
        return Some(option.clone());
    }
    input
        .parse::<usize>()
        .ok()
        .and_then(|number| number.checked_sub(1))
        .and_then(|i| options.get(i))
        .cloned()
}
