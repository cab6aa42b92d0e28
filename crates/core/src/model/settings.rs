use thiserror::Error;

use crate::model::question::ANSWER_OPTIONS;

//
// ─── ERRORS ────────────────────────────────────────────────────────────────────
//

#[derive(Debug, Error, Clone, PartialEq)]
#[non_exhaustive]
pub enum SettingsError {
    #[error("total questions must be > 0")]
    InvalidTotalQuestions,

    #[error("timer must be at least 1 second")]
    InvalidTimer,

    #[error("timer warning ({warning}s) must be shorter than the timer ({timer}s)")]
    InvalidTimerWarning { warning: u32, timer: u32 },

    #[error("difficulty band shares must be in [0, 1] and sum to at most 1, got {easy} + {medium}")]
    InvalidBandShares { easy: f64, medium: f64 },

    #[error("answer options must be {expected}, got {provided}")]
    InvalidAnswerOptions { expected: usize, provided: usize },
}

//
// ─── SETTINGS ──────────────────────────────────────────────────────────────────
//

/// Fixed constants for one play-through.
///
/// Defaults:
/// - 20 questions, 15 seconds each, warning at 5 seconds left
/// - 10 points per correct answer, up to 30 for speed, 5 per streak level
/// - the last 8 question combinations are avoided when possible
/// - 35% easy, 35% medium, remainder hard (7/7/6 of 20)
#[derive(Debug, Clone, PartialEq)]
pub struct GameSettings {
    total_questions: u32,
    timer_secs: u32,
    timer_warning_secs: u32,
    points_correct: u32,
    points_time_bonus: u32,
    points_streak: u32,
    min_combinations_before_repeat: usize,
    answer_options: usize,
    easy_share: f64,
    medium_share: f64,
}

impl Default for GameSettings {
    fn default() -> Self {
        Self {
            total_questions: 20,
            timer_secs: 15,
            timer_warning_secs: 5,
            points_correct: 10,
            points_time_bonus: 30,
            points_streak: 5,
            min_combinations_before_repeat: 8,
            answer_options: ANSWER_OPTIONS,
            easy_share: 0.35,
            medium_share: 0.35,
        }
    }
}

impl GameSettings {
    /// Custom session length and timer, reference values for everything else.
    ///
    /// # Errors
    ///
    /// Returns `SettingsError` if a value is out of range.
    pub fn new(total_questions: u32, timer_secs: u32) -> Result<Self, SettingsError> {
        Self::default()
            .with_total_questions(total_questions)?
            .with_timer_secs(timer_secs)
    }

    /// # Errors
    ///
    /// Returns `SettingsError::InvalidTotalQuestions` for zero.
    pub fn with_total_questions(mut self, total_questions: u32) -> Result<Self, SettingsError> {
        self.total_questions = total_questions;
        self.validate()?;
        Ok(self)
    }

    /// Sets the per-question timer. The warning threshold is pulled down to
    /// stay below the new timer.
    ///
    /// # Errors
    ///
    /// Returns `SettingsError::InvalidTimer` for zero.
    pub fn with_timer_secs(mut self, timer_secs: u32) -> Result<Self, SettingsError> {
        self.timer_secs = timer_secs;
        self.timer_warning_secs = self.timer_warning_secs.min(timer_secs.saturating_sub(1));
        self.validate()?;
        Ok(self)
    }

    /// # Errors
    ///
    /// Returns `SettingsError::InvalidTimerWarning` unless the warning is below the timer.
    pub fn with_timer_warning_secs(mut self, warning: u32) -> Result<Self, SettingsError> {
        self.timer_warning_secs = warning;
        self.validate()?;
        Ok(self)
    }

    #[must_use]
    pub fn with_points(mut self, correct: u32, time_bonus: u32, streak: u32) -> Self {
        self.points_correct = correct;
        self.points_time_bonus = time_bonus;
        self.points_streak = streak;
        self
    }

    #[must_use]
    pub fn with_repeat_window(mut self, window: usize) -> Self {
        self.min_combinations_before_repeat = window;
        self
    }

    /// # Errors
    ///
    /// Returns `SettingsError::InvalidBandShares` if either share is outside
    /// `[0, 1]` or together they exceed 1.
    pub fn with_band_shares(mut self, easy: f64, medium: f64) -> Result<Self, SettingsError> {
        self.easy_share = easy;
        self.medium_share = medium;
        self.validate()?;
        Ok(self)
    }

    /// Check every field.
    ///
    /// # Errors
    ///
    /// Returns the first `SettingsError` found.
    pub fn validate(&self) -> Result<(), SettingsError> {
        if self.total_questions == 0 {
            return Err(SettingsError::InvalidTotalQuestions);
        }
        if self.timer_secs == 0 {
            return Err(SettingsError::InvalidTimer);
        }
        if self.timer_warning_secs >= self.timer_secs {
            return Err(SettingsError::InvalidTimerWarning {
                warning: self.timer_warning_secs,
                timer: self.timer_secs,
            });
        }
        let in_unit = |v: f64| (0.0..=1.0).contains(&v);
        if !in_unit(self.easy_share)
            || !in_unit(self.medium_share)
            || self.easy_share + self.medium_share > 1.0
        {
            return Err(SettingsError::InvalidBandShares {
                easy: self.easy_share,
                medium: self.medium_share,
            });
        }
        if self.answer_options != ANSWER_OPTIONS {
            return Err(SettingsError::InvalidAnswerOptions {
                expected: ANSWER_OPTIONS,
                provided: self.answer_options,
            });
        }
        Ok(())
    }

    #[must_use]
    pub fn total_questions(&self) -> u32 {
        self.total_questions
    }

    #[must_use]
    pub fn timer_secs(&self) -> u32 {
        self.timer_secs
    }

    #[must_use]
    pub fn timer_warning_secs(&self) -> u32 {
        self.timer_warning_secs
    }

    #[must_use]
    pub fn points_correct(&self) -> u32 {
        self.points_correct
    }

    #[must_use]
    pub fn points_time_bonus(&self) -> u32 {
        self.points_time_bonus
    }

    #[must_use]
    pub fn points_streak(&self) -> u32 {
        self.points_streak
    }

    #[must_use]
    pub fn min_combinations_before_repeat(&self) -> usize {
        self.min_combinations_before_repeat
    }

    #[must_use]
    pub fn answer_options(&self) -> usize {
        self.answer_options
    }

    #[must_use]
    pub fn easy_share(&self) -> f64 {
        self.easy_share
    }

    #[must_use]
    pub fn medium_share(&self) -> f64 {
        self.medium_share
    }
}
