use serde::Serialize;

use crate::model::{AnswerOutcome, GameSettings};

//
// ─── RULES ─────────────────────────────────────────────────────────────────────
//

/// Points for one resolved question and the streak that follows it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ScoreOutcome {
    pub points: u32,
    pub streak: u32,
    pub time_bonus: u32,
    pub streak_bonus: u32,
}

impl ScoreOutcome {
    const MISS: Self = Self {
        points: 0,
        streak: 0,
        time_bonus: 0,
        streak_bonus: 0,
    };
}

/// Point values used to score answers.
///
/// A correct answer earns `base + time bonus + streak bonus`:
/// - the time bonus is `time_bonus * remaining / duration`, rounded
/// - the streak bonus is `streak_bonus * (streak - 1)` once the new streak reaches 2
///
/// A wrong answer or timeout earns nothing and resets the streak.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScoringRules {
    base: u32,
    time_bonus: u32,
    streak_bonus: u32,
}

impl ScoringRules {
    #[must_use]
    pub fn new(base: u32, time_bonus: u32, streak_bonus: u32) -> Self {
        Self {
            base,
            time_bonus,
            streak_bonus,
        }
    }

    #[must_use]
    pub fn from_settings(settings: &GameSettings) -> Self {
        Self::new(
            settings.points_correct(),
            settings.points_time_bonus(),
            settings.points_streak(),
        )
    }

    /// Score one response. `streak` is the streak before this answer.
    #[must_use]
    pub fn score(
        &self,
        correct: bool,
        remaining_secs: u32,
        timer_secs: u32,
        streak: u32,
    ) -> ScoreOutcome {
        if !correct {
            return ScoreOutcome::MISS;
        }

        let new_streak = streak.saturating_add(1);
        let time_bonus = self.time_bonus_for(remaining_secs, timer_secs);
        let streak_bonus = if new_streak < 2 {
            0
        } else {
            self.streak_bonus.saturating_mul(new_streak - 1)
        };

        ScoreOutcome {
            points: self
                .base
                .saturating_add(time_bonus)
                .saturating_add(streak_bonus),
            streak: new_streak,
            time_bonus,
            streak_bonus,
        }
    }

    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    fn time_bonus_for(&self, remaining_secs: u32, timer_secs: u32) -> u32 {
        if timer_secs == 0 {
            return 0;
        }
        let fraction = f64::from(remaining_secs.min(timer_secs)) / f64::from(timer_secs);
        (fraction * f64::from(self.time_bonus)).round() as u32
    }
}

impl Default for ScoringRules {
    fn default() -> Self {
        Self::from_settings(&GameSettings::default())
    }
}

//
// ─── RUNNING TOTALS ────────────────────────────────────────────────────────────
//

/// Running totals for a session. The score never decreases.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct ScoreBoard {
    score: u64,
    streak: u32,
    best_streak: u32,
    correct: u32,
    incorrect: u32,
}

impl ScoreBoard {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Fold one resolved question into the totals.
    pub fn record(&mut self, outcome: AnswerOutcome, scored: ScoreOutcome) {
        self.score += u64::from(scored.points);
        self.streak = scored.streak;
        self.best_streak = self.best_streak.max(scored.streak);
        if outcome.is_correct() {
            self.correct += 1;
        } else {
            self.incorrect += 1;
        }
    }

    #[must_use]
    pub fn score(&self) -> u64 {
        self.score
    }

    #[must_use]
    pub fn streak(&self) -> u32 {
        self.streak
    }

    #[must_use]
    pub fn best_streak(&self) -> u32 {
        self.best_streak
    }

    #[must_use]
    pub fn correct(&self) -> u32 {
        self.correct
    }

    #[must_use]
    pub fn incorrect(&self) -> u32 {
        self.incorrect
    }

    #[must_use]
    pub fn resolved(&self) -> u32 {
        self.correct + self.incorrect
    }
}
