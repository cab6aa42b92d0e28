use chrono::{DateTime, Utc};
use rand::rngs::StdRng;
use serde::Serialize;
use std::fmt;
use std::sync::Arc;
use tracing::{debug, info};

use shapes_core::model::{
    AnswerOutcome, GameSettings, Question, QuestionResult, QuestionToken, SessionId,
    SessionSummary,
};
use shapes_core::scoring::{ScoreBoard, ScoringRules};
use shapes_core::{AttributeCatalog, Clock, Countdown, Tick};

use super::planner::QuestionPlanner;
use super::progress::SessionProgress;
use crate::error::SessionError;
use crate::notifier::{GameEvent, Notifier};

/// Streak length from which every further correct answer is announced.
const STREAK_ANNOUNCE_FROM: u32 = 3;

//
// ─── OUTCOMES ──────────────────────────────────────────────────────────────────
//

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum SessionPhase {
    Idle,
    InProgress,
    Finished,
}

/// What the player is told after a question resolves.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AnswerFeedback {
    pub index: u32,
    pub outcome: AnswerOutcome,
    pub correct_answer: String,
    pub hint: String,
    pub points: u32,
    pub time_bonus: u32,
    pub streak_bonus: u32,
    pub streak: u32,
    pub total_score: u64,
}

/// Result of a resolution attempt.
///
/// Only the first answer or timeout for a question resolves it; every later
/// attempt is `Ignored` and changes nothing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Resolution {
    Resolved(AnswerFeedback),
    Ignored,
}

impl Resolution {
    #[must_use]
    pub fn feedback(&self) -> Option<&AnswerFeedback> {
        match self {
            Resolution::Resolved(feedback) => Some(feedback),
            Resolution::Ignored => None,
        }
    }

    #[must_use]
    pub fn is_ignored(&self) -> bool {
        matches!(self, Resolution::Ignored)
    }
}

/// Result of feeding one countdown tick to the session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TickOutcome {
    Running { remaining: u32 },
    Warning { remaining: u32 },
    TimedOut(AnswerFeedback),
    /// Stale token, or the question was already resolved.
    Ignored,
}

/// Where the session stands after `advance`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum SessionStep<'a> {
    Question(&'a Question),
    Finished(&'a SessionSummary),
}

//
// ─── SESSION ───────────────────────────────────────────────────────────────────
//

/// One play-through: `Idle → InProgress → Finished`.
///
/// All mutation goes through `start`, `advance`, `submit_answer`,
/// `on_timeout` and `tick`. Each question is resolved at most once; the
/// countdown is cancelled on every resolution path, and ticks carry the
/// [`QuestionToken`] of the question they were started for.
pub struct GameSession {
    id: SessionId,
    settings: GameSettings,
    rules: ScoringRules,
    planner: QuestionPlanner,
    rng: StdRng,
    clock: Clock,
    notifier: Arc<dyn Notifier>,
    phase: SessionPhase,
    question_index: u32,
    current: Option<Question>,
    token: QuestionToken,
    answered: bool,
    countdown: Countdown,
    board: ScoreBoard,
    results: Vec<QuestionResult>,
    started_at: Option<DateTime<Utc>>,
    summary: Option<SessionSummary>,
}

impl GameSession {
    /// Create an idle session.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::Settings` if `settings` fail validation.
    pub fn new(
        settings: GameSettings,
        catalog: Arc<AttributeCatalog>,
        rng: StdRng,
        clock: Clock,
        notifier: Arc<dyn Notifier>,
    ) -> Result<Self, SessionError> {
        settings.validate()?;
        Ok(Self {
            id: SessionId::new_v4(),
            rules: ScoringRules::from_settings(&settings),
            planner: QuestionPlanner::new(catalog, &settings),
            countdown: Countdown::idle(settings.timer_secs()),
            settings,
            rng,
            clock,
            notifier,
            phase: SessionPhase::Idle,
            question_index: 0,
            current: None,
            token: QuestionToken::default(),
            answered: false,
            board: ScoreBoard::new(),
            results: Vec::new(),
            started_at: None,
            summary: None,
        })
    }

    /// Reset every counter and issue question 1.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::AlreadyStarted` unless the session is idle, and
    /// `SessionError::Generation` if the first question cannot be built.
    pub fn start(&mut self) -> Result<&Question, SessionError> {
        if self.phase != SessionPhase::Idle {
            return Err(SessionError::AlreadyStarted);
        }

        self.reset();
        self.started_at = Some(self.clock.now());
        self.phase = SessionPhase::InProgress;
        info!(session = %self.id, total = self.settings.total_questions(), "session started");
        self.notifier.notify(GameEvent::SessionStart);

        match self.advance()? {
            SessionStep::Question(question) => Ok(question),
            SessionStep::Finished(_) => Err(SessionError::Finished),
        }
    }

    /// Throw away all progress and start over with a new session id.
    ///
    /// # Errors
    ///
    /// Same as [`GameSession::start`].
    pub fn restart(&mut self) -> Result<&Question, SessionError> {
        info!(session = %self.id, "session restarted");
        self.reset();
        self.id = SessionId::new_v4();
        self.phase = SessionPhase::Idle;
        self.start()
    }

    /// Move past a resolved question: issue the next one, or finish after the last.
    ///
    /// # Errors
    ///
    /// - `NotStarted` / `Finished` outside the `InProgress` phase
    /// - `Unresolved` while the current question still awaits an answer
    /// - `Generation` if the next question cannot be built
    pub fn advance(&mut self) -> Result<SessionStep<'_>, SessionError> {
        match self.phase {
            SessionPhase::Idle => return Err(SessionError::NotStarted),
            SessionPhase::Finished => return Err(SessionError::Finished),
            SessionPhase::InProgress => {}
        }
        if self.current.is_some() && !self.answered {
            return Err(SessionError::Unresolved);
        }

        if self.question_index >= self.settings.total_questions() {
            return self.finish().map(SessionStep::Finished);
        }

        let index = self.question_index + 1;
        let question = self.planner.next(index, &mut self.rng)?;

        self.question_index = index;
        self.token = self.token.next();
        self.answered = false;
        self.countdown = Countdown::start(
            self.settings.timer_secs(),
            self.settings.timer_warning_secs(),
        );
        info!(
            session = %self.id,
            index,
            kind = %question.kind(),
            figures = question.display().len(),
            "question issued"
        );

        Ok(SessionStep::Question(&*self.current.insert(question)))
    }

    /// Resolve the current question with the player's choice.
    pub fn submit_answer(&mut self, answer: &str) -> Resolution {
        if !self.awaiting_answer() {
            debug!(session = %self.id, index = self.question_index, "late answer ignored");
            return Resolution::Ignored;
        }
        self.resolve(Some(answer))
    }

    /// Resolve the current question as a timeout.
    pub fn on_timeout(&mut self) -> Resolution {
        if !self.awaiting_answer() {
            debug!(session = %self.id, index = self.question_index, "late timeout ignored");
            return Resolution::Ignored;
        }
        self.resolve(None)
    }

    /// Advance the countdown by one second on behalf of the question `token`
    /// was issued for.
    pub fn tick(&mut self, token: QuestionToken) -> TickOutcome {
        if token != self.token || !self.awaiting_answer() {
            return TickOutcome::Ignored;
        }

        match self.countdown.tick() {
            Tick::Running { remaining } => TickOutcome::Running { remaining },
            Tick::Warning { remaining } => {
                debug!(session = %self.id, index = self.question_index, remaining, "timer warning");
                self.notifier.notify(GameEvent::TimerWarning { remaining });
                TickOutcome::Warning { remaining }
            }
            Tick::Expired => match self.on_timeout() {
                Resolution::Resolved(feedback) => TickOutcome::TimedOut(feedback),
                Resolution::Ignored => TickOutcome::Ignored,
            },
            Tick::Stopped => TickOutcome::Ignored,
        }
    }

    fn awaiting_answer(&self) -> bool {
        self.phase == SessionPhase::InProgress && self.current.is_some() && !self.answered
    }

    fn resolve(&mut self, submitted: Option<&str>) -> Resolution {
        let Some(question) = self.current.as_ref() else {
            return Resolution::Ignored;
        };
        let kind = question.kind();
        let correct_answer = question.correct_answer().to_string();
        let hint = question.hint().to_string();
        let outcome = match submitted {
            None => AnswerOutcome::TimedOut,
            Some(answer) if question.is_correct(answer) => AnswerOutcome::Correct,
            Some(_) => AnswerOutcome::Incorrect,
        };

        self.answered = true;
        self.countdown.cancel();

        let scored = self.rules.score(
            outcome.is_correct(),
            self.countdown.remaining(),
            self.settings.timer_secs(),
            self.board.streak(),
        );
        self.board.record(outcome, scored);
        self.results.push(QuestionResult {
            index: self.question_index,
            kind,
            submitted: submitted.map(str::to_string),
            correct_answer: correct_answer.clone(),
            outcome,
            points: scored.points,
            streak_after: scored.streak,
        });

        info!(
            session = %self.id,
            index = self.question_index,
            ?outcome,
            points = scored.points,
            streak = scored.streak,
            score = self.board.score(),
            "question resolved"
        );

        self.notifier.notify(match outcome {
            AnswerOutcome::Correct => GameEvent::Correct,
            AnswerOutcome::Incorrect => GameEvent::Incorrect,
            AnswerOutcome::TimedOut => GameEvent::Timeout,
        });
        if scored.streak >= STREAK_ANNOUNCE_FROM {
            self.notifier.notify(GameEvent::Streak {
                length: scored.streak,
            });
        }

        Resolution::Resolved(AnswerFeedback {
            index: self.question_index,
            outcome,
            correct_answer,
            hint,
            points: scored.points,
            time_bonus: scored.time_bonus,
            streak_bonus: scored.streak_bonus,
            streak: scored.streak,
            total_score: self.board.score(),
        })
    }

    fn finish(&mut self) -> Result<&SessionSummary, SessionError> {
        self.countdown.cancel();
        let completed_at = self.clock.now();
        let started_at = self.started_at.unwrap_or(completed_at);
        let summary = SessionSummary::from_results(
            self.id,
            started_at,
            completed_at,
            self.settings.total_questions(),
            &self.results,
        )?;

        self.phase = SessionPhase::Finished;
        self.current = None;
        info!(
            session = %self.id,
            score = summary.score(),
            accuracy = summary.accuracy(),
            "session finished"
        );
        self.notifier.notify(GameEvent::SessionEnd);

        Ok(&*self.summary.insert(summary))
    }

    fn reset(&mut self) {
        self.countdown = Countdown::idle(self.settings.timer_secs());
        self.question_index = 0;
        self.current = None;
        self.answered = false;
        self.board = ScoreBoard::new();
        self.results.clear();
        self.planner.reset();
        self.started_at = None;
        self.summary = None;
    }

    #[must_use]
    pub fn id(&self) -> SessionId {
        self.id
    }

    #[must_use]
    pub fn phase(&self) -> SessionPhase {
        self.phase
    }

    #[must_use]
    pub fn settings(&self) -> &GameSettings {
        &self.settings
    }

    #[must_use]
    pub fn question_index(&self) -> u32 {
        self.question_index
    }

    #[must_use]
    pub fn current_question(&self) -> Option<&Question> {
        self.current.as_ref()
    }

    /// Token of the question currently on screen.
    #[must_use]
    pub fn token(&self) -> QuestionToken {
        self.token
    }

    #[must_use]
    pub fn is_answered(&self) -> bool {
        self.answered
    }

    #[must_use]
    pub fn remaining_secs(&self) -> u32 {
        self.countdown.remaining()
    }

    #[must_use]
    pub fn score(&self) -> u64 {
        self.board.score()
    }

    #[must_use]
    pub fn streak(&self) -> u32 {
        self.board.streak()
    }

    #[must_use]
    pub fn correct_count(&self) -> u32 {
        self.board.correct()
    }

    #[must_use]
    pub fn incorrect_count(&self) -> u32 {
        self.board.incorrect()
    }

    #[must_use]
    pub fn results(&self) -> &[QuestionResult] {
        &self.results
    }

    #[must_use]
    pub fn summary(&self) -> Option<&SessionSummary> {
        self.summary.as_ref()
    }

    #[must_use]
    pub fn is_finished(&self) -> bool {
        self.phase == SessionPhase::Finished
    }

    #[must_use]
    pub fn progress(&self) -> SessionProgress {
        let total = self.settings.total_questions();
        let answered = self.board.resolved();
        SessionProgress {
            index: self.question_index,
            total,
            answered,
            remaining: total.saturating_sub(answered),
            is_complete: self.is_finished(),
        }
    }
}

impl fmt::Debug for GameSession {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("GameSession")
            .field("id", &self.id)
            .field("phase", &self.phase)
            .field("question_index", &self.question_index)
            .field("token", &self.token)
            .field("answered", &self.answered)
            .field("countdown", &self.countdown)
            .field("board", &self.board)
            .field("results_len", &self.results.len())
            .finish_non_exhaustive()
    }
}

//
// ─── TESTS ─────────────────────────────────────────────────────────────────────
//

#[cfg(test)]
mod tests {
    use super::*;
    use crate::notifier::RecordingNotifier;
    use rand::SeedableRng;
    use shapes_core::time::fixed_clock;

    fn session_with(settings: GameSettings) -> (GameSession, Arc<RecordingNotifier>) {
        let notifier = Arc::new(RecordingNotifier::new());
        let session = GameSession::new(
            settings,
            Arc::new(AttributeCatalog::reference()),
            StdRng::seed_from_u64(17),
            fixed_clock(),
            notifier.clone(),
        )
        .unwrap();
        (session, notifier)
    }

    fn wrong_answer(question: &Question) -> String {
        question
            .options()
            .iter()
            .find(|o| !question.is_correct(o))
            .cloned()
            .unwrap()
    }

    #[test]
    fn start_issues_first_question() {
        let (mut session, notifier) = session_with(GameSettings::default());
        assert_eq!(session.phase(), SessionPhase::Idle);

        let question = session.start().unwrap();
        assert!(question.kind().is_single_figure());
        assert_eq!(session.question_index(), 1);
        assert_eq!(session.remaining_secs(), 15);
        assert!(!session.is_answered());
        assert_eq!(notifier.events(), vec![GameEvent::SessionStart]);
        assert!(matches!(session.start(), Err(SessionError::AlreadyStarted)));
    }

    #[test]
    fn advance_requires_started_and_resolved_question() {
        let (mut session, _) = session_with(GameSettings::default());
        assert!(matches!(session.advance(), Err(SessionError::NotStarted)));

        session.start().unwrap();
        assert!(matches!(session.advance(), Err(SessionError::Unresolved)));
    }

    #[test]
    fn second_submission_is_ignored() {
        let (mut session, notifier) = session_with(GameSettings::default());
        let answer = session.start().unwrap().correct_answer().to_string();

        let first = session.submit_answer(&answer);
        assert_eq!(first.feedback().unwrap().points, 40);

        let before = (session.score(), session.streak(), session.correct_count());
        assert!(session.submit_answer(&answer).is_ignored());
        assert!(session.on_timeout().is_ignored());
        assert_eq!(before, (session.score(), session.streak(), session.correct_count()));
        assert_eq!(session.results().len(), 1);
        assert_eq!(notifier.count(GameEvent::Correct), 1);
    }

    #[test]
    fn wrong_answer_resets_streak() {
        let (mut session, notifier) = session_with(GameSettings::default());
        let answer = session.start().unwrap().correct_answer().to_string();
        session.submit_answer(&answer);
        session.advance().unwrap();

        let wrong = wrong_answer(session.current_question().unwrap());
        let resolution = session.submit_answer(&wrong);
        let feedback = resolution.feedback().unwrap();
        assert_eq!(feedback.outcome, AnswerOutcome::Incorrect);
        assert_eq!(feedback.points, 0);
        assert_eq!(session.streak(), 0);
        assert_eq!(session.incorrect_count(), 1);
        assert_eq!(notifier.count(GameEvent::Incorrect), 1);
    }

    #[test]
    fn ticks_count_down_warn_and_time_out() {
        let (mut session, notifier) = session_with(GameSettings::default());
        session.start().unwrap();
        let token = session.token();

        for expected in (6..=14).rev() {
            assert_eq!(
                session.tick(token),
                TickOutcome::Running {
                    remaining: expected
                }
            );
        }
        assert_eq!(session.tick(token), TickOutcome::Warning { remaining: 5 });
        for _ in 0..4 {
            session.tick(token);
        }
        let TickOutcome::TimedOut(feedback) = session.tick(token) else {
            panic!("expected timeout");
        };
        assert_eq!(feedback.outcome, AnswerOutcome::TimedOut);
        assert_eq!(feedback.points, 0);
        assert_eq!(session.incorrect_count(), 1);
        assert_eq!(session.tick(token), TickOutcome::Ignored);
        assert_eq!(notifier.count(GameEvent::TimerWarning { remaining: 5 }), 1);
        assert_eq!(notifier.count(GameEvent::Timeout), 1);
    }

    #[test]
    fn stale_token_cannot_touch_next_question() {
        let (mut session, _) = session_with(GameSettings::default());
        session.start().unwrap();
        let stale = session.token();
        session.on_timeout();
        session.advance().unwrap();

        assert_eq!(session.tick(stale), TickOutcome::Ignored);
        assert_eq!(session.remaining_secs(), 15);
        assert!(!session.is_answered());
    }

    #[test]
    fn time_bonus_uses_remaining_seconds() {
        let (mut session, _) = session_with(GameSettings::default());
        let answer = session.start().unwrap().correct_answer().to_string();
        let token = session.token();
        for _ in 0..8 {
            session.tick(token);
        }
        // 7/15 of the time bonus remains.
        let feedback = session.submit_answer(&answer).feedback().cloned().unwrap();
        assert_eq!(feedback.time_bonus, 14);
        assert_eq!(feedback.points, 24);
    }

    #[test]
    fn streak_events_fire_from_third_correct_answer() {
        let (mut session, notifier) = session_with(GameSettings::new(4, 15).unwrap());
        session.start().unwrap();
        for _ in 0..4 {
            let answer = session.current_question().unwrap().correct_answer().to_string();
            session.submit_answer(&answer);
            session.advance().unwrap();
        }
        assert!(session.is_finished());
        assert_eq!(notifier.count(GameEvent::Streak { length: 3 }), 1);
        assert_eq!(notifier.count(GameEvent::Streak { length: 4 }), 1);
        assert_eq!(notifier.count(GameEvent::SessionEnd), 1);
    }

    #[test]
    fn restart_resets_counters() {
        let (mut session, _) = session_with(GameSettings::new(2, 15).unwrap());
        let old_id = session.id();
        let answer = session.start().unwrap().correct_answer().to_string();
        session.submit_answer(&answer);

        session.restart().unwrap();
        assert_ne!(session.id(), old_id);
        assert_eq!(session.question_index(), 1);
        assert_eq!(session.score(), 0);
        assert_eq!(session.correct_count(), 0);
        assert!(session.results().is_empty());
        assert_eq!(session.phase(), SessionPhase::InProgress);
    }

    #[test]
    fn progress_tracks_resolution() {
        let (mut session, _) = session_with(GameSettings::new(3, 15).unwrap());
        session.start().unwrap();
        session.on_timeout();

        let progress = session.progress();
        assert_eq!(progress.index, 1);
        assert_eq!(progress.answered, 1);
        assert_eq!(progress.remaining, 2);
        assert!(!progress.is_complete);
    }
}
