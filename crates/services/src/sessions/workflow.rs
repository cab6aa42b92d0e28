use std::sync::Arc;

use rand::SeedableRng;
use rand::rngs::StdRng;
use tracing::debug;

use shapes_core::AttributeCatalog;
use shapes_core::model::{GameSettings, QuestionToken};

use super::service::{GameSession, Resolution, TickOutcome};
use crate::Clock;
use crate::error::SessionError;
use crate::notifier::{Notifier, TracingNotifier};

/// Result of resolving the current question through [`GameLoopService`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionAnswerResult {
    pub resolution: Resolution,
    pub is_complete: bool,
}

/// Builds sessions from shared configuration and moves them forward after
/// every resolution.
#[derive(Clone)]
pub struct GameLoopService {
    clock: Clock,
    settings: GameSettings,
    catalog: Arc<AttributeCatalog>,
    notifier: Arc<dyn Notifier>,
    seed: Option<u64>,
}

impl GameLoopService {
    #[must_use]
    pub fn new(clock: Clock, settings: GameSettings, catalog: Arc<AttributeCatalog>) -> Self {
        Self {
            clock,
            settings,
            catalog,
            notifier: Arc::new(TracingNotifier),
            seed: None,
        }
    }

    /// Seed every session's generator for reproducible runs.
    #[must_use]
    pub fn with_seed(mut self, seed: Option<u64>) -> Self {
        self.seed = seed;
        self
    }

    #[must_use]
    pub fn with_notifier(mut self, notifier: Arc<dyn Notifier>) -> Self {
        self.notifier = notifier;
        self
    }

    #[must_use]
    pub fn settings(&self) -> &GameSettings {
        &self.settings
    }

    /// Build a session and issue its first question.
    ///
    /// # Errors
    ///
    /// Returns `SessionError` for invalid settings or generation failures.
    pub fn start_session(&self) -> Result<GameSession, SessionError> {
        let rng = match self.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_os_rng(),
        };
        let mut session = GameSession::new(
            self.settings.clone(),
            Arc::clone(&self.catalog),
            rng,
            self.clock,
            Arc::clone(&self.notifier),
        )?;
        session.start()?;
        Ok(session)
    }

    /// Answer the current question and advance past it.
    ///
    /// # Errors
    ///
    /// Returns `SessionError` if the next question cannot be issued.
    pub fn answer_current(
        &self,
        session: &mut GameSession,
        answer: &str,
    ) -> Result<SessionAnswerResult, SessionError> {
        let resolution = session.submit_answer(answer);
        self.settle(session, resolution)
    }

    /// Time out the current question and advance past it.
    ///
    /// # Errors
    ///
    /// Returns `SessionError` if the next question cannot be issued.
    pub fn expire_current(
        &self,
        session: &mut GameSession,
    ) -> Result<SessionAnswerResult, SessionError> {
        let resolution = session.on_timeout();
        self.settle(session, resolution)
    }

    /// Feed a countdown tick; advances when the tick times the question out.
    ///
    /// # Errors
    ///
    /// Returns `SessionError` if the next question cannot be issued.
    pub fn handle_tick(
        &self,
        session: &mut GameSession,
        token: QuestionToken,
    ) -> Result<TickOutcome, SessionError> {
        let outcome = session.tick(token);
        if matches!(outcome, TickOutcome::TimedOut(_)) {
            session.advance()?;
        }
        Ok(outcome)
    }

    fn settle(
        &self,
        session: &mut GameSession,
        resolution: Resolution,
    ) -> Result<SessionAnswerResult, SessionError> {
        if resolution.is_ignored() {
            debug!(session = %session.id(), "resolution ignored, not advancing");
        } else {
            session.advance()?;
        }
        Ok(SessionAnswerResult {
            resolution,
            is_complete: session.is_finished(),
        })
    }
}

impl std::fmt::Debug for GameLoopService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GameLoopService")
            .field("clock", &self.clock)
            .field("settings", &self.settings)
            .field("seed", &self.seed)
            .finish_non_exhaustive()
    }
}
