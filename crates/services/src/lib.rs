#![forbid(unsafe_code)]

pub mod error;
pub mod notifier;
pub mod sessions;
pub mod ticker;

pub use shapes_core::Clock;
pub use sessions as session;

pub use error::SessionError;
pub use notifier::{GameEvent, Notifier, RecordingNotifier, TracingNotifier};
pub use sessions::{
    AnswerFeedback, GameLoopService, GameSession, QuestionPlanner, Resolution, SessionAnswerResult,
    SessionPhase, SessionProgress, SessionStep, TickOutcome,
};
pub use ticker::{TickerHandle, spawn_ticker};
