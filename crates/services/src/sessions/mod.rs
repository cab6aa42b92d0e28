mod planner;
mod progress;
mod service;
mod workflow;

// Public API of the session subsystem.
pub use crate::error::SessionError;
pub use planner::QuestionPlanner;
pub use progress::SessionProgress;
pub use service::{AnswerFeedback, GameSession, Resolution, SessionPhase, SessionStep, TickOutcome};
pub use workflow::{GameLoopService, SessionAnswerResult};
