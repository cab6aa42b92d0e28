//! Shared error types for the services crate.

use thiserror::Error;

use shapes_core::model::{SessionSummaryError, SettingsError};

/// Errors emitted by session services.
///
/// Answering twice or a late countdown tick is not an error; those calls
/// resolve to `Resolution::Ignored`.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum SessionError {
    #[error("session has not been started")]
    NotStarted,
    #[error("session already started")]
    AlreadyStarted,
    #[error("session already finished")]
    Finished,
    #[error("current question has not been answered yet")]
    Unresolved,
    #[error("question generation failed: {0}")]
    Generation(#[from] shapes_core::Error),
    #[error(transparent)]
    Settings(#[from] SettingsError),
    #[error(transparent)]
    Summary(#[from] SessionSummaryError),
}
