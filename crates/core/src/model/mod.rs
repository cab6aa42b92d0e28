mod answer;
mod ids;
mod question;
mod session;
mod settings;

pub use ids::{QuestionToken, SessionId};

pub use answer::{AnswerOutcome, QuestionResult};
pub use question::{
    ANSWER_OPTIONS, Question, QuestionDraft, QuestionError, QuestionKind, QuestionSignature,
    ShapeInstance,
};
pub use session::{Encouragement, SessionSummary, SessionSummaryError};
pub use settings::{GameSettings, SettingsError};
