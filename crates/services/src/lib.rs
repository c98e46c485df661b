#![forbid(unsafe_code)]

pub mod error;
pub mod question_source;
pub mod rating;
pub mod sessions;

pub use quiz_core::Clock;

pub use error::{FetchError, HistoryError, RatingError, SessionError};
pub use question_source::{OpenTriviaSource, QuestionSource, QuestionSourceConfig};
pub use rating::{Rating, RatingTable, ResultsPresenter};
pub use sessions::{
    Advance, HistoryListItem, HistoryService, QuizEvent, QuizFlowService, QuizProgress,
    QuizSession, SubscriptionId,
};
