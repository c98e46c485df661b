//! Shared error types for the services crate.

use thiserror::Error;

use storage::repository::StorageError;

/// Errors emitted while fetching questions from a `QuestionSource`.
///
/// All variants surface to players as the same "could not load questions"
/// state (see [`FetchError::user_message`]); `Display` keeps the detail for logs.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum FetchError {
    #[error("invalid question source url: {0}")]
    InvalidUrl(#[from] url::ParseError),
    #[error("question request failed: {0}")]
    Transport(#[from] reqwest::Error),
    #[error("question source returned status {0}")]
    HttpStatus(reqwest::StatusCode),
    #[error("could not decode question payload: {0}")]
    Decode(#[from] serde_json::Error),
    #[error("question source reported failure code {code}")]
    SourceFailure { code: i64 },
}

impl FetchError {
    /// Text shown to players for any fetch failure.
    #[must_use]
    pub fn user_message(&self) -> &'static str {
        "Could not load questions. Please try again."
    }
}

/// Caller-contract violations on a `QuizSession`.
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
#[non_exhaustive]
pub enum SessionError {
    #[error("no current question to answer")]
    NoCurrentQuestion,
    #[error("current question has no answer yet")]
    AnswerRequired,
}

/// Errors from the rating lookup table.
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
#[non_exhaustive]
pub enum RatingError {
    #[error("rating table has {len} bands, expected one per possible score of a {total}-question quiz")]
    TableSize { len: usize, total: u32 },
    #[error("correct count {correct} exceeds total questions {total}")]
    OutOfRange { correct: u32, total: u32 },
}

/// Errors emitted by the history service.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum HistoryError {
    #[error(transparent)]
    Storage(#[from] StorageError),
}
