use chrono::{DateTime, Utc};
use thiserror::Error;

use crate::model::{HistoryEntryId, QuizResult};

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum HistoryEntryError {
    #[error("correct count ({correct}) exceeds total questions ({total})")]
    CountMismatch { correct: u32, total: u32 },
}

/// Persisted summary of one completed quiz.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HistoryEntry {
    id: HistoryEntryId,
    completed_at: DateTime<Utc>,
    total_questions: u32,
    correct_count: u32,
}

impl HistoryEntry {
    /// Build an entry for a just-completed quiz, with a fresh id.
    ///
    /// `completed_at` should come from the services layer clock.
    #[must_use]
    pub fn from_result(result: &QuizResult, completed_at: DateTime<Utc>) -> Self {
        Self {
            id: HistoryEntryId::generate(),
            completed_at,
            total_questions: result.total_questions(),
            correct_count: result.correct_count(),
        }
    }

    /// Rehydrate an entry from persisted storage.
    ///
    /// # Errors
    ///
    /// Returns `HistoryEntryError::CountMismatch` if more answers are correct
    /// than there were questions.
    pub fn from_persisted(
        id: HistoryEntryId,
        completed_at: DateTime<Utc>,
        total_questions: u32,
        correct_count: u32,
    ) -> Result<Self, HistoryEntryError> {
        if correct_count > total_questions {
            return Err(HistoryEntryError::CountMismatch {
                correct: correct_count,
                total: total_questions,
            });
        }
        Ok(Self {
            id,
            completed_at,
            total_questions,
            correct_count,
        })
    }

    #[must_use]
    pub fn id(&self) -> HistoryEntryId {
        self.id
    }

    #[must_use]
    pub fn completed_at(&self) -> DateTime<Utc> {
        self.completed_at
    }

    #[must_use]
    pub fn total_questions(&self) -> u32 {
        self.total_questions
    }

    #[must_use]
    pub fn correct_count(&self) -> u32 {
        self.correct_count
    }
}
