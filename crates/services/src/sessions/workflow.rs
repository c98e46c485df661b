use std::sync::Arc;

use quiz_core::model::{HistoryEntry, QuizResult};

use super::history::HistoryService;
use super::quiz::QuizSession;
use crate::error::FetchError;
use crate::question_source::QuestionSource;

/// Orchestrates quiz start (question fetch) and completion (history record).
#[derive(Clone)]
pub struct QuizFlowService {
    source: Arc<dyn QuestionSource>,
    history: HistoryService,
}

impl QuizFlowService {
    #[must_use]
    pub fn new(source: Arc<dyn QuestionSource>, history: HistoryService) -> Self {
        Self { source, history }
    }

    /// Fetch questions and start a new session.
    ///
    /// Callers should not start a second quiz while this is pending.
    ///
    /// # Errors
    ///
    /// Returns `FetchError` if the question source fails. No partial session
    /// is created.
    pub async fn start_quiz(&self) -> Result<QuizSession, FetchError> {
        let questions = self.source.fetch_questions().await.inspect_err(|e| {
            tracing::error!("Failed to fetch quiz questions: {:?}", e);
        })?;
        tracing::info!("Starting quiz with {} questions", questions.len());
        Ok(QuizSession::new(questions))
    }

    /// Store the result of a completed session in history.
    pub async fn finish(&self, result: &QuizResult) -> HistoryEntry {
        self.history.record(result).await
    }
}

impl std::fmt::Debug for QuizFlowService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("QuizFlowService")
            .field("history", &self.history)
            .finish_non_exhaustive()
    }
}
