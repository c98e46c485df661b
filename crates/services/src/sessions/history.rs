use chrono::{DateTime, Utc};
use std::sync::Arc;

use quiz_core::model::{HistoryEntry, HistoryEntryId, QuizResult};
use storage::HistoryStore;

use crate::Clock;
use crate::error::HistoryError;

/// Presentation-agnostic list item for a past quiz.
///
/// Timestamps are left unformatted; the UI picks locale and layout.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HistoryListItem {
    pub id: HistoryEntryId,
    /// `Quiz N`, numbered by position in the list (most recent is `Quiz 1`).
    pub title: String,
    pub completed_at: DateTime<Utc>,
    pub total: u32,
    pub correct: u32,
}

impl HistoryListItem {
    #[must_use]
    pub fn from_entry(position: usize, entry: &HistoryEntry) -> Self {
        Self {
            id: entry.id(),
            title: format!("Quiz {}", position + 1),
            completed_at: entry.completed_at(),
            total: entry.total_questions(),
            correct: entry.correct_count(),
        }
    }
}

/// History facade that hides the store and time source from the UI.
#[derive(Clone)]
pub struct HistoryService {
    clock: Clock,
    store: Arc<HistoryStore>,
}

impl HistoryService {
    #[must_use]
    pub fn new(clock: Clock, store: Arc<HistoryStore>) -> Self {
        Self { clock, store }
    }

    #[must_use]
    pub fn in_memory(clock: Clock) -> Self {
        Self::new(clock, Arc::new(HistoryStore::in_memory()))
    }

    #[must_use]
    pub fn store(&self) -> &Arc<HistoryStore> {
        &self.store
    }

    /// Turn a finished quiz into a history entry and store it.
    ///
    /// A failed write is logged and otherwise ignored: the entry is still
    /// listed for the rest of the process, it just may not survive a restart.
    pub async fn record(&self, result: &QuizResult) -> HistoryEntry {
        let entry = HistoryEntry::from_result(result, self.clock.now());
        if let Err(e) = self.store.add(entry.clone()).await {
            tracing::warn!("Quiz result {} kept in memory only: {:?}", entry.id(), e);
        }
        entry
    }

    /// Past quizzes, most recent first.
    pub async fn list(&self) -> Vec<HistoryListItem> {
        self.store
            .list()
            .await
            .iter()
            .enumerate()
            .map(|(i, entry)| HistoryListItem::from_entry(i, entry))
            .collect()
    }

    /// Delete one past quiz. Returns false if no entry had that id.
    ///
    /// # Errors
    ///
    /// Returns `HistoryError::Storage` if the deletion could not be persisted.
    pub async fn delete(&self, id: HistoryEntryId) -> Result<bool, HistoryError> {
        Ok(self.store.delete(id).await?)
    }
}

impl std::fmt::Debug for HistoryService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HistoryService")
            .field("clock", &self.clock)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;
    use quiz_core::model::AnsweredQuestion;
    use quiz_core::time::{fixed_clock, fixed_now};

    fn result(correct: usize) -> QuizResult {
        let answers = (0..5)
            .map(|i| AnsweredQuestion::new("Q", if i < correct { "A" } else { "B" }, "A"))
            .collect();
        QuizResult::from_answers(answers)
    }

    #[tokio::test]
    async fn record_stamps_with_clock() {
        let service = HistoryService::in_memory(fixed_clock());
        let entry = service.record(&result(2)).await;

        assert_eq!(entry.completed_at(), fixed_now());
        assert_eq!(entry.correct_count(), 2);
        assert_eq!(entry.total_questions(), 5);
    }

    #[tokio::test]
    async fn list_titles_follow_recency() {
        let store = Arc::new(HistoryStore::in_memory());
        let mut clock = fixed_clock();
        let older = HistoryService::new(clock, Arc::clone(&store))
            .record(&result(1))
            .await;
        clock.advance(Duration::hours(1));
        let newer = HistoryService::new(clock, Arc::clone(&store))
            .record(&result(4))
            .await;

        let items = HistoryService::new(clock, store).list().await;
        assert_eq!(items.len(), 2);
        assert_eq!(items[0].id, newer.id());
        assert_eq!(items[0].title, "Quiz 1");
        assert_eq!(items[1].id, older.id());
        assert_eq!(items[1].title, "Quiz 2");
        assert_eq!(items[1].correct, 1);
    }

    #[tokio::test]
    async fn delete_reports_whether_anything_was_removed() {
        let service = HistoryService::in_memory(fixed_clock());
        let entry = service.record(&result(3)).await;

        assert!(service.delete(entry.id()).await.unwrap());
        assert!(!service.delete(entry.id()).await.unwrap());
        assert!(service.list().await.is_empty());
    }
}
