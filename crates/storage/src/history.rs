//! Durable log of completed quizzes.
//!
//! The whole history lives in one blob under [`HISTORY_KEY`] as a JSON array.
//! It is read once on first use and rewritten in full on every mutation.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use quiz_core::model::{HistoryEntry, HistoryEntryId};
use serde::{Deserialize, Serialize};
use tokio::sync::{Mutex, MutexGuard};

use crate::repository::{BlobStore, InMemoryBlobStore, StorageError};

/// Blob key holding the serialized history.
pub const HISTORY_KEY: &str = "quizHistory";

/// Persisted shape of a history entry.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct HistoryRecord {
    id: HistoryEntryId,
    completed_at: DateTime<Utc>,
    total_questions: u32,
    correct_count: u32,
}

impl HistoryRecord {
    fn from_entry(entry: &HistoryEntry) -> Self {
        Self {
            id: entry.id(),
            completed_at: entry.completed_at(),
            total_questions: entry.total_questions(),
            correct_count: entry.correct_count(),
        }
    }

    fn into_entry(self) -> Result<HistoryEntry, StorageError> {
        HistoryEntry::from_persisted(
            self.id,
            self.completed_at,
            self.total_questions,
            self.correct_count,
        )
        .map_err(|e| StorageError::Serialization(e.to_string()))
    }
}

/// Serialize entries into the persisted blob format.
///
/// # Errors
///
/// Returns `StorageError::Serialization` if encoding fails.
pub fn encode_history(entries: &[HistoryEntry]) -> Result<Vec<u8>, StorageError> {
    let records: Vec<HistoryRecord> = entries.iter().map(HistoryRecord::from_entry).collect();
    serde_json::to_vec(&records).map_err(|e| StorageError::Serialization(e.to_string()))
}

/// Parse the persisted blob format back into entries.
///
/// # Errors
///
/// Returns `StorageError::Serialization` if the blob is not valid JSON or any
/// entry fails validation.
pub fn decode_history(bytes: &[u8]) -> Result<Vec<HistoryEntry>, StorageError> {
    let records: Vec<HistoryRecord> =
        serde_json::from_slice(bytes).map_err(|e| StorageError::Serialization(e.to_string()))?;
    records.into_iter().map(HistoryRecord::into_entry).collect()
}

/// Insertion-ordered collection of [`HistoryEntry`] backed by a [`BlobStore`].
///
/// Every operation loads the persisted history first if that has not
/// happened yet. Reads are fail-soft: a missing, unreadable or corrupt blob
/// yields an empty history. Writes go through the store's lock, so mutations
/// from one process are serialized; separate processes writing the same blob
/// race with last-write-wins.
pub struct HistoryStore {
    blobs: Arc<dyn BlobStore>,
    entries: Mutex<Option<Vec<HistoryEntry>>>,
}

impl HistoryStore {
    #[must_use]
    pub fn new(blobs: Arc<dyn BlobStore>) -> Self {
        Self {
            blobs,
            entries: Mutex::new(None),
        }
    }

    #[must_use]
    pub fn in_memory() -> Self {
        Self::new(Arc::new(InMemoryBlobStore::new()))
    }

    /// Load the persisted history into memory. No-op once loaded.
    pub async fn load(&self) {
        drop(self.lock_loaded().await);
    }

    /// Returns true once the persisted history has been read.
    pub async fn is_loaded(&self) -> bool {
        self.entries.lock().await.is_some()
    }

    /// Append an entry and rewrite the persisted history.
    ///
    /// The entry stays visible in memory even when the write fails, so the
    /// in-memory history can run ahead of what is durable.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the history cannot be serialized or written.
    pub async fn add(&self, entry: HistoryEntry) -> Result<(), StorageError> {
        let mut guard = self.lock_loaded().await;
        let entries = guard.get_or_insert_with(Vec::new);
        tracing::debug!("Adding quiz history entry {}", entry.id());
        entries.push(entry);
        self.persist(entries).await
    }

    /// All entries, most recently completed first.
    pub async fn list(&self) -> Vec<HistoryEntry> {
        let guard = self.lock_loaded().await;
        let mut entries = guard.as_ref().cloned().unwrap_or_default();
        entries.sort_by(|a, b| b.completed_at().cmp(&a.completed_at()));
        entries
    }

    /// Number of stored entries.
    pub async fn len(&self) -> usize {
        self.lock_loaded().await.as_ref().map_or(0, Vec::len)
    }

    pub async fn is_empty(&self) -> bool {
        self.len().await == 0
    }

    /// Remove the entry with `id` and rewrite the persisted history.
    ///
    /// Returns `Ok(false)` without writing when no such entry exists.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the updated history cannot be written. The
    /// entry is already gone from memory at that point.
    pub async fn delete(&self, id: HistoryEntryId) -> Result<bool, StorageError> {
        let mut guard = self.lock_loaded().await;
        let entries = guard.get_or_insert_with(Vec::new);

        let Some(index) = entries.iter().position(|e| e.id() == id) else {
            tracing::info!("Quiz history entry {} not found", id);
            return Ok(false);
        };

        let removed = entries.remove(index);
        tracing::info!(
            "Deleted quiz history entry {} ({}/{})",
            removed.id(),
            removed.correct_count(),
            removed.total_questions()
        );
        self.persist(entries).await?;
        Ok(true)
    }

    async fn lock_loaded(&self) -> MutexGuard<'_, Option<Vec<HistoryEntry>>> {
        let mut guard = self.entries.lock().await;
        if guard.is_none() {
            *guard = Some(self.read_persisted().await);
        }
        guard
    }

    async fn read_persisted(&self) -> Vec<HistoryEntry> {
        let bytes = match self.blobs.get(HISTORY_KEY).await {
            Ok(Some(bytes)) => bytes,
            Ok(None) => {
                tracing::info!("No quiz history found");
                return Vec::new();
            }
            Err(e) => {
                tracing::warn!("Failed to read quiz history, starting empty: {:?}", e);
                return Vec::new();
            }
        };

        match decode_history(&bytes) {
            Ok(entries) => {
                tracing::info!("Loaded {} quiz history entries", entries.len());
                entries
            }
            Err(e) => {
                tracing::warn!("Discarding unreadable quiz history: {:?}", e);
                Vec::new()
            }
        }
    }

    async fn persist(&self, entries: &[HistoryEntry]) -> Result<(), StorageError> {
        let bytes = encode_history(entries).inspect_err(|e| {
            tracing::warn!("Failed to encode quiz history: {:?}", e);
        })?;
        self.blobs.put(HISTORY_KEY, &bytes).await.inspect_err(|e| {
            tracing::warn!("Failed to save quiz history: {:?}", e);
        })?;
        tracing::info!("Saved {} quiz history entries", entries.len());
        Ok(())
    }
}

impl std::fmt::Debug for HistoryStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HistoryStore").finish_non_exhaustive()
    }
}
