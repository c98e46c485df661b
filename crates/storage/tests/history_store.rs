use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use async_trait::async_trait;
use chrono::Duration;
use quiz_core::model::{HistoryEntry, HistoryEntryId};
use quiz_core::time::fixed_now;
use storage::repository::{BlobStore, InMemoryBlobStore, StorageError};
use storage::{HISTORY_KEY, HistoryStore};

fn entry(minutes: i64, correct: u32) -> HistoryEntry {
    HistoryEntry::from_persisted(
        HistoryEntryId::generate(),
        fixed_now() + Duration::minutes(minutes),
        5,
        correct,
    )
    .unwrap()
}

/// Blob store whose reads or writes can be switched off.
#[derive(Default)]
struct FlakyBlobStore {
    inner: InMemoryBlobStore,
    fail_reads: AtomicBool,
    fail_writes: AtomicBool,
}

#[async_trait]
impl BlobStore for FlakyBlobStore {
    async fn get(&self, key: &str) -> Result<Option<Vec<u8>>, StorageError> {
        if self.fail_reads.load(Ordering::SeqCst) {
            return Err(StorageError::Connection("disk unplugged".into()));
        }
        self.inner.get(key).await
    }

    async fn put(&self, key: &str, value: &[u8]) -> Result<(), StorageError> {
        if self.fail_writes.load(Ordering::SeqCst) {
            return Err(StorageError::Connection("disk full".into()));
        }
        self.inner.put(key, value).await
    }
}

#[tokio::test]
async fn add_then_delete_round_trip() {
    let store = HistoryStore::in_memory();
    let e = entry(0, 2);

    store.add(e.clone()).await.unwrap();
    assert!(store.list().await.contains(&e));

    assert!(store.delete(e.id()).await.unwrap());
    assert!(!store.list().await.contains(&e));
}

#[tokio::test]
async fn deleting_unknown_id_leaves_list_unchanged() {
    let store = HistoryStore::in_memory();
    store.add(entry(0, 1)).await.unwrap();
    store.add(entry(1, 2)).await.unwrap();
    let before = store.list().await;

    assert!(!store.delete(HistoryEntryId::generate()).await.unwrap());
    assert_eq!(store.list().await, before);
}

#[tokio::test]
async fn list_orders_by_completion_time_regardless_of_insert_order() {
    let store = HistoryStore::in_memory();
    let t1 = entry(1, 1);
    let t2 = entry(2, 2);
    let t3 = entry(3, 3);
    for e in [t3.clone(), t1.clone(), t2.clone()] {
        store.add(e).await.unwrap();
    }
    assert_eq!(store.list().await, vec![t3, t2, t1]);
}

#[tokio::test]
async fn unreadable_backend_yields_empty_history() {
    let blobs = Arc::new(FlakyBlobStore::default());
    blobs.inner.insert_raw(HISTORY_KEY, b"[]".to_vec()).unwrap();
    blobs.fail_reads.store(true, Ordering::SeqCst);

    let store = HistoryStore::new(blobs);
    assert!(store.is_empty().await);
}

#[tokio::test]
async fn failed_write_is_reported_but_stays_in_memory() {
    let blobs = Arc::new(FlakyBlobStore::default());
    blobs.fail_writes.store(true, Ordering::SeqCst);
    let store = HistoryStore::new(blobs.clone());
    let e = entry(0, 5);

    let err = store.add(e.clone()).await.unwrap_err();
    assert!(matches!(err, StorageError::Connection(_)));
    assert_eq!(store.list().await, vec![e]);

    // Nothing reached durable storage.
    assert_eq!(blobs.inner.get(HISTORY_KEY).await.unwrap(), None);
}

#[tokio::test]
async fn failed_write_on_delete_still_removes_in_memory() {
    let blobs = Arc::new(FlakyBlobStore::default());
    let store = HistoryStore::new(blobs.clone());
    let e = entry(0, 5);
    store.add(e.clone()).await.unwrap();

    blobs.fail_writes.store(true, Ordering::SeqCst);
    assert!(store.delete(e.id()).await.is_err());
    assert!(store.list().await.is_empty());
}

#[tokio::test]
async fn concurrent_adds_in_one_process_are_not_lost() {
    let store = Arc::new(HistoryStore::in_memory());
    let mut handles = Vec::new();
    for i in 0..10 {
        let store = Arc::clone(&store);
        handles.push(tokio::spawn(async move {
            store.add(entry(i, 1)).await.unwrap();
        }));
    }
    for h in handles {
        h.await.unwrap();
    }
    assert_eq!(store.len().await, 10);
}

#[tokio::test]
async fn explicit_load_on_missing_blob_gives_empty_history() {
    let blobs = Arc::new(InMemoryBlobStore::new());
    let store = HistoryStore::new(blobs.clone());
    assert!(!store.is_loaded().await);

    store.load().await;

    assert!(store.is_loaded().await);
    assert!(store.is_empty().await);
    assert_eq!(blobs.get(HISTORY_KEY).await.unwrap(), None);
}

#[tokio::test]
async fn second_load_keeps_in_memory_entries() {
    let blobs = Arc::new(InMemoryBlobStore::new());
    let store = HistoryStore::new(blobs.clone());
    store.load().await;
    let kept = entry(0, 4);
    store.add(kept.clone()).await.unwrap();

    blobs.put(HISTORY_KEY, b"garbage").await.unwrap();
    store.load().await;

    assert_eq!(store.list().await, vec![kept]);
}

#[tokio::test]
async fn load_picks_up_history_written_earlier() {
    let blobs = Arc::new(InMemoryBlobStore::new());
    let first = HistoryStore::new(blobs.clone());
    let saved = entry(0, 3);
    first.add(saved.clone()).await.unwrap();

    let second = HistoryStore::new(blobs);
    second.load().await;
    assert_eq!(second.len().await, 1);
    assert_eq!(second.list().await, vec![saved]);
}
