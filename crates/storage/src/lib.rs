#![forbid(unsafe_code)]

pub mod history;
pub mod repository;
pub mod sqlite;

pub use history::{HISTORY_KEY, HistoryStore};
pub use repository::{BlobStore, InMemoryBlobStore, StorageError};
