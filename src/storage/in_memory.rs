//! In-memory record store.
//!
//! Keeps the collection behind a tokio `RwLock`. Until the first save the store
//! reports its collection as missing, mirroring a JSON store whose file has not
//! been written yet. Saves can be made to fail on demand, which is how tests
//! exercise the storage error paths.

use crate::model::{RecordCollection, UserRecord};
use crate::storage::{RecordStore, StorageError};
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use tokio::sync::RwLock;

/// Thread-safe in-memory store.
///
/// Clones share the same underlying collection.
#[derive(Clone, Default)]
pub struct InMemoryStore {
    users: Arc<RwLock<Option<Vec<UserRecord>>>>,
    fail_saves: Arc<AtomicBool>,
    save_count: Arc<AtomicUsize>,
}

impl InMemoryStore {
    /// Create a store with nothing persisted.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a store that already holds `records`.
    pub fn with_records(records: Vec<UserRecord>) -> Self {
        Self {
            users: Arc::new(RwLock::new(Some(records))),
            ..Self::default()
        }
    }

    /// Forget everything, returning to the "nothing persisted" state.
    pub async fn clear(&self) {
        *self.users.write().await = None;
    }

    /// Make every following save fail with [`StorageError::Unavailable`].
    pub fn set_save_failure(&self, fail: bool) {
        self.fail_saves.store(fail, Ordering::SeqCst);
    }

    /// Number of successful saves so far.
    pub fn save_count(&self) -> usize {
        self.save_count.load(Ordering::SeqCst)
    }
}

impl RecordStore for InMemoryStore {
    async fn load(&self) -> Result<RecordCollection, StorageError> {
        let guard = self.users.read().await;
        Ok(match guard.as_ref() {
            Some(users) => RecordCollection::stored(users.clone()),
            None => RecordCollection::missing(),
        })
    }

    async fn save(&self, collection: &RecordCollection) -> Result<(), StorageError> {
        if self.fail_saves.load(Ordering::SeqCst) {
            return Err(StorageError::unavailable("in-memory store rejects writes"));
        }
        *self.users.write().await = Some(collection.records().to_vec());
        self.save_count.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }

    fn describe(&self) -> String {
        "in-memory".to_string()
    }
}
