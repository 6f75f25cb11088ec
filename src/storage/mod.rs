//! Record store abstraction for the user collection.
//!
//! The store owns the single source of truth: an ordered list of user records that
//! is always read and written as a whole. There are no partial or streaming
//! writes; a mutating operation loads the collection, changes its copy and hands
//! the full collection back to [`RecordStore::save`].
//!
//! # Implementations
//!
//! - [`JsonFileStore`] - the persistent store, one pretty-printed JSON document of
//!   the form `{"users": [{"name": ..., "email": ...}]}`
//! - [`InMemoryStore`] - a process-local store for tests and benchmarks
//!
//! # Example Usage
//!
//! ```rust
//! use user_data_server::model::UserRecord;
//! use user_data_server::storage::{InMemoryStore, RecordStore};
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let store = InMemoryStore::new();
//!
//! let mut users = store.load().await?;
//! assert!(users.is_missing());
//!
//! users.push(UserRecord::new("Alice", "alice@x.com"));
//! store.save(&users).await?;
//!
//! assert_eq!(store.load().await?.len(), 1);
//! # Ok(())
//! # }
//! ```

pub mod errors;
pub mod in_memory;
pub mod json_file;

pub use errors::StorageError;
pub use in_memory::InMemoryStore;
pub use json_file::JsonFileStore;

use crate::model::{RecordCollection, UserRecord};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::future::Future;

/// On-disk layout of the user collection.
///
/// Entries stay raw JSON until [`UserDocument::into_records`]: an entry of the
/// wrong shape becomes a record with missing fields instead of failing the load.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UserDocument {
    #[serde(default)]
    pub users: Vec<Value>,
}

impl UserDocument {
    pub fn into_records(self) -> Vec<UserRecord> {
        self.users.iter().map(UserRecord::from_value).collect()
    }
}

/// Whole-collection persistence for user records.
///
/// Implementations perform no locking of their own. Callers that need
/// read-modify-write consistency serialize their writes (the service holds a
/// write lock for this).
pub trait RecordStore: Send + Sync {
    /// Load the full collection.
    ///
    /// Absent storage yields [`RecordCollection::missing`], never an error. Any
    /// other failure, including unparsable content, is returned to the caller.
    fn load(&self) -> impl Future<Output = Result<RecordCollection, StorageError>> + Send;

    /// Replace the stored collection with `collection`.
    ///
    /// Readers never observe a partially written collection.
    fn save(
        &self,
        collection: &RecordCollection,
    ) -> impl Future<Output = Result<(), StorageError>> + Send;

    /// Human readable location for log messages.
    fn describe(&self) -> String;
}
