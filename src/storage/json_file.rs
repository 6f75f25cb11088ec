//! JSON file backed record store.
//!
//! The whole collection lives in one pretty-printed document. Saving writes a
//! sibling `*.tmp` file and renames it over the target, so a reader sees either
//! the previous or the new collection, never a truncated one.

use crate::model::{RecordCollection, UserRecord};
use crate::storage::{RecordStore, StorageError, UserDocument};
use log::{debug, trace};
use serde::Serialize;
use std::ffi::OsString;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

/// Borrowed view of [`UserDocument`] so saving does not clone the records.
#[derive(Serialize)]
struct UserDocumentRef<'a> {
    users: &'a [UserRecord],
}

/// Persistent store keeping all users in a single JSON file.
#[derive(Debug, Clone)]
pub struct JsonFileStore {
    path: PathBuf,
}

impl JsonFileStore {
    /// Open a store at `path`, creating the parent directory when needed.
    ///
    /// This is done once at service startup. The file itself is not created until
    /// the first save.
    ///
    /// # Errors
    ///
    /// Returns [`StorageError::Configuration`] when `path` has no file name or
    /// points at a directory, and [`StorageError::Io`] when the parent directory
    /// cannot be created.
    pub async fn open(path: impl Into<PathBuf>) -> Result<Self, StorageError> {
        let path = path.into();
        if path.file_name().is_none() {
            return Err(StorageError::configuration(format!(
                "storage path '{}' has no file name",
                path.display()
            )));
        }

        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            tokio::fs::create_dir_all(parent)
                .await
                .map_err(|e| StorageError::io("create directory", parent, e))?;
        }

        match tokio::fs::metadata(&path).await {
            Ok(meta) if meta.is_dir() => {
                return Err(StorageError::configuration(format!(
                    "storage path '{}' is a directory",
                    path.display()
                )));
            }
            Ok(_) => {}
            Err(e) if e.kind() == ErrorKind::NotFound => {}
            Err(e) => return Err(StorageError::io("inspect", &path, e)),
        }

        debug!("Opened JSON user store at {}", path.display());
        Ok(Self { path })
    }

    /// Location of the backing file.
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn temp_path(&self) -> PathBuf {
        let mut name: OsString = self
            .path
            .file_name()
            .map(|n| n.to_os_string())
            .unwrap_or_default();
        name.push(".tmp");
        self.path.with_file_name(name)
    }
}

impl RecordStore for JsonFileStore {
    async fn load(&self) -> Result<RecordCollection, StorageError> {
        let bytes = match tokio::fs::read(&self.path).await {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                debug!("No user file at {}, treating as empty", self.path.display());
                return Ok(RecordCollection::missing());
            }
            Err(e) => return Err(StorageError::io("read", &self.path, e)),
        };

        let document: UserDocument =
            serde_json::from_slice(&bytes).map_err(|e| StorageError::corrupt(&self.path, e))?;
        let records = document.into_records();
        trace!("Loaded {} users from {}", records.len(), self.path.display());
        Ok(RecordCollection::stored(records))
    }

    async fn save(&self, collection: &RecordCollection) -> Result<(), StorageError> {
        let document = UserDocumentRef {
            users: collection.records(),
        };
        let bytes = serde_json::to_vec_pretty(&document).map_err(StorageError::Serialization)?;

        let temp = self.temp_path();
        tokio::fs::write(&temp, &bytes)
            .await
            .map_err(|e| StorageError::io("write", &temp, e))?;

        if let Err(e) = tokio::fs::rename(&temp, &self.path).await {
            let _ = tokio::fs::remove_file(&temp).await;
            return Err(StorageError::io("replace", &self.path, e));
        }

        trace!(
            "Saved {} users to {}",
            collection.len(),
            self.path.display()
        );
        Ok(())
    }

    fn describe(&self) -> String {
        self.path.display().to_string()
    }
}
