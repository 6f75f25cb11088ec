//! Storage-specific error types.
//!
//! These errors describe failures to read or write the persisted user collection,
//! separate from validation or lookup outcomes. A missing storage file is not an
//! error; see [`crate::storage::RecordStore::load`].

use std::path::{Path, PathBuf};

/// Errors that can occur while loading or saving the user collection.
#[derive(Debug, thiserror::Error)]
pub enum StorageError {
    /// The filesystem refused a read, write or rename.
    #[error("Failed to {operation} '{}': {source}", path.display())]
    Io {
        operation: &'static str,
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Stored content could not be parsed as a user document.
    #[error("Corrupt user data in '{}': {source}", path.display())]
    Corrupt {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    /// The collection could not be serialized.
    #[error("Failed to serialize user data: {0}")]
    Serialization(#[source] serde_json::Error),

    /// The store was configured with an unusable location.
    #[error("Invalid storage configuration: {message}")]
    Configuration { message: String },

    /// Backend refused the operation (used by test doubles and non-file stores).
    #[error("Storage unavailable: {message}")]
    Unavailable { message: String },
}

impl StorageError {
    pub(crate) fn io(operation: &'static str, path: &Path, source: std::io::Error) -> Self {
        Self::Io {
            operation,
            path: path.to_path_buf(),
            source,
        }
    }

    pub(crate) fn corrupt(path: &Path, source: serde_json::Error) -> Self {
        Self::Corrupt {
            path: path.to_path_buf(),
            source,
        }
    }

    /// Create a configuration error.
    pub fn configuration(message: impl Into<String>) -> Self {
        Self::Configuration {
            message: message.into(),
        }
    }

    /// Create an unavailable error.
    pub fn unavailable(message: impl Into<String>) -> Self {
        Self::Unavailable {
            message: message.into(),
        }
    }

    /// True when the stored content itself is unreadable, as opposed to an I/O fault.
    pub fn is_corruption(&self) -> bool {
        matches!(self, Self::Corrupt { .. })
    }
}
