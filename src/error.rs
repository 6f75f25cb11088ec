//! Error types for user data operations.
//!
//! Storage failures live in [`crate::storage::StorageError`]; this module adds the
//! validation errors raised for incoming records and the top level error returned
//! by [`crate::UserDataService`].

use crate::config::ConfigError;
use crate::storage::StorageError;

/// Main error type for service operations.
#[derive(Debug, thiserror::Error)]
pub enum UserDataError {
    /// Reading or writing the record store failed
    #[error("Storage error: {0}")]
    Storage(#[from] StorageError),

    /// An incoming record was rejected
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),

    /// Startup configuration is unusable
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// A lookup by name matched nothing
    #[error("User '{name}' not found")]
    NotFound { name: String },

    /// Invalid request format or parameters
    #[error("Invalid request: {message}")]
    InvalidRequest { message: String },
}

/// Validation errors for a single user record or bulk candidate.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ValidationError {
    /// Required field is absent
    #[error("Required field '{field}' is missing")]
    MissingField { field: &'static str },

    /// Required field is present but empty
    #[error("Required field '{field}' is empty")]
    EmptyField { field: &'static str },
}

impl UserDataError {
    /// Create an invalid request error.
    pub fn invalid_request(message: impl Into<String>) -> Self {
        Self::InvalidRequest {
            message: message.into(),
        }
    }

    /// Stable machine readable code, used in MCP error payloads.
    pub fn error_code(&self) -> &'static str {
        match self {
            Self::Storage(_) => "STORAGE_ERROR",
            Self::Validation(_) => "VALIDATION_ERROR",
            Self::Config(_) => "CONFIGURATION_ERROR",
            Self::NotFound { .. } => "USER_NOT_FOUND",
            Self::InvalidRequest { .. } => "INVALID_REQUEST",
        }
    }
}

/// Result type for service operations.
pub type UserDataResult<T> = Result<T, UserDataError>;
