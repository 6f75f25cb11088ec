//! User record types shared by the store, the analytics engines and the service.
//!
//! Records are persisted exactly as `{"name": ..., "email": ...}` objects. Both
//! fields are optional at the storage level because the backing file may be
//! edited by hand; [`UserRecord::is_valid`] decides whether a record takes part
//! in per-field analyses.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::ValidationError;

/// A single stored user.
///
/// No identity beyond the name/email pair is tracked and duplicates are allowed.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct UserRecord {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
}

impl UserRecord {
    /// Create a record with both fields present.
    pub fn new(name: impl Into<String>, email: impl Into<String>) -> Self {
        Self {
            name: Some(name.into()),
            email: Some(email.into()),
        }
    }

    /// The name, or an empty string when absent.
    pub fn name_or_empty(&self) -> &str {
        self.name.as_deref().unwrap_or("")
    }

    /// The email, or an empty string when absent.
    pub fn email_or_empty(&self) -> &str {
        self.email.as_deref().unwrap_or("")
    }

    /// A record is valid when both fields are present and non-empty.
    pub fn is_valid(&self) -> bool {
        !self.name_or_empty().is_empty() && !self.email_or_empty().is_empty()
    }

    /// Email domain: everything after the first `@`.
    pub fn email_domain(&self) -> Option<&str> {
        email_domain(self.email_or_empty())
    }

    /// Build a record from one stored JSON entry.
    ///
    /// Only string `name`/`email` members are kept. A non-object entry yields a
    /// record with neither field, which counts as invalid.
    pub fn from_value(value: &Value) -> Self {
        Self {
            name: string_member(value, "name"),
            email: string_member(value, "email"),
        }
    }

    /// Name length in characters, zero when the name is missing.
    pub fn name_len(&self) -> usize {
        self.name_or_empty().chars().count()
    }
}

fn string_member(value: &Value, key: &str) -> Option<String> {
    value.get(key).and_then(Value::as_str).map(str::to_string)
}

/// Extract the substring after the first `@`, if there is one.
pub fn email_domain(email: &str) -> Option<&str> {
    email.split_once('@').map(|(_, domain)| domain)
}

/// Whether the backing storage existed when a collection was loaded.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CollectionOrigin {
    /// Nothing has been persisted yet.
    #[default]
    Missing,
    /// Loaded from existing storage (which may still hold zero users).
    Stored,
}

/// The full ordered list of users, as handed out by a record store.
///
/// Callers always receive an owned copy; mutating it has no effect until it is
/// passed back to [`crate::storage::RecordStore::save`].
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct RecordCollection {
    records: Vec<UserRecord>,
    origin: CollectionOrigin,
}

impl RecordCollection {
    /// An empty collection for storage that does not exist yet.
    pub fn missing() -> Self {
        Self {
            records: Vec::new(),
            origin: CollectionOrigin::Missing,
        }
    }

    /// A collection loaded from existing storage.
    pub fn stored(records: Vec<UserRecord>) -> Self {
        Self {
            records,
            origin: CollectionOrigin::Stored,
        }
    }

    pub fn origin(&self) -> CollectionOrigin {
        self.origin
    }

    /// True when the collection stands in for absent storage.
    pub fn is_missing(&self) -> bool {
        self.origin == CollectionOrigin::Missing
    }

    pub fn records(&self) -> &[UserRecord] {
        &self.records
    }

    pub fn into_records(self) -> Vec<UserRecord> {
        self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Append records in order. The collection now describes stored data.
    pub fn extend(&mut self, records: impl IntoIterator<Item = UserRecord>) {
        self.records.extend(records);
        self.origin = CollectionOrigin::Stored;
    }

    pub fn push(&mut self, record: UserRecord) {
        self.extend(std::iter::once(record));
    }
}

/// An unvalidated entry of a bulk insert request.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct UserCandidate {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
}

impl UserCandidate {
    pub fn new(name: impl Into<String>, email: impl Into<String>) -> Self {
        Self {
            name: Some(name.into()),
            email: Some(email.into()),
        }
    }

    /// Build a candidate from arbitrary JSON.
    ///
    /// Only string `name`/`email` members are picked up; anything else (including
    /// non-object values) yields a candidate that will fail validation.
    pub fn from_value(value: &Value) -> Self {
        Self {
            name: string_member(value, "name"),
            email: string_member(value, "email"),
        }
    }

    /// Check both fields and turn the candidate into a record.
    pub fn validate(&self) -> Result<UserRecord, ValidationError> {
        let name = require_field("name", self.name.as_deref())?;
        let email = require_field("email", self.email.as_deref())?;
        Ok(UserRecord::new(name, email))
    }

    /// Short human readable label used in bulk error messages.
    pub fn describe(&self, position: usize) -> String {
        let name = self
            .name
            .as_deref()
            .filter(|n| !n.is_empty())
            .unwrap_or("Unknown");
        match self.email.as_deref().filter(|e| !e.is_empty()) {
            Some(email) => format!("#{} ({}, {})", position, name, email),
            None => format!("#{} ({})", position, name),
        }
    }
}

pub(crate) fn require_field<'a>(
    field: &'static str,
    value: Option<&'a str>,
) -> Result<&'a str, ValidationError> {
    match value {
        None => Err(ValidationError::MissingField { field }),
        Some("") => Err(ValidationError::EmptyField { field }),
        Some(v) => Ok(v),
    }
}
