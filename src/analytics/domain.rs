//! Email domain histogram.

use crate::model::UserRecord;
use serde::ser::{Serialize, SerializeMap, Serializer};
use std::collections::HashMap;

/// Occurrence count per email domain, in first-seen order.
///
/// Keeping insertion order makes [`DomainHistogram::most_common`] deterministic:
/// among equally frequent domains the one seen first wins. Serializes as a JSON
/// object in the same order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DomainHistogram {
    entries: Vec<(String, usize)>,
    index: HashMap<String, usize>,
}

impl DomainHistogram {
    pub fn new() -> Self {
        Self::default()
    }

    /// Count the domains of every record whose email contains `@`.
    pub fn from_records<'a>(records: impl IntoIterator<Item = &'a UserRecord>) -> Self {
        let mut histogram = Self::new();
        for record in records {
            histogram.record_email(record);
        }
        histogram
    }

    /// Count the record's domain, if its email has one. Returns whether it did.
    pub fn record_email(&mut self, record: &UserRecord) -> bool {
        match record.email_domain() {
            Some(domain) => {
                self.increment(domain);
                true
            }
            None => false,
        }
    }

    /// Add one occurrence of `domain`.
    pub fn increment(&mut self, domain: &str) {
        match self.index.get(domain) {
            Some(&slot) => self.entries[slot].1 += 1,
            None => {
                self.index.insert(domain.to_string(), self.entries.len());
                self.entries.push((domain.to_string(), 1));
            }
        }
    }

    pub fn get(&self, domain: &str) -> Option<usize> {
        self.index.get(domain).map(|&slot| self.entries[slot].1)
    }

    /// Number of distinct domains.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Sum of all counts.
    pub fn total(&self) -> usize {
        self.entries.iter().map(|(_, count)| count).sum()
    }

    /// Domain with the highest count; ties resolve to the first-seen domain.
    pub fn most_common(&self) -> Option<(&str, usize)> {
        let mut best: Option<(&str, usize)> = None;
        for (domain, count) in &self.entries {
            if best.is_none_or(|(_, top)| *count > top) {
                best = Some((domain.as_str(), *count));
            }
        }
        best
    }

    /// Domains and counts in first-seen order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, usize)> {
        self.entries.iter().map(|(d, c)| (d.as_str(), *c))
    }

    /// Domain names in first-seen order.
    pub fn domains(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(d, _)| d.as_str())
    }
}

impl Serialize for DomainHistogram {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.entries.len()))?;
        for (domain, count) in &self.entries {
            map.serialize_entry(domain, count)?;
        }
        map.end()
    }
}

impl std::fmt::Display for DomainHistogram {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{{")?;
        for (i, (domain, count)) in self.entries.iter().enumerate() {
            if i > 0 {
                write!(f, ", ")?;
            }
            write!(f, "'{}': {}", domain, count)?;
        }
        write!(f, "}}")
    }
}
