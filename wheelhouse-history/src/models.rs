//! Data models for first-use mining

use chrono::NaiveDate;
use indexmap::IndexMap;
use serde::Serialize;

/// Date format used when rendering first-use dates
pub const DATE_FORMAT: &str = "%Y-%m-%d";

/// A revision that touched the tracked manifest
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Revision {
    /// Commit identifier
    pub id: String,
    /// Author date of the commit, in the author's timezone
    pub date: NaiveDate,
}

impl Revision {
    pub fn new(id: impl Into<String>, date: NaiveDate) -> Self {
        Self {
            id: id.into(),
            date,
        }
    }
}

/// Earliest date each normalized package key appeared in the manifest.
///
/// Keys keep the order in which they were first seen. Once a key has a date
/// it is never overwritten, so revisions must be fed oldest first.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct FirstUseIndex {
    dates: IndexMap<String, NaiveDate>,
}

impl FirstUseIndex {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record `date` for every key that has no date yet.
    ///
    /// Returns the number of keys newly added.
    pub fn record<I, K>(&mut self, date: NaiveDate, keys: I) -> usize
    where
        I: IntoIterator<Item = K>,
        K: Into<String>,
    {
        let mut added = 0;
        for key in keys {
            let key = key.into();
            if key.is_empty() || self.dates.contains_key(&key) {
                continue;
            }
            self.dates.insert(key, date);
            added += 1;
        }
        added
    }

    /// Get the first-use date for a normalized key
    pub fn get(&self, key: &str) -> Option<NaiveDate> {
        self.dates.get(key).copied()
    }

    /// Get the first-use date formatted as `YYYY-MM-DD`
    pub fn date_string(&self, key: &str) -> Option<String> {
        self.get(key).map(|d| d.format(DATE_FORMAT).to_string())
    }

    pub fn len(&self) -> usize {
        self.dates.len()
    }

    pub fn is_empty(&self) -> bool {
        self.dates.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, NaiveDate)> {
        self.dates.iter().map(|(k, d)| (k.as_str(), *d))
    }
}
