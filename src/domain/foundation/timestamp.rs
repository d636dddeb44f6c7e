//! Timestamp value object for immutable points in time.

use chrono::{DateTime, NaiveDateTime, Utc};
use serde::{Deserialize, Serialize};

use super::ValidationError;

/// Text layout used for persisted visitor times.
///
/// Matches SQLite's `datetime('now')` so both store adapters produce the
/// same lexicographically sortable strings.
pub const STORE_TIME_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Immutable point in time, always UTC.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Timestamp(DateTime<Utc>);

impl Timestamp {
    /// Creates a timestamp for the current moment.
    pub fn now() -> Self {
        Self(Utc::now())
    }

    /// Creates a timestamp from a DateTime<Utc>.
    pub fn from_datetime(dt: DateTime<Utc>) -> Self {
        Self(dt)
    }

    /// Returns the inner DateTime.
    pub fn as_datetime(&self) -> &DateTime<Utc> {
        &self.0
    }

    /// Formats the timestamp the way the visitor log stores it.
    pub fn to_store_string(&self) -> String {
        self.0.format(STORE_TIME_FORMAT).to_string()
    }

    /// Parses a stored visitor time back into a timestamp.
    pub fn parse_store_string(s: &str) -> Result<Self, ValidationError> {
        NaiveDateTime::parse_from_str(s, STORE_TIME_FORMAT)
            .map(|naive| Self(naive.and_utc()))
            .map_err(|e| ValidationError::invalid_format("time", e.to_string()))
    }
}

impl Default for Timestamp {
    fn default() -> Self {
        Self::now()
    }
}
