//! Visitor event value object.

use serde::{Deserialize, Serialize};
use std::fmt;

/// One persisted record of the visitor count at the moment a client joined.
///
/// Immutable once created. `time` uses the store's sortable
/// `YYYY-MM-DD HH:MM:SS` layout (see [`crate::domain::foundation::STORE_TIME_FORMAT`]).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VisitorEvent {
    count: u64,
    time: String,
}

impl VisitorEvent {
    /// Creates a visitor event from a count and a stored time string.
    pub fn new(count: u64, time: impl Into<String>) -> Self {
        Self {
            count,
            time: time.into(),
        }
    }

    /// Number of connected visitors when the event was recorded.
    pub fn count(&self) -> u64 {
        self.count
    }

    /// Time the event was recorded.
    pub fn time(&self) -> &str {
        &self.time
    }
}

impl fmt::Display for VisitorEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Count: {}, Time: {}", self.count, self.time)
    }
}
