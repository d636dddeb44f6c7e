//! Aggregate view over the visitor log, printed at shutdown.

use std::fmt;

use super::VisitorEvent;

/// Aggregate figures computed from a full scan of the visitor log.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct VisitorSummary {
    pub total_events: usize,
    pub peak_count: u64,
    pub first_time: Option<String>,
    pub last_time: Option<String>,
}

impl VisitorSummary {
    /// Summarizes events given in insertion order.
    pub fn from_events(events: &[VisitorEvent]) -> Self {
        Self {
            total_events: events.len(),
            peak_count: events.iter().map(VisitorEvent::count).max().unwrap_or(0),
            first_time: events.first().map(|e| e.time().to_string()),
            last_time: events.last().map(|e| e.time().to_string()),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.total_events == 0
    }
}

impl fmt::Display for VisitorSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match (&self.first_time, &self.last_time) {
            (Some(first), Some(last)) => write!(
                f,
                "Visitors: {} events, peak {}, from {} to {}",
                self.total_events, self.peak_count, first, last
            ),
            _ => write!(f, "Visitors: no events recorded"),
        }
    }
}

/// Full snapshot of the visitor log plus its summary.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct VisitorLog {
    pub events: Vec<VisitorEvent>,
    pub summary: VisitorSummary,
}

impl VisitorLog {
    pub fn new(events: Vec<VisitorEvent>) -> Self {
        let summary = VisitorSummary::from_events(&events);
        Self { events, summary }
    }
}

impl fmt::Display for VisitorLog {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for event in &self.events {
            writeln!(f, "{}", event)?;
        }
        write!(f, "{}", self.summary)
    }
}
