//! Visitor domain module.
//!
//! A visitor event records how many clients were connected when a new
//! client joined. Events are append-only; the summary is derived on demand.

mod event;
mod summary;

pub use event::VisitorEvent;
pub use summary::{VisitorLog, VisitorSummary};
