//! Application handlers.
//!
//! Command and query handlers that orchestrate domain operations.

mod summarize_visitors;
mod visitor_session;

pub use summarize_visitors::SummarizeVisitorsHandler;
pub use visitor_session::VisitorSessionHandler;
