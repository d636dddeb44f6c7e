//! Application layer - Handlers and lifecycle coordination.
//!
//! This layer orchestrates domain operations and coordinates between ports:
//! the per-connection session handler, the shutdown summary query, and the
//! shutdown signal shared by all sessions.

pub mod handlers;
pub mod shutdown;

pub use handlers::{SummarizeVisitorsHandler, VisitorSessionHandler};
pub use shutdown::{
    drain_sessions, shutdown_channel, SessionTicket, SessionTracker, ShutdownSignal, ShutdownTrigger,
};
