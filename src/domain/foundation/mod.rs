//! Foundation module - Shared domain primitives.
//!
//! Contains value objects, identifiers, and error types that form the
//! vocabulary of the visitor counter domain.

mod errors;
mod ids;
mod state_machine;
mod timestamp;

pub use errors::ValidationError;
pub use ids::ConnectionId;
pub use state_machine::StateMachine;
pub use timestamp::{Timestamp, STORE_TIME_FORMAT};
