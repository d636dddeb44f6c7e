//! Domain layer containing the visitor counter's core types.
//!
//! # Module Organization
//!
//! - `foundation` - Shared primitives (connection ids, timestamps, state machine)
//! - `visitor` - Visitor events and the shutdown summary
//! - `session` - Per-connection lifecycle states, errors and outcomes

pub mod foundation;
pub mod session;
pub mod visitor;
