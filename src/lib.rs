//! Visitor Counter - Real-time WebSocket visitor counter
//!
//! Every WebSocket visitor is greeted, told how many visitors are currently
//! connected, and that count is appended to a SQLite visit log. The full log
//! is printed when the server shuts down.

pub mod adapters;
pub mod application;
pub mod config;
pub mod domain;
pub mod ports;
pub mod server;
