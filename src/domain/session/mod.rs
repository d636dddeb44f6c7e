//! Session domain module.
//!
//! A session is the lifetime of one visitor connection, from upgrade to
//! close. The state machine and typed outcome let callers assert on how a
//! session ended instead of scraping logs.

mod errors;
mod notices;
mod outcome;
mod state;

pub use errors::SessionError;
pub use notices::{visitor_count_notice, WELCOME_NOTICE};
pub use outcome::{CloseReason, SessionOutcome};
pub use state::SessionState;
