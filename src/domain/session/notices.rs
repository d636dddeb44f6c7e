//! Text frames sent to a joining visitor.

/// First frame every visitor receives.
pub const WELCOME_NOTICE: &str = "Welcome to my server";

/// Second frame: the registry size observed right after joining.
pub fn visitor_count_notice(count: u64) -> String {
    format!("Current Visitors: {}", count)
}
