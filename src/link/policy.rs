//! Error policy
//!
//! Pure decision step for the orchestrator, kept apart so the recovery rules
//! can be tested without any session behind them.

use crate::types::ErrorPolicy;

/// What the orchestrator does next after an escalated error
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Recovery {
    /// Keep running
    Continue,
    /// Stop the session; a later `start` may resume it
    Stop,
    /// Stop and start the session again
    Restart,
    /// Stop for good
    Halt,
}

#[cfg(feature = "embedded")]
impl defmt::Format for Recovery {
    fn format(&self, f: defmt::Formatter) {
        match self {
            Self::Continue => defmt::write!(f, "continue"),
            Self::Stop => defmt::write!(f, "stop"),
            Self::Restart => defmt::write!(f, "restart"),
            Self::Halt => defmt::write!(f, "halt"),
        }
    }
}

/// Choose the recovery for `policy` after `attempts` failed restarts
///
/// A restart policy that has used up `max_restarts` degrades to a halt.
#[must_use]
pub const fn decide(policy: ErrorPolicy, attempts: u8, max_restarts: u8) -> Recovery {
    match policy {
        ErrorPolicy::Ignore => Recovery::Continue,
        ErrorPolicy::Stop => Recovery::Stop,
        ErrorPolicy::Restart if attempts < max_restarts => Recovery::Restart,
        ErrorPolicy::Restart | ErrorPolicy::Halt => Recovery::Halt,
    }
}
