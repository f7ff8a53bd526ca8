//! Scan state machine phases.
//!
//! A scan sequences through: Polling → Capturing → Reporting → Complete.
//! Polling goes straight to Reporting when the window runs out.

use std::fmt;

/// Phases of a single scan run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScanPhase {
    /// Waiting for the team-selection screen
    Polling,
    /// Lobby detected, reading player name slots
    Capturing,
    /// Looking up stats for detected players
    Reporting,
    /// Everything reported
    Complete,
}

impl fmt::Display for ScanPhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ScanPhase::Polling => write!(f, "Polling"),
            ScanPhase::Capturing => write!(f, "Capturing"),
            ScanPhase::Reporting => write!(f, "Reporting"),
            ScanPhase::Complete => write!(f, "Complete"),
        }
    }
}
