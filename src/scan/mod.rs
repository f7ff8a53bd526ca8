//! Lobby scanning.
//!
//! This module provides:
//! - Lobby screen detection via bright pixel counting
//! - Player name capture from the 12 name slots
//! - The scan state machine run on a worker thread
//! - The event channel that reports progress to the GUI

pub mod capturer;
pub mod detection;
pub mod events;
pub mod runner;
pub mod state;

#[cfg(test)]
pub(crate) mod testing;

pub use capturer::split_teams;
pub use events::{create_event_channel, ScanEvent};
pub use runner::{is_scan_running, start_manual_lookup, start_scan};
pub use state::ScanPhase;
