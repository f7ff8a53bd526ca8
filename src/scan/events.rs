//! Event channel from scan workers to the GUI.
//!
//! Uses std::sync::mpsc: worker threads send progress and results,
//! the GUI drains the receiver once per frame.

use std::sync::mpsc::{channel, Receiver, Sender};

use super::state::ScanPhase;
use crate::stats::PlayerLookup;

/// Something a scan or manual lookup worker reports to the GUI.
#[derive(Debug, Clone, PartialEq)]
pub enum ScanEvent {
    /// The scan moved to `phase`; `progress` is the fraction of the poll window used (0.0 to 1.0)
    Phase { phase: ScanPhase, progress: f32 },
    /// Polling ended. `names` holds 12 entries when the lobby was seen, none otherwise
    Names {
        lobby_detected: bool,
        names: Vec<String>,
    },
    /// Stats for one detected player
    PlayerStats { name: String, lookup: PlayerLookup },
    /// The scan finished without error
    Finished,
    /// The scan aborted with an error
    Failed(String),
    /// Result of a manual username lookup
    ManualResult {
        username: String,
        result: Result<PlayerLookup, String>,
    },
}

/// Creates a new event channel.
pub fn create_event_channel() -> (Sender<ScanEvent>, Receiver<ScanEvent>) {
    channel()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_events_arrive_in_order() {
        let (sender, receiver) = create_event_channel();

        sender
            .send(ScanEvent::Phase {
                phase: ScanPhase::Polling,
                progress: 0.0,
            })
            .unwrap();
        sender.send(ScanEvent::Finished).unwrap();
        drop(sender);

        let events: Vec<ScanEvent> = receiver.iter().collect();
        assert_eq!(events.len(), 2);
        assert_eq!(events[1], ScanEvent::Finished);
    }
}
