//! GUI application state management.
//!
//! Tracks the scan status, the latest scan report and the manual lookup,
//! updated from `ScanEvent`s sent by worker threads.

use crate::ocr::is_known_player;
use crate::scan::{ScanEvent, ScanPhase};
use crate::stats::PlayerLookup;

/// Scan status for display in GUI.
#[derive(Clone, Debug, Default, PartialEq)]
pub enum ScanStatus {
    /// Not running, ready to start
    #[default]
    Idle,
    /// Waiting for the team selection screen
    Polling { progress: f32 },
    /// Lobby detected, reading names
    Capturing { progress: f32 },
    /// Polling is over, player stats are loading
    Reporting { lobby_detected: bool },
    /// Every lookup finished
    Completed { lobby_detected: bool },
    /// The scan failed with error
    Error(String),
}

fn scan_complete_text(lobby_detected: bool) -> &'static str {
    if lobby_detected {
        "Scan complete!"
    } else {
        "Scan complete - Team selection screen was not detected"
    }
}

impl ScanStatus {
    /// Get display text for current status.
    pub fn status_text(&self) -> String {
        match self {
            Self::Idle => "Ready".to_string(),
            Self::Polling { progress } => format!(
                "Scanning... {}% (Waiting for team selection screen)",
                (progress * 100.0) as u32
            ),
            Self::Capturing { progress } => format!(
                "Scanning... {}% (Team selection screen detected)",
                (progress * 100.0) as u32
            ),
            Self::Reporting { lobby_detected } | Self::Completed { lobby_detected } => {
                scan_complete_text(*lobby_detected).to_string()
            }
            Self::Error(msg) => format!("Error during scanning: {}", msg),
        }
    }

    /// Get progress as fraction (0.0 to 1.0), shown only while polling.
    pub fn progress(&self) -> Option<f32> {
        match self {
            Self::Polling { progress } | Self::Capturing { progress } => Some(*progress),
            _ => None,
        }
    }

    /// Check if a scan is currently running.
    pub fn is_running(&self) -> bool {
        matches!(
            self,
            Self::Polling { .. } | Self::Capturing { .. } | Self::Reporting { .. }
        )
    }
}

/// Names and stats gathered by one scan.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct ScanReport {
    pub names: Vec<String>,
    /// Lookups in the order they arrived (slot order)
    pub players: Vec<(String, PlayerLookup)>,
}

impl ScanReport {
    /// Known names with their lookup, `None` while still loading.
    pub fn player_rows(&self) -> Vec<(&str, Option<&PlayerLookup>)> {
        let mut seen = 0;
        self.names
            .iter()
            .filter(|name| is_known_player(name))
            .map(|name| {
                let lookup = self.players.get(seen).filter(|(n, _)| n == name);
                if lookup.is_some() {
                    seen += 1;
                }
                (name.as_str(), lookup.map(|(_, l)| l))
            })
            .collect()
    }
}

/// Manual lookup status.
#[derive(Clone, Debug, Default, PartialEq)]
pub enum ManualLookup {
    #[default]
    Idle,
    /// Search pressed with an empty username
    EmptyInput,
    Pending(String),
    Done {
        username: String,
        result: Result<PlayerLookup, String>,
    },
}

/// GUI application state.
#[derive(Debug, Default)]
pub struct GuiState {
    /// Current scan status.
    pub status: ScanStatus,
    /// Report of the latest scan, set once polling ends.
    pub report: Option<ScanReport>,
    /// Username text field.
    pub username: String,
    /// Manual lookup status.
    pub manual: ManualLookup,
}

impl GuiState {
    /// Report rows to display. Once the scan has stopped, players that were
    /// never looked up (the scan failed first) are left out.
    pub fn report_rows(&self) -> Vec<(&str, Option<&PlayerLookup>)> {
        let Some(report) = &self.report else {
            return Vec::new();
        };
        let running = self.status.is_running();
        report
            .player_rows()
            .into_iter()
            .filter(|(_, lookup)| running || lookup.is_some())
            .collect()
    }

    /// Resets scan output for a new run.
    pub fn begin_scan(&mut self) {
        self.status = ScanStatus::Polling { progress: 0.0 };
        self.report = None;
    }

    /// Applies one worker event.
    pub fn apply_event(&mut self, event: ScanEvent) {
        match event {
            ScanEvent::Phase { phase, progress } => match phase {
                ScanPhase::Polling => self.status = ScanStatus::Polling { progress },
                ScanPhase::Capturing => self.status = ScanStatus::Capturing { progress },
                // Reporting and completion carry the lobby flag, set by Names/Finished
                ScanPhase::Reporting | ScanPhase::Complete => {}
            },
            ScanEvent::Names {
                lobby_detected,
                names,
            } => {
                self.status = ScanStatus::Reporting { lobby_detected };
                self.report = Some(ScanReport {
                    names,
                    players: Vec::new(),
                });
            }
            ScanEvent::PlayerStats { name, lookup } => {
                if let Some(report) = &mut self.report {
                    report.players.push((name, lookup));
                }
            }
            ScanEvent::Finished => {
                let lobby_detected = self
                    .report
                    .as_ref()
                    .is_some_and(|r| !r.names.is_empty());
                self.status = ScanStatus::Completed { lobby_detected };
            }
            ScanEvent::Failed(msg) => self.status = ScanStatus::Error(msg),
            ScanEvent::ManualResult { username, result } => {
                self.manual = ManualLookup::Done { username, result };
            }
        }
    }
}
