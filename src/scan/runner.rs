//! Scan runner - entry point for the lobby scan and manual lookups.
//!
//! A scan polls for the lobby screen within a bounded window, reads the 12 name
//! slots once the lobby appears, then looks up stats for every known name.
//! Each run happens on its own worker thread and reports through `ScanEvent`s.

use anyhow::{anyhow, Result};
use std::any::Any;
use std::panic::{self, AssertUnwindSafe};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::mpsc::Sender;
use std::thread::{self, JoinHandle};
use std::time::{Duration, Instant};

use super::capturer::capture_player_names;
use super::detection::{BrightHeaderDetector, LobbyDetector};
use super::events::ScanEvent;
use super::state::ScanPhase;
use crate::capture::{DesktopScreen, ScreenSource};
use crate::config::{AppConfig, ScreenRegion};
use crate::ocr::{is_known_player, NameOcrOptions, TesseractEngine, TextRecognizer};
use crate::stats::{StatsClient, StatsSource};

/// Global flag indicating if a scan is currently running.
static SCAN_RUNNING: AtomicBool = AtomicBool::new(false);

/// Checks if a scan is currently running.
pub fn is_scan_running() -> bool {
    SCAN_RUNNING.load(Ordering::SeqCst)
}

/// Clears `SCAN_RUNNING` when the worker exits, including by panic.
struct RunningGuard;

impl Drop for RunningGuard {
    fn drop(&mut self) {
        SCAN_RUNNING.store(false, Ordering::SeqCst);
    }
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        s.to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "unknown panic".to_string()
    }
}

/// Runs `work`, turning a panic into an error.
fn run_catching<T>(work: impl FnOnce() -> Result<T>) -> Result<T> {
    panic::catch_unwind(AssertUnwindSafe(work))
        .unwrap_or_else(|payload| Err(anyhow!("worker panicked: {}", panic_message(&*payload))))
}

/// Poll window and interval for lobby detection.
#[derive(Debug, Clone, Copy)]
pub struct ScanTiming {
    pub window: Duration,
    pub poll_interval: Duration,
}

impl ScanTiming {
    pub fn from_config(config: &AppConfig) -> Self {
        Self {
            window: config.scan_window(),
            poll_interval: config.poll_interval(),
        }
    }
}

/// Everything a scan needs, with the screen, OCR and API behind traits.
pub struct ScanPipeline<'a> {
    pub screen: &'a dyn ScreenSource,
    pub detector: &'a dyn LobbyDetector,
    pub recognizer: &'a dyn TextRecognizer,
    pub stats: &'a dyn StatsSource,
    pub player_regions: &'a [ScreenRegion],
    pub ocr: NameOcrOptions,
    pub timing: ScanTiming,
    pub save_debug_captures: bool,
}

impl ScanPipeline<'_> {
    /// Waits for the lobby and reads the name slots.
    ///
    /// Returns `None` when the window elapses without the lobby appearing;
    /// player regions are only captured after a positive detection.
    pub fn poll_for_lobby(&self, events: &Sender<ScanEvent>) -> Result<Option<Vec<String>>> {
        let start = Instant::now();
        let window = self.timing.window.as_secs_f32().max(f32::EPSILON);

        loop {
            let elapsed = start.elapsed();
            if elapsed >= self.timing.window {
                crate::log("Scan window elapsed without detecting the lobby");
                return Ok(None);
            }
            let progress = (elapsed.as_secs_f32() / window).min(1.0);

            if self.detector.is_lobby(self.screen)? {
                crate::log(&format!(
                    "Lobby detected after {:.1}s, capturing player names",
                    elapsed.as_secs_f32()
                ));
                let _ = events.send(ScanEvent::Phase {
                    phase: ScanPhase::Capturing,
                    progress,
                });
                let names = capture_player_names(
                    self.screen,
                    self.player_regions,
                    self.recognizer,
                    &self.ocr,
                    self.save_debug_captures,
                )?;
                return Ok(Some(names));
            }

            let _ = events.send(ScanEvent::Phase {
                phase: ScanPhase::Polling,
                progress,
            });
            thread::sleep(self.timing.poll_interval);
        }
    }

    /// Runs a complete scan: poll, capture, then look up every known player in slot order.
    ///
    /// Any error aborts the rest of the scan.
    pub fn run(&self, events: &Sender<ScanEvent>) -> Result<()> {
        let _ = events.send(ScanEvent::Phase {
            phase: ScanPhase::Polling,
            progress: 0.0,
        });

        let detected = self.poll_for_lobby(events)?;
        let lobby_detected = detected.is_some();
        let names = detected.unwrap_or_default();

        let _ = events.send(ScanEvent::Phase {
            phase: ScanPhase::Reporting,
            progress: 1.0,
        });
        let _ = events.send(ScanEvent::Names {
            lobby_detected,
            names: names.clone(),
        });

        for name in names.iter().filter(|n| is_known_player(n)) {
            let lookup = self.stats.lookup(name)?;
            let _ = events.send(ScanEvent::PlayerStats {
                name: name.clone(),
                lookup,
            });
        }

        let _ = events.send(ScanEvent::Phase {
            phase: ScanPhase::Complete,
            progress: 1.0,
        });
        let _ = events.send(ScanEvent::Finished);
        Ok(())
    }
}

/// Starts a scan in a background thread.
///
/// Returns immediately after spawning the worker. Progress and results
/// arrive on `events`; an error ends the scan with `ScanEvent::Failed`.
///
/// # Errors
/// Returns an error if a scan is already running.
pub fn start_scan(config: AppConfig, events: Sender<ScanEvent>) -> Result<()> {
    if SCAN_RUNNING.swap(true, Ordering::SeqCst) {
        return Err(anyhow!("A scan is already running"));
    }

    crate::log(&format!(
        "Starting scan: window {}ms, poll every {}ms",
        config.scan_window_ms, config.poll_interval_ms
    ));

    spawn_scan_worker(events, move |events| run_desktop_scan(&config, events));
    Ok(())
}

/// Spawns the worker thread for a scan that already holds `SCAN_RUNNING`.
///
/// An error or panic in `scan` ends with `ScanEvent::Failed`; the flag is
/// cleared after the last event is sent.
fn spawn_scan_worker<F>(events: Sender<ScanEvent>, scan: F) -> JoinHandle<()>
where
    F: FnOnce(&Sender<ScanEvent>) -> Result<()> + Send + 'static,
{
    thread::spawn(move || {
        let _guard = RunningGuard;
        if let Err(e) = run_catching(|| scan(&events)) {
            crate::log(&format!("Scan failed: {:#}", e));
            let _ = events.send(ScanEvent::Failed(format!("{:#}", e)));
        }
        crate::log("Scan thread finished");
    })
}

/// Runs a scan against the real screen, Tesseract and the stats API.
fn run_desktop_scan(config: &AppConfig, events: &Sender<ScanEvent>) -> Result<()> {
    let screen = DesktopScreen;
    let detector = BrightHeaderDetector::from_config(config);
    let recognizer = TesseractEngine::setup(&config.ocr_language, config.ocr_auto_orientation)?;
    let stats = StatsClient::from_config(config)?;

    let pipeline = ScanPipeline {
        screen: &screen,
        detector: &detector,
        recognizer: &recognizer,
        stats: &stats,
        player_regions: &config.layout.player_regions,
        ocr: NameOcrOptions::from_config(config),
        timing: ScanTiming::from_config(config),
        save_debug_captures: config.save_debug_captures,
    };
    pipeline.run(events)
}

/// Looks up one player by name in a background thread.
///
/// Independent of the scan state machine; the result arrives as `ScanEvent::ManualResult`.
pub fn start_manual_lookup(config: &AppConfig, username: String, events: Sender<ScanEvent>) {
    crate::log(&format!("Manual lookup requested for '{}'", username));

    let client = StatsClient::from_config(config);
    thread::spawn(move || {
        let result = client
            .and_then(|client| run_catching(|| client.lookup(&username)))
            .map_err(|e| format!("{:#}", e));
        if let Err(e) = &result {
            crate::log(&format!("Manual lookup for '{}' failed: {}", username, e));
        }
        let _ = events.send(ScanEvent::ManualResult { username, result });
    });
}
