//! Rivals Lobby Tracker
//!
//! A desktop application that watches the Marvel Rivals team selection
//! screen, reads the twelve player names with Tesseract OCR and shows each
//! player's most played heroes from the stats API.

// Hide console window on Windows for GUI mode
#![windows_subsystem = "windows"]

mod capture;
mod config;
mod gui;
mod ocr;
mod paths;
mod scan;
mod stats;

use anyhow::{anyhow, Result};
use chrono::Local;
use std::fs::OpenOptions;
use std::io::Write;

const LOG_FILE: &str = "rivals_tracker.log";

/// Logs a message to both console and log file with timestamp.
pub fn log(msg: &str) {
    let timestamp = Local::now().format("%H:%M:%S%.3f");
    let line = format!("[{}] {}\n", timestamp, msg);
    print!("{}", line);
    let log_path = paths::get_logs_dir().join(LOG_FILE);
    if let Ok(mut file) = OpenOptions::new()
        .create(true)
        .append(true)
        .open(&log_path)
    {
        let _ = file.write_all(line.as_bytes());
    }
}

fn main() -> Result<()> {
    // Set up panic hook to log panics
    std::panic::set_hook(Box::new(|panic_info| {
        let msg = if let Some(s) = panic_info.payload().downcast_ref::<&str>() {
            s.to_string()
        } else if let Some(s) = panic_info.payload().downcast_ref::<String>() {
            s.clone()
        } else {
            "Unknown panic".to_string()
        };
        let location = if let Some(loc) = panic_info.location() {
            format!(" at {}:{}:{}", loc.file(), loc.line(), loc.column())
        } else {
            String::new()
        };
        let log_msg = format!("[PANIC]{} {}\n", location, msg);
        eprintln!("{}", log_msg);
        let log_path = paths::get_logs_dir().join(LOG_FILE);
        if let Ok(mut file) = OpenOptions::new().create(true).append(true).open(&log_path) {
            let _ = file.write_all(log_msg.as_bytes());
        }
    }));

    // Ensure output directories exist
    paths::ensure_directories()?;

    // Load configuration
    config::init_config();
    let cfg = config::get_config();

    // Fetch Tesseract and language data up front so the first scan starts quickly
    if let Err(e) = ocr::setup::ensure_tesseract(&cfg.ocr_language, cfg.ocr_auto_orientation) {
        log(&format!("Warning: Failed to setup Tesseract: {:#}", e));
        log("Scans will fail until Tesseract is installed.");
    }

    log("Starting GUI application...");
    match gui::run_gui() {
        Ok(()) => {
            log("GUI application exited normally");
            Ok(())
        }
        Err(e) => {
            log(&format!("GUI error: {}", e));
            Err(anyhow!("GUI error: {}", e))
        }
    }
}
