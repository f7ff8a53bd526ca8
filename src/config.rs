//! Configuration types for the tracker.
//!
//! Loads settings from config.json at startup. Provides the API endpoint and key,
//! the lobby screen layout, detection thresholds, OCR options and polling timing.

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use std::sync::OnceLock;
use std::time::Duration;

/// Global configuration instance, initialized once at startup.
static CONFIG: OnceLock<AppConfig> = OnceLock::new();

/// Environment variable that overrides `api_key` from config.json.
pub const API_KEY_ENV: &str = "RIVALS_API_KEY";

/// Number of player name slots on the lobby screen (6 per team).
pub const PLAYER_SLOTS: usize = 12;

/// A rectangle in absolute screen-pixel coordinates.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScreenRegion {
    pub top: i32,
    pub left: i32,
    pub width: u32,
    pub height: u32,
}

impl ScreenRegion {
    pub const fn new(top: i32, left: i32, width: u32, height: u32) -> Self {
        Self {
            top,
            left,
            width,
            height,
        }
    }

    /// Builds a region from corner coordinates `(x1, y1)`-`(x2, y2)`.
    pub const fn from_corners(x1: i32, y1: i32, x2: i32, y2: i32) -> Self {
        Self {
            top: y1,
            left: x1,
            width: (x2 - x1) as u32,
            height: (y2 - y1) as u32,
        }
    }
}

/// Named screen regions for one version of the game's lobby UI.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct LobbyLayout {
    /// Free-form version tag, logged at startup so mismatched layouts are easy to spot
    pub version: String,
    /// Team header regions used to recognize the lobby screen
    pub header_regions: Vec<ScreenRegion>,
    /// Player name slots, own team first (6) then enemy team (6)
    pub player_regions: Vec<ScreenRegion>,
}

impl Default for LobbyLayout {
    /// 1920x1080 layout of the team-selection screen.
    fn default() -> Self {
        Self {
            version: "1920x1080-s1".to_string(),
            header_regions: vec![
                ScreenRegion::new(185, 135, 140, 40),
                ScreenRegion::new(185, 1645, 140, 40),
            ],
            player_regions: vec![
                ScreenRegion::from_corners(267, 309, 813, 372),
                ScreenRegion::from_corners(267, 381, 813, 444),
                ScreenRegion::from_corners(267, 456, 813, 519),
                ScreenRegion::from_corners(269, 530, 815, 593),
                ScreenRegion::from_corners(269, 604, 815, 667),
                ScreenRegion::from_corners(264, 678, 810, 741),
                ScreenRegion::from_corners(1121, 309, 1667, 372),
                ScreenRegion::from_corners(1121, 381, 1667, 444),
                ScreenRegion::from_corners(1121, 455, 1667, 518),
                ScreenRegion::from_corners(1119, 530, 1665, 593),
                ScreenRegion::from_corners(1119, 603, 1665, 666),
                ScreenRegion::from_corners(1119, 677, 1665, 740),
            ],
        }
    }
}

/// Complete application configuration.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// Base URL of the statistics API, without trailing slash
    pub api_base_url: String,
    /// Secret sent as the `x-api-key` header
    pub api_key: String,
    /// HTTP timeout in seconds; None keeps the client default
    pub http_timeout_secs: Option<u64>,
    /// Number of heroes shown per player
    pub top_heroes: usize,
    /// Screen regions for the lobby UI
    pub layout: LobbyLayout,
    /// Grayscale value a pixel must exceed to count as bright
    pub bright_threshold: u8,
    /// Bright pixels each header region needs for the lobby to be detected
    pub min_bright_pixels: u32,
    /// How long a scan waits for the lobby screen (milliseconds)
    pub scan_window_ms: u64,
    /// Delay between lobby checks (milliseconds)
    pub poll_interval_ms: u64,
    /// Tesseract language(s), e.g. "eng" or "eng+kor"
    pub ocr_language: String,
    /// Let Tesseract detect text orientation before recognition
    pub ocr_auto_orientation: bool,
    /// Invert the grayscale region so light text becomes dark
    pub ocr_invert: bool,
    /// Upscale factor applied before OCR
    pub ocr_scale: u32,
    /// Fragments with fewer characters than this are dropped as noise
    pub ocr_min_fragment_chars: usize,
    /// Write every captured name region to the debug directory
    pub save_debug_captures: bool,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            api_base_url: "https://marvelrivalsapi.com/api/v1".to_string(),
            api_key: String::new(),
            http_timeout_secs: None,
            top_heroes: 5,
            layout: LobbyLayout::default(),
            bright_threshold: 200,
            min_bright_pixels: 100,
            scan_window_ms: 5000,
            poll_interval_ms: 500,
            ocr_language: "eng".to_string(),
            ocr_auto_orientation: true,
            ocr_invert: true,
            ocr_scale: 2,
            ocr_min_fragment_chars: 2,
            save_debug_captures: false,
        }
    }
}

impl AppConfig {
    pub fn scan_window(&self) -> Duration {
        Duration::from_millis(self.scan_window_ms)
    }

    pub fn poll_interval(&self) -> Duration {
        Duration::from_millis(self.poll_interval_ms)
    }

    /// Applies the API key environment override, if set and non-empty.
    fn apply_env_override(&mut self, env_key: Option<String>) {
        if let Some(key) = env_key.filter(|k| !k.trim().is_empty()) {
            self.api_key = key.trim().to_string();
        }
    }
}

/// Parses configuration JSON. Missing fields take their defaults.
pub fn parse_config(contents: &str) -> serde_json::Result<AppConfig> {
    serde_json::from_str(contents)
}

/// Loads configuration from config.json or returns defaults.
/// Looks for config.json in the same directory as the executable.
fn load_config() -> AppConfig {
    let config_path = crate::paths::get_exe_dir().join("config.json");
    let mut config = load_config_from(&config_path);
    config.apply_env_override(std::env::var(API_KEY_ENV).ok());

    if config.api_key.is_empty() {
        crate::log(&format!(
            "Warning: no API key configured (set api_key in config.json or {})",
            API_KEY_ENV
        ));
    }
    crate::log(&format!(
        "Using lobby layout '{}' ({} header regions, {} player regions)",
        config.layout.version,
        config.layout.header_regions.len(),
        config.layout.player_regions.len()
    ));

    config
}

fn load_config_from(config_path: &Path) -> AppConfig {
    crate::log(&format!("Looking for config at: {}", config_path.display()));

    if !config_path.exists() {
        crate::log("config.json not found. Using default config.");
        return AppConfig::default();
    }

    match fs::read_to_string(config_path) {
        Ok(contents) => match parse_config(&contents) {
            Ok(config) => {
                crate::log("Config loaded from config.json");
                config
            }
            Err(e) => {
                crate::log(&format!(
                    "Failed to parse config.json: {}. Using defaults.",
                    e
                ));
                AppConfig::default()
            }
        },
        Err(e) => {
            crate::log(&format!(
                "Failed to read config.json: {}. Using defaults.",
                e
            ));
            AppConfig::default()
        }
    }
}

/// Initializes the global configuration. Call once at startup.
pub fn init_config() {
    let _ = CONFIG.set(load_config());
}

/// Returns a reference to the global configuration, loading it on first use.
pub fn get_config() -> &'static AppConfig {
    CONFIG.get_or_init(load_config)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_default_layout_has_twelve_slots() {
        let layout = LobbyLayout::default();
        assert_eq!(layout.player_regions.len(), PLAYER_SLOTS);
        assert_eq!(layout.header_regions.len(), 2);
    }

    #[test]
    fn test_from_corners() {
        let region = ScreenRegion::from_corners(267, 309, 813, 372);
        assert_eq!(region, ScreenRegion::new(309, 267, 546, 63));
    }

    #[test]
    fn test_partial_config_keeps_defaults() {
        let config = parse_config(r#"{ "api_key": "abc", "scan_window_ms": 8000 }"#).unwrap();
        assert_eq!(config.api_key, "abc");
        assert_eq!(config.scan_window(), Duration::from_secs(8));
        assert_eq!(config.poll_interval(), Duration::from_millis(500));
        assert_eq!(config.bright_threshold, 200);
        assert_eq!(config.min_bright_pixels, 100);
        assert_eq!(config.top_heroes, 5);
        assert_eq!(config.layout.player_regions.len(), PLAYER_SLOTS);
    }

    #[test]
    fn test_custom_layout() {
        let json = r#"{
            "layout": {
                "version": "2560x1440",
                "header_regions": [{ "top": 1, "left": 2, "width": 3, "height": 4 }],
                "player_regions": []
            }
        }"#;
        let config = parse_config(json).unwrap();
        assert_eq!(config.layout.version, "2560x1440");
        assert_eq!(config.layout.header_regions, vec![ScreenRegion::new(1, 2, 3, 4)]);
        assert!(config.layout.player_regions.is_empty());
    }

    #[test]
    fn test_env_override() {
        let mut config = AppConfig {
            api_key: "from-file".to_string(),
            ..Default::default()
        };
        config.apply_env_override(Some("   ".to_string()));
        assert_eq!(config.api_key, "from-file");
        config.apply_env_override(None);
        assert_eq!(config.api_key, "from-file");
        config.apply_env_override(Some(" from-env ".to_string()));
        assert_eq!(config.api_key, "from-env");
    }

    #[test]
    fn test_malformed_file_falls_back_to_defaults() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("config.json");
        fs::write(&path, "{ not json").unwrap();

        let config = load_config_from(&path);
        assert_eq!(config.api_base_url, AppConfig::default().api_base_url);
    }

    #[test]
    fn test_missing_file_falls_back_to_defaults() {
        let dir = tempdir().unwrap();
        let config = load_config_from(&dir.path().join("config.json"));
        assert_eq!(config.scan_window_ms, 5000);
    }
}
