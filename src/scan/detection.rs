//! Lobby screen detection via bright pixel counting.
//!
//! The team-selection screen shows a white team header in the top corners of the
//! screen. Counting bright pixels in those two regions is enough to tell the lobby
//! apart from gameplay and menus.

use anyhow::Result;

use crate::capture::ScreenSource;
use crate::config::{AppConfig, ScreenRegion};
use crate::ocr::{count_bright_pixels, to_grayscale};

/// Decides whether the screen currently shows the team-selection lobby.
pub trait LobbyDetector {
    fn is_lobby(&self, screen: &dyn ScreenSource) -> Result<bool>;
}

/// Detector that requires every header region to contain enough bright pixels.
#[derive(Debug, Clone)]
pub struct BrightHeaderDetector {
    pub regions: Vec<ScreenRegion>,
    pub threshold: u8,
    pub min_bright_pixels: u32,
}

impl BrightHeaderDetector {
    pub fn from_config(config: &AppConfig) -> Self {
        Self {
            regions: config.layout.header_regions.clone(),
            threshold: config.bright_threshold,
            min_bright_pixels: config.min_bright_pixels,
        }
    }
}

impl LobbyDetector for BrightHeaderDetector {
    /// Stops at the first region below the minimum, so a negative answer may not
    /// capture every header.
    fn is_lobby(&self, screen: &dyn ScreenSource) -> Result<bool> {
        if self.regions.is_empty() {
            return Ok(false);
        }

        for (i, region) in self.regions.iter().enumerate() {
            let img = screen.grab(region)?;
            let bright = count_bright_pixels(&to_grayscale(&img), self.threshold);
            if bright < self.min_bright_pixels {
                crate::log(&format!(
                    "Header {}: {} bright pixels (need {})",
                    i + 1,
                    bright,
                    self.min_bright_pixels
                ));
                return Ok(false);
            }
        }

        Ok(true)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scan::testing::FakeScreen;
    use image::Rgba;

    fn detector() -> BrightHeaderDetector {
        BrightHeaderDetector {
            regions: vec![ScreenRegion::new(0, 0, 20, 10), ScreenRegion::new(0, 100, 20, 10)],
            threshold: 200,
            min_bright_pixels: 100,
        }
    }

    #[test]
    fn test_detects_bright_headers() {
        let screen = FakeScreen::filled(Rgba([255, 255, 255, 255]));
        assert!(detector().is_lobby(&screen).unwrap());
        assert_eq!(screen.grabbed().len(), 2);
    }

    #[test]
    fn test_dark_screen_is_not_lobby() {
        let screen = FakeScreen::filled(Rgba([30, 30, 30, 255]));
        assert!(!detector().is_lobby(&screen).unwrap());
        assert_eq!(screen.grabbed().len(), 1, "Stops after the first dark header");
    }

    #[test]
    fn test_threshold_is_strict() {
        // Exactly at the threshold does not count as bright
        let screen = FakeScreen::filled(Rgba([200, 200, 200, 255]));
        assert!(!detector().is_lobby(&screen).unwrap());
    }

    #[test]
    fn test_minimum_pixel_count() {
        // A 20x10 region holds exactly 200 pixels
        let mut det = detector();
        let screen = FakeScreen::filled(Rgba([255, 255, 255, 255]));
        det.min_bright_pixels = 201;
        assert!(!det.is_lobby(&screen).unwrap());
        det.min_bright_pixels = 200;
        assert!(det.is_lobby(&screen).unwrap());
    }

    #[test]
    fn test_no_regions_is_not_lobby() {
        let det = BrightHeaderDetector {
            regions: Vec::new(),
            ..detector()
        };
        assert!(!det.is_lobby(&FakeScreen::filled(Rgba([255, 255, 255, 255]))).unwrap());
    }

    #[test]
    fn test_capture_error_propagates() {
        let screen = FakeScreen::failing();
        assert!(detector().is_lobby(&screen).is_err());
    }
}
