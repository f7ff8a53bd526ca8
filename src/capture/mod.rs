//! Screen capture of fixed display regions.
//!
//! This module provides:
//! - The `ScreenSource` seam used by detection and name capture
//! - `DesktopScreen`, which grabs regions of the primary display
//! - Saving captured regions for debugging (`save_debug_capture`)

pub mod screenshot;

use anyhow::{Context, Result};
use chrono::Local;
use image::RgbaImage;
use std::path::PathBuf;

use crate::config::ScreenRegion;

pub use screenshot::DesktopScreen;

/// Something that can produce the pixels of a screen region.
pub trait ScreenSource {
    fn grab(&self, region: &ScreenRegion) -> Result<RgbaImage>;
}

/// Writes a captured region to the debug directory and returns its path.
pub fn save_debug_capture(img: &RgbaImage, label: &str) -> Result<PathBuf> {
    let timestamp = Local::now().format("%Y%m%d_%H%M%S%.3f");
    let path = crate::paths::get_debug_dir().join(format!("{}_{}.png", label, timestamp));
    img.save(&path)
        .with_context(|| format!("Failed to save debug capture {}", path.display()))?;
    Ok(path)
}
