pub mod engine;
pub mod extract;
pub mod preprocess;
pub mod setup;

pub use engine::{OcrLine, TesseractEngine};
pub use extract::{assemble_name, is_known_player, UNKNOWN_PLAYER};
pub use preprocess::{count_bright_pixels, prepare_for_ocr, to_grayscale};

use anyhow::Result;
use image::{GrayImage, RgbaImage};

/// An OCR backend that turns a preprocessed grayscale image into text lines.
pub trait TextRecognizer {
    fn recognize(&self, img: &GrayImage) -> Result<Vec<OcrLine>>;
}

/// Options controlling how a name region is read.
#[derive(Debug, Clone, Copy)]
pub struct NameOcrOptions {
    pub invert: bool,
    pub scale: u32,
    pub min_fragment_chars: usize,
}

impl NameOcrOptions {
    pub fn from_config(config: &crate::config::AppConfig) -> Self {
        Self {
            invert: config.ocr_invert,
            scale: config.ocr_scale,
            min_fragment_chars: config.ocr_min_fragment_chars,
        }
    }
}

/// High-level function: captured name region → player name.
///
/// Converts to grayscale, runs a single OCR pass, and joins the fragments.
/// Yields `UNKNOWN_PLAYER` when nothing usable was recognized.
pub fn read_player_name(
    img: &RgbaImage,
    recognizer: &dyn TextRecognizer,
    options: &NameOcrOptions,
) -> Result<String> {
    let prepared = prepare_for_ocr(img, options.invert, options.scale);
    let lines = recognizer.recognize(&prepared)?;
    assemble_name(&lines, options.min_fragment_chars)
}
