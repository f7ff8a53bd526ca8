use anyhow::{anyhow, Context, Result};
use image::GrayImage;
use std::path::PathBuf;
use std::process::Command;
use tempfile::NamedTempFile;

use super::setup::{ensure_tesseract, TesseractPaths};
use super::TextRecognizer;

/// Tesseract page segmentation mode: automatic segmentation with orientation detection.
const PSM_AUTO_OSD: &str = "1";
/// Tesseract page segmentation mode: treat the image as a single text line.
const PSM_SINGLE_LINE: &str = "7";

/// Words Tesseract placed on one text line, left to right.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct OcrLine {
    pub words: Vec<String>,
}

/// Text recognizer backed by the Tesseract command-line tool.
#[derive(Debug, Clone)]
pub struct TesseractEngine {
    executable: PathBuf,
    tessdata: PathBuf,
    language: String,
    auto_orientation: bool,
}

impl TesseractEngine {
    pub fn new(paths: TesseractPaths, language: &str, auto_orientation: bool) -> Self {
        Self {
            executable: paths.executable,
            tessdata: paths.tessdata,
            language: language.to_string(),
            auto_orientation,
        }
    }

    /// Locates Tesseract, fetching missing trained data for `language` first.
    pub fn setup(language: &str, auto_orientation: bool) -> Result<Self> {
        let paths = ensure_tesseract(language, auto_orientation)?;
        Ok(Self::new(paths, language, auto_orientation))
    }

    fn page_seg_mode(&self) -> &'static str {
        if self.auto_orientation {
            PSM_AUTO_OSD
        } else {
            PSM_SINGLE_LINE
        }
    }
}

impl TextRecognizer for TesseractEngine {
    /// Runs Tesseract on a preprocessed grayscale image.
    /// Returns the recognized words grouped by text line.
    fn recognize(&self, img: &GrayImage) -> Result<Vec<OcrLine>> {
        // Save image to temporary file
        let temp_input = NamedTempFile::with_suffix(".png")?;
        img.save(temp_input.path())
            .context("Failed to write OCR input image")?;

        // Create temporary output file (Tesseract adds .tsv extension)
        let temp_output = NamedTempFile::new()?;
        let output_base = temp_output.path().to_string_lossy().to_string();

        let output = Command::new(&self.executable)
            .arg(temp_input.path())
            .arg(&output_base)
            .arg("--tessdata-dir")
            .arg(&self.tessdata)
            .arg("-l")
            .arg(&self.language)
            .arg("--psm")
            .arg(self.page_seg_mode())
            .arg("tsv")
            .output()
            .with_context(|| format!("Failed to run {}", self.executable.display()))?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(anyhow!("Tesseract failed: {}", stderr));
        }

        let tsv_path = format!("{}.tsv", output_base);
        let tsv_content = std::fs::read_to_string(&tsv_path)
            .map_err(|e| anyhow!("Failed to read Tesseract output: {}", e))?;
        let _ = std::fs::remove_file(&tsv_path);

        Ok(parse_tsv_output(&tsv_content))
    }
}

/// Parses Tesseract TSV output into structured OcrLine data.
///
/// Words are grouped by (block, paragraph, line) so that text detected in
/// separate blocks of the same region stays in separate lines.
pub fn parse_tsv_output(tsv: &str) -> Vec<OcrLine> {
    let mut lines: Vec<OcrLine> = Vec::new();
    let mut current_key: Option<(i32, i32, i32)> = None;
    let mut current_words: Vec<String> = Vec::new();

    // TSV fields: level, page_num, block_num, par_num, line_num, word_num,
    //             left, top, width, height, conf, text
    for line in tsv.lines().skip(1) {
        let fields: Vec<&str> = line.split('\t').collect();
        if fields.len() < 12 {
            continue;
        }

        let level: i32 = fields[0].parse().unwrap_or(-1);
        // Level 5 = word
        if level != 5 {
            continue;
        }

        let text = fields[11].trim();
        let conf: f32 = fields[10].parse().unwrap_or(-1.0);
        if text.is_empty() || conf < 0.0 {
            continue;
        }

        let key = (
            fields[2].parse().unwrap_or(-1),
            fields[3].parse().unwrap_or(-1),
            fields[4].parse().unwrap_or(-1),
        );
        if current_key.is_some_and(|k| k != key) {
            push_line(&mut lines, std::mem::take(&mut current_words));
        }
        current_key = Some(key);

        current_words.push(text.to_string());
    }

    push_line(&mut lines, current_words);
    lines
}

fn push_line(lines: &mut Vec<OcrLine>, words: Vec<String>) {
    if !words.is_empty() {
        lines.push(OcrLine { words });
    }
}
