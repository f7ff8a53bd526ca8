//! Fakes for the scan pipeline seams.

use anyhow::{anyhow, Result};
use image::{GrayImage, ImageBuffer, Rgba, RgbaImage};
use std::cell::{Cell, RefCell};
use std::collections::{HashMap, VecDeque};

use super::detection::LobbyDetector;
use crate::capture::ScreenSource;
use crate::config::ScreenRegion;
use crate::ocr::{OcrLine, TextRecognizer};
use crate::stats::{PlayerLookup, StatsSource};

/// Screen that returns a solid color for every region and records what was grabbed.
pub struct FakeScreen {
    color: Option<Rgba<u8>>,
    grabbed: RefCell<Vec<ScreenRegion>>,
}

impl FakeScreen {
    pub fn filled(color: Rgba<u8>) -> Self {
        Self {
            color: Some(color),
            grabbed: RefCell::new(Vec::new()),
        }
    }

    pub fn failing() -> Self {
        Self {
            color: None,
            grabbed: RefCell::new(Vec::new()),
        }
    }

    pub fn grabbed(&self) -> Vec<ScreenRegion> {
        self.grabbed.borrow().clone()
    }
}

impl ScreenSource for FakeScreen {
    fn grab(&self, region: &ScreenRegion) -> Result<RgbaImage> {
        self.grabbed.borrow_mut().push(*region);
        match self.color {
            Some(color) => Ok(ImageBuffer::from_pixel(region.width, region.height, color)),
            None => Err(anyhow!("display disconnected")),
        }
    }
}

/// Detector that answers from a script, then keeps repeating `fallback`.
pub struct ScriptedDetector {
    answers: RefCell<VecDeque<bool>>,
    fallback: bool,
    pub calls: Cell<usize>,
}

impl ScriptedDetector {
    pub fn new(answers: &[bool], fallback: bool) -> Self {
        Self {
            answers: RefCell::new(answers.iter().copied().collect()),
            fallback,
            calls: Cell::new(0),
        }
    }
}

impl LobbyDetector for ScriptedDetector {
    fn is_lobby(&self, _screen: &dyn ScreenSource) -> Result<bool> {
        self.calls.set(self.calls.get() + 1);
        Ok(self.answers.borrow_mut().pop_front().unwrap_or(self.fallback))
    }
}

/// Recognizer that returns one scripted line per call; empty once the script runs out.
pub struct ScriptedRecognizer {
    lines: RefCell<VecDeque<Vec<String>>>,
}

impl ScriptedRecognizer {
    pub fn new(lines: &[&[&str]]) -> Self {
        Self {
            lines: RefCell::new(
                lines
                    .iter()
                    .map(|words| words.iter().map(|w| w.to_string()).collect())
                    .collect(),
            ),
        }
    }
}

impl TextRecognizer for ScriptedRecognizer {
    fn recognize(&self, _img: &GrayImage) -> Result<Vec<OcrLine>> {
        let Some(words) = self.lines.borrow_mut().pop_front() else {
            return Ok(Vec::new());
        };
        Ok(vec![OcrLine { words }])
    }
}

/// Stats source backed by a fixed map; unknown names are private.
#[derive(Default)]
pub struct FakeStats {
    pub players: HashMap<String, PlayerLookup>,
    pub failing: Option<String>,
    pub calls: RefCell<Vec<String>>,
}

impl StatsSource for FakeStats {
    fn lookup(&self, player_name: &str) -> Result<PlayerLookup> {
        self.calls.borrow_mut().push(player_name.to_string());
        if self.failing.as_deref() == Some(player_name) {
            return Err(anyhow!("connection reset"));
        }
        Ok(self
            .players
            .get(player_name)
            .cloned()
            .unwrap_or(PlayerLookup::Private))
    }
}
