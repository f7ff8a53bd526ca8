//! Player name capture from the lobby's name slots.

use anyhow::{Context, Result};

use crate::capture::{save_debug_capture, ScreenSource};
use crate::config::{ScreenRegion, PLAYER_SLOTS};
use crate::ocr::{read_player_name, NameOcrOptions, TextRecognizer, UNKNOWN_PLAYER};

/// Players per team; the first team listed is the user's own.
pub const TEAM_SIZE: usize = PLAYER_SLOTS / 2;

/// Captures and reads every player name slot.
///
/// Always returns exactly `PLAYER_SLOTS` names: extra regions are ignored and
/// missing ones are filled with `UNKNOWN_PLAYER`.
pub fn capture_player_names(
    screen: &dyn ScreenSource,
    regions: &[ScreenRegion],
    recognizer: &dyn TextRecognizer,
    options: &NameOcrOptions,
    save_debug_captures: bool,
) -> Result<Vec<String>> {
    let mut names = Vec::with_capacity(PLAYER_SLOTS);

    for (slot, region) in regions.iter().take(PLAYER_SLOTS).enumerate() {
        let img = screen
            .grab(region)
            .with_context(|| format!("Failed to capture player slot {}", slot + 1))?;

        if save_debug_captures {
            match save_debug_capture(&img, &format!("slot{:02}", slot + 1)) {
                Ok(path) => crate::log(&format!("Saved slot capture: {}", path.display())),
                Err(e) => crate::log(&format!("Could not save slot capture: {}", e)),
            }
        }

        let name = read_player_name(&img, recognizer, options)
            .with_context(|| format!("OCR failed for player slot {}", slot + 1))?;
        crate::log(&format!("Slot {}: {}", slot + 1, name));
        names.push(name);
    }

    Ok(pad_names(names))
}

/// Pads or truncates a name list to exactly `PLAYER_SLOTS` entries.
pub fn pad_names(mut names: Vec<String>) -> Vec<String> {
    names.resize(PLAYER_SLOTS, UNKNOWN_PLAYER.to_string());
    names
}

/// Splits the 12 names into (own team, enemy team).
pub fn split_teams(names: &[String]) -> (&[String], &[String]) {
    names.split_at(TEAM_SIZE.min(names.len()))
}
