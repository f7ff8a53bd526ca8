use anyhow::Result;
use regex::Regex;

use super::engine::OcrLine;

/// Placeholder for a slot where no name could be read.
pub const UNKNOWN_PLAYER: &str = "Unknown";

/// Frame glyphs Tesseract reads from the slot border and glues onto the name.
const BORDER_GLYPHS: &str = r"^[|\[\]{}]+|[|\[\]{}]+$";

/// Joins the recognized fragments of one name region into a player name.
///
/// Fragments shorter than `min_fragment_chars` (after trimming) are treated as
/// noise: stray borders and rank icons often come back as single glyphs.
/// Returns `UNKNOWN_PLAYER` when nothing survives.
pub fn assemble_name(lines: &[OcrLine], min_fragment_chars: usize) -> Result<String> {
    let border_regex = Regex::new(BORDER_GLYPHS)?;

    let fragments: Vec<String> = lines
        .iter()
        .flat_map(|line| line.words.iter())
        .map(|word| border_regex.replace_all(word.trim(), "").into_owned())
        .filter(|text| !text.is_empty() && text.chars().count() >= min_fragment_chars)
        .collect();

    let name = fragments.join(" ").split_whitespace().collect::<Vec<_>>().join(" ");
    if name.is_empty() {
        Ok(UNKNOWN_PLAYER.to_string())
    } else {
        Ok(name)
    }
}

/// Returns true if the slot holds a real name worth looking up.
pub fn is_known_player(name: &str) -> bool {
    !name.trim().is_empty() && name != UNKNOWN_PLAYER
}

#[cfg(test)]
mod tests {
    use super::*;

    fn line(words: &[&str]) -> OcrLine {
        OcrLine {
            words: words.iter().map(|w| w.to_string()).collect(),
        }
    }

    #[test]
    fn test_single_fragment() {
        assert_eq!(assemble_name(&[line(&["Hulkbuster99"])], 2).unwrap(), "Hulkbuster99");
    }

    #[test]
    fn test_drops_single_character_noise() {
        let lines = [line(&["|", "Storm", "x"]), line(&["Rider"])];
        assert_eq!(assemble_name(&lines, 2).unwrap(), "Storm Rider");
    }

    #[test]
    fn test_strips_border_glyphs() {
        let lines = [line(&["|Mantis_Main]", "[|"])];
        assert_eq!(assemble_name(&lines, 2).unwrap(), "Mantis_Main");
    }

    #[test]
    fn test_counts_characters_not_bytes() {
        // One Hangul syllable is three UTF-8 bytes but a single character
        assert_eq!(assemble_name(&[line(&["한"])], 2).unwrap(), UNKNOWN_PLAYER);
        assert_eq!(assemble_name(&[line(&["한국"])], 2).unwrap(), "한국");
    }

    #[test]
    fn test_collapses_inner_whitespace() {
        let lines = [line(&["Moon  Knight", "Main"])];
        assert_eq!(assemble_name(&lines, 2).unwrap(), "Moon Knight Main");
    }

    #[test]
    fn test_empty_defaults_to_unknown() {
        assert_eq!(assemble_name(&[], 2).unwrap(), UNKNOWN_PLAYER);
        assert_eq!(assemble_name(&[line(&["a", "b"])], 2).unwrap(), UNKNOWN_PLAYER);
    }

    #[test]
    fn test_is_known_player() {
        assert!(is_known_player("Groot"));
        assert!(!is_known_player(UNKNOWN_PLAYER));
        assert!(!is_known_player("  "));
    }
}
