//! Player statistics lookup and hero table formatting.
//!
//! This module provides:
//! - The statistics API client (`StatsClient`)
//! - Playtime string parsing and formatting
//! - Winrate / average KDA rows for display

pub mod client;
pub mod formatter;
pub mod playtime;

pub use client::StatsClient;
pub use formatter::{build_rows, StatRow, COLUMNS};

use anyhow::Result;

/// Outcome of looking up one player.
#[derive(Debug, Clone, PartialEq)]
pub enum PlayerLookup {
    /// Top heroes, sorted by descending playtime
    Found(Vec<StatRow>),
    /// The API returned no usable stats (private profile, unknown name, or API error)
    Private,
}

/// Something that can look up a player's stats. Implemented by `StatsClient`.
pub trait StatsSource {
    fn lookup(&self, player_name: &str) -> Result<PlayerLookup>;
}

impl StatsSource for StatsClient {
    fn lookup(&self, player_name: &str) -> Result<PlayerLookup> {
        Ok(match self.fetch_player_stats(player_name)? {
            Some(heroes) => PlayerLookup::Found(build_rows(&heroes)),
            None => PlayerLookup::Private,
        })
    }
}
