//! Per-hero table rows: winrate and average KDA.

use serde::Serialize;
use std::cmp::Reverse;

use super::client::HeroStat;
use super::playtime::parse_playtime;

/// One display row of a player's hero table.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StatRow {
    pub hero: String,
    pub matches: u64,
    pub playtime: String,
    pub wins: u64,
    pub winrate: String,
    pub avg_kda: String,
}

/// Column headers in display order.
pub const COLUMNS: [&str; 6] = ["Hero", "Matches", "Playtime", "Wins", "Winrate", "Avg KDA"];

impl StatRow {
    pub fn from_hero(hero: &HeroStat) -> Self {
        Self {
            hero: title_case(&hero.hero_name),
            matches: hero.matches,
            playtime: hero.play_time.clone(),
            wins: hero.wins,
            winrate: calculate_winrate(hero.wins, hero.matches),
            avg_kda: calculate_average_kda(hero.kills, hero.deaths, hero.assists, hero.matches),
        }
    }

    /// Cell values in `COLUMNS` order.
    pub fn cells(&self) -> [String; 6] {
        [
            self.hero.clone(),
            self.matches.to_string(),
            self.playtime.clone(),
            self.wins.to_string(),
            self.winrate.clone(),
            self.avg_kda.clone(),
        ]
    }
}

/// Winrate as a whole percentage, e.g. "57%". Halves round to even.
pub fn calculate_winrate(wins: u64, matches: u64) -> String {
    if matches == 0 {
        return "0%".to_string();
    }
    let percent = (wins as f64 / matches as f64 * 100.0).round_ties_even();
    format!("{}%", percent as i64)
}

/// Per-match averages as "K/D/A" with one decimal each, e.g. "5.2/3.0/8.7".
///
/// Each quotient is rounded from its exact binary value, so 3/20 (stored just
/// below 0.15) prints as "0.1".
pub fn calculate_average_kda(kills: u64, deaths: u64, assists: u64, matches: u64) -> String {
    if matches == 0 {
        return "0/0/0".to_string();
    }
    let per_match = |total: u64| total as f64 / matches as f64;
    format!(
        "{:.1}/{:.1}/{:.1}",
        per_match(kills),
        per_match(deaths),
        per_match(assists)
    )
}

/// Capitalizes the first letter of every word, lowercasing the rest.
/// Any non-alphabetic character starts a new word ("spider-man" → "Spider-Man").
pub fn title_case(name: &str) -> String {
    let mut result = String::with_capacity(name.len());
    let mut in_word = false;

    for c in name.chars() {
        if c.is_alphabetic() {
            if in_word {
                result.extend(c.to_lowercase());
            } else {
                result.extend(c.to_uppercase());
            }
            in_word = true;
        } else {
            result.push(c);
            in_word = false;
        }
    }

    result
}

/// Builds table rows sorted by descending playtime. Ties keep input order.
pub fn build_rows(heroes: &[HeroStat]) -> Vec<StatRow> {
    let mut rows: Vec<StatRow> = heroes.iter().map(StatRow::from_hero).collect();
    rows.sort_by_key(|row| Reverse(parse_playtime(&row.playtime)));
    rows
}

#[cfg(test)]
mod tests {
    use super::*;

    fn hero(name: &str, matches: u64, wins: u64, play_time: &str, k: u64, d: u64, a: u64) -> HeroStat {
        HeroStat {
            hero_name: name.to_string(),
            matches,
            wins,
            play_time: play_time.to_string(),
            kills: k,
            deaths: d,
            assists: a,
        }
    }

    #[test]
    fn test_zero_matches() {
        assert_eq!(calculate_winrate(0, 0), "0%");
        assert_eq!(calculate_average_kda(0, 0, 0, 0), "0/0/0");
        assert_eq!(calculate_average_kda(5, 2, 1, 0), "0/0/0");
    }

    #[test]
    fn test_perfect_winrate() {
        for matches in [1, 3, 7, 250] {
            assert_eq!(calculate_winrate(matches, matches), "100%");
        }
    }

    #[test]
    fn test_winrate_rounding() {
        assert_eq!(calculate_winrate(1, 3), "33%");
        assert_eq!(calculate_winrate(2, 3), "67%");
        assert_eq!(calculate_winrate(1, 8), "12%", "12.5 rounds half to even");
        assert_eq!(calculate_winrate(3, 8), "38%", "37.5 rounds half to even");
    }

    #[test]
    fn test_average_kda() {
        assert_eq!(calculate_average_kda(52, 30, 87, 10), "5.2/3.0/8.7");
        assert_eq!(calculate_average_kda(10, 3, 0, 3), "3.3/1.0/0.0");
        // 0.15 and 0.65 sit just below the tie, 0.45 just above
        assert_eq!(calculate_average_kda(3, 9, 13, 20), "0.1/0.5/0.7");
    }

    #[test]
    fn test_title_case() {
        assert_eq!(title_case("spider-man"), "Spider-Man");
        assert_eq!(title_case("JEFF THE LAND SHARK"), "Jeff The Land Shark");
        assert_eq!(title_case("cloak & dagger"), "Cloak & Dagger");
        assert_eq!(title_case(""), "");
    }

    #[test]
    fn test_build_rows_sorts_by_playtime() {
        let heroes = vec![
            hero("groot", 10, 5, "45m", 20, 10, 30),
            hero("storm", 40, 30, "12h5m", 300, 120, 200),
            hero("luna snow", 0, 0, "0s", 0, 0, 0),
            hero("magneto", 8, 8, "1h2m5s", 16, 4, 12),
            hero("loki", 3, 1, "1h", 7, 9, 40),
        ];

        let rows = build_rows(&heroes);

        assert_eq!(rows.len(), 5);
        let order: Vec<&str> = rows.iter().map(|r| r.hero.as_str()).collect();
        assert_eq!(order, ["Storm", "Magneto", "Loki", "Groot", "Luna Snow"]);

        assert_eq!(rows[0].winrate, "75%");
        assert_eq!(rows[0].avg_kda, "7.5/3.0/5.0");
        assert_eq!(rows[1].winrate, "100%");
        assert_eq!(rows[1].avg_kda, "2.0/0.5/1.5");
        assert_eq!(rows[4].winrate, "0%");
        assert_eq!(rows[4].avg_kda, "0/0/0");
    }

    #[test]
    fn test_cells_follow_column_order() {
        let row = StatRow::from_hero(&hero("hela", 4, 3, "2h", 40, 8, 12));
        assert_eq!(row.cells(), ["Hela", "4", "2h", "3", "75%", "10.0/2.0/3.0"].map(String::from));
    }
}
