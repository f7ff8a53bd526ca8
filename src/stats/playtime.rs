//! Conversion between playtime strings ("1h2m5s") and seconds.

/// Parses a playtime string such as "12h30m5s" into seconds.
///
/// Every component is optional and they are consumed in h, m, s order.
/// Whitespace is ignored. A component whose value is not an integer counts as zero.
/// Values too large for `u64` saturate.
pub fn parse_playtime(play_time: &str) -> u64 {
    let mut rest: String = play_time.chars().filter(|c| !c.is_whitespace()).collect();
    let mut total = 0u64;

    for (unit, factor) in [('h', 3600u64), ('m', 60), ('s', 1)] {
        if let Some((value, tail)) = rest.split_once(unit) {
            let seconds = value.parse::<u64>().unwrap_or(0).saturating_mul(factor);
            total = total.saturating_add(seconds);
            rest = tail.to_string();
        }
    }

    total
}

/// Formats seconds as "XhYmZs", omitting leading zero components.
pub fn format_playtime(total_seconds: u64) -> String {
    let hours = total_seconds / 3600;
    let minutes = (total_seconds % 3600) / 60;
    let seconds = total_seconds % 60;

    if hours > 0 {
        format!("{}h{}m{}s", hours, minutes, seconds)
    } else if minutes > 0 {
        format!("{}m{}s", minutes, seconds)
    } else {
        format!("{}s", seconds)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_full() {
        assert_eq!(parse_playtime("1h2m5s"), 3725);
        assert_eq!(parse_playtime("12h 30m 0s"), 45000);
    }

    #[test]
    fn test_parse_partial_components() {
        assert_eq!(parse_playtime("45m"), 2700);
        assert_eq!(parse_playtime("2h"), 7200);
        assert_eq!(parse_playtime("30s"), 30);
        assert_eq!(parse_playtime("1h15s"), 3615);
    }

    #[test]
    fn test_parse_garbage() {
        assert_eq!(parse_playtime(""), 0);
        assert_eq!(parse_playtime("0"), 0);
        assert_eq!(parse_playtime("xh10m"), 600);
    }

    #[test]
    fn test_parse_huge_values_saturate() {
        assert_eq!(parse_playtime("99999999999999999h"), u64::MAX);
        assert_eq!(parse_playtime("5124095576030431h59m59s"), u64::MAX);
        assert_eq!(parse_playtime("99999999999999999999999h"), 0, "Unparseable counts as zero");
    }

    #[test]
    fn test_format() {
        assert_eq!(format_playtime(3725), "1h2m5s");
        assert_eq!(format_playtime(65), "1m5s");
        assert_eq!(format_playtime(0), "0s");
        assert_eq!(format_playtime(7200), "2h0m0s");
    }

    #[test]
    fn test_round_trip() {
        for seconds in [0, 1, 59, 60, 61, 3599, 3600, 3725, 86399, 86400, 1_000_000] {
            assert_eq!(parse_playtime(&format_playtime(seconds)), seconds);
        }
    }
}
