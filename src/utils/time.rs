//! Time utilities: parsing HH:MM and formatting wait durations.

use chrono::{NaiveTime, TimeDelta};

pub fn parse_time(t: &str) -> Option<NaiveTime> {
    NaiveTime::parse_from_str(t.trim(), "%H:%M").ok()
}

/// Human readable "1h 05m" / "42s" rendering of a (non-negative) delay.
pub fn format_delay(d: TimeDelta) -> String {
    let secs = d.num_seconds().max(0);
    let (h, m, s) = (secs / 3600, (secs % 3600) / 60, secs % 60);

    if h > 0 {
        format!("{}h {:02}m", h, m)
    } else if m > 0 {
        format!("{}m {:02}s", m, s)
    } else {
        format!("{}s", s)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn formats_delays() {
        assert_eq!(format_delay(TimeDelta::seconds(42)), "42s");
        assert_eq!(format_delay(TimeDelta::seconds(125)), "2m 05s");
        assert_eq!(format_delay(TimeDelta::minutes(605)), "10h 05m");
        assert_eq!(format_delay(TimeDelta::seconds(-3)), "0s");
    }

    #[test]
    fn parses_hh_mm() {
        assert_eq!(parse_time("07:45"), NaiveTime::from_hms_opt(7, 45, 0));
        assert!(parse_time("7h45").is_none());
    }
}
