// src/export/range.rs

use crate::errors::{AppError, AppResult};
use chrono::{Datelike, NaiveDate};

/// Parse `--range` into inclusive date bounds.
///
/// Accepted forms, either alone or as `start:end` with both sides in the
/// same form:
/// - YYYY
/// - YYYY-MM
/// - YYYY-MM-DD
///
/// `all` (any case) means no bounds and yields `None`.
pub fn parse_range(r: &str) -> AppResult<Option<(NaiveDate, NaiveDate)>> {
    let r = r.trim();
    if r.eq_ignore_ascii_case("all") {
        return Ok(None);
    }

    let (first, last) = match r.split_once(':') {
        Some((start, end)) => {
            let (start, end) = (start.trim(), end.trim());
            if start.len() != end.len() {
                return Err(invalid(r, "start and end must have the same format"));
            }
            (period_bounds(start)?.0, period_bounds(end)?.1)
        }
        None => period_bounds(r)?,
    };

    if first > last {
        return Err(invalid(r, "start is after end"));
    }
    Ok(Some((first, last)))
}

/// First and last day of a single YYYY / YYYY-MM / YYYY-MM-DD period.
fn period_bounds(p: &str) -> AppResult<(NaiveDate, NaiveDate)> {
    match p.len() {
        4 => {
            let y: i32 = p.parse().map_err(|_| invalid(p, "invalid year"))?;
            let first = ymd(y, 1, 1, p)?;
            let last = ymd(y, 12, 31, p)?;
            Ok((first, last))
        }
        7 => {
            let first = NaiveDate::parse_from_str(&format!("{p}-01"), "%Y-%m-%d")
                .map_err(|_| invalid(p, "invalid month"))?;
            Ok((first, last_day_of_month(first)))
        }
        10 => {
            let d = NaiveDate::parse_from_str(p, "%Y-%m-%d").map_err(|_| invalid(p, "invalid date"))?;
            Ok((d, d))
        }
        _ => Err(invalid(p, "use YYYY, YYYY-MM, YYYY-MM-DD or start:end")),
    }
}

fn ymd(y: i32, m: u32, d: u32, src: &str) -> AppResult<NaiveDate> {
    NaiveDate::from_ymd_opt(y, m, d).ok_or_else(|| invalid(src, "date out of range"))
}

fn last_day_of_month(first: NaiveDate) -> NaiveDate {
    let (y, m) = if first.month() == 12 {
        (first.year() + 1, 1)
    } else {
        (first.year(), first.month() + 1)
    };
    NaiveDate::from_ymd_opt(y, m, 1)
        .and_then(|d| d.pred_opt())
        .unwrap_or(first)
}

fn invalid(input: &str, why: &str) -> AppError {
    AppError::InvalidRange(format!("'{input}': {why}"))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn d(y: i32, m: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, day).unwrap()
    }

    #[test]
    fn single_periods() {
        assert_eq!(parse_range("2025").unwrap(), Some((d(2025, 1, 1), d(2025, 12, 31))));
        assert_eq!(parse_range("2024-02").unwrap(), Some((d(2024, 2, 1), d(2024, 2, 29))));
        assert_eq!(parse_range("2025-12").unwrap(), Some((d(2025, 12, 1), d(2025, 12, 31))));
        assert_eq!(parse_range("2025-06-18").unwrap(), Some((d(2025, 6, 18), d(2025, 6, 18))));
    }

    #[test]
    fn ranges_and_all() {
        assert_eq!(
            parse_range("2025-06:2025-08").unwrap(),
            Some((d(2025, 6, 1), d(2025, 8, 31)))
        );
        assert_eq!(parse_range("ALL").unwrap(), None);
    }

    #[test]
    fn rejects_mixed_or_reversed_ranges() {
        assert!(parse_range("2025:2025-06").is_err());
        assert!(parse_range("2025-08:2025-06").is_err());
        assert!(parse_range("2025-13").is_err());
        assert!(parse_range("yesterday").is_err());
    }
}
