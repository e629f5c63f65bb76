use chrono::NaiveDate;

pub fn yesterday_of(d: NaiveDate) -> NaiveDate {
    d.pred_opt().unwrap_or(d)
}

pub fn parse_date(s: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(s.trim(), "%Y-%m-%d").ok()
}

pub fn month_name(m: &str) -> &'static str {
    match m {
        "01" => "January",
        "02" => "February",
        "03" => "March",
        "04" => "April",
        "05" => "May",
        "06" => "June",
        "07" => "July",
        "08" => "August",
        "09" => "September",
        "10" => "October",
        "11" => "November",
        "12" => "December",
        _ => "Unknown",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn yesterday_crosses_month_and_year() {
        let d = NaiveDate::from_ymd_opt(2025, 1, 1).unwrap();
        assert_eq!(yesterday_of(d), NaiveDate::from_ymd_opt(2024, 12, 31).unwrap());

        let d = NaiveDate::from_ymd_opt(2024, 3, 1).unwrap();
        assert_eq!(yesterday_of(d), NaiveDate::from_ymd_opt(2024, 2, 29).unwrap());
    }

    #[test]
    fn parse_date_accepts_iso_only() {
        assert!(parse_date("2025-06-18").is_some());
        assert!(parse_date(" 2025-06-18 ").is_some());
        assert!(parse_date("18/06/2025").is_none());
    }
}
