use chrono::{DateTime, Local, NaiveDate, NaiveDateTime, TimeZone, Utc};

/// "Now", captured once per command so that the eligibility date, the
/// record timestamp and the sweep boundary all agree.
#[derive(Debug, Clone, Copy)]
pub struct Clock {
    /// Local calendar date.
    pub today: NaiveDate,
    /// Local wall-clock time.
    pub local: NaiveDateTime,
    /// Same instant, for persisted timestamps.
    pub now: DateTime<Utc>,
}

impl Clock {
    pub fn system() -> Self {
        let local = Local::now();
        Self {
            today: local.date_naive(),
            local: local.naive_local(),
            now: local.with_timezone(&Utc),
        }
    }

    /// Clock frozen at a local wall-clock time.
    pub fn at(local: NaiveDateTime) -> Self {
        let now = Local
            .from_local_datetime(&local)
            .earliest()
            .map(|dt| dt.with_timezone(&Utc))
            .unwrap_or_else(|| local.and_utc());
        Self {
            today: local.date(),
            local,
            now,
        }
    }
}
