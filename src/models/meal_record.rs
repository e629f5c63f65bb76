use super::{employee::EmployeeId, meal_type::MealType};
use chrono::{DateTime, Local, NaiveDate, SecondsFormat, Utc};
use serde::Serialize;

/// One served meal in the active store.
#[derive(Debug, Clone, Serialize)]
pub struct MealRecord {
    pub id: i64,
    pub employee_id: String, // ⇔ active_meals.employee_id
    pub date: NaiveDate,     // ⇔ active_meals.date (TEXT "YYYY-MM-DD")
    pub meal_type: MealType, // ⇔ active_meals.meal_type ('MORNING' | 'EVENING')
    pub counter_id: u32,     // ⇔ active_meals.counter_id
    pub timestamp: DateTime<Utc>, // ⇔ active_meals.timestamp (TEXT, RFC 3339 UTC)
}

impl MealRecord {
    /// Build a not-yet-stored record (`id = 0`) for `date`, stamped with `at`.
    pub fn new(
        employee: &EmployeeId,
        date: NaiveDate,
        meal_type: MealType,
        counter_id: u32,
        at: DateTime<Utc>,
    ) -> Self {
        Self {
            id: 0,
            employee_id: employee.as_str().to_string(),
            date,
            meal_type,
            counter_id,
            timestamp: at,
        }
    }

    pub fn date_str(&self) -> String {
        self.date.format("%Y-%m-%d").to_string()
    }

    pub fn local_time_str(&self) -> String {
        self.timestamp
            .with_timezone(&Local)
            .format("%H:%M:%S")
            .to_string()
    }
}

/// A meal moved to the archive store by the daily sweep.
#[derive(Debug, Clone, Serialize)]
pub struct ArchivedMeal {
    #[serde(flatten)]
    pub record: MealRecord,
    pub archived_at: DateTime<Utc>,
}

/// Content of the `last_archive` row in `app_state`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArchiveState {
    pub date: NaiveDate,
    pub timestamp: String,
    pub archived: usize,
}

/// Timestamps are always persisted as RFC 3339 UTC so that text ordering
/// matches chronological ordering.
pub fn to_db_timestamp(at: &DateTime<Utc>) -> String {
    at.to_rfc3339_opts(SecondsFormat::Millis, true)
}

pub fn from_db_timestamp(s: &str) -> Option<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(s)
        .ok()
        .map(|dt| dt.with_timezone(&Utc))
}
