use crate::errors::AppError;
use crate::models::meal_record::{
    ArchiveState, ArchivedMeal, MealRecord, from_db_timestamp, to_db_timestamp,
};
use crate::models::meal_type::MealType;
use chrono::{DateTime, NaiveDate, Utc};
use rusqlite::{Connection, OptionalExtension, Result, Row, params};

/// `app_state` key written by the archive sweep.
pub const LAST_ARCHIVE_KEY: &str = "last_archive";
/// `app_state` key written by the automatic export.
pub const LAST_EXPORT_KEY: &str = "last_export";

const ACTIVE_COLUMNS: &str = "id, employee_id, date, meal_type, counter_id, timestamp";
const ARCHIVED_COLUMNS: &str =
    "id, employee_id, date, meal_type, counter_id, timestamp, archived_at";

fn conversion_error(err: AppError) -> rusqlite::Error {
    rusqlite::Error::FromSqlConversionFailure(0, rusqlite::types::Type::Text, Box::new(err))
}

fn parse_date(s: &str) -> Result<NaiveDate> {
    crate::utils::date::parse_date(s)
        .ok_or_else(|| conversion_error(AppError::InvalidDate(s.to_string())))
}

fn parse_timestamp(s: &str) -> Result<DateTime<Utc>> {
    from_db_timestamp(s).ok_or_else(|| conversion_error(AppError::InvalidTime(s.to_string())))
}

pub fn map_active_row(row: &Row) -> Result<MealRecord> {
    let date_str: String = row.get("date")?;
    let ts_str: String = row.get("timestamp")?;
    let meal_str: String = row.get("meal_type")?;

    let meal_type = MealType::from_db_str(&meal_str)
        .ok_or_else(|| conversion_error(AppError::InvalidMealType(meal_str.clone())))?;

    Ok(MealRecord {
        id: row.get("id")?,
        employee_id: row.get("employee_id")?,
        date: parse_date(&date_str)?,
        meal_type,
        counter_id: row.get("counter_id")?,
        timestamp: parse_timestamp(&ts_str)?,
    })
}

pub fn map_archived_row(row: &Row) -> Result<ArchivedMeal> {
    let archived_str: String = row.get("archived_at")?;
    Ok(ArchivedMeal {
        record: map_active_row(row)?,
        archived_at: parse_timestamp(&archived_str)?,
    })
}

// ---------------------------------------------------------------------------
// Active store
// ---------------------------------------------------------------------------

pub fn find_active(conn: &Connection, employee_id: &str, date: &NaiveDate) -> Result<Option<MealRecord>> {
    let sql = format!(
        "SELECT {ACTIVE_COLUMNS} FROM active_meals
         WHERE employee_id = ?1 AND date = ?2
         ORDER BY timestamp ASC
         LIMIT 1"
    );
    conn.query_row(&sql, params![employee_id, date.to_string()], map_active_row)
        .optional()
}

pub fn insert_active(conn: &Connection, rec: &MealRecord) -> Result<i64> {
    conn.execute(
        "INSERT INTO active_meals (employee_id, date, meal_type, counter_id, timestamp)
         VALUES (?1, ?2, ?3, ?4, ?5)",
        params![
            rec.employee_id,
            rec.date_str(),
            rec.meal_type.to_db_str(),
            rec.counter_id,
            to_db_timestamp(&rec.timestamp),
        ],
    )?;
    Ok(conn.last_insert_rowid())
}

/// Active records for one date, newest first.
pub fn active_by_date(conn: &Connection, date: &NaiveDate) -> Result<Vec<MealRecord>> {
    let sql = format!(
        "SELECT {ACTIVE_COLUMNS} FROM active_meals
         WHERE date = ?1
         ORDER BY timestamp DESC"
    );
    let mut stmt = conn.prepare(&sql)?;
    let rows = stmt.query_map([date.to_string()], map_active_row)?;
    rows.collect()
}

/// Active records dated strictly before `date`, oldest first.
pub fn active_before(conn: &Connection, date: &NaiveDate) -> Result<Vec<MealRecord>> {
    let sql = format!(
        "SELECT {ACTIVE_COLUMNS} FROM active_meals
         WHERE date < ?1
         ORDER BY date ASC, timestamp ASC"
    );
    let mut stmt = conn.prepare(&sql)?;
    let rows = stmt.query_map([date.to_string()], map_active_row)?;
    rows.collect()
}

pub fn count_active_before(conn: &Connection, date: &NaiveDate) -> Result<i64> {
    conn.query_row(
        "SELECT COUNT(*) FROM active_meals WHERE date < ?1",
        [date.to_string()],
        |row| row.get(0),
    )
}

pub fn delete_active(conn: &Connection, id: i64) -> Result<usize> {
    conn.execute("DELETE FROM active_meals WHERE id = ?1", [id])
}

// ---------------------------------------------------------------------------
// Archive store
// ---------------------------------------------------------------------------

/// Copy one record into the archive. Returns false when the archive already
/// holds a meal for the same employee and date; that row is left untouched.
pub fn insert_archived(conn: &Connection, rec: &MealRecord, archived_at: &DateTime<Utc>) -> Result<bool> {
    let inserted = conn.execute(
        "INSERT INTO archived_meals
            (employee_id, date, meal_type, counter_id, timestamp, archived_at)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6)
         ON CONFLICT(employee_id, date) DO NOTHING",
        params![
            rec.employee_id,
            rec.date_str(),
            rec.meal_type.to_db_str(),
            rec.counter_id,
            to_db_timestamp(&rec.timestamp),
            to_db_timestamp(archived_at),
        ],
    )?;
    Ok(inserted > 0)
}

/// Archive records of one employee, newest first.
pub fn archived_by_employee(conn: &Connection, employee_id: &str) -> Result<Vec<ArchivedMeal>> {
    let sql = format!(
        "SELECT {ARCHIVED_COLUMNS} FROM archived_meals
         WHERE employee_id = ?1
         ORDER BY timestamp DESC"
    );
    let mut stmt = conn.prepare(&sql)?;
    let rows = stmt.query_map([employee_id], map_archived_row)?;
    rows.collect()
}

/// Archive records inside the inclusive date bounds (or all), oldest first.
pub fn archived_in_range(
    conn: &Connection,
    bounds: Option<(NaiveDate, NaiveDate)>,
) -> Result<Vec<ArchivedMeal>> {
    match bounds {
        None => {
            let sql = format!(
                "SELECT {ARCHIVED_COLUMNS} FROM archived_meals
                 ORDER BY date ASC, timestamp ASC"
            );
            let mut stmt = conn.prepare(&sql)?;
            let rows = stmt.query_map([], map_archived_row)?;
            rows.collect()
        }
        Some((start, end)) => {
            let sql = format!(
                "SELECT {ARCHIVED_COLUMNS} FROM archived_meals
                 WHERE date BETWEEN ?1 AND ?2
                 ORDER BY date ASC, timestamp ASC"
            );
            let mut stmt = conn.prepare(&sql)?;
            let rows =
                stmt.query_map(params![start.to_string(), end.to_string()], map_archived_row)?;
            rows.collect()
        }
    }
}

pub fn count_archived_for_date(conn: &Connection, date: &NaiveDate) -> Result<i64> {
    conn.query_row(
        "SELECT COUNT(*) FROM archived_meals WHERE date = ?1",
        [date.to_string()],
        |row| row.get(0),
    )
}

// ---------------------------------------------------------------------------
// app_state
// ---------------------------------------------------------------------------

pub fn load_state(conn: &Connection, key: &str) -> Result<Option<ArchiveState>> {
    conn.query_row(
        "SELECT date, count, updated_at FROM app_state WHERE key = ?1",
        [key],
        |row| {
            let date_str: String = row.get(0)?;
            let count: i64 = row.get(1)?;
            Ok(ArchiveState {
                date: parse_date(&date_str)?,
                archived: count.max(0) as usize,
                timestamp: row.get(2)?,
            })
        },
    )
    .optional()
}

pub fn save_state(conn: &Connection, key: &str, state: &ArchiveState) -> Result<()> {
    conn.execute(
        "INSERT INTO app_state (key, date, count, updated_at)
         VALUES (?1, ?2, ?3, ?4)
         ON CONFLICT(key) DO UPDATE SET
            date = excluded.date,
            count = excluded.count,
            updated_at = excluded.updated_at",
        params![
            key,
            state.date.to_string(),
            state.archived as i64,
            state.timestamp,
        ],
    )?;
    Ok(())
}
