use crate::db::queries::archived_by_employee;
use crate::errors::AppResult;
use crate::models::employee::EmployeeId;
use crate::models::meal_record::ArchivedMeal;
use rusqlite::Connection;

pub struct HistoryLogic;

impl HistoryLogic {
    /// Archived meals of `employee`, newest first. An employee without
    /// history yields an empty list.
    pub fn lookup(conn: &Connection, employee: &EmployeeId) -> AppResult<Vec<ArchivedMeal>> {
        Ok(archived_by_employee(conn, employee.as_str())?)
    }
}
