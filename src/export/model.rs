// src/export/model.rs

use crate::models::meal_record::{ArchivedMeal, MealRecord, to_db_timestamp};
use serde::Serialize;

/// Flat row shared by the CSV and JSON writers.
#[derive(Serialize, Clone, Debug, PartialEq, Eq)]
pub struct MealExport {
    pub employee_id: String,
    pub date: String,
    pub meal_type: String,
    pub counter_id: u32,
    pub timestamp: String,
    /// Empty for records still in the active store.
    pub archived_at: Option<String>,
}

impl From<&MealRecord> for MealExport {
    fn from(r: &MealRecord) -> Self {
        Self {
            employee_id: r.employee_id.clone(),
            date: r.date_str(),
            meal_type: r.meal_type.to_db_str().to_string(),
            counter_id: r.counter_id,
            timestamp: to_db_timestamp(&r.timestamp),
            archived_at: None,
        }
    }
}

impl From<&ArchivedMeal> for MealExport {
    fn from(a: &ArchivedMeal) -> Self {
        Self {
            archived_at: Some(to_db_timestamp(&a.archived_at)),
            ..MealExport::from(&a.record)
        }
    }
}
