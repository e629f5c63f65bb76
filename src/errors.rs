//! Unified application error type.
//! All modules (db, core, cli, export) return AppError so that every failure
//! reaches the user as a single readable message.

use crate::models::meal_type::MealType;
use std::io;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum AppError {
    // ---------------------------
    // IO
    // ---------------------------
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    // ---------------------------
    // Database-related
    // ---------------------------
    #[error("Database error: {0}")]
    Db(#[from] rusqlite::Error),

    // ---------------------------
    // Validation
    // ---------------------------
    #[error("Invalid employee ID: {0}")]
    InvalidEmployeeId(String),

    #[error("Invalid meal type: {0}")]
    InvalidMealType(String),

    #[error("Invalid counter: {0}")]
    InvalidCounter(String),

    #[error("Invalid date format: {0}")]
    InvalidDate(String),

    #[error("Invalid time format: {0}")]
    InvalidTime(String),

    #[error("Invalid range: {0}")]
    InvalidRange(String),

    // ---------------------------
    // Record lifecycle
    // ---------------------------
    #[error("Employee {employee} already received a {meal_type} meal today (counter {counter})")]
    DuplicateMeal {
        employee: String,
        meal_type: MealType,
        counter: u32,
    },

    #[error("Archive failed: {0}")]
    Archive(String),

    // ---------------------------
    // Config errors
    // ---------------------------
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Failed to load configuration: {0}")]
    ConfigLoad(String),

    #[error("Failed to save configuration: {0}")]
    ConfigSave(String),

    // ---------------------------
    // Export errors
    // ---------------------------
    #[error("Export error: {0}")]
    Export(String),
}

pub type AppResult<T> = Result<T, AppError>;
