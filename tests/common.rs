#![allow(dead_code)]
use assert_cmd::{Command, cargo_bin_cmd};
use chrono::{Local, NaiveDate};
use mealcounter::core::clock::Clock;
use mealcounter::core::meals::MealLogic;
use mealcounter::db::pool::DbPool;
use mealcounter::models::employee::EmployeeId;
use mealcounter::models::meal_type::MealType;
use std::env;
use std::fs;
use std::path::PathBuf;

pub fn mc() -> Command {
    cargo_bin_cmd!("mealcounter")
}

/// Create a unique test DB path inside the system temp dir and remove any existing file
pub fn setup_test_db(name: &str) -> String {
    let mut path: PathBuf = env::temp_dir();
    path.push(format!("{}_mealcounter.sqlite", name));
    let db_path = path.to_string_lossy().to_string();
    fs::remove_file(&db_path).ok();
    db_path
}

/// Create a temporary output file path inside tempdir and ensure it's removed
pub fn temp_out(name: &str, ext: &str) -> String {
    let mut path: PathBuf = env::temp_dir();
    path.push(format!("{}_out.{}", name, ext));
    let p = path.to_string_lossy().to_string();
    fs::remove_file(&p).ok();
    p
}

/// Fresh database created through `init` in test mode.
pub fn init_db(name: &str) -> String {
    let db_path = setup_test_db(name);
    mc().args(["--db", &db_path, "--test", "init"])
        .assert()
        .success();
    db_path
}

pub fn yesterday() -> NaiveDate {
    Local::now().date_naive().pred_opt().expect("valid date")
}

pub fn days_ago(n: u64) -> NaiveDate {
    Local::now()
        .date_naive()
        .checked_sub_days(chrono::Days::new(n))
        .expect("valid date")
}

/// Insert a meal dated yesterday through the library API, as if it had been
/// served the day before and never swept.
pub fn seed_yesterday(db_path: &str, employee: &str, meal: MealType, counter: u32) {
    seed_on(db_path, employee, yesterday(), meal, counter);
}

/// Insert a meal served at noon on `date`, bypassing the boot-time sweep.
pub fn seed_on(db_path: &str, employee: &str, date: NaiveDate, meal: MealType, counter: u32) {
    let mut pool = DbPool::new(db_path).expect("open db");
    let clock = Clock::at(date.and_hms_opt(12, 0, 0).expect("valid time"));
    MealLogic::provide(
        &mut pool,
        &EmployeeId::parse(employee).expect("valid id"),
        meal,
        counter,
        3,
        &clock,
    )
    .expect("seed meal");
}

pub fn count(db_path: &str, table: &str) -> i64 {
    let pool = DbPool::new(db_path).expect("open db");
    pool.conn
        .query_row(&format!("SELECT COUNT(*) FROM {table}"), [], |r| r.get(0))
        .expect("count rows")
}
