use crate::db::migrate::{current_version, latest_version};
use crate::db::pool::DbPool;
use crate::db::queries::{LAST_ARCHIVE_KEY, load_state};
use crate::utils::colors::{CYAN, GREEN, GREY, RESET, YELLOW};
use rusqlite::OptionalExtension;
use std::fs;

pub fn print_db_info(pool: &mut DbPool, db_path: &str) -> rusqlite::Result<()> {
    println!();

    //
    // 1) FILE SIZE + SCHEMA
    //
    let file_size = fs::metadata(db_path).map(|m| m.len()).unwrap_or(0);
    let file_mb = (file_size as f64) / (1024.0 * 1024.0);

    println!("{}• File:{} {}{}{}", CYAN, RESET, YELLOW, db_path, RESET);
    println!("{}• Size:{} {:.2} MB", CYAN, RESET, file_mb);
    println!(
        "{}• Schema:{} v{} (latest v{})",
        CYAN,
        RESET,
        current_version(&pool.conn)?,
        latest_version()
    );

    //
    // 2) RECORD COUNTS
    //
    let active: i64 = pool
        .conn
        .query_row("SELECT COUNT(*) FROM active_meals", [], |row| row.get(0))?;
    let archived: i64 = pool
        .conn
        .query_row("SELECT COUNT(*) FROM archived_meals", [], |row| row.get(0))?;

    println!("{}• Active meals:{} {}{}{}", CYAN, RESET, GREEN, active, RESET);
    println!(
        "{}• Archived meals:{} {}{}{}",
        CYAN, RESET, GREEN, archived, RESET
    );

    //
    // 3) ARCHIVE DATE RANGE
    //
    let first_date: Option<String> = pool
        .conn
        .query_row(
            "SELECT date FROM archived_meals ORDER BY date ASC LIMIT 1",
            [],
            |row| row.get(0),
        )
        .optional()?;
    let last_date: Option<String> = pool
        .conn
        .query_row(
            "SELECT date FROM archived_meals ORDER BY date DESC LIMIT 1",
            [],
            |row| row.get(0),
        )
        .optional()?;

    let grey_dash = || format!("{GREY}--{RESET}");

    println!("{}• Archive range:{}", CYAN, RESET);
    println!("    from: {}", first_date.unwrap_or_else(grey_dash));
    println!("    to:   {}", last_date.unwrap_or_else(grey_dash));

    //
    // 4) LAST SWEEP
    //
    match load_state(&pool.conn, LAST_ARCHIVE_KEY)? {
        Some(state) => println!(
            "{}• Last sweep:{} {} ({} records, at {})",
            CYAN, RESET, state.date, state.archived, state.timestamp
        ),
        None => println!("{}• Last sweep:{} {}", CYAN, RESET, grey_dash()),
    }

    println!();
    Ok(())
}
