use crate::ui::messages::success;
use rusqlite::{Connection, OptionalExtension, Result};

/// Ensure that the `log` table exists; migrations record themselves in it.
fn ensure_log_table(conn: &Connection) -> Result<()> {
    conn.execute_batch(
        r#"
        CREATE TABLE IF NOT EXISTS log (
            id        INTEGER PRIMARY KEY AUTOINCREMENT,
            date      TEXT NOT NULL,
            operation TEXT NOT NULL,
            target    TEXT DEFAULT '',
            message   TEXT NOT NULL
        );
        "#,
    )
}

/// Active store, archive store and the key/value state table.
const INITIAL_SCHEMA: &str = r#"
    CREATE TABLE IF NOT EXISTS active_meals (
        id           INTEGER PRIMARY KEY AUTOINCREMENT,
        employee_id  TEXT NOT NULL,
        date         TEXT NOT NULL,
        meal_type    TEXT NOT NULL CHECK(meal_type IN ('MORNING','EVENING')),
        counter_id   INTEGER NOT NULL CHECK(counter_id > 0),
        timestamp    TEXT NOT NULL
    );

    CREATE TABLE IF NOT EXISTS archived_meals (
        id           INTEGER PRIMARY KEY AUTOINCREMENT,
        employee_id  TEXT NOT NULL,
        date         TEXT NOT NULL,
        meal_type    TEXT NOT NULL CHECK(meal_type IN ('MORNING','EVENING')),
        counter_id   INTEGER NOT NULL CHECK(counter_id > 0),
        timestamp    TEXT NOT NULL,
        archived_at  TEXT NOT NULL
    );

    CREATE TABLE IF NOT EXISTS app_state (
        key          TEXT PRIMARY KEY,
        date         TEXT NOT NULL,
        count        INTEGER NOT NULL DEFAULT 0,
        updated_at   TEXT NOT NULL
    );

    CREATE INDEX IF NOT EXISTS idx_active_date ON active_meals(date);
    CREATE INDEX IF NOT EXISTS idx_archived_employee_ts ON archived_meals(employee_id, timestamp);
    CREATE INDEX IF NOT EXISTS idx_archived_date ON archived_meals(date);
"#;

/// One meal per employee per day, in both stores.
const UNIQUE_DAILY_MEAL: &str = r#"
    CREATE UNIQUE INDEX IF NOT EXISTS uq_active_employee_date
        ON active_meals(employee_id, date);
    CREATE UNIQUE INDEX IF NOT EXISTS uq_archived_employee_date
        ON archived_meals(employee_id, date);
"#;

/// Ordered list of schema migrations; position + 1 is the `user_version`
/// reached once the step is applied.
const MIGRATIONS: &[(&str, &str, &str)] = &[
    (
        "20250301_0001_initial_schema",
        INITIAL_SCHEMA,
        "Created active_meals, archived_meals and app_state",
    ),
    (
        "20250318_0002_unique_daily_meal",
        UNIQUE_DAILY_MEAL,
        "Enforced one meal per employee per day",
    ),
];

fn user_version(conn: &Connection) -> Result<i64> {
    conn.pragma_query_value(None, "user_version", |row| row.get(0))
}

fn already_logged(conn: &Connection, version: &str) -> Result<bool> {
    let mut chk = conn.prepare(
        "SELECT 1 FROM log
         WHERE operation = 'migration_applied' AND target = ?1
         LIMIT 1",
    )?;
    Ok(chk.query_row([version], |_| Ok(())).optional()?.is_some())
}

/// Public entry point: run all pending migrations.
///
/// Invoked every time a `DbPool` is opened; a no-op on an up-to-date file.
pub fn run_pending_migrations(conn: &Connection) -> Result<()> {
    ensure_log_table(conn)?;

    let current = user_version(conn)?;

    for (idx, (version, sql, message)) in MIGRATIONS.iter().enumerate() {
        let target = idx as i64 + 1;
        if target <= current {
            continue;
        }

        let tx = conn.unchecked_transaction()?;
        tx.execute_batch(sql)?;

        if !already_logged(&tx, version)? {
            tx.execute(
                "INSERT INTO log (date, operation, target, message)
                 VALUES (datetime('now'), 'migration_applied', ?1, ?2)",
                [*version, *message],
            )?;
        }

        tx.pragma_update(None, "user_version", target)?;
        tx.commit()?;

        success(format!("Migration applied: {} → {}", version, message));
    }

    Ok(())
}

/// Latest schema version known to this binary.
pub fn latest_version() -> i64 {
    MIGRATIONS.len() as i64
}

pub fn current_version(conn: &Connection) -> Result<i64> {
    user_version(conn)
}
