use crate::core::clock::Clock;
use crate::db::log::{op, ttlog};
use crate::db::pool::DbPool;
use crate::db::queries::{
    LAST_ARCHIVE_KEY, active_before, active_by_date, count_active_before, delete_active,
    insert_archived, load_state, save_state,
};
use crate::errors::{AppError, AppResult};
use crate::models::meal_record::{ArchiveState, to_db_timestamp};
use crate::utils::date::yesterday_of;
use chrono::NaiveDate;
use rusqlite::{Connection, TransactionBehavior};
use std::collections::BTreeMap;
use tracing::{debug, info, warn};

/// Which active records a sweep moves.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SweepScope {
    /// Records dated exactly yesterday.
    Yesterday,
    /// Every record dated before today (days on which no sweep ran).
    CatchUp,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SweepReport {
    pub today: NaiveDate,
    pub scope: SweepScope,
    pub archived: usize,
    /// Active records dropped because the archive already held a meal for
    /// the same employee and date.
    pub skipped: usize,
    /// Archived records per original meal date.
    pub per_date: BTreeMap<NaiveDate, usize>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SweepOutcome {
    /// The config row already records a sweep for today; nothing moved.
    UpToDate(ArchiveState),
    Completed(SweepReport),
}

/// Daily move of active records into the archive store.
pub struct ArchiveLogic;

impl ArchiveLogic {
    /// True unless a sweep has already been recorded for `today`.
    pub fn should_archive(conn: &Connection, today: NaiveDate) -> AppResult<bool> {
        Ok(match load_state(conn, LAST_ARCHIVE_KEY)? {
            Some(state) => state.date < today,
            None => true,
        })
    }

    pub fn last_sweep(conn: &Connection) -> AppResult<Option<ArchiveState>> {
        Ok(load_state(conn, LAST_ARCHIVE_KEY)?)
    }

    /// Active records left over from previous days.
    pub fn pending(conn: &Connection, today: NaiveDate) -> AppResult<i64> {
        Ok(count_active_before(conn, &today)?)
    }

    /// Boot-time / scheduled entry point: sweep only if no sweep has been
    /// recorded for today. The check runs inside the sweep transaction, so
    /// two overlapping callers serialize and the second one is a no-op.
    pub fn sweep_if_due(pool: &mut DbPool, clock: &Clock, scope: SweepScope) -> AppResult<SweepOutcome> {
        Self::run(pool, clock, scope, true)
    }

    /// Manual sweep, regardless of the config row. Records already moved are
    /// gone from the active store, so repeating it archives nothing twice.
    pub fn sweep(pool: &mut DbPool, clock: &Clock, scope: SweepScope) -> AppResult<SweepReport> {
        match Self::run(pool, clock, scope, false)? {
            SweepOutcome::Completed(report) => Ok(report),
            SweepOutcome::UpToDate(_) => Err(AppError::Archive(
                "forced sweep reported up-to-date".into(),
            )),
        }
    }

    fn run(pool: &mut DbPool, clock: &Clock, scope: SweepScope, only_if_due: bool) -> AppResult<SweepOutcome> {
        let today = clock.today;

        let tx = pool
            .conn
            .transaction_with_behavior(TransactionBehavior::Immediate)?;

        if only_if_due
            && let Some(state) = load_state(&tx, LAST_ARCHIVE_KEY)?
            && state.date >= today
        {
            debug!(last = %state.date, "archive up to date");
            return Ok(SweepOutcome::UpToDate(state));
        }

        let records = match scope {
            SweepScope::Yesterday => active_by_date(&tx, &yesterday_of(today))?,
            SweepScope::CatchUp => active_before(&tx, &today)?,
        };

        let mut per_date: BTreeMap<NaiveDate, usize> = BTreeMap::new();
        let mut skipped = 0;

        for rec in &records {
            if insert_archived(&tx, rec, &clock.now)? {
                *per_date.entry(rec.date).or_insert(0) += 1;
            } else {
                warn!(
                    employee = %rec.employee_id,
                    date = %rec.date,
                    "archive already holds a meal for this day; active record dropped"
                );
                skipped += 1;
            }
            delete_active(&tx, rec.id)?;
        }

        let archived = records.len() - skipped;

        save_state(
            &tx,
            LAST_ARCHIVE_KEY,
            &ArchiveState {
                date: today,
                timestamp: to_db_timestamp(&clock.now),
                archived,
            },
        )?;

        let target = match scope {
            SweepScope::Yesterday => yesterday_of(today).to_string(),
            SweepScope::CatchUp => format!("before {}", today),
        };
        let message = if skipped > 0 {
            format!("Archived {} record(s), skipped {} duplicate(s)", archived, skipped)
        } else {
            format!("Archived {} record(s)", archived)
        };
        ttlog(&tx, op::ARCHIVE, &target, &message)?;

        tx.commit()?;

        info!(archived, skipped, scope = ?scope, today = %today, "archive sweep completed");

        Ok(SweepOutcome::Completed(SweepReport {
            today,
            scope,
            archived,
            skipped,
            per_date,
        }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::meals::MealLogic;
    use crate::db::queries::{archived_by_employee, count_active_before, count_archived_for_date};
    use crate::models::employee::EmployeeId;
    use crate::models::meal_type::MealType;

    fn day(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 6, d).unwrap()
    }

    fn clock(d: u32, h: u32) -> Clock {
        Clock::at(day(d).and_hms_opt(h, 0, 0).unwrap())
    }

    fn serve(pool: &mut DbPool, id: &str, d: u32) {
        let e = EmployeeId::parse(id).unwrap();
        MealLogic::provide(pool, &e, MealType::Morning, 1, 3, &clock(d, 8)).unwrap();
    }

    fn active_on(pool: &DbPool, d: u32) -> i64 {
        pool.conn
            .query_row(
                "SELECT COUNT(*) FROM active_meals WHERE date = ?1",
                [day(d).to_string()],
                |r| r.get(0),
            )
            .unwrap()
    }

    #[test]
    fn sweep_moves_yesterday_and_keeps_today() {
        let mut pool = DbPool::open_in_memory().unwrap();
        serve(&mut pool, "EMP001", 17);
        serve(&mut pool, "EMP002", 17);
        serve(&mut pool, "EMP001", 18);

        let outcome = ArchiveLogic::sweep_if_due(&mut pool, &clock(18, 0), SweepScope::Yesterday).unwrap();

        let SweepOutcome::Completed(report) = outcome else {
            panic!("sweep should have run");
        };
        assert_eq!(report.archived, 2);
        assert_eq!(report.per_date.get(&day(17)), Some(&2));
        assert_eq!(active_on(&pool, 17), 0);
        assert_eq!(active_on(&pool, 18), 1);
        assert_eq!(count_archived_for_date(&pool.conn, &day(17)).unwrap(), 2);

        let history = archived_by_employee(&pool.conn, "EMP001").unwrap();
        assert_eq!(history.len(), 1);
        assert_eq!(history[0].record.date, day(17));
    }

    #[test]
    fn second_due_sweep_same_day_is_a_no_op() {
        let mut pool = DbPool::open_in_memory().unwrap();
        serve(&mut pool, "EMP001", 17);

        let first = ArchiveLogic::sweep_if_due(&mut pool, &clock(18, 0), SweepScope::Yesterday).unwrap();
        assert!(matches!(first, SweepOutcome::Completed(ref r) if r.archived == 1));

        let second = ArchiveLogic::sweep_if_due(&mut pool, &clock(18, 9), SweepScope::Yesterday).unwrap();
        match second {
            SweepOutcome::UpToDate(state) => {
                assert_eq!(state.date, day(18));
                assert_eq!(state.archived, 1);
            }
            other => panic!("expected up-to-date, got {other:?}"),
        }
        assert_eq!(count_archived_for_date(&pool.conn, &day(17)).unwrap(), 1);
        assert!(!ArchiveLogic::should_archive(&pool.conn, day(18)).unwrap());
        assert!(ArchiveLogic::should_archive(&pool.conn, day(19)).unwrap());
    }

    #[test]
    fn forced_sweep_twice_moves_records_once() {
        let mut pool = DbPool::open_in_memory().unwrap();
        serve(&mut pool, "EMP001", 17);

        let a = ArchiveLogic::sweep(&mut pool, &clock(18, 0), SweepScope::Yesterday).unwrap();
        let b = ArchiveLogic::sweep(&mut pool, &clock(18, 0), SweepScope::Yesterday).unwrap();

        assert_eq!(a.archived, 1);
        assert_eq!(b.archived, 0);
        assert_eq!(count_archived_for_date(&pool.conn, &day(17)).unwrap(), 1);
    }

    #[test]
    fn yesterday_scope_leaves_older_records_for_catch_up() {
        let mut pool = DbPool::open_in_memory().unwrap();
        serve(&mut pool, "EMP001", 14);
        serve(&mut pool, "EMP002", 17);

        let y = ArchiveLogic::sweep(&mut pool, &clock(18, 0), SweepScope::Yesterday).unwrap();
        assert_eq!(y.archived, 1);
        assert_eq!(ArchiveLogic::pending(&pool.conn, day(18)).unwrap(), 1);

        let c = ArchiveLogic::sweep(&mut pool, &clock(18, 0), SweepScope::CatchUp).unwrap();
        assert_eq!(c.archived, 1);
        assert_eq!(c.per_date.get(&day(14)), Some(&1));
        assert_eq!(ArchiveLogic::pending(&pool.conn, day(18)).unwrap(), 0);
    }

    #[test]
    fn empty_sweep_still_records_the_day() {
        let mut pool = DbPool::open_in_memory().unwrap();

        let outcome = ArchiveLogic::sweep_if_due(&mut pool, &clock(18, 0), SweepScope::Yesterday).unwrap();
        assert!(matches!(outcome, SweepOutcome::Completed(ref r) if r.archived == 0));

        let state = ArchiveLogic::last_sweep(&pool.conn).unwrap().unwrap();
        assert_eq!(state.date, day(18));
    }

    #[test]
    fn archived_rows_carry_archived_at() {
        let mut pool = DbPool::open_in_memory().unwrap();
        serve(&mut pool, "EMP009", 17);
        let c = clock(18, 0);

        ArchiveLogic::sweep(&mut pool, &c, SweepScope::Yesterday).unwrap();

        let rows = archived_by_employee(&pool.conn, "EMP009").unwrap();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].archived_at.timestamp_millis(), c.now.timestamp_millis());
        assert!(rows[0].archived_at >= rows[0].record.timestamp);
    }

    #[test]
    fn already_archived_day_is_skipped_not_fatal() {
        let mut pool = DbPool::open_in_memory().unwrap();
        serve(&mut pool, "EMP001", 17);
        ArchiveLogic::sweep(&mut pool, &clock(18, 0), SweepScope::Yesterday).unwrap();

        // A second active row for the same day, e.g. restored from a backup.
        pool.conn
            .execute(
                "INSERT INTO active_meals (employee_id, date, meal_type, counter_id, timestamp)
                 VALUES ('EMP001', ?1, 'EVENING', 2, '2025-06-17T17:00:00.000Z')",
                [day(17).to_string()],
            )
            .unwrap();
        serve(&mut pool, "EMP002", 17);

        let report = ArchiveLogic::sweep(&mut pool, &clock(18, 1), SweepScope::Yesterday).unwrap();
        assert_eq!(report.archived, 1);
        assert_eq!(report.skipped, 1);
        assert_eq!(count_active_before(&pool.conn, &day(18)).unwrap(), 0);
        assert_eq!(count_archived_for_date(&pool.conn, &day(17)).unwrap(), 2);

        let kept = archived_by_employee(&pool.conn, "EMP001").unwrap();
        assert_eq!(kept.len(), 1);
        assert_eq!(kept[0].record.meal_type, MealType::Morning);

        let next = ArchiveLogic::sweep_if_due(&mut pool, &clock(19, 0), SweepScope::Yesterday).unwrap();
        assert!(matches!(next, SweepOutcome::Completed(_)));
    }
}
