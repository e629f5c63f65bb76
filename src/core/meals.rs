use crate::core::clock::Clock;
use crate::db::log::{op, ttlog};
use crate::db::pool::DbPool;
use crate::db::queries::{find_active, insert_active};
use crate::errors::{AppError, AppResult};
use crate::models::employee::EmployeeId;
use crate::models::meal_record::MealRecord;
use crate::models::meal_type::MealType;
use chrono::{DateTime, NaiveTime, Utc};
use rusqlite::{Connection, ErrorCode, TransactionBehavior};
use tracing::{debug, info};

/// Answer of the eligibility check.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Eligibility {
    Eligible,
    AlreadyServed {
        meal_type: MealType,
        counter_id: u32,
        timestamp: DateTime<Utc>,
    },
}

/// Eligibility check and meal registration against the active store.
pub struct MealLogic;

impl MealLogic {
    /// Has `employee` already been served on `clock.today`? Read-only.
    pub fn check(conn: &Connection, employee: &EmployeeId, clock: &Clock) -> AppResult<Eligibility> {
        debug!(employee = %employee, date = %clock.today, "eligibility check");

        Ok(match find_active(conn, employee.as_str(), &clock.today)? {
            Some(rec) => Eligibility::AlreadyServed {
                meal_type: rec.meal_type,
                counter_id: rec.counter_id,
                timestamp: rec.timestamp,
            },
            None => Eligibility::Eligible,
        })
    }

    /// Register one meal for `employee` today.
    ///
    /// The check and the insert share one immediate transaction, and the
    /// `(employee_id, date)` unique index rejects whatever still slips
    /// through, so a second meal on the same day is always a
    /// `DuplicateMeal` error and never a second row.
    pub fn provide(
        pool: &mut DbPool,
        employee: &EmployeeId,
        meal_type: MealType,
        counter_id: u32,
        max_counters: u32,
        clock: &Clock,
    ) -> AppResult<MealRecord> {
        validate_counter(counter_id, max_counters)?;

        let tx = pool
            .conn
            .transaction_with_behavior(TransactionBehavior::Immediate)?;

        if let Eligibility::AlreadyServed {
            meal_type: served,
            counter_id: counter,
            ..
        } = Self::check(&tx, employee, clock)?
        {
            return Err(duplicate(employee, served, counter));
        }

        let mut rec = MealRecord::new(employee, clock.today, meal_type, counter_id, clock.now);

        match insert_active(&tx, &rec) {
            Ok(id) => rec.id = id,
            Err(e) if is_unique_violation(&e) => {
                let existing = find_active(&tx, employee.as_str(), &clock.today)?;
                return Err(match existing {
                    Some(prev) => duplicate(employee, prev.meal_type, prev.counter_id),
                    None => AppError::Db(e),
                });
            }
            Err(e) => return Err(e.into()),
        }

        ttlog(
            &tx,
            op::PROVIDE,
            employee.as_str(),
            &format!("{} meal at counter {}", meal_type, counter_id),
        )?;

        tx.commit()?;

        info!(employee = %employee, meal = %meal_type, counter = counter_id, "meal registered");
        Ok(rec)
    }
}

fn duplicate(employee: &EmployeeId, meal_type: MealType, counter: u32) -> AppError {
    AppError::DuplicateMeal {
        employee: employee.to_string(),
        meal_type,
        counter,
    }
}

fn is_unique_violation(e: &rusqlite::Error) -> bool {
    matches!(e, rusqlite::Error::SqliteFailure(f, _) if f.code == ErrorCode::ConstraintViolation)
}

pub fn validate_counter(counter_id: u32, max_counters: u32) -> AppResult<()> {
    if counter_id == 0 || counter_id > max_counters {
        return Err(AppError::InvalidCounter(format!(
            "{} (valid counters: 1-{})",
            counter_id, max_counters
        )));
    }
    Ok(())
}

/// Meal type to use when the operator did not pick one: MORNING before
/// `cutover`, EVENING from `cutover` on.
pub fn resolve_meal_type(explicit: Option<MealType>, now: NaiveTime, cutover: NaiveTime) -> MealType {
    explicit.unwrap_or(if now < cutover {
        MealType::Morning
    } else {
        MealType::Evening
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn clock(y: i32, m: u32, d: u32, h: u32) -> Clock {
        Clock::at(
            NaiveDate::from_ymd_opt(y, m, d)
                .unwrap()
                .and_hms_opt(h, 0, 0)
                .unwrap(),
        )
    }

    fn emp(id: &str) -> EmployeeId {
        EmployeeId::parse(id).unwrap()
    }

    fn active_count(pool: &DbPool) -> i64 {
        pool.conn
            .query_row("SELECT COUNT(*) FROM active_meals", [], |r| r.get(0))
            .unwrap()
    }

    #[test]
    fn fresh_employee_is_eligible() {
        let pool = DbPool::open_in_memory().unwrap();
        let e = MealLogic::check(&pool.conn, &emp("EMP001"), &clock(2025, 6, 18, 8)).unwrap();
        assert_eq!(e, Eligibility::Eligible);
    }

    #[test]
    fn second_meal_same_day_cites_first_one() {
        let mut pool = DbPool::open_in_memory().unwrap();
        let c = clock(2025, 6, 18, 8);

        MealLogic::provide(&mut pool, &emp("EMP001"), MealType::Morning, 1, 3, &c).unwrap();
        let err = MealLogic::provide(&mut pool, &emp("EMP001"), MealType::Evening, 2, 3, &c)
            .unwrap_err();

        match err {
            AppError::DuplicateMeal {
                employee,
                meal_type,
                counter,
            } => {
                assert_eq!(employee, "EMP001");
                assert_eq!(meal_type, MealType::Morning);
                assert_eq!(counter, 1);
            }
            other => panic!("unexpected error: {other}"),
        }
        assert_eq!(active_count(&pool), 1);
    }

    #[test]
    fn check_reports_existing_meal() {
        let mut pool = DbPool::open_in_memory().unwrap();
        let c = clock(2025, 6, 18, 19);

        MealLogic::provide(&mut pool, &emp("EMP002"), MealType::Evening, 3, 3, &c).unwrap();

        match MealLogic::check(&pool.conn, &emp("EMP002"), &c).unwrap() {
            Eligibility::AlreadyServed {
                meal_type,
                counter_id,
                ..
            } => {
                assert_eq!(meal_type, MealType::Evening);
                assert_eq!(counter_id, 3);
            }
            Eligibility::Eligible => panic!("EMP002 was already served"),
        }
    }

    #[test]
    fn next_day_is_eligible_again() {
        let mut pool = DbPool::open_in_memory().unwrap();

        MealLogic::provide(&mut pool, &emp("EMP003"), MealType::Morning, 1, 3, &clock(2025, 6, 18, 8))
            .unwrap();
        let next = MealLogic::check(&pool.conn, &emp("EMP003"), &clock(2025, 6, 19, 8)).unwrap();

        assert_eq!(next, Eligibility::Eligible);
    }

    #[test]
    fn unique_index_rejects_bypassed_check() {
        let mut pool = DbPool::open_in_memory().unwrap();
        let c = clock(2025, 6, 18, 8);
        let rec = MealRecord::new(&emp("EMP004"), c.today, MealType::Morning, 1, c.now);

        insert_active(&pool.conn, &rec).unwrap();
        let err = insert_active(&pool.conn, &rec).unwrap_err();
        assert!(is_unique_violation(&err));

        let again = MealLogic::provide(&mut pool, &emp("EMP004"), MealType::Morning, 1, 3, &c);
        assert!(matches!(again, Err(AppError::DuplicateMeal { .. })));
    }

    #[test]
    fn counter_out_of_range_is_rejected_without_write() {
        let mut pool = DbPool::open_in_memory().unwrap();
        let c = clock(2025, 6, 18, 8);

        let err = MealLogic::provide(&mut pool, &emp("EMP005"), MealType::Morning, 4, 3, &c);
        assert!(matches!(err, Err(AppError::InvalidCounter(_))));
        assert!(validate_counter(0, 3).is_err());
        assert_eq!(active_count(&pool), 0);
    }

    #[test]
    fn meal_type_follows_cutover_when_not_given() {
        let cutover = NaiveTime::from_hms_opt(14, 0, 0).unwrap();
        let morning = NaiveTime::from_hms_opt(13, 59, 0).unwrap();

        assert_eq!(resolve_meal_type(None, morning, cutover), MealType::Morning);
        assert_eq!(resolve_meal_type(None, cutover, cutover), MealType::Evening);
        assert_eq!(
            resolve_meal_type(Some(MealType::Morning), cutover, cutover),
            MealType::Morning
        );
    }
}
