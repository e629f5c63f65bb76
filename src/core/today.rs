use crate::db::queries::active_by_date;
use crate::errors::AppResult;
use crate::models::meal_record::MealRecord;
use crate::models::meal_type::MealType;
use chrono::NaiveDate;
use rusqlite::Connection;
use std::collections::BTreeMap;

/// Today's served meals plus the counts shown under the list.
#[derive(Debug, Default)]
pub struct TodaySummary {
    pub meals: Vec<MealRecord>,
    pub per_meal: BTreeMap<MealType, usize>,
    pub per_counter: BTreeMap<u32, usize>,
}

impl TodaySummary {
    pub fn total(&self) -> usize {
        self.meals.len()
    }
}

pub struct TodayLogic;

impl TodayLogic {
    /// Active records dated `today`, newest first.
    pub fn load(conn: &Connection, today: NaiveDate) -> AppResult<TodaySummary> {
        let meals = active_by_date(conn, &today)?;

        let mut per_meal = BTreeMap::new();
        let mut per_counter = BTreeMap::new();
        for m in &meals {
            *per_meal.entry(m.meal_type).or_insert(0) += 1;
            *per_counter.entry(m.counter_id).or_insert(0) += 1;
        }

        Ok(TodaySummary {
            meals,
            per_meal,
            per_counter,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::clock::Clock;
    use crate::core::meals::MealLogic;
    use crate::db::pool::DbPool;
    use crate::models::employee::EmployeeId;

    #[test]
    fn summary_counts_by_meal_and_counter() {
        let mut pool = DbPool::open_in_memory().unwrap();
        let date = NaiveDate::from_ymd_opt(2025, 6, 18).unwrap();

        let entries = [
            ("A1", MealType::Morning, 1, 8),
            ("A2", MealType::Evening, 2, 18),
            ("A3", MealType::Evening, 2, 19),
        ];
        for (id, meal, counter, hour) in entries {
            let clock = Clock::at(date.and_hms_opt(hour, 0, 0).unwrap());
            MealLogic::provide(&mut pool, &EmployeeId::parse(id).unwrap(), meal, counter, 3, &clock)
                .unwrap();
        }

        let s = TodayLogic::load(&pool.conn, date).unwrap();

        assert_eq!(s.total(), 3);
        assert_eq!(s.meals[0].employee_id, "A3");
        assert_eq!(s.per_meal.get(&MealType::Evening), Some(&2));
        assert_eq!(s.per_counter.get(&1), Some(&1));
        assert_eq!(s.per_counter.get(&2), Some(&2));
    }
}
