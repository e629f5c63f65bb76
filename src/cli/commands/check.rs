use crate::cli::parser::Commands;
use crate::config::Config;
use crate::core::clock::Clock;
use crate::core::meals::{Eligibility, MealLogic};
use crate::db::pool::DbPool;
use crate::errors::AppResult;
use crate::models::employee::EmployeeId;
use crate::ui::messages::{denied, success};
use chrono::Local;

pub fn handle(cmd: &Commands, cfg: &Config) -> AppResult<()> {
    if let Commands::Check { employee } = cmd {
        let employee = EmployeeId::parse(employee)?;
        let clock = Clock::system();
        let pool = DbPool::new(&cfg.database)?;

        match MealLogic::check(&pool.conn, &employee, &clock)? {
            Eligibility::Eligible => {
                success(format!("Employee {employee} is eligible for a meal today."));
            }
            Eligibility::AlreadyServed {
                meal_type,
                counter_id,
                timestamp,
            } => {
                denied(format!(
                    "Employee {employee} already received a {meal_type} meal today at {} (counter {counter_id}).",
                    timestamp.with_timezone(&Local).format("%H:%M")
                ));
            }
        }
    }
    Ok(())
}
