use crate::cli::commands::open_with_due_sweep;
use crate::cli::parser::Commands;
use crate::config::Config;
use crate::core::clock::Clock;
use crate::core::meals::{MealLogic, resolve_meal_type, validate_counter};
use crate::errors::{AppError, AppResult};
use crate::models::employee::EmployeeId;
use crate::ui::messages::success;
use crate::utils::time::parse_time;

pub fn handle(cmd: &Commands, cfg: &Config) -> AppResult<()> {
    if let Commands::Provide {
        employee,
        meal,
        counter,
    } = cmd
    {
        // Validate input before touching the database.
        let employee = EmployeeId::parse(employee)?;
        validate_counter(*counter, cfg.counters)?;

        let cutover = parse_time(&cfg.meal_cutover)
            .ok_or_else(|| AppError::InvalidTime(cfg.meal_cutover.clone()))?;

        let clock = Clock::system();
        let meal_type = resolve_meal_type(*meal, clock.local.time(), cutover);

        let mut pool = open_with_due_sweep(cfg, &clock)?;
        let rec = MealLogic::provide(&mut pool, &employee, meal_type, *counter, cfg.counters, &clock)?;

        success(format!(
            "{} meal provided to {} at counter {} ({}).",
            rec.meal_type,
            rec.employee_id,
            rec.counter_id,
            rec.local_time_str()
        ));
    }
    Ok(())
}
