use crate::cli::parser::Commands;
use crate::config::Config;
use crate::core::history::HistoryLogic;
use crate::db::pool::DbPool;
use crate::errors::AppResult;
use crate::models::employee::EmployeeId;
use crate::ui::messages::{header, info};
use crate::utils::table::Table;
use chrono::Local;

pub fn handle(cmd: &Commands, cfg: &Config) -> AppResult<()> {
    if let Commands::History { employee } = cmd {
        let employee = EmployeeId::parse(employee)?;
        let pool = DbPool::new(&cfg.database)?;

        let rows = HistoryLogic::lookup(&pool.conn, &employee)?;

        header(format!("Meal history of {employee}"));

        if rows.is_empty() {
            info(format!("No archived meals for {employee}."));
            return Ok(());
        }

        let mut table = Table::new(["Date", "Time", "Meal", "Counter", "Archived"]);
        for a in &rows {
            table.add_row(vec![
                a.record.date_str(),
                a.record.local_time_str(),
                a.record.meal_type.to_string(),
                a.record.counter_id.to_string(),
                a.archived_at
                    .with_timezone(&Local)
                    .format("%Y-%m-%d %H:%M")
                    .to_string(),
            ]);
        }
        print!("{}", table.render());
        println!("\n{} meal(s)", rows.len());
    }
    Ok(())
}
