use crate::cli::commands::open_with_due_sweep;
use crate::cli::parser::Commands;
use crate::config::Config;
use crate::core::clock::Clock;
use crate::core::today::{TodayLogic, TodaySummary};
use crate::errors::AppResult;
use crate::models::meal_type::MealType;
use crate::ui::messages::{header, info};
use crate::utils::colors::{GREY, RESET, color_for_meal};
use crate::utils::table::Table;

pub fn handle(cmd: &Commands, cfg: &Config) -> AppResult<()> {
    if let Commands::Today { summary } = cmd {
        let clock = Clock::system();
        let pool = open_with_due_sweep(cfg, &clock)?;

        let today = TodayLogic::load(&pool.conn, clock.today)?;

        header(format!("Meals served on {}", clock.today));

        if today.meals.is_empty() {
            info("No meals served yet today.");
            return Ok(());
        }

        if !*summary {
            print_meals(&today);
        }
        print_totals(&today, cfg.counters);
    }
    Ok(())
}

fn print_meals(today: &TodaySummary) {
    let mut table = Table::new(["Time", "Employee", "Meal", "Counter"]);
    for m in &today.meals {
        table.add_row(vec![
            m.local_time_str(),
            m.employee_id.clone(),
            m.meal_type.to_string(),
            m.counter_id.to_string(),
        ]);
    }
    print!("{}", table.render());
    println!();
}

fn print_totals(today: &TodaySummary, counters: u32) {
    println!("Total: {}", today.total());

    for meal in MealType::all() {
        let n = today.per_meal.get(&meal).copied().unwrap_or(0);
        println!("  {}{:<8}{} {}", color_for_meal(meal), meal, RESET, n);
    }

    for c in 1..=counters {
        let n = today.per_counter.get(&c).copied().unwrap_or(0);
        println!("  Counter {c}: {n}");
    }

    // Counters removed from the config can still hold today's rows.
    for (c, n) in today.per_counter.range(counters + 1..) {
        println!("  {GREY}Counter {c}: {n}{RESET}");
    }
}
