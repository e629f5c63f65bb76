use crate::cli::parser::Commands;
use crate::config::Config;
use crate::core::archive::{ArchiveLogic, SweepOutcome, SweepReport, SweepScope};
use crate::core::clock::Clock;
use crate::db::pool::DbPool;
use crate::errors::AppResult;
use crate::ui::messages::{info, success, warning};

pub fn handle(cmd: &Commands, cfg: &Config) -> AppResult<()> {
    if let Commands::Archive {
        force,
        catch_up,
        status,
    } = cmd
    {
        let clock = Clock::system();
        let mut pool = DbPool::new(&cfg.database)?;

        if *status {
            return print_status(&pool, &clock);
        }

        let scope = if *catch_up {
            SweepScope::CatchUp
        } else {
            SweepScope::Yesterday
        };

        // An explicit catch-up runs even after today's daily sweep.
        if *force || *catch_up {
            let report = ArchiveLogic::sweep(&mut pool, &clock, scope)?;
            print_report(&report);
        } else {
            match ArchiveLogic::sweep_if_due(&mut pool, &clock, scope)? {
                SweepOutcome::Completed(report) => print_report(&report),
                SweepOutcome::UpToDate(state) => info(format!(
                    "Archive is up to date (last sweep {}, {} record(s)). Use --force to sweep again.",
                    state.date, state.archived
                )),
            }
        }

        let left = ArchiveLogic::pending(&pool.conn, clock.today)?;
        if left > 0 {
            warning(format!(
                "{left} record(s) from earlier days are still active; run 'archive --catch-up'."
            ));
        }
    }
    Ok(())
}

fn print_report(report: &SweepReport) {
    if report.skipped > 0 {
        warning(format!(
            "{} record(s) were already in the archive for their day and were dropped.",
            report.skipped
        ));
    }
    if report.archived == 0 {
        info("Nothing to archive.");
        return;
    }
    for (date, n) in &report.per_date {
        println!("  {date}: {n}");
    }
    success(format!("Archived {} record(s).", report.archived));
}

fn print_status(pool: &DbPool, clock: &Clock) -> AppResult<()> {
    match ArchiveLogic::last_sweep(&pool.conn)? {
        Some(state) => println!(
            "Last sweep : {} ({} record(s), at {})",
            state.date, state.archived, state.timestamp
        ),
        None => println!("Last sweep : never"),
    }

    let due = ArchiveLogic::should_archive(&pool.conn, clock.today)?;
    println!("Sweep due  : {}", if due { "yes" } else { "no" });
    println!("Pending    : {}", ArchiveLogic::pending(&pool.conn, clock.today)?);
    Ok(())
}
