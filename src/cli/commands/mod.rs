pub mod archive;
pub mod backup;
pub mod check;
pub mod config;
pub mod db;
pub mod export;
pub mod history;
pub mod init;
pub mod log;
pub mod provide;
pub mod scheduler;
pub mod today;

use crate::config::Config;
use crate::core::archive::{ArchiveLogic, SweepOutcome, SweepScope};
use crate::core::clock::Clock;
use crate::db::pool::DbPool;
use crate::errors::AppResult;
use crate::ui::messages::{info, warning};

/// Open the database and run the sweep if none has been recorded today, the
/// same check the scheduler performs when it starts.
///
/// Records older than yesterday are reported once per day, when the sweep runs.
pub(crate) fn open_with_due_sweep(cfg: &Config, clock: &Clock) -> AppResult<DbPool> {
    let mut pool = DbPool::new(&cfg.database)?;

    if let SweepOutcome::Completed(report) =
        ArchiveLogic::sweep_if_due(&mut pool, clock, SweepScope::Yesterday)?
    {
        if report.archived > 0 {
            info(format!(
                "Archived {} meal(s) from {}.",
                report.archived,
                crate::utils::date::yesterday_of(report.today)
            ));
        }

        let pending = ArchiveLogic::pending(&pool.conn, clock.today)?;
        if pending > 0 {
            warning(format!(
                "{pending} meal(s) from earlier days are still active; run 'archive --catch-up'."
            ));
        }
    }

    Ok(pool)
}
