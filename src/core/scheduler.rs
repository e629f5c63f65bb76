//! Long-running scheduler: daily archive sweep and optional automatic export.
//!
//! Nothing is kept in memory between wake-ups: whether a job is due is read
//! from `app_state` each time, so a restarted (or duplicated) scheduler picks
//! up exactly where the previous one stopped.

use crate::config::Config;
use crate::core::archive::{ArchiveLogic, SweepOutcome, SweepScope};
use crate::core::clock::Clock;
use crate::db::pool::DbPool;
use crate::errors::AppResult;
use crate::export::ExportLogic;
use crate::utils::time::{format_delay, parse_time};
use chrono::{NaiveDateTime, NaiveTime, TimeDelta};
use std::path::PathBuf;
use std::time::Duration;
use tracing::{debug, error, info, warn};

/// Upper bound of one sleep, so clock changes (DST, NTP jumps, suspend) are
/// noticed within the hour.
const MAX_SLEEP_SECS: i64 = 3600;

/// What one pass of [`run_due_jobs`] did.
#[derive(Debug)]
pub struct TickReport {
    pub sweep: SweepOutcome,
    /// Active records older than yesterday, which the daily sweep never moves.
    pub pending: i64,
    pub export: Option<PathBuf>,
}

/// Next instant at which something may be due: one second after the coming
/// local midnight, or today's export time if that is still ahead.
pub fn next_wakeup(now: NaiveDateTime, export_at: Option<NaiveTime>) -> NaiveDateTime {
    let tomorrow = now.date().succ_opt().unwrap_or(now.date());
    let midnight = tomorrow.and_time(NaiveTime::from_hms_opt(0, 0, 1).unwrap_or_default());

    match export_at {
        Some(t) if t > now.time() => now.date().and_time(t).min(midnight),
        _ => midnight,
    }
}

/// How long to sleep before the next pass, capped at one hour.
pub fn sleep_for(now: NaiveDateTime, export_at: Option<NaiveTime>) -> TimeDelta {
    let wait = next_wakeup(now, export_at) - now;
    wait.clamp(TimeDelta::seconds(1), TimeDelta::seconds(MAX_SLEEP_SECS))
}

/// Run whatever is due at `clock`: the sweep of yesterday's records (once per
/// day) and, when enabled, the daily export.
pub fn run_due_jobs(pool: &mut DbPool, cfg: &Config, clock: &Clock) -> AppResult<TickReport> {
    let sweep = ArchiveLogic::sweep_if_due(pool, clock, SweepScope::Yesterday)?;
    match &sweep {
        SweepOutcome::Completed(r) => info!(archived = r.archived, "scheduled sweep ran"),
        SweepOutcome::UpToDate(s) => debug!(last = %s.date, "sweep not due"),
    }

    let pending = ArchiveLogic::pending(&pool.conn, clock.today)?;
    if pending > 0 {
        warn!(pending, "records from earlier days are still active; run 'archive --catch-up'");
    }

    let export = if ExportLogic::auto_export_due(pool, cfg, clock)? {
        Some(ExportLogic::auto_export(pool, cfg, clock)?)
    } else {
        None
    };

    Ok(TickReport {
        sweep,
        pending,
        export,
    })
}

fn export_time(cfg: &Config) -> Option<NaiveTime> {
    if cfg.auto_export.enabled {
        parse_time(&cfg.auto_export.time)
    } else {
        None
    }
}

/// Foreground loop behind `mealcounter scheduler`.
///
/// With `once`, a single pass runs and its error (if any) is returned.
/// Otherwise errors are logged and the loop carries on at the next wake-up.
pub fn run(cfg: &Config, once: bool) -> AppResult<()> {
    let mut pool = DbPool::new(&cfg.database)?;

    if once {
        run_due_jobs(&mut pool, cfg, &Clock::system())?;
        return Ok(());
    }

    info!(database = %cfg.database, "scheduler started");
    let export_at = export_time(cfg);

    loop {
        let clock = Clock::system();
        if let Err(e) = run_due_jobs(&mut pool, cfg, &clock) {
            error!(error = %e, "scheduled jobs failed");
        }

        let now = Clock::system().local;
        let wait = sleep_for(now, export_at);
        info!(
            next = %next_wakeup(now, export_at),
            wait = %format_delay(wait),
            "scheduler sleeping"
        );
        std::thread::sleep(wait.to_std().unwrap_or(Duration::from_secs(1)));
    }
}
