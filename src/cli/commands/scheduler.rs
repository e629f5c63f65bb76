use crate::cli::parser::Commands;
use crate::config::Config;
use crate::core::scheduler;
use crate::errors::AppResult;
use crate::ui::messages::{info, success};

pub fn handle(cmd: &Commands, cfg: &Config) -> AppResult<()> {
    if let Commands::Scheduler { once } = cmd {
        if *once {
            scheduler::run(cfg, true)?;
            success("Scheduled jobs completed.");
        } else {
            info(format!(
                "Scheduler running on {} (Ctrl+C to stop).",
                cfg.database
            ));
            scheduler::run(cfg, false)?;
        }
    }
    Ok(())
}
