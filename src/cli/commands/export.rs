use crate::cli::parser::Commands;
use crate::config::Config;
use crate::core::clock::Clock;
use crate::db::pool::DbPool;
use crate::errors::AppResult;
use crate::export::ExportLogic;
use crate::export::logic::ExportSource;

pub fn handle(cmd: &Commands, cfg: &Config) -> AppResult<()> {
    if let Commands::Export {
        format,
        file,
        range,
        today,
        force,
    } = cmd
    {
        let source = if *today {
            ExportSource::Today
        } else {
            ExportSource::Archive(range.clone())
        };

        let mut pool = DbPool::new(&cfg.database)?;
        ExportLogic::export(&mut pool, *format, file, &source, *force, &Clock::system())?;
    }
    Ok(())
}
