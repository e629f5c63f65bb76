use crate::cli::parser::Commands;
use crate::config::Config;
use crate::core::backup::BackupLogic;
use crate::db::pool::DbPool;
use crate::errors::{AppError, AppResult};
use crate::utils::path::{expand_tilde, is_absolute};

pub fn handle(cmd: &Commands, cfg: &Config) -> AppResult<()> {
    if let Commands::Backup {
        file,
        compress,
        force,
    } = cmd
    {
        if !is_absolute(file) {
            return Err(AppError::Config(format!(
                "Backup file path must be absolute: {file}"
            )));
        }

        let dest = expand_tilde(file);
        let mut pool = DbPool::new(&cfg.database)?;
        BackupLogic::backup(&mut pool, &cfg.database, &dest.to_string_lossy(), *compress, *force)?;
    }

    Ok(())
}
