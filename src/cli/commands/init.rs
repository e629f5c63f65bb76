use crate::cli::parser::Cli;
use crate::config::Config;
use crate::db::log::{op, ttlog};
use crate::db::migrate::current_version;
use crate::db::pool::DbPool;
use crate::errors::AppResult;
use crate::ui::messages::{success, warning};

/// Handle the `init` command
///
/// This initializes:
///  - the config directory (if missing)
///  - the configuration file (skipped with `--test`)
///  - the SQLite database with every migration applied
pub fn handle(cli: &Cli) -> AppResult<()> {
    let cfg = Config::init_all(cli.db.clone(), cli.test)?;
    let db_path = cfg.database.clone();

    println!("⚙️  Initializing mealcounter…");
    if !cli.test {
        println!("📄 Config file : {}", Config::config_file().display());
    }
    println!("🗄️  Database   : {}", &db_path);

    let pool = DbPool::new(&db_path)?;
    let version = current_version(&pool.conn)?;

    success(format!("Database initialized at {} (schema v{})", &db_path, version));

    if let Err(e) = ttlog(
        &pool.conn,
        op::INIT,
        &db_path,
        &format!("Database initialized (schema v{version})"),
    ) {
        warning(format!("Failed to write internal log: {e}"));
    }

    println!("🎉 mealcounter initialization completed!");
    Ok(())
}
