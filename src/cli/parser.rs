use crate::export::ExportFormat;
use crate::models::meal_type::MealType;
use clap::{Parser, Subcommand};

/// Command-line interface definition for mealcounter
/// CLI application to track employee meals at the canteen counters with SQLite
#[derive(Parser)]
#[command(
    name = "mealcounter",
    version = env!("CARGO_PKG_VERSION"),
    about = "Employee meal counter: one meal per employee per day, with daily archiving and history",
    long_about = None
)]
pub struct Cli {
    /// Override database path (useful for tests or custom DB)
    #[arg(global = true, long = "db")]
    pub db: Option<String>,

    /// Run in test mode (no config file update)
    #[arg(global = true, long = "test", hide = true)]
    pub test: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Initialize the database and configuration
    Init,

    /// Manage the configuration file (view or edit)
    Config {
        #[arg(long = "print", help = "Print the current configuration")]
        print_config: bool,

        #[arg(
            long = "edit",
            help = "Edit the configuration file (default editor: $EDITOR, or nano/notepad)"
        )]
        edit_config: bool,

        #[arg(
            long = "editor",
            help = "Specify the editor to use (vim, nano, or custom path)"
        )]
        editor: Option<String>,
    },

    /// Check whether an employee may still receive a meal today
    Check {
        /// Employee ID
        employee: String,
    },

    /// Register a meal for an employee
    Provide {
        /// Employee ID
        employee: String,

        /// Meal type (morning|m, evening|e); picked from the clock when omitted
        #[arg(long = "meal", short = 'm', value_enum)]
        meal: Option<MealType>,

        /// Serving counter (1..=counters)
        #[arg(long = "counter", short = 'c', default_value_t = 1)]
        counter: u32,
    },

    /// List the meals served today
    Today {
        #[arg(long = "summary", help = "Show only the totals")]
        summary: bool,
    },

    /// Show the archived meal history of an employee
    History {
        /// Employee ID
        employee: String,
    },

    /// Move past days' meals into the archive
    Archive {
        #[arg(long = "force", help = "Sweep even if today's sweep already ran")]
        force: bool,

        #[arg(
            long = "catch-up",
            help = "Archive every meal dated before today, not only yesterday's"
        )]
        catch_up: bool,

        #[arg(
            long = "status",
            conflicts_with_all = ["force", "catch_up"],
            help = "Show the last sweep and the pending records"
        )]
        status: bool,
    },

    /// Run the daily sweep and automatic export on schedule
    Scheduler {
        #[arg(long = "once", help = "Run the jobs that are due, then exit")]
        once: bool,
    },

    /// Export meal records
    Export {
        #[arg(long, value_enum, default_value = "csv")]
        format: ExportFormat,

        #[arg(long, value_name = "FILE")]
        file: String,

        #[arg(
            long,
            value_name = "RANGE",
            conflicts_with = "today",
            help = "Filter archived meals by year/month/day, a custom range, or 'all'"
        )]
        range: Option<String>,

        #[arg(long = "today", help = "Export today's meals instead of the archive")]
        today: bool,

        #[arg(long, short = 'f')]
        force: bool,
    },

    /// Create a backup copy of the database
    Backup {
        #[arg(long, value_name = "FILE")]
        file: String,

        #[arg(long)]
        compress: bool,

        #[arg(long, short = 'f', help = "Overwrite an existing backup without asking")]
        force: bool,
    },

    /// Print the internal log table
    Log {
        #[arg(long = "print", help = "Print rows from the internal log table")]
        print: bool,
    },

    /// Manage the database (migrations, integrity checks, etc.)
    Db {
        #[arg(long = "migrate", help = "Run pending database migrations")]
        migrate: bool,

        #[arg(long = "check", help = "Check database integrity")]
        check: bool,

        #[arg(long = "vacuum", help = "Optimize the database using VACUUM")]
        vacuum: bool,

        #[arg(long = "info", help = "Show database information")]
        info: bool,
    },
}
