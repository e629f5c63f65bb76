use crate::errors::{AppError, AppResult};
use crate::export::ExportFormat;
use crate::utils::path::expand_tilde;
use serde::{Deserialize, Serialize};
use std::env;
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

/// Persisted settings of the daily automatic export.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AutoExport {
    #[serde(default)]
    pub enabled: bool,
    /// Local time of day (HH:MM) at which today's meals are written out.
    #[serde(default = "default_export_time")]
    pub time: String,
    #[serde(default)]
    pub format: ExportFormat,
    #[serde(default = "default_export_dir")]
    pub directory: String,
}

impl Default for AutoExport {
    fn default() -> Self {
        Self {
            enabled: false,
            time: default_export_time(),
            format: ExportFormat::default(),
            directory: default_export_dir(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    #[serde(default = "default_database")]
    pub database: String,
    /// Number of serving counters; valid counter ids are 1..=counters.
    #[serde(default = "default_counters")]
    pub counters: u32,
    /// Meals provided before this local time (HH:MM) default to MORNING.
    #[serde(default = "default_meal_cutover")]
    pub meal_cutover: String,
    #[serde(default)]
    pub auto_export: AutoExport,
}

fn default_database() -> String {
    Config::database_file().to_string_lossy().to_string()
}
fn default_counters() -> u32 {
    3
}
fn default_meal_cutover() -> String {
    "14:00".to_string()
}
fn default_export_time() -> String {
    "23:30".to_string()
}
fn default_export_dir() -> String {
    Config::config_dir()
        .join("exports")
        .to_string_lossy()
        .to_string()
}

impl Default for Config {
    fn default() -> Self {
        Self {
            database: default_database(),
            counters: default_counters(),
            meal_cutover: default_meal_cutover(),
            auto_export: AutoExport::default(),
        }
    }
}

impl Config {
    /// Return the standard configuration directory depending on the platform
    pub fn config_dir() -> PathBuf {
        if cfg!(target_os = "windows") {
            let appdata = env::var("APPDATA").unwrap_or_else(|_| ".".to_string());
            PathBuf::from(appdata).join("mealcounter")
        } else {
            let home = dirs::home_dir().unwrap_or_else(|| PathBuf::from("."));
            home.join(".mealcounter")
        }
    }

    /// Return the full path of the config file
    pub fn config_file() -> PathBuf {
        Self::config_dir().join("mealcounter.conf")
    }

    /// Return the default path of the SQLite database
    pub fn database_file() -> PathBuf {
        Self::config_dir().join("mealcounter.sqlite")
    }

    /// Load configuration from file, or return defaults if not found.
    pub fn load() -> AppResult<Self> {
        Self::load_from(&Self::config_file())
    }

    pub fn load_from(path: &Path) -> AppResult<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }

        let content = fs::read_to_string(path)
            .map_err(|e| AppError::ConfigLoad(format!("{}: {}", path.display(), e)))?;
        let cfg: Config = serde_yaml::from_str(&content)
            .map_err(|e| AppError::ConfigLoad(format!("{}: {}", path.display(), e)))?;
        cfg.validate()?;
        Ok(cfg)
    }

    /// Reject values the rest of the application cannot work with.
    pub fn validate(&self) -> AppResult<()> {
        if self.counters == 0 {
            return Err(AppError::Config("'counters' must be at least 1".into()));
        }
        crate::utils::time::parse_time(&self.meal_cutover)
            .ok_or_else(|| AppError::Config(format!("invalid meal_cutover '{}'", self.meal_cutover)))?;
        crate::utils::time::parse_time(&self.auto_export.time).ok_or_else(|| {
            AppError::Config(format!("invalid auto_export.time '{}'", self.auto_export.time))
        })?;
        Ok(())
    }

    /// Export directory with `~/` expanded.
    pub fn export_dir(&self) -> PathBuf {
        expand_tilde(&self.auto_export.directory)
    }

    pub fn to_yaml(&self) -> AppResult<String> {
        serde_yaml::to_string(self).map_err(|e| AppError::Config(e.to_string()))
    }

    pub fn save_to(&self, path: &Path) -> AppResult<()> {
        let yaml = self.to_yaml()?;
        let save_err = |e: std::io::Error| AppError::ConfigSave(format!("{}: {}", path.display(), e));
        let mut file = fs::File::create(path).map_err(save_err)?;
        file.write_all(yaml.as_bytes()).map_err(save_err)?;
        Ok(())
    }

    /// Initialize configuration and database files.
    ///
    /// Returns the configuration that was written (or would have been, in
    /// test mode).
    pub fn init_all(custom_db: Option<String>, is_test: bool) -> AppResult<Self> {
        let dir = Self::config_dir();

        let db_path = match custom_db {
            Some(name) => {
                let p = expand_tilde(&name);
                if p.is_absolute() { p } else { dir.join(p) }
            }
            None => Self::database_file(),
        };

        let mut config = if Self::config_file().exists() {
            Self::load()?
        } else {
            Self::default()
        };
        config.database = db_path.to_string_lossy().to_string();

        if !is_test {
            fs::create_dir_all(&dir)?;
            config.save_to(&Self::config_file())?;
        }

        if let Some(parent) = db_path.parent()
            && !parent.as_os_str().is_empty()
        {
            fs::create_dir_all(parent)?;
        }

        Ok(config)
    }
}
