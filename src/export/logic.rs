// src/export/logic.rs

use crate::config::Config;
use crate::core::clock::Clock;
use crate::db::log::{op, ttlog};
use crate::db::pool::DbPool;
use crate::db::queries::{LAST_EXPORT_KEY, active_by_date, archived_in_range, load_state, save_state};
use crate::errors::{AppError, AppResult};
use crate::export::ExportFormat;
use crate::export::fs_utils::{ensure_parent, ensure_writable};
use crate::export::json_csv::{export_csv, export_json};
use crate::export::model::MealExport;
use crate::export::range::parse_range;
use crate::models::meal_record::{ArchiveState, to_db_timestamp};
use crate::ui::messages::{info, warning};
use crate::utils::date::month_name;
use std::path::{Path, PathBuf};
use tracing::info as trace_info;

/// What an export reads.
#[derive(Debug, Clone)]
pub enum ExportSource {
    /// Today's active records.
    Today,
    /// Archived records, optionally restricted by a `--range` expression.
    Archive(Option<String>),
}

/// High level export entry points.
pub struct ExportLogic;

impl ExportLogic {
    /// Manual export (`export` command). Returns the number of rows written.
    pub fn export(
        pool: &mut DbPool,
        format: ExportFormat,
        file: &str,
        source: &ExportSource,
        force: bool,
        clock: &Clock,
    ) -> AppResult<usize> {
        let path = Path::new(file);

        if !path.is_absolute() {
            return Err(AppError::Export(format!(
                "Output file path must be absolute: {file}"
            )));
        }

        let rows = load_rows(pool, source, clock)?;

        if rows.is_empty() {
            warning(format!("No meals found for {}.", describe_source(source, clock)));
            return Ok(0);
        }

        ensure_writable(path, force)?;
        ensure_parent(path)?;

        info(format!("Exporting {}", describe_source(source, clock)));
        write_rows(&rows, format, path)?;

        ttlog(
            &pool.conn,
            op::EXPORT,
            &path.to_string_lossy(),
            &format!("{} {} row(s)", format.as_str(), rows.len()),
        )?;

        Ok(rows.len())
    }

    /// Whether the scheduled daily export still has to run at `clock`.
    pub fn auto_export_due(pool: &DbPool, cfg: &Config, clock: &Clock) -> AppResult<bool> {
        if !cfg.auto_export.enabled {
            return Ok(false);
        }

        let at = crate::utils::time::parse_time(&cfg.auto_export.time)
            .ok_or_else(|| AppError::InvalidTime(cfg.auto_export.time.clone()))?;

        if clock.local.time() < at {
            return Ok(false);
        }

        Ok(match load_state(&pool.conn, LAST_EXPORT_KEY)? {
            Some(state) => state.date < clock.today,
            None => true,
        })
    }

    /// Scheduled daily export of today's active records into
    /// `<auto_export.directory>/meals-YYYY-MM-DD.<ext>`. Always overwrites.
    pub fn auto_export(pool: &mut DbPool, cfg: &Config, clock: &Clock) -> AppResult<PathBuf> {
        let format = cfg.auto_export.format;
        let path = cfg
            .export_dir()
            .join(format!("meals-{}.{}", clock.today, format.extension()));

        let rows = load_rows(pool, &ExportSource::Today, clock)?;

        ensure_parent(&path)?;
        write_rows(&rows, format, &path)?;

        save_state(
            &pool.conn,
            LAST_EXPORT_KEY,
            &ArchiveState {
                date: clock.today,
                timestamp: to_db_timestamp(&clock.now),
                archived: rows.len(),
            },
        )?;
        ttlog(
            &pool.conn,
            op::AUTO_EXPORT,
            &path.to_string_lossy(),
            &format!("{} {} row(s)", format.as_str(), rows.len()),
        )?;

        trace_info!(path = %path.display(), rows = rows.len(), "automatic export written");
        Ok(path)
    }
}

fn load_rows(pool: &DbPool, source: &ExportSource, clock: &Clock) -> AppResult<Vec<MealExport>> {
    Ok(match source {
        ExportSource::Today => active_by_date(&pool.conn, &clock.today)?
            .iter()
            .map(MealExport::from)
            .collect(),
        ExportSource::Archive(range) => {
            let bounds = match range {
                None => None,
                Some(r) => parse_range(r)?,
            };
            archived_in_range(&pool.conn, bounds)?
                .iter()
                .map(MealExport::from)
                .collect()
        }
    })
}

fn write_rows(rows: &[MealExport], format: ExportFormat, path: &Path) -> AppResult<()> {
    match format {
        ExportFormat::Csv => export_csv(rows, path),
        ExportFormat::Json => export_json(rows, path),
    }
}

/// Human label of what is being exported, e.g. "archived meals for June 2025".
fn describe_source(source: &ExportSource, clock: &Clock) -> String {
    let range = match source {
        ExportSource::Today => return format!("today's meals ({})", clock.today),
        ExportSource::Archive(None) => return "all archived meals".to_string(),
        ExportSource::Archive(Some(r)) => r.trim(),
    };

    match range.len() {
        4 => format!("archived meals for year {range}"),
        7 => {
            let (y, m) = range.split_at(4);
            format!("archived meals for {} {}", month_name(m.trim_start_matches('-')), y)
        }
        10 => format!("archived meals for {range}"),
        _ => match range.split_once(':') {
            Some((a, b)) => format!("archived meals from {a} to {b}"),
            None => format!("archived meals ({range})"),
        },
    }
}
