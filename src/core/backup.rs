use crate::db::log::{op, ttlog};
use crate::db::pool::DbPool;
use crate::errors::{AppError, AppResult};
use crate::export::fs_utils::{ensure_parent, ensure_writable};
use crate::ui::messages::{success, warning};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::info;
use zip::ZipWriter;
use zip::write::FileOptions;

pub struct BackupLogic;

impl BackupLogic {
    /// Copy the database file to `dest_file`, optionally replacing the copy
    /// with a `.zip` archive. Returns the path actually written.
    ///
    /// The copy is taken with `VACUUM INTO`, so records written by another
    /// process during the backup never leave a torn file behind.
    pub fn backup(
        pool: &mut DbPool,
        db_path: &str,
        dest_file: &str,
        compress: bool,
        force: bool,
    ) -> AppResult<PathBuf> {
        let src = Path::new(db_path);
        let dest = Path::new(dest_file);

        if !src.exists() {
            return Err(AppError::Io(std::io::Error::new(
                std::io::ErrorKind::NotFound,
                format!("Database not found: {}", src.display()),
            )));
        }
        if src == dest {
            return Err(AppError::Config(
                "backup destination is the database itself".into(),
            ));
        }

        ensure_writable(dest, force)?;
        ensure_parent(dest)?;
        if dest.exists() {
            fs::remove_file(dest)?;
        }

        pool.conn
            .execute("VACUUM INTO ?1", [dest.to_string_lossy().to_string()])?;
        success(format!("Backup created: {}", dest.display()));

        let final_path = if compress {
            let zipped = compress_backup(dest)?;
            if let Err(e) = fs::remove_file(dest) {
                warning(format!("Failed to remove uncompressed backup: {e}"));
            }
            zipped
        } else {
            dest.to_path_buf()
        };

        ttlog(
            &pool.conn,
            op::BACKUP,
            &final_path.to_string_lossy(),
            if compress {
                "Backup created and compressed"
            } else {
                "Backup created"
            },
        )?;

        info!(path = %final_path.display(), compress, "database backup written");
        Ok(final_path)
    }
}

/// Store `path` inside `<path>.zip` (deflated).
fn compress_backup(path: &Path) -> AppResult<PathBuf> {
    let zip_path = path.with_extension("zip");
    let name = path
        .file_name()
        .map(|n| n.to_string_lossy().to_string())
        .unwrap_or_else(|| "mealcounter.sqlite".to_string());

    let file = fs::File::create(&zip_path)?;
    let mut zip = ZipWriter::new(file);

    let options: FileOptions<'_, ()> =
        FileOptions::default().compression_method(zip::CompressionMethod::Deflated);

    zip.start_file(name, options).map_err(std::io::Error::other)?;

    let mut f = fs::File::open(path)?;
    std::io::copy(&mut f, &mut zip)?;
    zip.finish().map_err(std::io::Error::other)?;

    success(format!("Compressed: {}", zip_path.display()));
    Ok(zip_path)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::clock::Clock;
    use crate::core::meals::MealLogic;
    use crate::models::employee::EmployeeId;
    use crate::models::meal_type::MealType;

    #[test]
    fn backup_copies_meals_and_can_zip() {
        let dir = std::env::temp_dir().join("mealcounter_unit_backup");
        fs::remove_dir_all(&dir).ok();
        fs::create_dir_all(&dir).unwrap();

        let db = dir.join("src.sqlite");
        let db_str = db.to_string_lossy().to_string();
        let mut pool = DbPool::new(&db_str).unwrap();
        MealLogic::provide(
            &mut pool,
            &EmployeeId::parse("EMP1").unwrap(),
            MealType::Morning,
            1,
            3,
            &Clock::system(),
        )
        .unwrap();

        let copy = dir.join("copy.sqlite");
        let out = BackupLogic::backup(&mut pool, &db_str, &copy.to_string_lossy(), false, true).unwrap();
        assert_eq!(out, copy);

        let restored = DbPool::new(&copy.to_string_lossy()).unwrap();
        let n: i64 = restored
            .conn
            .query_row("SELECT COUNT(*) FROM active_meals", [], |r| r.get(0))
            .unwrap();
        assert_eq!(n, 1);

        let zipped = BackupLogic::backup(&mut pool, &db_str, &copy.to_string_lossy(), true, true).unwrap();
        assert_eq!(zipped, dir.join("copy.zip"));
        assert!(zipped.exists());
        assert!(!copy.exists());
    }
}
