use crate::config::Config;
use crate::db::log::ttlog_soft;
use crate::db::pool::DbPool;
use crate::errors::{AppError, AppResult};
use crate::export::fs_utils::ensure_writable;
use crate::ui::messages::{info, success, warning};
use std::fs;
use std::path::{Path, PathBuf};
use zip::ZipWriter;
use zip::write::FileOptions;

pub struct BackupLogic;

impl BackupLogic {
    /// Write a consistent snapshot of the database to `dest_file`
    /// (`VACUUM INTO`, safe while other processes are scanning), optionally
    /// zipped.
    pub fn backup(cfg: &Config, dest_file: &Path, compress: bool, force: bool) -> AppResult<PathBuf> {
        let src = Path::new(&cfg.database);

        if !src.exists() {
            return Err(std::io::Error::new(
                std::io::ErrorKind::NotFound,
                format!("Database not found: {}", src.display()),
            )
            .into());
        }

        if let Some(parent) = dest_file.parent()
            && !parent.as_os_str().is_empty()
        {
            fs::create_dir_all(parent)?;
        }

        ensure_writable(dest_file, force)?;
        if dest_file.exists() {
            // VACUUM INTO refuses to overwrite
            fs::remove_file(dest_file)?;
        }

        let pool = DbPool::new(&cfg.database)?;
        pool.conn
            .execute("VACUUM INTO ?1", [dest_file.to_string_lossy().to_string()])?;
        success(format!("Backup created: {}", dest_file.display()));

        let final_path = if compress {
            let zipped = compress_backup(dest_file)?;
            if let Err(e) = fs::remove_file(dest_file) {
                warning(format!("Failed to remove uncompressed backup: {}", e));
            } else {
                info(format!("Removed uncompressed backup: {}", dest_file.display()));
            }
            zipped
        } else {
            dest_file.to_path_buf()
        };

        ttlog_soft(
            &pool.conn,
            "backup",
            &final_path.to_string_lossy(),
            if compress {
                "Backup created and compressed"
            } else {
                "Backup created"
            },
        );

        Ok(final_path)
    }
}

/// Compress a backup using .zip
fn compress_backup(path: &Path) -> AppResult<PathBuf> {
    let zip_path = path.with_extension("zip");
    let file = fs::File::create(&zip_path)?;
    let mut zip = ZipWriter::new(file);

    let options: FileOptions<'_, ()> =
        FileOptions::default().compression_method(zip::CompressionMethod::Deflated);

    let entry = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .ok_or_else(|| AppError::Other(format!("Invalid backup path: {}", path.display())))?;

    let mut f = fs::File::open(path)?;
    zip.start_file(entry, options).map_err(std::io::Error::other)?;

    std::io::copy(&mut f, &mut zip)?;
    zip.finish().map_err(std::io::Error::other)?;

    success(format!("Compressed: {}", zip_path.display()));

    Ok(zip_path)
}
