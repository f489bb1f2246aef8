//! Report destination: naming and atomic write.

use crate::errors::{AppError, AppResult};
use crate::export::ReportFormat;
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

/// Default report file name: event name with spaces as `_`.
pub fn file_name_for(event_name: &str, format: ReportFormat) -> String {
    let stem: String = event_name
        .trim()
        .chars()
        .map(|c| if c.is_whitespace() { '_' } else { c })
        .collect();
    let stem = if stem.is_empty() { "event".to_string() } else { stem };
    format!("{stem}.{}", format.extension())
}

fn temp_sibling(path: &Path) -> PathBuf {
    let mut name = path
        .file_name()
        .map(|n| n.to_os_string())
        .unwrap_or_default();
    name.push(".part");
    path.with_file_name(name)
}

/// Write the full text to `path`. Readers see either the old file or the
/// complete new one, never a partial report.
pub fn write_report(path: &Path, text: &str) -> AppResult<()> {
    let io_err = |e: std::io::Error| AppError::ExportIo(format!("{}: {e}", path.display()));

    if let Some(parent) = path.parent()
        && !parent.as_os_str().is_empty()
    {
        fs::create_dir_all(parent).map_err(io_err)?;
    }

    let tmp = temp_sibling(path);
    let written = fs::File::create(&tmp)
        .and_then(|mut f| {
            f.write_all(text.as_bytes())?;
            f.sync_all()
        })
        .and_then(|_| fs::rename(&tmp, path));

    if let Err(e) = written {
        let _ = fs::remove_file(&tmp);
        return Err(io_err(e));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::env;

    fn scratch(name: &str) -> PathBuf {
        let dir = env::temp_dir().join(format!("rattendance_sink_{}", std::process::id()));
        fs::create_dir_all(&dir).unwrap();
        dir.join(name)
    }

    #[test]
    fn names_replace_spaces() {
        assert_eq!(file_name_for("Math 101 A", ReportFormat::Csv), "Math_101_A.csv");
        assert_eq!(file_name_for("Lab", ReportFormat::Txt), "Lab.txt");
        assert_eq!(file_name_for("  ", ReportFormat::Txt), "event.txt");
    }

    #[test]
    fn writes_and_replaces() {
        let path = scratch("report.txt");
        write_report(&path, "first\n").unwrap();
        write_report(&path, "second\n").unwrap();

        assert_eq!(fs::read_to_string(&path).unwrap(), "second\n");
        assert!(!temp_sibling(&path).exists());
        fs::remove_file(&path).ok();
    }

    #[test]
    fn unwritable_destination_is_export_error() {
        let blocker = scratch("blocker");
        fs::write(&blocker, "x").unwrap();
        let path = blocker.join("report.csv");

        let err = write_report(&path, "data").unwrap_err();
        assert!(matches!(err, AppError::ExportIo(_)));
        fs::remove_file(&blocker).ok();
    }
}
