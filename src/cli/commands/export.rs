use crate::cli::commands::records::session_filter;
use crate::cli::commands::{open_db, require_event};
use crate::cli::parser::Commands;
use crate::config::Config;
use crate::db::log::ttlog_soft;
use crate::errors::AppResult;
use crate::export::fs_utils::ensure_writable;
use crate::export::{file_name_for, notify_export_success, render, write_report};
use crate::store::AttendanceStore;
use crate::ui::messages::warning;
use crate::utils::path::expand_tilde;

pub fn handle(cmd: &Commands, cfg: &Config) -> AppResult<()> {
    if let Commands::Export {
        event,
        format,
        session,
        file,
        dir,
        force,
    } = cmd
    {
        let pool = open_db(cfg)?;
        let ev = require_event(&pool, *event)?;
        let records = pool.list_attendance_records(ev.id, session_filter(session)?)?;

        if records.is_empty() {
            warning("No scans to export!");
            return Ok(());
        }

        let path = match file {
            Some(f) => expand_tilde(f),
            None => dir
                .as_deref()
                .map(expand_tilde)
                .unwrap_or_else(|| cfg.export_dir())
                .join(file_name_for(&ev.name, *format)),
        };

        ensure_writable(&path, *force)?;

        let text = render(&records, *format)?;
        write_report(&path, &text)?;

        notify_export_success(format.label(), &path);
        ttlog_soft(
            &pool.conn,
            "export",
            &path.to_string_lossy(),
            &format!(
                "{} record(s) of '{}' exported as {}",
                records.len(),
                ev.name,
                format.as_str()
            ),
        );
    }

    Ok(())
}
