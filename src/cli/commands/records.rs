use crate::cli::commands::{open_db, require_event};
use crate::cli::parser::Commands;
use crate::config::Config;
use crate::errors::{AppError, AppResult};
use crate::models::Session;
use crate::store::AttendanceStore;
use crate::ui::messages::info;
use crate::utils::colors::{GREY, RESET};
use crate::utils::table::Table;

/// Optional `--session` filter; no default applies here.
pub(crate) fn session_filter(arg: &Option<String>) -> AppResult<Option<Session>> {
    arg.as_deref()
        .map(|label| Session::parse(label).ok_or_else(|| AppError::InvalidSession(label.into())))
        .transpose()
}

pub fn handle(cmd: &Commands, cfg: &Config) -> AppResult<()> {
    if let Commands::Records {
        event,
        session,
        json,
    } = cmd
    {
        let pool = open_db(cfg)?;
        let ev = require_event(&pool, *event)?;
        let records = pool.list_attendance_records(ev.id, session_filter(session)?)?;

        if *json {
            let out = serde_json::to_string_pretty(&records)
                .map_err(|e| AppError::Other(e.to_string()))?;
            println!("{}", out);
            return Ok(());
        }

        if records.is_empty() {
            info(format!("No attendance records for '{}'.", ev.name));
            return Ok(());
        }

        let mut table = Table::new(["#", "TIME", "SESSION", "TOKEN", "NAME"]);
        for rec in &records {
            table.add_row(vec![
                format!("{GREY}{}{RESET}", rec.id),
                rec.captured_at.format("%Y-%m-%d %H:%M:%S").to_string(),
                rec.session.to_string(),
                rec.token.clone(),
                rec.student_name
                    .clone()
                    .unwrap_or_else(|| format!("{GREY}--{RESET}")),
            ]);
        }
        print!("{}", table.render());
    }

    Ok(())
}
