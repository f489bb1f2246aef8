use crate::cli::commands::open_db;
use crate::cli::parser::{Commands, RosterAction};
use crate::config::Config;
use crate::core::RosterImporter;
use crate::db::log::ttlog_soft;
use crate::errors::AppResult;
use crate::import::read_roster_file;
use crate::ui::messages::{info, success, warning};
use crate::utils::path::expand_tilde;

pub fn handle(cmd: &Commands, cfg: &Config) -> AppResult<()> {
    if let Commands::Roster {
        action: RosterAction::Import { event, file },
    } = cmd
    {
        let path = expand_tilde(file);
        let rows = read_roster_file(&path)?;

        let pool = open_db(cfg)?;
        let summary = RosterImporter::import(&pool, *event, rows)?;

        for skipped in &summary.skipped {
            warning(format!(
                "Line {} skipped: {}",
                skipped.line,
                skipped.reason.as_str()
            ));
        }

        if summary.students == 0 {
            info("No students imported; the event stays in freeform mode.");
        } else {
            success(format!(
                "Roster imported: {} row(s) accepted, {} skipped, {} student(s)",
                summary.accepted,
                summary.skipped.len(),
                summary.students
            ));
        }

        ttlog_soft(
            &pool.conn,
            "roster_import",
            &event.to_string(),
            &format!(
                "{}: {} accepted, {} skipped",
                path.display(),
                summary.accepted,
                summary.skipped.len()
            ),
        );
    }

    Ok(())
}
