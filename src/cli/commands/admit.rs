use crate::cli::commands::scan::report;
use crate::cli::commands::{open_db, require_event, session_label};
use crate::cli::parser::Commands;
use crate::config::Config;
use crate::core::{CheckInProcessor, MessageClass};
use crate::db::log::ttlog_soft;
use crate::errors::{AppError, AppResult};

pub fn handle(cmd: &Commands, cfg: &Config) -> AppResult<()> {
    if let Commands::Admit {
        event,
        token,
        name,
        session,
    } = cmd
    {
        let pool = open_db(cfg)?;
        let ev = require_event(&pool, *event)?;
        let session = session_label(session, cfg);

        let outcome = CheckInProcessor::new(&pool).admit_unlisted(
            ev.id,
            &session,
            token,
            name.as_deref().unwrap_or(""),
        );
        report(&outcome);

        match outcome.message_class() {
            MessageClass::Accepted => ttlog_soft(
                &pool.conn,
                "admit",
                token.trim(),
                &format!("Admitted to '{}' for {}", ev.name, session.trim()),
            ),
            MessageClass::Rejected | MessageClass::Error => {
                return Err(AppError::Other(outcome.message()));
            }
            MessageClass::Duplicate | MessageClass::Unknown => {}
        }
    }

    Ok(())
}
