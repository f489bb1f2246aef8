use crate::cli::commands::{ask_confirmation, open_db, require_event};
use crate::cli::parser::{Commands, EventAction};
use crate::config::Config;
use crate::db::log::ttlog_soft;
use crate::errors::{AppError, AppResult};
use crate::store::AttendanceStore;
use crate::ui::messages::{info, success};
use crate::utils::colors::{CYAN, GREY, RESET, YELLOW};
use crate::utils::table::Table;

pub fn handle(cmd: &Commands, cfg: &Config) -> AppResult<()> {
    if let Commands::Event { action } = cmd {
        let pool = open_db(cfg)?;

        match action {
            EventAction::Create { name } => {
                let name = name.trim();
                if name.is_empty() {
                    return Err(AppError::Other("event name cannot be empty".into()));
                }

                let id = pool.create_event(name)?;
                ttlog_soft(
                    &pool.conn,
                    "event_create",
                    &id.to_string(),
                    &format!("Event '{}' created", name),
                );
                success(format!("Event #{} created: {}", id, name));
            }

            EventAction::List => {
                let events = pool.list_events()?;
                if events.is_empty() {
                    info("No events yet. Create one with `rattendance event create <NAME>`.");
                    return Ok(());
                }

                let mut table = Table::new(["ID", "NAME", "CREATED", "MODE"]);
                for ev in &events {
                    let mode_color = if ev.has_roster { CYAN } else { YELLOW };
                    table.add_row(vec![
                        format!("{GREY}{}{RESET}", ev.id),
                        ev.name.clone(),
                        ev.created_str(),
                        format!("{mode_color}{}{RESET}", ev.mode_label()),
                    ]);
                }
                print!("{}", table.render());
            }

            EventAction::Delete { id, yes } => {
                let event = require_event(&pool, *id)?;

                let prompt = format!(
                    "Delete event #{} '{}' with its roster and all attendance records? This action is irreversible.",
                    event.id, event.name
                );
                if !*yes && !ask_confirmation(&prompt) {
                    info("Operation cancelled.");
                    return Ok(());
                }

                if pool.delete_event(event.id)? {
                    ttlog_soft(
                        &pool.conn,
                        "event_delete",
                        &event.id.to_string(),
                        &format!("Event '{}' deleted", event.name),
                    );
                    success(format!("Event #{} has been deleted.", event.id));
                } else {
                    return Err(AppError::EventNotFound(event.id));
                }
            }
        }
    }

    Ok(())
}
