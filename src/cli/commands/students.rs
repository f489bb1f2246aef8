use crate::cli::commands::{open_db, require_event};
use crate::cli::parser::Commands;
use crate::config::Config;
use crate::errors::AppResult;
use crate::models::Session;
use crate::store::AttendanceStore;
use crate::ui::messages::{header, info};
use crate::utils::colors::{ABSENT, colorize_presence};
use crate::utils::table::Table;

pub fn handle(cmd: &Commands, cfg: &Config) -> AppResult<()> {
    if let Commands::Students { event } = cmd {
        let pool = open_db(cfg)?;
        let ev = require_event(&pool, *event)?;
        let students = pool.list_students(ev.id)?;

        header(format!("{} ({})", ev.name, ev.mode_label()));

        if students.is_empty() {
            info("No students on the roster.");
            return Ok(());
        }

        let mut headers = vec!["ROLL".to_string(), "NAME".to_string()];
        headers.extend(Session::ALL.iter().map(|s| s.title().to_uppercase()));
        let mut table = Table::new(headers);

        for st in &students {
            let mut row = vec![st.roll.to_string(), st.name.clone()];
            for session in Session::ALL {
                let cell = st
                    .checked_in_at(session)
                    .map(|t| t.format("%H:%M").to_string())
                    .unwrap_or_else(|| ABSENT.to_string());
                row.push(colorize_presence(&cell));
            }
            table.add_row(row);
        }

        print!("{}", table.render());

        for session in Session::ALL {
            let present = students.iter().filter(|s| s.is_present(session)).count();
            println!("{}: {}/{}", session.title(), present, students.len());
        }
    }

    Ok(())
}
