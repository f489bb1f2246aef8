pub mod admit;
pub mod backup;
pub mod config;
pub mod db;
pub mod event;
pub mod export;
pub mod init;
pub mod log;
pub mod records;
pub mod roster;
pub mod scan;
pub mod students;

use crate::config::Config;
use crate::db::initialize::init_db;
use crate::db::pool::DbPool;
use crate::errors::{AppError, AppResult};
use crate::models::Event;
use crate::store::AttendanceStore;
use crate::ui::messages::warning;
use std::io::{self, Write};

/// Open the configured database with its schema up to date.
pub(crate) fn open_db(cfg: &Config) -> AppResult<DbPool> {
    let pool = DbPool::new(&cfg.database)?;
    init_db(&pool.conn)?;
    Ok(pool)
}

/// `--session` as typed, otherwise the configured default. Validation is
/// left to the processor so a bad label is reported as a rejected scan.
pub(crate) fn session_label(arg: &Option<String>, cfg: &Config) -> String {
    arg.clone().unwrap_or_else(|| cfg.default_session.clone())
}

pub(crate) fn require_event<S: AttendanceStore>(store: &S, id: i64) -> AppResult<Event> {
    store.get_event(id)?.ok_or(AppError::EventNotFound(id))
}

/// Ask a yes/no confirmation from the user
pub(crate) fn ask_confirmation(prompt: &str) -> bool {
    warning(prompt);
    print!("Confirm [y/N]: ");
    let _ = io::stdout().flush();

    let mut s = String::new();
    if io::stdin().read_line(&mut s).is_ok() {
        crate::export::fs_utils::is_yes(&s)
    } else {
        false
    }
}
