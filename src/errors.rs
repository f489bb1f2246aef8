//! Unified application error type.
//! All modules (db, store, core, cli, export) return AppError to keep the error
//! handling consistent and easy to manage.

use std::io;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum AppError {
    // ---------------------------
    // IO
    // ---------------------------
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    // ---------------------------
    // Storage
    // ---------------------------
    #[error("Database error: {0}")]
    Db(#[from] rusqlite::Error),

    #[error("Database migration error: {0}")]
    Migration(String),

    #[error("Storage error: {0}")]
    Storage(String),

    // ---------------------------
    // Domain
    // ---------------------------
    #[error("Event not found: {0}")]
    EventNotFound(i64),

    #[error("Invalid session: '{0}' (expected morning, afternoon or evening)")]
    InvalidSession(String),

    #[error("Invalid scan transition: cannot {action} while {from}")]
    InvalidTransition { from: String, action: &'static str },

    // ---------------------------
    // Roster import
    // ---------------------------
    #[error("Roster parse error: {0}")]
    RosterParse(String),

    // ---------------------------
    // Config errors
    // ---------------------------
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Failed to load configuration")]
    ConfigLoad,

    #[error("Failed to save configuration")]
    ConfigSave,

    // ---------------------------
    // Export errors
    // ---------------------------
    #[error("Export failed: {0}")]
    ExportIo(String),

    // ---------------------------
    // Generic fallback
    // ---------------------------
    #[error("Internal error: {0}")]
    Other(String),
}

pub type AppResult<T> = Result<T, AppError>;
