use chrono::{DateTime, Local};
use serde::Serialize;

/// An attendance-taking container. Owns its students and records.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Event {
    pub id: i64,
    pub name: String,
    pub created_at: DateTime<Local>, // ⇔ events.created_at (TEXT, RFC3339)
    pub has_roster: bool,            // ⇔ events.has_roster (INT 0/1)
}

impl Event {
    pub fn mode_label(&self) -> &'static str {
        if self.has_roster { "roster" } else { "freeform" }
    }

    pub fn created_str(&self) -> String {
        self.created_at.format("%Y-%m-%d %H:%M").to_string()
    }
}
