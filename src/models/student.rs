use super::roll::Roll;
use super::session::Session;
use chrono::{DateTime, Local};
use serde::Serialize;

/// Roster entry scoped to one event, keyed by `(event_id, roll)`.
///
/// Presence is stored only as the optional check-in time of each session,
/// so "present" and "has a timestamp" can never disagree.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Student {
    pub event_id: i64,
    pub roll: Roll,
    pub name: String,
    pub morning: Option<DateTime<Local>>,
    pub afternoon: Option<DateTime<Local>>,
    pub evening: Option<DateTime<Local>>,
}

impl Student {
    pub fn new(event_id: i64, roll: Roll, name: impl Into<String>) -> Self {
        Self {
            event_id,
            roll,
            name: name.into(),
            morning: None,
            afternoon: None,
            evening: None,
        }
    }

    pub fn checked_in_at(&self, session: Session) -> Option<DateTime<Local>> {
        match session {
            Session::Morning => self.morning,
            Session::Afternoon => self.afternoon,
            Session::Evening => self.evening,
        }
    }

    pub fn is_present(&self, session: Session) -> bool {
        self.checked_in_at(session).is_some()
    }

    pub fn set_present(&mut self, session: Session, at: DateTime<Local>) {
        let slot = match session {
            Session::Morning => &mut self.morning,
            Session::Afternoon => &mut self.afternoon,
            Session::Evening => &mut self.evening,
        };
        *slot = Some(at);
    }
}

/// Insert payload for roster upserts.
#[derive(Debug, Clone, PartialEq)]
pub struct NewStudent {
    pub roll: Roll,
    pub name: String,
}
