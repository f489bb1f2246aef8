use super::session::Session;
use chrono::{DateTime, Local};
use serde::Serialize;

/// Append-only audit entry. Exists for freeform and roster-backed events alike.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AttendanceRecord {
    pub id: i64,
    pub event_id: i64,
    pub token: String,                // raw scanned text, as captured
    pub student_name: Option<String>, // resolved name, None in freeform mode
    pub session: Session,
    pub captured_at: DateTime<Local>,
}

impl AttendanceRecord {
    /// Name if resolved, raw token otherwise.
    pub fn display_label(&self) -> &str {
        self.student_name.as_deref().unwrap_or(&self.token)
    }
}

/// Insert payload; the store assigns the id.
#[derive(Debug, Clone, PartialEq)]
pub struct NewAttendanceRecord {
    pub event_id: i64,
    pub token: String,
    pub student_name: Option<String>,
    pub session: Session,
    pub captured_at: DateTime<Local>,
}

impl NewAttendanceRecord {
    pub fn into_record(self, id: i64) -> AttendanceRecord {
        AttendanceRecord {
            id,
            event_id: self.event_id,
            token: self.token,
            student_name: self.student_name,
            session: self.session,
            captured_at: self.captured_at,
        }
    }
}
