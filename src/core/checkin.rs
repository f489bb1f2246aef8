//! Check-in decision engine.
//!
//! For every scanned token the processor decides between a new check-in, a
//! duplicate, an identity missing from the roster, or a freeform scan. The
//! operating mode is inferred per event from whether it has a roster; the
//! processor keeps no state of its own between calls.

use crate::errors::{AppError, AppResult};
use crate::models::{NewAttendanceRecord, NewStudent, Roll, Session, Student};
use crate::store::AttendanceStore;
use chrono::{DateTime, Local};
use std::fmt;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RejectReason {
    EmptyToken,
    /// Control characters (line breaks, tabs, escapes) inside the token.
    InvalidToken,
    /// The scanner sent bytes that are not UTF-8.
    InvalidEncoding,
    InvalidSession(String),
    UnknownEvent(i64),
}

impl fmt::Display for RejectReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RejectReason::EmptyToken => f.write_str("empty token"),
            RejectReason::InvalidToken => f.write_str("token contains control characters"),
            RejectReason::InvalidEncoding => f.write_str("token is not valid UTF-8"),
            RejectReason::InvalidSession(s) => write!(f, "invalid session '{}'", s),
            RejectReason::UnknownEvent(id) => write!(f, "event {} does not exist", id),
        }
    }
}

/// User-facing classification; every outcome maps to exactly one.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MessageClass {
    Accepted,
    Duplicate,
    Unknown,
    Rejected,
    Error,
}

#[derive(Debug, Clone, PartialEq)]
pub enum ScanOutcome {
    /// A check-in was stored. `student_name` is `None` in freeform mode.
    Accepted {
        student_name: Option<String>,
        token: String,
        session: Session,
        record_id: i64,
    },
    /// The student is already present for this session. Nothing was written.
    Duplicate {
        student_name: String,
        session: Session,
    },
    /// Roster-backed event, token not on it. Nothing was written; see
    /// [`CheckInProcessor::admit_unlisted`].
    UnknownNeedsConfirmation { token: String, session: Session },
    Rejected(RejectReason),
    /// The store failed; this scan had no effect and may be retried.
    StorageError(String),
}

impl ScanOutcome {
    pub fn message_class(&self) -> MessageClass {
        match self {
            ScanOutcome::Accepted { .. } => MessageClass::Accepted,
            ScanOutcome::Duplicate { .. } => MessageClass::Duplicate,
            ScanOutcome::UnknownNeedsConfirmation { .. } => MessageClass::Unknown,
            ScanOutcome::Rejected(_) => MessageClass::Rejected,
            ScanOutcome::StorageError(_) => MessageClass::Error,
        }
    }

    pub fn message(&self) -> String {
        match self {
            ScanOutcome::Accepted {
                student_name: Some(name),
                session,
                ..
            } => format!("Thank you {}\n{} attendance recorded", name, session),
            ScanOutcome::Accepted {
                student_name: None,
                token,
                ..
            } => format!("Scanned ID: {}", token),
            ScanOutcome::Duplicate {
                student_name,
                session,
            } => format!("{} already marked present for {}", student_name, session),
            ScanOutcome::UnknownNeedsConfirmation { token, .. } => {
                format!("{} is not on the roster", token)
            }
            ScanOutcome::Rejected(reason) => format!("Scan rejected: {}", reason),
            ScanOutcome::StorageError(e) => format!("Scan not saved: {}", e),
        }
    }

    pub fn is_accepted(&self) -> bool {
        matches!(self, ScanOutcome::Accepted { .. })
    }
}

impl From<AppError> for ScanOutcome {
    fn from(e: AppError) -> Self {
        ScanOutcome::StorageError(e.to_string())
    }
}

/// Input checks shared by both entry points.
fn validate(session: &str, token: &str) -> Result<(Session, Roll), RejectReason> {
    let roll = Roll::parse(token).ok_or(RejectReason::EmptyToken)?;
    if roll.as_str().chars().any(char::is_control) {
        return Err(RejectReason::InvalidToken);
    }
    let session =
        Session::parse(session).ok_or_else(|| RejectReason::InvalidSession(session.to_string()))?;
    Ok((session, roll))
}

pub struct CheckInProcessor<'a, S: AttendanceStore> {
    store: &'a S,
    clock: fn() -> DateTime<Local>,
}

impl<'a, S: AttendanceStore> CheckInProcessor<'a, S> {
    pub fn new(store: &'a S) -> Self {
        Self {
            store,
            clock: Local::now,
        }
    }

    pub fn with_clock(mut self, clock: fn() -> DateTime<Local>) -> Self {
        self.clock = clock;
        self
    }

    /// Classify one scanned token for `session` of event `event_id` and
    /// persist the check-in when it is accepted.
    pub fn process_scan(&self, event_id: i64, session: &str, token: &str) -> ScanOutcome {
        let (session, roll) = match validate(session, token) {
            Ok(v) => v,
            Err(reason) => return ScanOutcome::Rejected(reason),
        };

        match self.classify(event_id, session, &roll, token) {
            Ok(outcome) => outcome,
            Err(e) => e.into(),
        }
    }

    /// Confirmation step after `UnknownNeedsConfirmation`: add the token as a
    /// student already present for `session` and record the check-in.
    ///
    /// If the roll exists by now, behaves like a regular scan of it.
    pub fn admit_unlisted(
        &self,
        event_id: i64,
        session: &str,
        token: &str,
        name: &str,
    ) -> ScanOutcome {
        let (session, roll) = match validate(session, token) {
            Ok(v) => v,
            Err(reason) => return ScanOutcome::Rejected(reason),
        };

        let name = match name.trim() {
            "" => roll.as_str().to_string(),
            n => n.to_string(),
        };

        let res = self.store.atomically(|store| {
            if store.get_event(event_id)?.is_none() {
                return Ok(ScanOutcome::Rejected(RejectReason::UnknownEvent(event_id)));
            }

            if let Some(existing) = store.get_student(event_id, &roll)? {
                return self.check_in(store, existing, session, token);
            }

            store.upsert_students(
                event_id,
                &[NewStudent {
                    roll: roll.clone(),
                    name: name.clone(),
                }],
            )?;
            store.set_event_has_roster(event_id, true)?;

            match store.get_student(event_id, &roll)? {
                Some(created) => self.check_in(store, created, session, token),
                None => Err(AppError::Storage(format!(
                    "student {} vanished after insert",
                    roll
                ))),
            }
        });

        match res {
            Ok(outcome) => outcome,
            Err(e) => e.into(),
        }
    }

    fn classify(
        &self,
        event_id: i64,
        session: Session,
        roll: &Roll,
        token: &str,
    ) -> AppResult<ScanOutcome> {
        self.store.atomically(|store| {
            let Some(event) = store.get_event(event_id)? else {
                return Ok(ScanOutcome::Rejected(RejectReason::UnknownEvent(event_id)));
            };

            if let Some(student) = store.get_student(event_id, roll)? {
                return self.check_in(store, student, session, token);
            }

            if event.has_roster {
                return Ok(ScanOutcome::UnknownNeedsConfirmation {
                    token: token.to_string(),
                    session,
                });
            }

            // Freeform: log every scan, no identity, no dedup.
            let record_id = store.insert_attendance_record(&NewAttendanceRecord {
                event_id,
                token: token.to_string(),
                student_name: None,
                session,
                captured_at: (self.clock)(),
            })?;

            Ok(ScanOutcome::Accepted {
                student_name: None,
                token: token.to_string(),
                session,
                record_id,
            })
        })
    }

    /// Mark `student` present and append the record, or report a duplicate.
    /// Must run inside an atomic section.
    fn check_in(
        &self,
        store: &S,
        student: Student,
        session: Session,
        token: &str,
    ) -> AppResult<ScanOutcome> {
        let now = (self.clock)();

        if !store.mark_present(student.event_id, &student.roll, session, now)? {
            return Ok(ScanOutcome::Duplicate {
                student_name: student.name,
                session,
            });
        }

        let record_id = store.insert_attendance_record(&NewAttendanceRecord {
            event_id: student.event_id,
            token: token.to_string(),
            student_name: Some(student.name.clone()),
            session,
            captured_at: now,
        })?;

        Ok(ScanOutcome::Accepted {
            student_name: Some(student.name),
            token: token.to_string(),
            session,
            record_id,
        })
    }
}
