//! Storage port consumed by the reconciliation core.
//!
//! The core never caches entities: every decision is taken from a fresh read
//! through this trait. Implementations own the physical persistence.
//! `db::store` provides the SQLite adapter, [`memory::MemoryStore`] an
//! in-process one.

pub mod memory;

use crate::errors::AppResult;
use crate::models::{AttendanceRecord, Event, NewAttendanceRecord, NewStudent, Roll, Session, Student};
use chrono::{DateTime, Local};

pub use memory::MemoryStore;

pub trait AttendanceStore {
    /// Create an event stamped with the current local time and return its id.
    fn create_event(&self, name: &str) -> AppResult<i64>;

    fn get_event(&self, id: i64) -> AppResult<Option<Event>>;

    /// Events ordered by creation time, newest first.
    fn list_events(&self) -> AppResult<Vec<Event>>;

    /// Delete an event together with its students and attendance records.
    /// Returns `false` when no such event existed.
    fn delete_event(&self, id: i64) -> AppResult<bool>;

    /// Insert or replace by `(event_id, roll)`. An existing student keeps its
    /// presence times; only the display name is replaced.
    fn upsert_students(&self, event_id: i64, students: &[NewStudent]) -> AppResult<()>;

    fn get_student(&self, event_id: i64, roll: &Roll) -> AppResult<Option<Student>>;

    fn update_student(&self, student: &Student) -> AppResult<()>;

    /// Compare-and-swap on one session's presence: set the check-in time only
    /// if it is still unset. Returns `true` when this call made the change.
    fn mark_present(
        &self,
        event_id: i64,
        roll: &Roll,
        session: Session,
        at: DateTime<Local>,
    ) -> AppResult<bool>;

    /// Students of an event ordered by name.
    fn list_students(&self, event_id: i64) -> AppResult<Vec<Student>>;

    fn set_event_has_roster(&self, event_id: i64, has_roster: bool) -> AppResult<()>;

    fn insert_attendance_record(&self, record: &NewAttendanceRecord) -> AppResult<i64>;

    /// Records in insertion order, optionally restricted to one session.
    fn list_attendance_records(
        &self,
        event_id: i64,
        session: Option<Session>,
    ) -> AppResult<Vec<AttendanceRecord>>;

    /// Run `f` as one unit: either every write it performs is kept, or none is.
    fn atomically<T, F>(&self, f: F) -> AppResult<T>
    where
        F: FnOnce(&Self) -> AppResult<T>,
        Self: Sized;
}
