//! SQLite adapter for the storage port.

use crate::db::pool::DbPool;
use crate::errors::{AppError, AppResult};
use crate::models::{
    AttendanceRecord, Event, NewAttendanceRecord, NewStudent, Roll, Session, Student,
};
use crate::store::AttendanceStore;
use chrono::{DateTime, Local};
use rusqlite::types::Type;
use rusqlite::{OptionalExtension, Row, Transaction, TransactionBehavior, params};

fn to_db_time(at: &DateTime<Local>) -> String {
    at.to_rfc3339()
}

fn parse_db_time(idx: usize, raw: &str) -> rusqlite::Result<DateTime<Local>> {
    DateTime::parse_from_rfc3339(raw)
        .map(|dt| dt.with_timezone(&Local))
        .map_err(|e| rusqlite::Error::FromSqlConversionFailure(idx, Type::Text, Box::new(e)))
}

fn parse_opt_time(idx: usize, raw: Option<String>) -> rusqlite::Result<Option<DateTime<Local>>> {
    raw.map(|s| parse_db_time(idx, &s)).transpose()
}

pub fn map_event(row: &Row) -> rusqlite::Result<Event> {
    let created: String = row.get("created_at")?;
    Ok(Event {
        id: row.get("id")?,
        name: row.get("name")?,
        created_at: parse_db_time(2, &created)?,
        has_roster: row.get::<_, i32>("has_roster")? == 1,
    })
}

pub fn map_student(row: &Row) -> rusqlite::Result<Student> {
    let roll_str: String = row.get("roll")?;
    let roll = Roll::parse(&roll_str).ok_or_else(|| {
        rusqlite::Error::FromSqlConversionFailure(
            1,
            Type::Text,
            Box::new(AppError::Storage(format!("invalid stored roll '{}'", roll_str))),
        )
    })?;

    Ok(Student {
        event_id: row.get("event_id")?,
        roll,
        name: row.get("name")?,
        morning: parse_opt_time(3, row.get("morning_time")?)?,
        afternoon: parse_opt_time(4, row.get("afternoon_time")?)?,
        evening: parse_opt_time(5, row.get("evening_time")?)?,
    })
}

pub fn map_record(row: &Row) -> rusqlite::Result<AttendanceRecord> {
    let session_str: String = row.get("session")?;
    let session = Session::from_db_str(&session_str).ok_or_else(|| {
        rusqlite::Error::FromSqlConversionFailure(
            4,
            Type::Text,
            Box::new(AppError::InvalidSession(session_str.clone())),
        )
    })?;
    let captured: String = row.get("captured_at")?;

    Ok(AttendanceRecord {
        id: row.get("id")?,
        event_id: row.get("event_id")?,
        token: row.get("token")?,
        student_name: row.get("student_name")?,
        session,
        captured_at: parse_db_time(5, &captured)?,
    })
}

impl DbPool {
    fn require_event(&self, event_id: i64) -> AppResult<()> {
        if self.get_event(event_id)?.is_some() {
            Ok(())
        } else {
            Err(AppError::EventNotFound(event_id))
        }
    }
}

impl AttendanceStore for DbPool {
    fn create_event(&self, name: &str) -> AppResult<i64> {
        self.conn.execute(
            "INSERT INTO events (name, created_at, has_roster) VALUES (?1, ?2, 0)",
            params![name, to_db_time(&Local::now())],
        )?;
        Ok(self.conn.last_insert_rowid())
    }

    fn get_event(&self, id: i64) -> AppResult<Option<Event>> {
        let mut stmt = self.conn.prepare_cached(
            "SELECT id, name, created_at, has_roster FROM events WHERE id = ?1",
        )?;
        Ok(stmt.query_row([id], map_event).optional()?)
    }

    fn list_events(&self) -> AppResult<Vec<Event>> {
        let mut stmt = self.conn.prepare_cached(
            "SELECT id, name, created_at, has_roster FROM events
             ORDER BY id DESC",
        )?;
        let rows = stmt.query_map([], map_event)?;

        let mut out = Vec::new();
        for r in rows {
            out.push(r?);
        }
        Ok(out)
    }

    fn delete_event(&self, id: i64) -> AppResult<bool> {
        // students/attendance follow through ON DELETE CASCADE
        let n = self.conn.execute("DELETE FROM events WHERE id = ?1", [id])?;
        Ok(n > 0)
    }

    fn upsert_students(&self, event_id: i64, students: &[NewStudent]) -> AppResult<()> {
        self.require_event(event_id)?;

        let mut stmt = self.conn.prepare_cached(
            "INSERT INTO students (event_id, roll, name)
             VALUES (?1, ?2, ?3)
             ON CONFLICT(event_id, roll) DO UPDATE SET name = excluded.name",
        )?;
        for s in students {
            stmt.execute(params![event_id, s.roll.as_str(), s.name])?;
        }
        Ok(())
    }

    fn get_student(&self, event_id: i64, roll: &Roll) -> AppResult<Option<Student>> {
        let mut stmt = self.conn.prepare_cached(
            "SELECT event_id, roll, name, morning_time, afternoon_time, evening_time
             FROM students
             WHERE event_id = ?1 AND roll = ?2",
        )?;
        Ok(stmt
            .query_row(params![event_id, roll.as_str()], map_student)
            .optional()?)
    }

    fn update_student(&self, student: &Student) -> AppResult<()> {
        let n = self.conn.execute(
            "UPDATE students
             SET name = ?1, morning_time = ?2, afternoon_time = ?3, evening_time = ?4
             WHERE event_id = ?5 AND roll = ?6",
            params![
                student.name,
                student.morning.as_ref().map(to_db_time),
                student.afternoon.as_ref().map(to_db_time),
                student.evening.as_ref().map(to_db_time),
                student.event_id,
                student.roll.as_str(),
            ],
        )?;
        if n == 0 {
            return Err(AppError::Storage(format!(
                "student {} not found in event {}",
                student.roll, student.event_id
            )));
        }
        Ok(())
    }

    fn mark_present(
        &self,
        event_id: i64,
        roll: &Roll,
        session: Session,
        at: DateTime<Local>,
    ) -> AppResult<bool> {
        let col = session.time_column();
        let sql = format!(
            "UPDATE students SET {col} = ?1
             WHERE event_id = ?2 AND roll = ?3 AND {col} IS NULL"
        );
        let n = self
            .conn
            .execute(&sql, params![to_db_time(&at), event_id, roll.as_str()])?;
        Ok(n == 1)
    }

    fn list_students(&self, event_id: i64) -> AppResult<Vec<Student>> {
        let mut stmt = self.conn.prepare_cached(
            "SELECT event_id, roll, name, morning_time, afternoon_time, evening_time
             FROM students
             WHERE event_id = ?1
             ORDER BY name ASC, roll ASC",
        )?;
        let rows = stmt.query_map([event_id], map_student)?;

        let mut out = Vec::new();
        for r in rows {
            out.push(r?);
        }
        Ok(out)
    }

    fn set_event_has_roster(&self, event_id: i64, has_roster: bool) -> AppResult<()> {
        let n = self.conn.execute(
            "UPDATE events SET has_roster = ?1 WHERE id = ?2",
            params![if has_roster { 1 } else { 0 }, event_id],
        )?;
        if n == 0 {
            return Err(AppError::EventNotFound(event_id));
        }
        Ok(())
    }

    fn insert_attendance_record(&self, record: &NewAttendanceRecord) -> AppResult<i64> {
        self.conn.execute(
            "INSERT INTO attendance (event_id, token, student_name, session, captured_at)
             VALUES (?1, ?2, ?3, ?4, ?5)",
            params![
                record.event_id,
                record.token,
                record.student_name,
                record.session.to_db_str(),
                to_db_time(&record.captured_at),
            ],
        )?;
        Ok(self.conn.last_insert_rowid())
    }

    fn list_attendance_records(
        &self,
        event_id: i64,
        session: Option<Session>,
    ) -> AppResult<Vec<AttendanceRecord>> {
        let mut out = Vec::new();

        match session {
            None => {
                let mut stmt = self.conn.prepare_cached(
                    "SELECT id, event_id, token, student_name, session, captured_at
                     FROM attendance
                     WHERE event_id = ?1
                     ORDER BY id ASC",
                )?;
                let rows = stmt.query_map([event_id], map_record)?;
                for r in rows {
                    out.push(r?);
                }
            }
            Some(s) => {
                let mut stmt = self.conn.prepare_cached(
                    "SELECT id, event_id, token, student_name, session, captured_at
                     FROM attendance
                     WHERE event_id = ?1 AND session = ?2
                     ORDER BY id ASC",
                )?;
                let rows = stmt.query_map(params![event_id, s.to_db_str()], map_record)?;
                for r in rows {
                    out.push(r?);
                }
            }
        }

        Ok(out)
    }

    fn atomically<T, F>(&self, f: F) -> AppResult<T>
    where
        F: FnOnce(&Self) -> AppResult<T>,
    {
        // Already inside a transaction: join it.
        if !self.conn.is_autocommit() {
            return f(self);
        }

        // IMMEDIATE takes the write lock up front, so a competing process
        // waits on busy_timeout instead of failing on lock upgrade.
        let tx = Transaction::new_unchecked(&self.conn, TransactionBehavior::Immediate)?;
        let value = f(self)?; // dropping `tx` on error rolls back
        tx.commit()?;
        Ok(value)
    }
}
