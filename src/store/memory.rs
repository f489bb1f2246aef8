//! In-process implementation of the storage port.
//!
//! Useful for tests and as a reference for the SQLite adapter's semantics.
//! Every operation takes a turn: one thread at a time, re-entrant for the
//! thread inside an atomic section. A failed section restores the snapshot
//! taken when its turn began, so it can only undo its own writes.

use super::AttendanceStore;
use crate::errors::{AppError, AppResult};
use crate::models::{
    AttendanceRecord, Event, NewAttendanceRecord, NewStudent, Roll, Session, Student,
};
use chrono::{DateTime, Local};
use std::collections::BTreeMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Condvar, Mutex, MutexGuard, PoisonError};
use std::thread::{self, ThreadId};

#[derive(Debug, Default, Clone)]
struct State {
    last_event_id: i64,
    last_record_id: i64,
    events: BTreeMap<i64, Event>,
    students: BTreeMap<(i64, Roll), Student>,
    records: Vec<AttendanceRecord>,
}

#[derive(Debug, Default)]
pub struct MemoryStore {
    state: Mutex<State>,
    /// Thread currently holding the turn.
    owner: Mutex<Option<ThreadId>>,
    turn_free: Condvar,
    read_only: AtomicBool,
}

/// Releases the turn on drop. A nested call holds a non-owning guard.
struct Turn<'a> {
    store: &'a MemoryStore,
    owned: bool,
}

impl Drop for Turn<'_> {
    fn drop(&mut self) {
        if self.owned {
            *self
                .store
                .owner
                .lock()
                .unwrap_or_else(PoisonError::into_inner) = None;
            self.store.turn_free.notify_one();
        }
    }
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// While set, every write fails with `AppError::Storage`.
    pub fn set_read_only(&self, read_only: bool) {
        self.read_only.store(read_only, Ordering::SeqCst);
    }

    fn turn(&self) -> AppResult<Turn<'_>> {
        let me = thread::current().id();
        let poisoned = |_| AppError::Storage("memory store turn lock poisoned".into());

        let mut owner = self.owner.lock().map_err(poisoned)?;
        if *owner == Some(me) {
            return Ok(Turn {
                store: self,
                owned: false,
            });
        }
        while owner.is_some() {
            owner = self.turn_free.wait(owner).map_err(poisoned)?;
        }
        *owner = Some(me);

        Ok(Turn {
            store: self,
            owned: true,
        })
    }

    fn state(&self) -> AppResult<MutexGuard<'_, State>> {
        self.state
            .lock()
            .map_err(|_| AppError::Storage("memory store lock poisoned".into()))
    }

    fn writable(&self) -> AppResult<MutexGuard<'_, State>> {
        if self.read_only.load(Ordering::SeqCst) {
            return Err(AppError::Storage("store is read-only".into()));
        }
        self.state()
    }
}

fn require_event(state: &State, event_id: i64) -> AppResult<()> {
    if state.events.contains_key(&event_id) {
        Ok(())
    } else {
        Err(AppError::EventNotFound(event_id))
    }
}

impl AttendanceStore for MemoryStore {
    fn create_event(&self, name: &str) -> AppResult<i64> {
        let _turn = self.turn()?;
        let mut st = self.writable()?;
        st.last_event_id += 1;
        let id = st.last_event_id;
        st.events.insert(
            id,
            Event {
                id,
                name: name.to_string(),
                created_at: Local::now(),
                has_roster: false,
            },
        );
        Ok(id)
    }

    fn get_event(&self, id: i64) -> AppResult<Option<Event>> {
        let _turn = self.turn()?;
        Ok(self.state()?.events.get(&id).cloned())
    }

    fn list_events(&self) -> AppResult<Vec<Event>> {
        let _turn = self.turn()?;
        let mut out: Vec<Event> = self.state()?.events.values().cloned().collect();
        out.sort_by(|a, b| b.id.cmp(&a.id));
        Ok(out)
    }

    fn delete_event(&self, id: i64) -> AppResult<bool> {
        let _turn = self.turn()?;
        let mut st = self.writable()?;
        if st.events.remove(&id).is_none() {
            return Ok(false);
        }
        st.students.retain(|(event_id, _), _| *event_id != id);
        st.records.retain(|r| r.event_id != id);
        Ok(true)
    }

    fn upsert_students(&self, event_id: i64, students: &[NewStudent]) -> AppResult<()> {
        let _turn = self.turn()?;
        let mut st = self.writable()?;
        require_event(&st, event_id)?;
        for s in students {
            st.students
                .entry((event_id, s.roll.clone()))
                .and_modify(|existing| existing.name = s.name.clone())
                .or_insert_with(|| Student::new(event_id, s.roll.clone(), s.name.clone()));
        }
        Ok(())
    }

    fn get_student(&self, event_id: i64, roll: &Roll) -> AppResult<Option<Student>> {
        let _turn = self.turn()?;
        Ok(self
            .state()?
            .students
            .get(&(event_id, roll.clone()))
            .cloned())
    }

    fn update_student(&self, student: &Student) -> AppResult<()> {
        let _turn = self.turn()?;
        let mut st = self.writable()?;
        match st
            .students
            .get_mut(&(student.event_id, student.roll.clone()))
        {
            Some(slot) => {
                *slot = student.clone();
                Ok(())
            }
            None => Err(AppError::Storage(format!(
                "student {} not found in event {}",
                student.roll, student.event_id
            ))),
        }
    }

    fn mark_present(
        &self,
        event_id: i64,
        roll: &Roll,
        session: Session,
        at: DateTime<Local>,
    ) -> AppResult<bool> {
        let _turn = self.turn()?;
        let mut st = self.writable()?;
        match st.students.get_mut(&(event_id, roll.clone())) {
            Some(s) if !s.is_present(session) => {
                s.set_present(session, at);
                Ok(true)
            }
            _ => Ok(false),
        }
    }

    fn list_students(&self, event_id: i64) -> AppResult<Vec<Student>> {
        let _turn = self.turn()?;
        let mut out: Vec<Student> = self
            .state()?
            .students
            .values()
            .filter(|s| s.event_id == event_id)
            .cloned()
            .collect();
        out.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(out)
    }

    fn set_event_has_roster(&self, event_id: i64, has_roster: bool) -> AppResult<()> {
        let _turn = self.turn()?;
        let mut st = self.writable()?;
        match st.events.get_mut(&event_id) {
            Some(ev) => {
                ev.has_roster = has_roster;
                Ok(())
            }
            None => Err(AppError::EventNotFound(event_id)),
        }
    }

    fn insert_attendance_record(&self, record: &NewAttendanceRecord) -> AppResult<i64> {
        let _turn = self.turn()?;
        let mut st = self.writable()?;
        require_event(&st, record.event_id)?;
        st.last_record_id += 1;
        let id = st.last_record_id;
        st.records.push(record.clone().into_record(id));
        Ok(id)
    }

    fn list_attendance_records(
        &self,
        event_id: i64,
        session: Option<Session>,
    ) -> AppResult<Vec<AttendanceRecord>> {
        let _turn = self.turn()?;
        Ok(self
            .state()?
            .records
            .iter()
            .filter(|r| r.event_id == event_id)
            .filter(|r| session.is_none_or(|s| r.session == s))
            .cloned()
            .collect())
    }

    fn atomically<T, F>(&self, f: F) -> AppResult<T>
    where
        F: FnOnce(&Self) -> AppResult<T>,
    {
        let _turn = self.turn()?;

        let snapshot = self.state()?.clone();
        let result = f(self);
        if result.is_err() {
            *self.state()? = snapshot;
        }
        result
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn roll(s: &str) -> Roll {
        Roll::parse(s).unwrap()
    }

    #[test]
    fn delete_event_cascades() {
        let store = MemoryStore::new();
        let keep = store.create_event("Keep").unwrap();
        let gone = store.create_event("Gone").unwrap();

        for id in [keep, gone] {
            store
                .upsert_students(id, &[NewStudent { roll: roll("a1"), name: "Ana".into() }])
                .unwrap();
            store
                .insert_attendance_record(&NewAttendanceRecord {
                    event_id: id,
                    token: "A1".into(),
                    student_name: Some("Ana".into()),
                    session: Session::Morning,
                    captured_at: Local::now(),
                })
                .unwrap();
        }

        assert!(store.delete_event(gone).unwrap());
        assert!(!store.delete_event(gone).unwrap());
        assert!(store.list_students(gone).unwrap().is_empty());
        assert!(store.list_attendance_records(gone, None).unwrap().is_empty());
        assert_eq!(store.list_students(keep).unwrap().len(), 1);
        assert_eq!(store.list_attendance_records(keep, None).unwrap().len(), 1);
    }

    #[test]
    fn upsert_keeps_presence_and_replaces_name() {
        let store = MemoryStore::new();
        let ev = store.create_event("E").unwrap();
        store
            .upsert_students(ev, &[NewStudent { roll: roll("a1"), name: "Ana".into() }])
            .unwrap();
        assert!(store.mark_present(ev, &roll("A1"), Session::Morning, Local::now()).unwrap());

        store
            .upsert_students(ev, &[NewStudent { roll: roll("a1"), name: "Ana Maria".into() }])
            .unwrap();
        let s = store.get_student(ev, &roll("A1")).unwrap().unwrap();
        assert_eq!(s.name, "Ana Maria");
        assert!(s.is_present(Session::Morning));
    }

    #[test]
    fn mark_present_is_compare_and_swap() {
        let store = MemoryStore::new();
        let ev = store.create_event("E").unwrap();
        store
            .upsert_students(ev, &[NewStudent { roll: roll("b2"), name: "Bo".into() }])
            .unwrap();

        assert!(store.mark_present(ev, &roll("B2"), Session::Evening, Local::now()).unwrap());
        assert!(!store.mark_present(ev, &roll("B2"), Session::Evening, Local::now()).unwrap());
        assert!(!store.mark_present(ev, &roll("ZZ"), Session::Evening, Local::now()).unwrap());
    }

    #[test]
    fn failed_section_rolls_back() {
        let store = MemoryStore::new();
        let ev = store.create_event("E").unwrap();

        let res: AppResult<()> = store.atomically(|s| {
            s.set_event_has_roster(ev, true)?;
            Err(AppError::Other("boom".into()))
        });

        assert!(res.is_err());
        assert!(!store.get_event(ev).unwrap().unwrap().has_roster);
    }

    #[test]
    fn failed_section_keeps_other_threads_writes() {
        use std::sync::mpsc;
        use std::time::Duration;

        let store = MemoryStore::new();
        let ev = store.create_event("E").unwrap();
        let (entered, wait_entered) = mpsc::channel();

        let other = thread::scope(|scope| {
            let store = &store;
            scope.spawn(move || {
                let res: AppResult<()> = store.atomically(|s| {
                    s.set_event_has_roster(ev, true)?;
                    entered.send(()).unwrap();
                    thread::sleep(Duration::from_millis(100));
                    Err(AppError::Other("boom".into()))
                });
                assert!(res.is_err());
            });

            wait_entered.recv().unwrap();
            store.create_event("Committed elsewhere").unwrap()
        });

        assert_eq!(
            store.get_event(other).unwrap().map(|e| e.name),
            Some("Committed elsewhere".to_string())
        );
        assert!(!store.get_event(ev).unwrap().unwrap().has_roster);
    }

    #[test]
    fn nested_calls_inside_a_section_do_not_block() {
        let store = MemoryStore::new();
        let id = store
            .atomically(|s| {
                let id = s.create_event("Inner")?;
                s.atomically(|s2| s2.set_event_has_roster(id, true))?;
                Ok(id)
            })
            .unwrap();
        assert!(store.get_event(id).unwrap().unwrap().has_roster);
    }

    #[test]
    fn read_only_rejects_writes() {
        let store = MemoryStore::new();
        store.set_read_only(true);
        assert!(matches!(store.create_event("E"), Err(AppError::Storage(_))));
    }
}
