use crate::errors::{AppError, AppResult};
use crate::models::{NewStudent, Roll};
use crate::store::AttendanceStore;
use std::collections::HashMap;

/// One `(roll, name)` pair as read from the roster source.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RosterRow {
    /// 1-based position in the source, used when reporting skipped rows.
    pub line: usize,
    pub roll: String,
    pub name: String,
}

impl RosterRow {
    pub fn new(line: usize, roll: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            line,
            roll: roll.into(),
            name: name.into(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SkipReason {
    MissingRoll,
    MissingName,
}

impl SkipReason {
    pub fn as_str(&self) -> &'static str {
        match self {
            SkipReason::MissingRoll => "missing roll",
            SkipReason::MissingName => "missing name",
        }
    }
}

/// A malformed roster row; never fatal to the import.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SkippedRow {
    pub line: usize,
    pub reason: SkipReason,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ImportSummary {
    /// Input rows that passed validation (duplicates included).
    pub accepted: usize,
    pub skipped: Vec<SkippedRow>,
    /// Distinct rolls written to the store.
    pub students: usize,
}

pub struct RosterImporter;

impl RosterImporter {
    /// Normalize rows and upsert them as the event's roster.
    ///
    /// Duplicate rolls collapse to the last name seen. The upsert and the
    /// `has_roster` flag are written in one atomic section.
    pub fn import<S, I>(store: &S, event_id: i64, rows: I) -> AppResult<ImportSummary>
    where
        S: AttendanceStore,
        I: IntoIterator<Item = RosterRow>,
    {
        if store.get_event(event_id)?.is_none() {
            return Err(AppError::EventNotFound(event_id));
        }

        let mut summary = ImportSummary::default();
        let mut students: Vec<NewStudent> = Vec::new();
        let mut index: HashMap<Roll, usize> = HashMap::new();

        for row in rows {
            let Some(roll) = Roll::parse(&row.roll) else {
                summary.skipped.push(SkippedRow {
                    line: row.line,
                    reason: SkipReason::MissingRoll,
                });
                continue;
            };

            let name = row.name.trim();
            if name.is_empty() {
                summary.skipped.push(SkippedRow {
                    line: row.line,
                    reason: SkipReason::MissingName,
                });
                continue;
            }

            summary.accepted += 1;

            match index.get(&roll) {
                Some(&i) => students[i].name = name.to_string(),
                None => {
                    index.insert(roll.clone(), students.len());
                    students.push(NewStudent {
                        roll,
                        name: name.to_string(),
                    });
                }
            }
        }

        summary.students = students.len();

        store.atomically(|s| {
            if !students.is_empty() {
                s.upsert_students(event_id, &students)?;
            }
            if !s.list_students(event_id)?.is_empty() {
                s.set_event_has_roster(event_id, true)?;
            }
            Ok(())
        })?;

        Ok(summary)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Session;
    use crate::store::MemoryStore;
    use chrono::Local;

    #[test]
    fn import_normalizes_and_collapses_duplicates() {
        let store = MemoryStore::new();
        let ev = store.create_event("Math101").unwrap();

        let rows = vec![
            RosterRow::new(1, " a1 ", "Ana"),
            RosterRow::new(2, "b2", "Bo"),
            RosterRow::new(3, "A1", "Ana Maria"),
        ];
        let summary = RosterImporter::import(&store, ev, rows).unwrap();

        assert_eq!(summary.accepted, 3);
        assert_eq!(summary.students, 2);
        assert!(summary.skipped.is_empty());

        let a1 = store.get_student(ev, &Roll::parse("A1").unwrap()).unwrap().unwrap();
        assert_eq!(a1.name, "Ana Maria");
        assert!(store.get_event(ev).unwrap().unwrap().has_roster);
    }

    #[test]
    fn malformed_rows_are_counted_not_fatal() {
        let store = MemoryStore::new();
        let ev = store.create_event("E").unwrap();

        let rows = vec![
            RosterRow::new(1, "", "Nobody"),
            RosterRow::new(2, "c3", "  "),
            RosterRow::new(3, "d4", "Di"),
        ];
        let summary = RosterImporter::import(&store, ev, rows).unwrap();

        assert_eq!(summary.accepted, 1);
        assert_eq!(
            summary.skipped,
            vec![
                SkippedRow { line: 1, reason: SkipReason::MissingRoll },
                SkippedRow { line: 2, reason: SkipReason::MissingName },
            ]
        );
        assert_eq!(store.list_students(ev).unwrap().len(), 1);
    }

    #[test]
    fn empty_import_leaves_event_freeform() {
        let store = MemoryStore::new();
        let ev = store.create_event("E").unwrap();

        let summary = RosterImporter::import(&store, ev, Vec::new()).unwrap();

        assert_eq!(summary, ImportSummary::default());
        assert!(!store.get_event(ev).unwrap().unwrap().has_roster);
    }

    #[test]
    fn reimport_keeps_existing_check_ins() {
        let store = MemoryStore::new();
        let ev = store.create_event("E").unwrap();
        RosterImporter::import(&store, ev, vec![RosterRow::new(1, "A1", "Ana")]).unwrap();
        let a1 = Roll::parse("A1").unwrap();
        store.mark_present(ev, &a1, Session::Morning, Local::now()).unwrap();

        RosterImporter::import(&store, ev, vec![RosterRow::new(1, "a1", "Ana")]).unwrap();

        assert!(store.get_student(ev, &a1).unwrap().unwrap().is_present(Session::Morning));
    }

    #[test]
    fn unknown_event_is_an_error() {
        let store = MemoryStore::new();
        let err = RosterImporter::import(&store, 42, vec![RosterRow::new(1, "A1", "Ana")])
            .unwrap_err();
        assert!(matches!(err, AppError::EventNotFound(42)));
    }
}
