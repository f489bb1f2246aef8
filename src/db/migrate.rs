use crate::ui::messages::success;
use rusqlite::{Connection, OptionalExtension, Result};

/// Named, ordered schema steps. Each one runs at most once; applied versions
/// are recorded in the `log` table as `migration_applied`.
const MIGRATIONS: &[(&str, &str, &str)] = &[
    (
        "20260112_0001_base_schema",
        "Created events, students and attendance tables",
        r#"
        CREATE TABLE IF NOT EXISTS events (
            id          INTEGER PRIMARY KEY AUTOINCREMENT,
            name        TEXT NOT NULL,
            created_at  TEXT NOT NULL,
            has_roster  INTEGER NOT NULL DEFAULT 0 CHECK(has_roster IN (0,1))
        );

        CREATE TABLE IF NOT EXISTS students (
            event_id        INTEGER NOT NULL REFERENCES events(id) ON DELETE CASCADE,
            roll            TEXT NOT NULL CHECK(roll <> ''),
            name            TEXT NOT NULL,
            morning_time    TEXT,
            afternoon_time  TEXT,
            evening_time    TEXT,
            PRIMARY KEY (event_id, roll)
        );

        CREATE TABLE IF NOT EXISTS attendance (
            id            INTEGER PRIMARY KEY AUTOINCREMENT,
            event_id      INTEGER NOT NULL REFERENCES events(id) ON DELETE CASCADE,
            token         TEXT NOT NULL,
            student_name  TEXT,
            session       TEXT NOT NULL CHECK(session IN ('morning','afternoon','evening')),
            captured_at   TEXT NOT NULL
        );

        CREATE INDEX IF NOT EXISTS idx_events_created ON events(created_at);
        CREATE INDEX IF NOT EXISTS idx_attendance_event ON attendance(event_id, id);
        "#,
    ),
    (
        "20260203_0002_lookup_indexes",
        "Added student name and attendance session indexes",
        r#"
        CREATE INDEX IF NOT EXISTS idx_students_event_name ON students(event_id, name);
        CREATE INDEX IF NOT EXISTS idx_attendance_event_session ON attendance(event_id, session, id);
        "#,
    ),
];

/// Ensure that the `log` table exists with the modern schema.
fn ensure_log_table(conn: &Connection) -> Result<()> {
    conn.execute_batch(
        r#"
        CREATE TABLE IF NOT EXISTS log (
            id        INTEGER PRIMARY KEY AUTOINCREMENT,
            date      TEXT NOT NULL,
            operation TEXT NOT NULL,
            target    TEXT DEFAULT '',
            message   TEXT NOT NULL
        );
        "#,
    )?;
    Ok(())
}

/// Check if a table exists in the connected database.
pub fn table_exists(conn: &Connection, table: &str) -> Result<bool> {
    let mut stmt = conn.prepare("SELECT name FROM sqlite_master WHERE type='table' AND name=?1")?;
    let exists: Option<String> = stmt.query_row([table], |row| row.get(0)).optional()?;
    Ok(exists.is_some())
}

fn is_applied(conn: &Connection, version: &str) -> Result<bool> {
    let mut chk = conn.prepare(
        "SELECT 1 FROM log
         WHERE operation = 'migration_applied' AND target = ?1
         LIMIT 1",
    )?;
    Ok(chk.query_row([version], |_| Ok(())).optional()?.is_some())
}

/// Versions already recorded as applied, oldest first.
pub fn applied_versions(conn: &Connection) -> Result<Vec<String>> {
    let mut stmt = conn.prepare(
        "SELECT target FROM log WHERE operation = 'migration_applied' ORDER BY id ASC",
    )?;
    let rows = stmt.query_map([], |row| row.get::<_, String>(0))?;

    let mut out = Vec::new();
    for r in rows {
        out.push(r?);
    }
    Ok(out)
}

fn apply(conn: &Connection, version: &str, message: &str, sql: &str) -> Result<()> {
    let tx = conn.unchecked_transaction()?;

    tx.execute_batch(sql)?;
    tx.execute(
        "INSERT INTO log (date, operation, target, message)
         VALUES (datetime('now'), 'migration_applied', ?1, ?2)",
        [version, message],
    )?;

    tx.commit()?;

    success(format!("Migration applied: {} → {}", version, message));
    Ok(())
}

/// Public entry point: run all pending migrations.
///
/// Invocata da db::init_db().
pub fn run_pending_migrations(conn: &Connection) -> Result<()> {
    ensure_log_table(conn)?;

    for (version, message, sql) in MIGRATIONS {
        if !is_applied(conn, version)? {
            apply(conn, version, message, sql)?;
        }
    }

    Ok(())
}
