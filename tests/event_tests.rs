use predicates::prelude::PredicateBooleanExt;
use predicates::str::contains;

mod common;
use common::{init_math101, rta_db, setup_test_db};

#[test]
fn test_init_creates_schema() {
    let db_path = setup_test_db("init_schema");

    rta_db(&db_path)
        .arg("init")
        .assert()
        .success()
        .stdout(contains("Database initialized"));

    rta_db(&db_path)
        .args(["db", "--info"])
        .assert()
        .success()
        .stdout(contains("Events:"))
        .stdout(contains("Attendance records:"));
}

#[test]
fn test_event_create_and_list() {
    let db_path = setup_test_db("event_create_list");
    rta_db(&db_path).arg("init").assert().success();

    rta_db(&db_path)
        .args(["event", "create", "Math101"])
        .assert()
        .success()
        .stdout(contains("Event #1 created: Math101"));

    rta_db(&db_path)
        .args(["event", "create", "Physics Lab"])
        .assert()
        .success()
        .stdout(contains("Event #2 created"));

    rta_db(&db_path)
        .args(["event", "list"])
        .assert()
        .success()
        .stdout(contains("Math101"))
        .stdout(contains("Physics Lab"))
        .stdout(contains("freeform"));
}

#[test]
fn test_empty_event_name_is_rejected() {
    let db_path = setup_test_db("event_empty_name");
    rta_db(&db_path).arg("init").assert().success();

    rta_db(&db_path)
        .args(["event", "create", "   "])
        .assert()
        .failure()
        .stderr(contains("event name cannot be empty"));
}

#[test]
fn test_event_delete_cascades() {
    let db_path = setup_test_db("event_delete_cascade");
    init_math101("event_delete_cascade", &db_path);

    rta_db(&db_path)
        .args(["scan", "--event", "1", "--session", "morning", "A1"])
        .assert()
        .success();

    rta_db(&db_path)
        .args(["event", "delete", "1", "--yes"])
        .assert()
        .success()
        .stdout(contains("has been deleted"));

    rta_db(&db_path)
        .args(["students", "--event", "1"])
        .assert()
        .failure()
        .stderr(contains("Event not found: 1"));

    let conn = rusqlite::Connection::open(&db_path).expect("open db");
    let students: i64 = conn
        .query_row("SELECT COUNT(*) FROM students", [], |r| r.get(0))
        .expect("count students");
    let records: i64 = conn
        .query_row("SELECT COUNT(*) FROM attendance", [], |r| r.get(0))
        .expect("count records");
    assert_eq!(students, 0);
    assert_eq!(records, 0);
}

#[test]
fn test_event_delete_can_be_cancelled() {
    let db_path = setup_test_db("event_delete_cancel");
    init_math101("event_delete_cancel", &db_path);

    rta_db(&db_path)
        .args(["event", "delete", "1"])
        .write_stdin("n\n")
        .assert()
        .success()
        .stdout(contains("Operation cancelled."));

    rta_db(&db_path)
        .args(["event", "list"])
        .assert()
        .success()
        .stdout(contains("Math101").and(contains("roster")));
}

#[test]
fn test_delete_missing_event_fails() {
    let db_path = setup_test_db("event_delete_missing");
    rta_db(&db_path).arg("init").assert().success();

    rta_db(&db_path)
        .args(["event", "delete", "7", "--yes"])
        .assert()
        .failure()
        .stderr(contains("Event not found: 7"));
}

#[test]
fn test_log_records_operations() {
    let db_path = setup_test_db("log_operations");
    init_math101("log_operations", &db_path);

    rta_db(&db_path)
        .args(["log", "--print"])
        .assert()
        .success()
        .stdout(contains("event_create"))
        .stdout(contains("roster_import"))
        .stdout(contains("migration_applied"));
}
