use predicates::prelude::PredicateBooleanExt;
use predicates::str::contains;

mod common;
use common::{init_with_event, rta_db, setup_test_db, write_roster};

#[test]
fn test_roster_import_summary() {
    let db_path = setup_test_db("roster_summary");
    init_with_event(&db_path, "Math101");

    let roster = write_roster(
        "roster_summary",
        "Roll Number,Name\n a1 ,Ana\nB2,Bo\n,Nobody\nC3,\nb2,Bo Jr\n",
    );

    rta_db(&db_path)
        .args(["roster", "import", "--event", "1", "--file", &roster])
        .assert()
        .success()
        .stdout(contains("Line 4 skipped: missing roll"))
        .stdout(contains("Line 5 skipped: missing name"))
        .stdout(contains("3 row(s) accepted, 2 skipped, 2 student(s)"));

    rta_db(&db_path)
        .args(["students", "--event", "1"])
        .assert()
        .success()
        .stdout(contains("A1").and(contains("Ana")))
        .stdout(contains("Bo Jr"))
        .stdout(contains("Morning: 0/2"));

    rta_db(&db_path)
        .args(["event", "list"])
        .assert()
        .success()
        .stdout(contains("roster"));
}

#[test]
fn test_roster_import_into_missing_event() {
    let db_path = setup_test_db("roster_missing_event");
    rta_db(&db_path).arg("init").assert().success();

    let roster = write_roster("roster_missing_event", "A1,Ana\n");

    rta_db(&db_path)
        .args(["roster", "import", "--event", "3", "--file", &roster])
        .assert()
        .failure()
        .stderr(contains("Event not found: 3"));
}

#[test]
fn test_roster_with_only_bad_rows_stays_freeform() {
    let db_path = setup_test_db("roster_only_bad");
    init_with_event(&db_path, "Open Day");

    let roster = write_roster("roster_only_bad", "roll,name\n,Ghost\n");

    rta_db(&db_path)
        .args(["roster", "import", "--event", "1", "--file", &roster])
        .assert()
        .success()
        .stdout(contains("stays in freeform mode"));

    rta_db(&db_path)
        .args(["scan", "--event", "1", "--session", "morning", "ANY1"])
        .assert()
        .success()
        .stdout(contains("Scanned ID: ANY1"));
}

#[test]
fn test_roster_file_not_found() {
    let db_path = setup_test_db("roster_no_file");
    init_with_event(&db_path, "E");

    rta_db(&db_path)
        .args([
            "roster",
            "import",
            "--event",
            "1",
            "--file",
            "/nonexistent/dir/roster.csv",
        ])
        .assert()
        .failure()
        .stderr(contains("I/O error"));
}
