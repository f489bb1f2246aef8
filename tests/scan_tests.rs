use predicates::prelude::PredicateBooleanExt;
use predicates::str::contains;

mod common;
use common::{init_math101, init_with_event, rta_db, setup_test_db};

fn record_count(db_path: &str, event: &str) -> usize {
    let out = rta_db(db_path)
        .args(["records", "--event", event, "--json"])
        .output()
        .expect("run records");
    assert!(out.status.success());
    let stdout = String::from_utf8_lossy(&out.stdout);
    let json: serde_json::Value = serde_json::from_str(stdout.trim()).expect("valid json");
    json.as_array().map(|a| a.len()).unwrap_or(0)
}

#[test]
fn test_math101_scenario() {
    let db_path = setup_test_db("scan_math101");
    init_math101("scan_math101", &db_path);

    rta_db(&db_path)
        .args(["scan", "--event", "1", "--session", "morning", "a1"])
        .assert()
        .success()
        .stdout(contains("Thank you Ana"))
        .stdout(contains("morning attendance recorded"));

    rta_db(&db_path)
        .args(["scan", "--event", "1", "--session", "morning", "A1"])
        .assert()
        .success()
        .stdout(contains("Ana already marked present for morning"));

    assert_eq!(record_count(&db_path, "1"), 1);

    rta_db(&db_path)
        .args(["scan", "--event", "1", "--session", "afternoon", "A1"])
        .assert()
        .success()
        .stdout(contains("afternoon attendance recorded"));

    assert_eq!(record_count(&db_path, "1"), 2);

    rta_db(&db_path)
        .args(["students", "--event", "1"])
        .assert()
        .success()
        .stdout(contains("Morning: 1/1"))
        .stdout(contains("Afternoon: 1/1"))
        .stdout(contains("Evening: 0/1"));
}

#[test]
fn test_freeform_scenario() {
    let db_path = setup_test_db("scan_freeform");
    init_with_event(&db_path, "Freeform");

    rta_db(&db_path)
        .args([
            "scan", "--event", "1", "--session", "evening", "XYZ123", "XYZ123",
        ])
        .assert()
        .success()
        .stdout(contains("Scanned ID: XYZ123"))
        .stdout(contains("2 scan(s): 2 accepted, 0 duplicate"))
        .stdout(contains("already marked present").not());

    assert_eq!(record_count(&db_path, "1"), 2);

    rta_db(&db_path)
        .args(["records", "--event", "1"])
        .assert()
        .success()
        .stdout(contains("XYZ123"))
        .stdout(contains("evening"));
}

#[test]
fn test_unknown_token_without_prompt_writes_nothing() {
    let db_path = setup_test_db("scan_unknown_args");
    init_math101("scan_unknown_args", &db_path);

    rta_db(&db_path)
        .args(["scan", "--event", "1", "--session", "morning", "ZZ9"])
        .assert()
        .success()
        .stdout(contains("ZZ9 is not on the roster"))
        .stdout(contains("rattendance admit"));

    assert_eq!(record_count(&db_path, "1"), 0);
}

#[test]
fn test_stdin_unknown_token_is_admitted() {
    let db_path = setup_test_db("scan_stdin_admit");
    init_math101("scan_stdin_admit", &db_path);

    rta_db(&db_path)
        .args(["scan", "--event", "1", "--session", "morning"])
        .write_stdin("zz9\nZed\nZZ9\n")
        .assert()
        .success()
        .stdout(contains("ZZ9 is not on the roster").or(contains("zz9 is not on the roster")))
        .stdout(contains("Thank you Zed"))
        .stdout(contains("Zed already marked present for morning"))
        .stdout(contains("2 scan(s): 1 accepted, 1 duplicate, 0 unknown"));

    assert_eq!(record_count(&db_path, "1"), 1);

    rta_db(&db_path)
        .args(["students", "--event", "1"])
        .assert()
        .success()
        .stdout(contains("ZZ9").and(contains("Zed")));
}

#[test]
fn test_stdin_unknown_token_can_be_skipped() {
    let db_path = setup_test_db("scan_stdin_cancel");
    init_math101("scan_stdin_cancel", &db_path);

    rta_db(&db_path)
        .args(["scan", "--event", "1", "--session", "morning"])
        .write_stdin("ZZ9\n\nA1\n")
        .assert()
        .success()
        .stdout(contains("ZZ9 not added."))
        .stdout(contains("Thank you Ana"));

    assert_eq!(record_count(&db_path, "1"), 1);

    rta_db(&db_path)
        .args(["students", "--event", "1"])
        .assert()
        .success()
        .stdout(contains("ZZ9").not());
}

#[test]
fn test_stdin_bad_bytes_are_rejected_and_scanning_continues() {
    let db_path = setup_test_db("scan_stdin_bytes");
    init_with_event(&db_path, "Freeform");

    rta_db(&db_path)
        .args(["scan", "--event", "1", "--session", "morning"])
        .write_stdin(&b"T1\r\n\xff\xfe\nT2\nT3\n"[..])
        .assert()
        .success()
        .stderr(contains("not valid UTF-8"))
        .stdout(contains("Scanned ID: T3"))
        .stdout(contains("4 scan(s): 3 accepted, 0 duplicate, 0 unknown, 1 rejected"));

    assert_eq!(record_count(&db_path, "1"), 3);

    rta_db(&db_path)
        .args(["records", "--event", "1"])
        .assert()
        .success()
        .stdout(contains("T1\r").not());
}

#[test]
fn test_tokens_with_control_characters_are_rejected() {
    let db_path = setup_test_db("scan_control_chars");
    init_with_event(&db_path, "Freeform");

    rta_db(&db_path)
        .args(["scan", "--event", "1", "A\tB", "C\u{1b}[2JD", "OK1"])
        .assert()
        .success()
        .stderr(contains("token contains control characters"))
        .stdout(contains("3 scan(s): 1 accepted"));

    assert_eq!(record_count(&db_path, "1"), 1);
}

#[test]
fn test_admit_command_then_rescan() {
    let db_path = setup_test_db("scan_admit_cmd");
    init_math101("scan_admit_cmd", &db_path);

    rta_db(&db_path)
        .args([
            "admit", "--event", "1", "--session", "evening", "--token", "n7", "--name", "Nia",
        ])
        .assert()
        .success()
        .stdout(contains("Thank you Nia"));

    rta_db(&db_path)
        .args(["scan", "--event", "1", "--session", "evening", "N7"])
        .assert()
        .success()
        .stdout(contains("Nia already marked present for evening"));
}

#[test]
fn test_rejections_are_reported() {
    let db_path = setup_test_db("scan_rejections");
    init_math101("scan_rejections", &db_path);

    rta_db(&db_path)
        .args(["scan", "--event", "1", "--session", "night", "A1"])
        .assert()
        .success()
        .stderr(contains("invalid session 'night'"));

    rta_db(&db_path)
        .args(["scan", "--event", "1", "--session", "morning", "   "])
        .assert()
        .success()
        .stderr(contains("empty token"));

    rta_db(&db_path)
        .args(["admit", "--event", "1", "--session", "noon", "--token", "X1"])
        .assert()
        .failure()
        .stderr(contains("invalid session 'noon'"));

    assert_eq!(record_count(&db_path, "1"), 0);
}

#[test]
fn test_scan_unknown_event_fails() {
    let db_path = setup_test_db("scan_unknown_event");
    rta_db(&db_path).arg("init").assert().success();

    rta_db(&db_path)
        .args(["scan", "--event", "9", "A1"])
        .assert()
        .failure()
        .stderr(contains("Event not found: 9"));
}

#[test]
fn test_default_session_is_morning() {
    let db_path = setup_test_db("scan_default_session");
    init_math101("scan_default_session", &db_path);

    rta_db(&db_path)
        .args(["scan", "--event", "1", "A1"])
        .assert()
        .success()
        .stdout(contains("morning attendance recorded"));
}
