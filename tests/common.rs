#![allow(dead_code)]
use assert_cmd::{Command, cargo_bin_cmd};
use std::env;
use std::fs;
use std::path::PathBuf;

pub fn rta() -> Command {
    cargo_bin_cmd!("rattendance")
}

/// `rattendance --db <db> --test ...`: never reads or writes the user config.
pub fn rta_db(db_path: &str) -> Command {
    let mut cmd = rta();
    cmd.args(["--db", db_path, "--test"]);
    cmd
}

/// Create a unique test DB path inside the system temp dir and remove any existing file
pub fn setup_test_db(name: &str) -> String {
    let mut path: PathBuf = env::temp_dir();
    path.push(format!("{}_rattendance.sqlite", name));
    let db_path = path.to_string_lossy().to_string();
    fs::remove_file(&db_path).ok();
    db_path
}

/// Create a temporary output file path inside tempdir and ensure it's removed
pub fn temp_out(name: &str, ext: &str) -> String {
    let mut path: PathBuf = env::temp_dir();
    path.push(format!("{}_out.{}", name, ext));
    let p = path.to_string_lossy().to_string();
    fs::remove_file(&p).ok();
    p
}

/// Write a roster CSV into the temp dir and return its path
pub fn write_roster(name: &str, content: &str) -> String {
    let mut path: PathBuf = env::temp_dir();
    path.push(format!("{}_roster.csv", name));
    fs::write(&path, content).expect("write roster");
    path.to_string_lossy().to_string()
}

/// Fresh DB with one event (id 1)
pub fn init_with_event(db_path: &str, event_name: &str) {
    rta_db(db_path).arg("init").assert().success();
    rta_db(db_path)
        .args(["event", "create", event_name])
        .assert()
        .success();
}

/// Fresh DB with event 1 "Math101" and roster A1 → Ana
pub fn init_math101(name: &str, db_path: &str) {
    init_with_event(db_path, "Math101");
    let roster = write_roster(name, "roll,name\nA1,Ana\n");
    rta_db(db_path)
        .args(["roster", "import", "--event", "1", "--file", &roster])
        .assert()
        .success();
}
