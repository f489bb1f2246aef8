use crate::db::migrate::table_exists;
use crate::db::pool::DbPool;
use crate::ui::messages::warning;
use crate::utils::colors::{CYAN, GREEN, GREY, RESET, YELLOW};
use chrono::{DateTime, Local};
use rusqlite::OptionalExtension;
use std::fs;

fn count(pool: &DbPool, table: &str) -> rusqlite::Result<i64> {
    pool.conn
        .query_row(&format!("SELECT COUNT(*) FROM {}", table), [], |row| {
            row.get(0)
        })
}

pub fn print_db_info(pool: &mut DbPool, db_path: &str) -> rusqlite::Result<()> {
    println!();

    //
    // 1) FILE SIZE
    //
    let file_size = fs::metadata(db_path).map(|m| m.len()).unwrap_or(0);
    let file_mb = (file_size as f64) / (1024.0 * 1024.0);

    println!("{}• File:{} {}{}{}", CYAN, RESET, YELLOW, db_path, RESET);
    println!("{}• Size:{} {:.2} MB", CYAN, RESET, file_mb);

    if !table_exists(&pool.conn, "attendance")? {
        warning("Database not initialized. Run `rattendance init` first.");
        return Ok(());
    }

    //
    // 2) TOTALS
    //
    let events = count(pool, "events")?;
    let rostered: i64 = pool.conn.query_row(
        "SELECT COUNT(*) FROM events WHERE has_roster = 1",
        [],
        |row| row.get(0),
    )?;
    let students = count(pool, "students")?;
    let records = count(pool, "attendance")?;

    println!(
        "{}• Events:{} {}{}{} ({} with roster, {} freeform)",
        CYAN,
        RESET,
        GREEN,
        events,
        RESET,
        rostered,
        events - rostered
    );
    println!("{}• Students:{} {}{}{}", CYAN, RESET, GREEN, students, RESET);
    println!(
        "{}• Attendance records:{} {}{}{}",
        CYAN, RESET, GREEN, records, RESET
    );

    //
    // 3) CAPTURE RANGE
    //
    let first: Option<String> = pool
        .conn
        .query_row(
            "SELECT captured_at FROM attendance ORDER BY id ASC LIMIT 1",
            [],
            |row| row.get(0),
        )
        .optional()?;

    let last: Option<String> = pool
        .conn
        .query_row(
            "SELECT captured_at FROM attendance ORDER BY id DESC LIMIT 1",
            [],
            |row| row.get(0),
        )
        .optional()?;

    println!("{}• Scans:{}", CYAN, RESET);
    println!("    first: {}", fmt_capture(first));
    println!("    last:  {}", fmt_capture(last));

    println!();
    Ok(())
}

fn fmt_capture(raw: Option<String>) -> String {
    match raw {
        Some(s) => DateTime::parse_from_rfc3339(&s)
            .map(|dt| {
                dt.with_timezone(&Local)
                    .format("%Y-%m-%d %H:%M:%S")
                    .to_string()
            })
            .unwrap_or(s),
        None => format!("{GREY}--{RESET}"),
    }
}
