//! Report rendering. Pure: no storage access, no I/O, same input → same text.

use crate::errors::{AppError, AppResult};
use crate::export::ReportFormat;
use crate::models::AttendanceRecord;
use csv::{Terminator, WriterBuilder};

pub const CSV_HEADER: [&str; 5] = [
    "Student_Name",
    "Roll_Number",
    "Session",
    "Timestamp",
    "Attendance_Ratio",
];

const TIMESTAMP_FMT: &str = "%Y-%m-%d %H:%M:%S";

/// One check-in counted against one expected check-in.
const ATTENDANCE_RATIO: &str = "1/1";

const NO_NAME: &str = "N/A";

pub fn render(records: &[AttendanceRecord], format: ReportFormat) -> AppResult<String> {
    match format {
        ReportFormat::Csv => {
            render_csv(records).map_err(|e| AppError::ExportIo(format!("CSV rendering: {}", e)))
        }
        ReportFormat::Txt => Ok(render_txt(records)),
    }
}

fn timestamp(rec: &AttendanceRecord) -> String {
    rec.captured_at.format(TIMESTAMP_FMT).to_string()
}

fn render_csv(records: &[AttendanceRecord]) -> csv::Result<String> {
    let mut wtr = WriterBuilder::new()
        .terminator(Terminator::Any(b'\n'))
        .from_writer(Vec::new());

    wtr.write_record(CSV_HEADER)?;
    for rec in records {
        wtr.write_record([
            rec.student_name.as_deref().unwrap_or(NO_NAME),
            rec.token.as_str(),
            rec.session.as_str(),
            timestamp(rec).as_str(),
            ATTENDANCE_RATIO,
        ])?;
    }

    let bytes = wtr.into_inner().map_err(|e| csv::Error::from(e.into_error()))?;
    Ok(String::from_utf8_lossy(&bytes).into_owned())
}

/// Control characters become spaces so a record stays on its own line.
fn one_line(s: &str) -> String {
    s.chars()
        .map(|c| if c.is_control() { ' ' } else { c })
        .collect()
}

fn render_txt(records: &[AttendanceRecord]) -> String {
    records
        .iter()
        .map(|rec| {
            format!(
                "{} - {} - {}\n",
                one_line(rec.display_label()),
                rec.session,
                timestamp(rec)
            )
        })
        .collect()
}
