//! Roster CSV reader.
//!
//! Column 1 is the roll, column 2 the display name; extra columns are
//! ignored. A first line whose first cell looks like a "roll" header is
//! skipped. Short rows are passed through with empty fields so the importer
//! can count them as malformed.

use crate::core::roster::RosterRow;
use crate::errors::{AppError, AppResult};
use csv::{ReaderBuilder, Trim};
use std::fs::File;
use std::io::Read;
use std::path::Path;

const HEADER_CELLS: &[&str] = &["roll", "roll_number", "roll number", "roll no", "roll_no"];

fn is_header(first_cell: &str) -> bool {
    let cell = first_cell.trim().to_lowercase();
    HEADER_CELLS.contains(&cell.as_str())
}

pub fn read_roster_file(path: &Path) -> AppResult<Vec<RosterRow>> {
    let file = File::open(path)?;
    read_roster(file)
}

pub fn read_roster<R: Read>(reader: R) -> AppResult<Vec<RosterRow>> {
    let mut rdr = ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .trim(Trim::All)
        .from_reader(reader);

    let mut rows = Vec::new();

    for (idx, rec) in rdr.records().enumerate() {
        let rec = rec.map_err(|e| AppError::RosterParse(e.to_string()))?;
        let line = rec
            .position()
            .map(|p| p.line() as usize)
            .unwrap_or(idx + 1);

        if rec.iter().all(|c| c.is_empty()) {
            continue;
        }
        if idx == 0 && rec.get(0).is_some_and(is_header) {
            continue;
        }

        rows.push(RosterRow::new(
            line,
            rec.get(0).unwrap_or_default(),
            rec.get(1).unwrap_or_default(),
        ));
    }

    Ok(rows)
}
