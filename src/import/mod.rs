//! Readers turning uploaded files into roster rows.

pub mod roster_csv;

pub use roster_csv::{read_roster, read_roster_file};
