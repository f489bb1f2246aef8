// src/export/mod.rs

pub(crate) mod fs_utils;
pub mod render;
pub mod sink;

pub use render::render;
pub use sink::{file_name_for, write_report};

use crate::ui::messages::success;
use clap::ValueEnum;
use std::path::Path;

/// Helper comune per messaggi di completamento export.
pub(crate) fn notify_export_success(label: &str, path: &Path) {
    success(format!("{label} export completed: {}", path.display()));
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum ReportFormat {
    Csv,
    Txt,
}

impl ReportFormat {
    pub fn as_str(&self) -> &'static str {
        match self {
            ReportFormat::Csv => "csv",
            ReportFormat::Txt => "txt",
        }
    }

    pub fn extension(&self) -> &'static str {
        self.as_str()
    }

    pub fn label(&self) -> &'static str {
        match self {
            ReportFormat::Csv => "CSV",
            ReportFormat::Txt => "TXT",
        }
    }
}
