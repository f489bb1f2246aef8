pub mod backup;
pub mod checkin;
pub mod config;
pub mod lifecycle;
pub mod log;
pub mod roster;

pub use checkin::{CheckInProcessor, MessageClass, RejectReason, ScanOutcome};
pub use lifecycle::{ScanLifecycle, ScanState};
pub use roster::{ImportSummary, RosterImporter, RosterRow, SkipReason, SkippedRow};
