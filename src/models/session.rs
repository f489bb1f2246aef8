use serde::Serialize;
use std::fmt;

/// The three day-parts attendance is tracked against.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Session {
    Morning,
    Afternoon,
    Evening,
}

impl Session {
    pub const ALL: [Session; 3] = [Session::Morning, Session::Afternoon, Session::Evening];

    /// Parse a user supplied label (case-insensitive, surrounding blanks ignored).
    /// Anything outside the three labels is `None`; there is no default.
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "morning" => Some(Self::Morning),
            "afternoon" => Some(Self::Afternoon),
            "evening" => Some(Self::Evening),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Session::Morning => "morning",
            Session::Afternoon => "afternoon",
            Session::Evening => "evening",
        }
    }

    /// Convert enum → DB string
    pub fn to_db_str(&self) -> &'static str {
        self.as_str()
    }

    /// Convert DB string → enum (strict, no normalization)
    pub fn from_db_str(s: &str) -> Option<Self> {
        match s {
            "morning" => Some(Session::Morning),
            "afternoon" => Some(Session::Afternoon),
            "evening" => Some(Session::Evening),
            _ => None,
        }
    }

    /// Column holding this session's check-in time in the `students` table.
    pub(crate) fn time_column(&self) -> &'static str {
        match self {
            Session::Morning => "morning_time",
            Session::Afternoon => "afternoon_time",
            Session::Evening => "evening_time",
        }
    }

    /// "Morning", "Afternoon", ...
    pub fn title(&self) -> &'static str {
        match self {
            Session::Morning => "Morning",
            Session::Afternoon => "Afternoon",
            Session::Evening => "Evening",
        }
    }
}

impl fmt::Display for Session {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
