use serde::Serialize;
use std::fmt;

/// Canonical roster identifier: trimmed and upper-cased.
///
/// A `Roll` can only be built through [`Roll::parse`], so every value in
/// circulation is already normalized and non-empty.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(transparent)]
pub struct Roll(String);

impl Roll {
    pub fn parse(raw: &str) -> Option<Self> {
        let canonical = normalize(raw);
        if canonical.is_empty() {
            None
        } else {
            Some(Self(canonical))
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Roll {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Trim + upper-case. Idempotent.
pub fn normalize(raw: &str) -> String {
    raw.trim().to_uppercase()
}
