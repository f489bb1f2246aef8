//! Explicit state machine for one scan round-trip.
//!
//! ```text
//! Idle → AwaitingClassification → Classified(outcome) → Idle
//!                                  Classified(Unknown…) → ConfirmingAddition → Idle
//! ```
//!
//! Capture is paused (`accepts_input() == false`) everywhere except `Idle`.
//! `abandon()` returns to `Idle` from any state; since the unknown branch
//! writes nothing, abandoning never leaves a persisted trace.

use crate::core::checkin::ScanOutcome;
use crate::errors::{AppError, AppResult};
use std::fmt;

#[derive(Debug, Clone, PartialEq)]
pub enum ScanState {
    Idle,
    AwaitingClassification { token: String },
    Classified(ScanOutcome),
    ConfirmingAddition { token: String },
}

impl fmt::Display for ScanState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ScanState::Idle => f.write_str("idle"),
            ScanState::AwaitingClassification { .. } => f.write_str("awaiting classification"),
            ScanState::Classified(_) => f.write_str("classified"),
            ScanState::ConfirmingAddition { .. } => f.write_str("confirming addition"),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ScanLifecycle {
    state: ScanState,
}

impl Default for ScanLifecycle {
    fn default() -> Self {
        Self {
            state: ScanState::Idle,
        }
    }
}

impl ScanLifecycle {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> &ScanState {
        &self.state
    }

    pub fn accepts_input(&self) -> bool {
        matches!(self.state, ScanState::Idle)
    }

    fn invalid(&self, action: &'static str) -> AppError {
        AppError::InvalidTransition {
            from: self.state.to_string(),
            action,
        }
    }

    /// A token was captured; capture pauses until the round-trip ends.
    pub fn begin(&mut self, token: &str) -> AppResult<()> {
        if !self.accepts_input() {
            return Err(self.invalid("begin a scan"));
        }
        self.state = ScanState::AwaitingClassification {
            token: token.to_string(),
        };
        Ok(())
    }

    pub fn classify(&mut self, outcome: ScanOutcome) -> AppResult<()> {
        if !matches!(self.state, ScanState::AwaitingClassification { .. }) {
            return Err(self.invalid("classify"));
        }
        self.state = ScanState::Classified(outcome);
        Ok(())
    }

    /// Operator chose to add the unknown token; returns it.
    pub fn confirm_addition(&mut self) -> AppResult<String> {
        let token = match &self.state {
            ScanState::Classified(ScanOutcome::UnknownNeedsConfirmation { token, .. }) => {
                token.clone()
            }
            _ => return Err(self.invalid("confirm an addition")),
        };
        self.state = ScanState::ConfirmingAddition {
            token: token.clone(),
        };
        Ok(token)
    }

    pub fn finish(&mut self) -> AppResult<()> {
        match self.state {
            ScanState::Classified(_) | ScanState::ConfirmingAddition { .. } => {
                self.state = ScanState::Idle;
                Ok(())
            }
            _ => Err(self.invalid("finish")),
        }
    }

    pub fn abandon(&mut self) {
        self.state = ScanState::Idle;
    }
}
