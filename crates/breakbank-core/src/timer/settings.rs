use serde::{Deserialize, Serialize};

use crate::error::ValidationError;

/// Phase durations for one session. Not mutated by the engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Settings {
    pub work_seconds: u64,
    pub break_seconds: u64,
    pub long_break_seconds: u64,
    /// Completed work cycles per long break.
    pub long_break_every: u32,
}

impl Settings {
    /// Reject settings the engine cannot cycle through.
    ///
    /// A zero duration would make a phase end the instant it begins, and a
    /// zero `long_break_every` would never grant a long break.
    pub fn validate(&self) -> Result<(), ValidationError> {
        let checks = [
            ("work_seconds", self.work_seconds),
            ("break_seconds", self.break_seconds),
            ("long_break_seconds", self.long_break_seconds),
            ("long_break_every", u64::from(self.long_break_every)),
        ];
        for (field, value) in checks {
            if value == 0 {
                return Err(ValidationError::InvalidValue {
                    field: field.to_string(),
                    message: "must be greater than zero".to_string(),
                });
            }
        }
        Ok(())
    }
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            work_seconds: 25 * 60,
            break_seconds: 5 * 60,
            long_break_seconds: 10 * 60,
            long_break_every: 4,
        }
    }
}
