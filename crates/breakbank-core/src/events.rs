use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::timer::{Phase, Status};

/// One logged span of work attributed to a task.
///
/// Timestamps are milliseconds since the Unix epoch; `end_ms` is exclusive.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WorkEvent {
    pub start_ms: i64,
    pub end_ms: i64,
    pub task: String,
}

impl WorkEvent {
    /// Whole seconds covered by the span. Degenerate spans count as zero.
    pub fn duration_secs(&self) -> u64 {
        u64::try_from((self.end_ms - self.start_ms) / 1000).unwrap_or(0)
    }
}

/// Every state change in the engine produces an Event.
/// Front ends print or render them; the engine never reads them back.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum Event {
    TimerStarted {
        phase: Phase,
        seconds_remaining: u64,
    },
    TimerHeld {
        phase: Phase,
        seconds_remaining: u64,
        logged: Option<WorkEvent>,
    },
    PhaseCompleted {
        completed: Phase,
        next: Phase,
        long_break: bool,
        at_ms: i64,
    },
    BreakStarted {
        break_seconds: u64,
        logged: Option<WorkEvent>,
    },
    ReturnedToWork {
        /// Break seconds left on the clock when the break was cut short.
        skipped_seconds: u64,
    },
    TimerReset,
    ContinuousWorkChanged {
        enabled: bool,
    },
    TaskAdded {
        name: String,
    },
    TaskSelected {
        previous: String,
        selected: String,
        logged: Option<WorkEvent>,
    },
    CustomRangeSet {
        from: NaiveDate,
        to: NaiveDate,
    },
    StateSnapshot {
        status: Status,
        phase: Phase,
        /// `mm:ss`
        remaining: String,
        seconds_remaining: u64,
        /// `hh:mm:ss`
        total_time_worked: String,
        /// `hh:mm:ss`
        available_break_time: String,
        break_available: bool,
        continuous_work: bool,
        selected_task: String,
        long_break_counter: u32,
    },
}
