//! Timer engine implementation.
//!
//! The timer engine is a wall-clock-driven state machine. It does not use
//! internal threads or read the clock: the caller passes a timestamp to
//! `tick()` periodically and the engine catches up on every whole second
//! elapsed since the previous tick.
//!
//! ## State Transitions
//!
//! ```text
//! {Idle, Running} x {Work, Break}
//!
//! Work  --(countdown hits 0)--> Break        (or Work again in continuous mode)
//! Break --(countdown hits 0)--> Work
//! Work  --start_break()-------> Break        (claims the whole balance)
//! Break --return_to_work()----> Work
//! ```
//!
//! ## Usage
//!
//! ```ignore
//! let mut engine = TimerEngine::new(Settings::default());
//! engine.start();
//! // In a loop:
//! for event in engine.tick(now_ms) { /* phase completed */ }
//! ```

use std::collections::BTreeMap;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use super::format::{format_clock, format_duration};
use super::settings::Settings;
use super::tasks::{TaskList, NO_TASK};
use crate::events::{Event, WorkEvent};
use crate::stats::{aggregate, AggregateOptions, TaskTotals};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Status {
    Idle,
    Running,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Phase {
    Work,
    Break,
}

impl std::fmt::Display for Phase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let label = match self {
            Phase::Work => "Work",
            Phase::Break => "Break",
        };
        write!(f, "{label}")
    }
}

fn default_selected_task() -> String {
    NO_TASK.to_string()
}

/// Complete persisted state of the timer.
///
/// Saved and restored verbatim by a [`StateStore`](crate::storage::StateStore).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimerState {
    pub seconds_remaining: u64,
    /// Countdown value the current segment started from.
    pub initial_seconds: u64,
    pub status: Status,
    pub phase: Phase,
    pub long_break_counter: u32,
    pub total_time_worked_seconds: u64,
    pub available_break_time_seconds: u64,
    #[serde(default)]
    pub continuous_work: bool,
    /// Epoch ms of the last tick. Only set while running.
    #[serde(default)]
    pub last_timestamp: Option<i64>,
    #[serde(default)]
    pub tasks: TaskList,
    #[serde(default = "default_selected_task")]
    pub selected_task: String,
    #[serde(default)]
    pub events: Vec<WorkEvent>,
    #[serde(default)]
    pub custom_from: Option<NaiveDate>,
    #[serde(default)]
    pub custom_to: Option<NaiveDate>,
}

impl TimerState {
    pub fn new(settings: &Settings) -> Self {
        Self {
            seconds_remaining: settings.work_seconds,
            initial_seconds: settings.work_seconds,
            status: Status::Idle,
            phase: Phase::Work,
            long_break_counter: 0,
            total_time_worked_seconds: 0,
            available_break_time_seconds: 0,
            continuous_work: false,
            last_timestamp: None,
            tasks: TaskList::new(),
            selected_task: default_selected_task(),
            events: Vec::new(),
            custom_from: None,
            custom_to: None,
        }
    }
}

/// Core timer engine.
///
/// Sole owner of a [`TimerState`]. Every command mutates it in place and
/// reports what happened; commands that do not apply to the current state
/// are no-ops returning `None`.
#[derive(Debug, Clone)]
pub struct TimerEngine {
    settings: Settings,
    state: TimerState,
}

impl TimerEngine {
    /// Create a new engine: idle, in the work phase, with a full countdown.
    pub fn new(settings: Settings) -> Self {
        let state = TimerState::new(&settings);
        Self { settings, state }
    }

    /// Resume from a previously saved state.
    ///
    /// An idle snapshot never carries a tick timestamp, so a stale one is dropped.
    pub fn from_state(settings: Settings, mut state: TimerState) -> Self {
        if state.status == Status::Idle {
            state.last_timestamp = None;
        }
        Self { settings, state }
    }

    // ── Queries ──────────────────────────────────────────────────────

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    pub fn state(&self) -> &TimerState {
        &self.state
    }

    pub fn into_state(self) -> TimerState {
        self.state
    }

    pub fn status(&self) -> Status {
        self.state.status
    }

    pub fn phase(&self) -> Phase {
        self.state.phase
    }

    pub fn is_idle(&self) -> bool {
        self.state.status == Status::Idle
    }

    pub fn is_running(&self) -> bool {
        self.state.status == Status::Running
    }

    pub fn is_break_available(&self) -> bool {
        self.state.available_break_time_seconds > 0
    }

    pub fn seconds_remaining(&self) -> u64 {
        self.state.seconds_remaining
    }

    /// Remaining time as `mm:ss`.
    pub fn remaining_clock(&self) -> String {
        format_clock(self.state.seconds_remaining)
    }

    /// Total time worked as `hh:mm:ss`.
    pub fn total_time_worked(&self) -> String {
        format_duration(self.state.total_time_worked_seconds)
    }

    /// Available break balance as `hh:mm:ss`.
    pub fn available_break_time(&self) -> String {
        format_duration(self.state.available_break_time_seconds)
    }

    pub fn tasks(&self) -> &TaskList {
        &self.state.tasks
    }

    pub fn selected_task(&self) -> &str {
        &self.state.selected_task
    }

    pub fn events(&self) -> &[WorkEvent] {
        &self.state.events
    }

    pub fn custom_range(&self) -> (Option<NaiveDate>, Option<NaiveDate>) {
        (self.state.custom_from, self.state.custom_to)
    }

    /// Per-task totals relative to `reference`, using the stored custom range.
    pub fn totals(
        &self,
        reference: NaiveDate,
        options: AggregateOptions,
    ) -> BTreeMap<String, TaskTotals> {
        aggregate(
            &self.state.events,
            reference,
            self.state.custom_from,
            self.state.custom_to,
            options,
        )
    }

    /// Build a full state snapshot event.
    pub fn snapshot(&self) -> Event {
        Event::StateSnapshot {
            status: self.state.status,
            phase: self.state.phase,
            remaining: self.remaining_clock(),
            seconds_remaining: self.state.seconds_remaining,
            total_time_worked: self.total_time_worked(),
            available_break_time: self.available_break_time(),
            break_available: self.is_break_available(),
            continuous_work: self.state.continuous_work,
            selected_task: self.state.selected_task.clone(),
            long_break_counter: self.state.long_break_counter,
        }
    }

    // ── Commands ─────────────────────────────────────────────────────

    pub fn start(&mut self) -> Option<Event> {
        if self.state.status == Status::Running {
            return None;
        }
        self.state.status = Status::Running;
        self.state.initial_seconds = self.state.seconds_remaining;
        info!(phase = %self.state.phase, remaining = self.state.seconds_remaining, "timer started");
        Some(Event::TimerStarted {
            phase: self.state.phase,
            seconds_remaining: self.state.seconds_remaining,
        })
    }

    pub fn hold(&mut self) -> Option<Event> {
        if self.state.status != Status::Running {
            return None;
        }
        let logged = self.log_partial_segment(self.state.selected_task.clone());
        self.state.status = Status::Idle;
        self.state.last_timestamp = None;
        let selected = self.state.selected_task.clone();
        self.state.tasks.promote(&selected);
        info!(phase = %self.state.phase, remaining = self.state.seconds_remaining, "timer held");
        Some(Event::TimerHeld {
            phase: self.state.phase,
            seconds_remaining: self.state.seconds_remaining,
            logged,
        })
    }

    /// Cut a break short. Unspent break seconds are not refunded.
    pub fn return_to_work(&mut self) -> Option<Event> {
        if self.state.phase != Phase::Break {
            return None;
        }
        let skipped_seconds = self.state.seconds_remaining;
        self.enter_phase(Phase::Work, self.settings.work_seconds);
        info!(skipped_seconds, "returned to work");
        Some(Event::ReturnedToWork { skipped_seconds })
    }

    /// Spend the whole accrued balance on a break, starting now.
    pub fn start_break(&mut self) -> Option<Event> {
        if self.state.phase != Phase::Work || !self.is_break_available() {
            return None;
        }
        let logged = self.log_partial_segment(self.state.selected_task.clone());
        let break_seconds = self.state.available_break_time_seconds;
        self.enter_phase(Phase::Break, break_seconds);
        info!(break_seconds, "break started");
        Some(Event::BreakStarted {
            break_seconds,
            logged,
        })
    }

    /// Zero every accumulator. Tasks and the event log are kept.
    pub fn reset(&mut self) -> Option<Event> {
        self.state.status = Status::Idle;
        self.state.long_break_counter = 0;
        self.state.total_time_worked_seconds = 0;
        self.state.available_break_time_seconds = 0;
        self.state.last_timestamp = None;
        self.enter_phase(Phase::Work, self.settings.work_seconds);
        info!("timer reset");
        Some(Event::TimerReset)
    }

    pub fn set_continuous_work(&mut self, enabled: bool) -> Option<Event> {
        self.state.continuous_work = enabled;
        Some(Event::ContinuousWorkChanged { enabled })
    }

    /// Add a task. Names are expected to be validated by the caller.
    pub fn add_task(&mut self, name: &str) -> Option<Event> {
        if !self.state.tasks.add(name) {
            return None;
        }
        debug!(task = name, "task added");
        Some(Event::TaskAdded {
            name: name.to_string(),
        })
    }

    /// Switch the task that work time is attributed to.
    ///
    /// While running in the work phase the segment so far is closed out and
    /// logged for the previous task first.
    pub fn set_selected_task(&mut self, name: &str) -> Option<Event> {
        let previous = self.state.selected_task.clone();
        let logged = if self.state.status == Status::Running && self.state.phase == Phase::Work {
            self.log_partial_segment(previous.clone())
        } else {
            None
        };
        self.state.selected_task = name.to_string();
        self.state.initial_seconds = self.state.seconds_remaining;
        self.state.tasks.promote(name);
        debug!(previous = %previous, selected = name, "task selected");
        Some(Event::TaskSelected {
            previous,
            selected: name.to_string(),
            logged,
        })
    }

    pub fn set_custom_range(&mut self, from: NaiveDate, to: NaiveDate) -> Option<Event> {
        self.state.custom_from = Some(from);
        self.state.custom_to = Some(to);
        Some(Event::CustomRangeSet { from, to })
    }

    /// Advance the countdown to `now_ms`.
    ///
    /// Consumes every whole second since the previous tick (one second on
    /// the first tick after `start`), cascading through as many phase
    /// transitions as fit. Returns one `PhaseCompleted` event per transition.
    /// Ignored while idle or when the clock moved backwards.
    pub fn tick(&mut self, now_ms: i64) -> Vec<Event> {
        if self.state.status != Status::Running {
            return Vec::new();
        }
        let (then, elapsed) = match self.state.last_timestamp {
            Some(last) if now_ms < last => {
                warn!(now_ms, last, "clock moved backwards; tick ignored");
                return Vec::new();
            }
            Some(last) => (last, now_ms.saturating_sub(last) / 1000),
            None => (now_ms.saturating_sub(1000), 1),
        };
        // Sub-second remainders stay on the clock for the next tick.
        self.state.last_timestamp = Some(then + elapsed * 1000);
        self.consume(then, elapsed.unsigned_abs())
    }

    // ── Internal ─────────────────────────────────────────────────────

    fn consume(&mut self, mut then: i64, mut left: u64) -> Vec<Event> {
        let mut completed = Vec::new();
        while left > 0 {
            let step = self.state.seconds_remaining.min(left);
            left -= step;
            self.state.seconds_remaining -= step;
            then += step as i64 * 1000;
            match self.state.phase {
                Phase::Work => self.state.total_time_worked_seconds += step,
                Phase::Break => {
                    self.state.available_break_time_seconds =
                        self.state.available_break_time_seconds.saturating_sub(step)
                }
            }
            if self.state.seconds_remaining == 0 {
                completed.push(self.complete_phase(then));
                if self.state.seconds_remaining == 0 {
                    break;
                }
            }
        }
        completed
    }

    fn complete_phase(&mut self, at_ms: i64) -> Event {
        let completed = self.state.phase;
        let mut long_break = false;
        match completed {
            Phase::Work => {
                self.state.long_break_counter += 1;
                long_break = self.state.long_break_counter >= self.settings.long_break_every;
                let earned = if long_break {
                    self.state.long_break_counter = 0;
                    self.settings.long_break_seconds
                } else {
                    self.settings.break_seconds
                };
                self.state.available_break_time_seconds += earned;

                let start_ms = at_ms - self.state.initial_seconds as i64 * 1000;
                self.push_event(start_ms, at_ms, self.state.selected_task.clone());

                if self.state.continuous_work {
                    self.enter_phase(Phase::Work, self.settings.work_seconds);
                } else {
                    self.enter_phase(Phase::Break, earned);
                }
            }
            Phase::Break => {
                self.enter_phase(Phase::Work, self.settings.work_seconds);
            }
        }
        debug!(
            completed = %completed,
            next = %self.state.phase,
            long_break,
            at_ms,
            available = self.state.available_break_time_seconds,
            "phase completed"
        );
        Event::PhaseCompleted {
            completed,
            next: self.state.phase,
            long_break,
            at_ms,
        }
    }

    fn enter_phase(&mut self, phase: Phase, seconds: u64) {
        self.state.phase = phase;
        self.state.seconds_remaining = seconds;
        self.state.initial_seconds = seconds;
    }

    /// Log the running work segment up to the last tick.
    fn log_partial_segment(&mut self, task: String) -> Option<WorkEvent> {
        if self.state.phase != Phase::Work {
            return None;
        }
        let end_ms = self.state.last_timestamp?;
        let worked = self
            .state
            .initial_seconds
            .saturating_sub(self.state.seconds_remaining);
        self.push_event(end_ms - worked as i64 * 1000, end_ms, task)
    }

    fn push_event(&mut self, start_ms: i64, end_ms: i64, task: String) -> Option<WorkEvent> {
        if start_ms >= end_ms {
            return None;
        }
        let event = WorkEvent {
            start_ms,
            end_ms,
            task,
        };
        debug!(task = %event.task, start_ms, end_ms, "work event logged");
        self.state.events.push(event.clone());
        Some(event)
    }
}
