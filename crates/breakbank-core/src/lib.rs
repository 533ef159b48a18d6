//! # breakbank Core Library
//!
//! Core business logic for breakbank, a work/break interval timer that
//! banks break time as a spendable balance and totals work per task.
//! The CLI binary is a thin layer over this library.
//!
//! ## Architecture
//!
//! - **Timer Engine**: a deterministic state machine driven by caller-supplied
//!   timestamps. Ticks may arrive late or in bursts; the result is the same
//!   as ticking once per second.
//! - **Task Totals**: pure aggregation of the work-event log into
//!   today/yesterday/week/month/custom windows for an explicit reference date.
//! - **Storage**: TOML configuration and a SQLite key-value store for the
//!   timer snapshot.
//!
//! ## Key Components
//!
//! - [`TimerEngine`]: Core timer state machine
//! - [`aggregate`]: Per-task totals
//! - [`Config`]: Application configuration management
//! - [`StateStore`]: Snapshot persistence seam, implemented by [`Database`]
//! - [`Clock`]: Wall-clock seam for callers

pub mod clock;
pub mod error;
pub mod events;
pub mod stats;
pub mod storage;
pub mod timer;

pub use clock::{Clock, ManualClock, SystemClock};
pub use error::{ConfigError, CoreError, DatabaseError, ValidationError};
pub use events::{Event, WorkEvent};
pub use stats::{aggregate, AggregateOptions, TaskTotals};
pub use storage::{Config, Database, StateStore};
pub use timer::{Phase, Settings, Status, TimerEngine, TimerState, NO_TASK};
