mod engine;
mod format;
mod settings;
mod tasks;

pub use engine::{Phase, Status, TimerEngine, TimerState};
pub use format::{format_clock, format_duration};
pub use settings::Settings;
pub use tasks::{Task, TaskList, NO_TASK};
