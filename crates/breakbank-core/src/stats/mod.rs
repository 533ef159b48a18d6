//! Statistics over the work-event log.

mod task_totals;

pub use task_totals::{aggregate, AggregateOptions, TaskTotals};
