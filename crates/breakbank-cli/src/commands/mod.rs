pub mod config;
pub mod events;
pub mod stats;
pub mod task;
pub mod timer;
