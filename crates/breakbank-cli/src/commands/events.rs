use breakbank_core::WorkEvent;
use chrono::{DateTime, Utc};
use clap::Subcommand;

use crate::session::{CliResult, Session};

#[derive(Subcommand)]
pub enum EventsAction {
    /// List logged work events, oldest first
    List {
        /// Only events for this task
        #[arg(long)]
        task: Option<String>,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
}

fn utc(ms: i64) -> DateTime<Utc> {
    DateTime::<Utc>::from_timestamp_millis(ms).unwrap_or_default()
}

/// `2023-06-09 Pet the dog 12:00 - 12:25` (UTC).
fn describe(event: &WorkEvent) -> String {
    let start = utc(event.start_ms);
    let end = utc(event.end_ms);
    format!(
        "{} {} {} - {}",
        start.format("%Y-%m-%d"),
        event.task,
        start.format("%H:%M"),
        end.format("%H:%M")
    )
}

pub fn run(action: EventsAction, now: Option<i64>) -> CliResult {
    let session = Session::open(now)?;

    match action {
        EventsAction::List { task, json } => {
            let events: Vec<&WorkEvent> = session
                .engine
                .events()
                .iter()
                .filter(|e| task.as_deref().map_or(true, |t| e.task == t))
                .collect();
            if json {
                println!("{}", serde_json::to_string_pretty(&events)?);
            } else {
                for event in events {
                    println!("{}", describe(event));
                }
            }
        }
    }

    session.save()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn describe_uses_utc_clock_times() {
        let event = WorkEvent {
            start_ms: 1_686_312_000_000,
            end_ms: 1_686_312_000_000 + 25 * 60_000,
            task: "Pet the dog".into(),
        };
        assert_eq!(describe(&event), "2023-06-09 Pet the dog 12:00 - 12:25");
    }
}
