use breakbank_core::timer::format_duration;
use breakbank_core::ValidationError;
use chrono::NaiveDate;
use clap::Subcommand;

use crate::session::{CliResult, Session};

#[derive(Subcommand)]
pub enum StatsAction {
    /// Per-task totals for today, yesterday, this week, this month and a custom range
    Totals {
        /// Reference date (YYYY-MM-DD, UTC); defaults to today
        #[arg(long)]
        date: Option<NaiveDate>,
        /// First day of the custom range (YYYY-MM-DD)
        #[arg(long, requires = "to")]
        from: Option<NaiveDate>,
        /// Last day of the custom range, inclusive (YYYY-MM-DD)
        #[arg(long, requires = "from")]
        to: Option<NaiveDate>,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
}

pub fn run(action: StatsAction, now: Option<i64>) -> CliResult {
    let mut session = Session::open(now)?;

    match action {
        StatsAction::Totals {
            date,
            from,
            to,
            json,
        } => {
            if let (Some(from), Some(to)) = (from, to) {
                if from > to {
                    return Err(ValidationError::InvalidDateRange { from, to }.into());
                }
                session.engine.set_custom_range(from, to);
            }

            let reference = date.unwrap_or_else(|| session.today());
            let totals = session
                .engine
                .totals(reference, session.config.aggregate_options());

            if json {
                println!("{}", serde_json::to_string_pretty(&totals)?);
            } else if totals.is_empty() {
                println!("no work logged");
            } else {
                println!(
                    "{:<24} {:>8} {:>9} {:>8} {:>8} {:>8}",
                    "TASK", "TODAY", "YESTERDAY", "WEEK", "MONTH", "CUSTOM"
                );
                for (task, t) in &totals {
                    println!(
                        "{:<24} {:>8} {:>9} {:>8} {:>8} {:>8}",
                        task,
                        format_duration(t.today),
                        format_duration(t.yesterday),
                        format_duration(t.week),
                        format_duration(t.month),
                        format_duration(t.custom)
                    );
                }
            }
        }
    }

    session.save()?;
    Ok(())
}
