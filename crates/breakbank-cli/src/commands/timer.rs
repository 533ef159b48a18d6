use breakbank_core::{Clock, ValidationError};
use clap::{Subcommand, ValueEnum};
use tracing::info;

use crate::session::{print_outcome, CliResult, Session};

#[derive(Clone, Copy, ValueEnum)]
pub enum Toggle {
    On,
    Off,
}

#[derive(Subcommand)]
pub enum TimerAction {
    /// Start (or resume) the countdown
    Start,
    /// Pause the countdown, logging the work done so far
    Hold,
    /// Cut the current break short and go back to work
    Work,
    /// Spend the whole banked break balance now
    Break,
    /// Reset counters and the countdown (tasks and history are kept)
    Reset,
    /// Keep working when a work phase ends instead of switching to a break
    Continuous {
        #[arg(value_enum)]
        state: Toggle,
    },
    /// Print current timer state as JSON
    Status,
    /// Advance to now and print completed phases as JSON
    Tick,
    /// Tick once per second in the foreground, printing the state each time.
    /// Stops when the timer is idle.
    Watch {
        /// Stop after this many ticks (required with --now)
        #[arg(long)]
        count: Option<u64>,
    },
}

pub fn run(action: TimerAction, now: Option<i64>) -> CliResult {
    let mut session = Session::open(now)?;

    match action {
        TimerAction::Start => {
            let event = session.engine.start();
            if event.is_some() {
                session.mark_started()?;
            }
            print_outcome(event, &session.engine)?;
        }
        TimerAction::Hold => {
            let event = session.engine.hold();
            print_outcome(event, &session.engine)?;
        }
        TimerAction::Work => {
            let event = session.engine.return_to_work();
            print_outcome(event, &session.engine)?;
        }
        TimerAction::Break => {
            let event = session.engine.start_break();
            print_outcome(event, &session.engine)?;
        }
        TimerAction::Reset => {
            let event = session.engine.reset();
            print_outcome(event, &session.engine)?;
        }
        TimerAction::Continuous { state } => {
            let event = session
                .engine
                .set_continuous_work(matches!(state, Toggle::On));
            print_outcome(event, &session.engine)?;
        }
        TimerAction::Status => {
            print_outcome(None, &session.engine)?;
        }
        TimerAction::Tick => {
            let completed = session.catch_up()?;
            println!("{}", serde_json::to_string_pretty(&completed)?);
        }
        TimerAction::Watch { count } => {
            if count.is_none() && session.clock.is_pinned() {
                return Err(ValidationError::InvalidValue {
                    field: "count".into(),
                    message: "required when the clock is pinned with --now".into(),
                }
                .into());
            }
            if !session.engine.is_running() {
                print_outcome(None, &session.engine)?;
            }
            info!(?count, "watching timer");
            let mut ticks = 0u64;
            while session.engine.is_running() && count.map_or(true, |limit| ticks < limit) {
                session.clock.wait_one_second();
                let completed = session.engine.tick(session.clock.now_ms());
                for event in &completed {
                    println!("{}", serde_json::to_string(event)?);
                }
                println!("{}", serde_json::to_string(&session.engine.snapshot())?);
                session.save()?;
                ticks += 1;
            }
        }
    }

    session.save()?;
    Ok(())
}
