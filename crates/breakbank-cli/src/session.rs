//! One CLI invocation's view of the timer: config, engine and clock.
//!
//! Opening a session restores the saved snapshot and replays the 1 Hz ticker
//! up to the current time, so each command acts on an up-to-date state.

use std::time::Duration;

use breakbank_core::{
    Clock, Config, Database, Event, ManualClock, StateStore, SystemClock, TimerEngine,
};
use chrono::NaiveDate;
use tracing::debug;

/// Epoch ms of the last `timer start`, used to place the ticker's first fire.
const STARTED_AT_KEY: &str = "ticker_started_at";

pub type CliResult<T = ()> = Result<T, Box<dyn std::error::Error>>;

pub enum CliClock {
    System(SystemClock),
    /// Pinned by `--now`; waiting advances it instead of sleeping.
    Manual(ManualClock),
}

impl CliClock {
    pub fn from_arg(now: Option<i64>) -> Self {
        match now {
            Some(ms) => CliClock::Manual(ManualClock::new(ms)),
            None => CliClock::System(SystemClock),
        }
    }

    pub fn is_pinned(&self) -> bool {
        matches!(self, CliClock::Manual(_))
    }

    pub fn wait_one_second(&self) {
        match self {
            CliClock::System(_) => std::thread::sleep(Duration::from_secs(1)),
            CliClock::Manual(clock) => clock.advance_secs(1),
        }
    }
}

impl Clock for CliClock {
    fn now_ms(&self) -> i64 {
        match self {
            CliClock::System(clock) => clock.now_ms(),
            CliClock::Manual(clock) => clock.now_ms(),
        }
    }
}

pub struct Session {
    db: Database,
    pub config: Config,
    pub engine: TimerEngine,
    pub clock: CliClock,
}

impl Session {
    pub fn open(now: Option<i64>) -> CliResult<Self> {
        let config = Config::load()?;
        let settings = config.settings()?;
        let db = Database::open()?;
        let engine = match db.load_state()? {
            Some(state) => TimerEngine::from_state(settings, state),
            None => TimerEngine::new(settings),
        };
        let mut session = Self {
            db,
            config,
            engine,
            clock: CliClock::from_arg(now),
        };
        let completed = session.catch_up()?;
        debug!(completed = completed.len(), "session opened");
        Ok(session)
    }

    pub fn today(&self) -> NaiveDate {
        self.clock.today()
    }

    /// Tick the engine up to now, as the 1 Hz ticker would have.
    ///
    /// The ticker's first fire lands one second after `timer start`; later
    /// fires are coalesced into a single tick at the current time.
    pub fn catch_up(&mut self) -> CliResult<Vec<Event>> {
        if !self.engine.is_running() {
            return Ok(Vec::new());
        }
        let now = self.clock.now_ms();
        let mut completed = Vec::new();
        if self.engine.state().last_timestamp.is_none() {
            let started_at = self
                .db
                .kv_get(STARTED_AT_KEY)?
                .and_then(|v| v.parse::<i64>().ok())
                .unwrap_or(now - 1000);
            let first_fire = started_at + 1000;
            if first_fire > now {
                return Ok(completed);
            }
            completed.extend(self.engine.tick(first_fire));
        }
        completed.extend(self.engine.tick(now));
        Ok(completed)
    }

    /// Remember when the ticker started so the next session can place its first fire.
    pub fn mark_started(&self) -> CliResult {
        let now = self.clock.now_ms();
        self.db.kv_set(STARTED_AT_KEY, &now.to_string())?;
        Ok(())
    }

    pub fn save(&self) -> CliResult {
        self.db.save_state(self.engine.state())?;
        Ok(())
    }
}

/// Print the command's event, or the current snapshot when it was a no-op.
pub fn print_outcome(event: Option<Event>, engine: &TimerEngine) -> CliResult {
    let event = event.unwrap_or_else(|| engine.snapshot());
    println!("{}", serde_json::to_string_pretty(&event)?);
    Ok(())
}
