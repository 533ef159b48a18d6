//! However ticks are spaced, the engine ends where a 1 Hz ticker would.

use breakbank_core::{Phase, Settings, TimerEngine};
use proptest::prelude::*;

const T0: i64 = 1_686_312_000_000;

fn short_settings() -> Settings {
    Settings {
        work_seconds: 7,
        break_seconds: 3,
        long_break_seconds: 5,
        long_break_every: 2,
    }
}

/// Longest countdown any automatic phase can start with.
fn max_phase_seconds(s: &Settings) -> u64 {
    s.work_seconds.max(s.break_seconds).max(s.long_break_seconds)
}

fn started(settings: Settings, continuous: bool, task: &str) -> TimerEngine {
    let mut engine = TimerEngine::new(settings);
    engine.set_continuous_work(continuous);
    engine.set_selected_task(task);
    engine.start();
    // Same first tick for both sides, so event timestamps share an origin.
    engine.tick(T0 + 1000);
    engine
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    #[test]
    fn chunked_ticks_match_per_second_ticks(
        chunks in prop::collection::vec(0i64..45_000, 1..20),
        continuous in any::<bool>(),
    ) {
        let mut chunked = started(short_settings(), continuous, "focus");
        let mut now = T0 + 1000;
        for chunk in &chunks {
            now += chunk;
            chunked.tick(now);
        }

        let whole_secs = (now - (T0 + 1000)) / 1000;
        let mut stepped = started(short_settings(), continuous, "focus");
        for i in 1..=whole_secs {
            stepped.tick(T0 + 1000 + i * 1000);
        }

        prop_assert_eq!(chunked.state(), stepped.state());
    }

    #[test]
    fn claimed_break_spends_exactly_the_balance(
        chunks in prop::collection::vec(0i64..20_000, 1..30),
        claim_at in 0usize..30,
    ) {
        let mut engine = started(short_settings(), true, "focus");
        let mut now = T0 + 1000;
        for (i, chunk) in chunks.iter().enumerate() {
            if i == claim_at {
                engine.start_break();
            }
            now += chunk;
            engine.tick(now);
            let s = engine.state();
            prop_assert!(s.long_break_counter < short_settings().long_break_every);
            prop_assert!(
                s.seconds_remaining <= max_phase_seconds(&short_settings()).max(s.initial_seconds)
            );
            if s.phase == Phase::Break {
                prop_assert_eq!(s.available_break_time_seconds, s.seconds_remaining);
            }
        }
    }

    #[test]
    fn worked_seconds_track_work_phase_time(
        secs in 1i64..400,
    ) {
        let mut engine = started(short_settings(), true, "focus");
        engine.tick(T0 + 1000 + secs * 1000);
        // Continuous mode never leaves Work, so every second is worked.
        prop_assert_eq!(engine.state().total_time_worked_seconds, (secs + 1) as u64);
    }
}
