//! Per-task time totals over calendar windows.
//!
//! All day boundaries are computed in UTC. The reference date is always an
//! explicit input; nothing here reads the clock.

use std::collections::BTreeMap;

use chrono::{Datelike, Days, NaiveDate, NaiveTime};
use serde::{Deserialize, Serialize};

use crate::events::WorkEvent;

/// Seconds worked on one task in each window.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaskTotals {
    pub today: u64,
    pub yesterday: u64,
    pub week: u64,
    pub month: u64,
    pub custom: u64,
}

impl TaskTotals {
    fn is_empty(&self, include_custom: bool) -> bool {
        self.today == 0
            && self.yesterday == 0
            && self.week == 0
            && self.month == 0
            && (!include_custom || self.custom == 0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct AggregateOptions {
    /// Keep a task whose only non-zero bucket is `custom`.
    pub custom_keeps_task: bool,
}

impl Default for AggregateOptions {
    fn default() -> Self {
        Self {
            custom_keeps_task: true,
        }
    }
}

/// Epoch-ms bounds derived from a reference date and a custom range.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct Windows {
    today_start: i64,
    yesterday_start: i64,
    week_start: i64,
    month_start: i64,
    /// Exclusive end of today/week/month: midnight after the reference date.
    upper: i64,
    /// Inclusive `[from 00:00:00.000, to 23:59:59.999]`.
    custom: Option<(i64, i64)>,
}

impl Windows {
    pub(crate) fn new(
        reference: NaiveDate,
        custom_from: Option<NaiveDate>,
        custom_to: Option<NaiveDate>,
    ) -> Self {
        let yesterday = reference
            .checked_sub_days(Days::new(1))
            .unwrap_or(reference);
        let week = reference
            .checked_sub_days(Days::new(u64::from(reference.weekday().num_days_from_sunday())))
            .unwrap_or(reference);
        let month = reference.with_day(1).unwrap_or(reference);

        let custom = match (custom_from, custom_to) {
            (Some(from), Some(to)) => Some((start_of_day_ms(from), end_of_day_ms(to))),
            _ => None,
        };

        Self {
            today_start: start_of_day_ms(reference),
            yesterday_start: start_of_day_ms(yesterday),
            week_start: start_of_day_ms(week),
            month_start: start_of_day_ms(month),
            upper: end_of_day_ms(reference) + 1,
            custom,
        }
    }

    fn totals_for(&self, event: &WorkEvent) -> TaskTotals {
        let secs = event.duration_secs();
        let start = event.start_ms;
        let pick = |hit: bool| if hit { secs } else { 0 };
        let through_reference = |lo: i64| start >= lo && start < self.upper;
        TaskTotals {
            today: pick(through_reference(self.today_start)),
            yesterday: pick(start >= self.yesterday_start && start < self.today_start),
            week: pick(through_reference(self.week_start)),
            month: pick(through_reference(self.month_start)),
            custom: pick(
                self.custom
                    .is_some_and(|(lo, hi)| start >= lo && event.end_ms <= hi),
            ),
        }
    }
}

fn start_of_day_ms(date: NaiveDate) -> i64 {
    date.and_time(NaiveTime::MIN).and_utc().timestamp_millis()
}

fn end_of_day_ms(date: NaiveDate) -> i64 {
    let next = date.checked_add_days(Days::new(1)).unwrap_or(date);
    start_of_day_ms(next) - 1
}

/// Sum work events per task into today/yesterday/week/month/custom buckets.
///
/// Buckets overlap: an event counts toward every window it falls in. Events
/// with a blank task are skipped, and tasks with nothing in any bucket are
/// left out of the result (see [`AggregateOptions::custom_keeps_task`]).
pub fn aggregate(
    events: &[WorkEvent],
    reference: NaiveDate,
    custom_from: Option<NaiveDate>,
    custom_to: Option<NaiveDate>,
    options: AggregateOptions,
) -> BTreeMap<String, TaskTotals> {
    let windows = Windows::new(reference, custom_from, custom_to);
    let mut totals: BTreeMap<String, TaskTotals> = BTreeMap::new();

    for event in events.iter().filter(|e| !e.task.trim().is_empty()) {
        let add = windows.totals_for(event);
        let entry = totals.entry(event.task.clone()).or_default();
        entry.today += add.today;
        entry.yesterday += add.yesterday;
        entry.week += add.week;
        entry.month += add.month;
        entry.custom += add.custom;
    }

    totals.retain(|_, t| !t.is_empty(options.custom_keeps_task));
    totals
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn at(date: NaiveDate, h: u32, min: u32) -> i64 {
        date.and_hms_opt(h, min, 0).unwrap().and_utc().timestamp_millis()
    }

    fn event(start_ms: i64, minutes: i64, task: &str) -> WorkEvent {
        WorkEvent {
            start_ms,
            end_ms: start_ms + minutes * 60_000,
            task: task.into(),
        }
    }

    // 2023-06-09 is a Friday; the week starts on Sunday 2023-06-04.
    fn friday() -> NaiveDate {
        date(2023, 6, 9)
    }

    #[test]
    fn windows_use_sunday_week_and_first_of_month() {
        let w = Windows::new(friday(), None, None);
        assert_eq!(w.today_start, at(date(2023, 6, 9), 0, 0));
        assert_eq!(w.yesterday_start, at(date(2023, 6, 8), 0, 0));
        assert_eq!(w.week_start, at(date(2023, 6, 4), 0, 0));
        assert_eq!(w.month_start, at(date(2023, 6, 1), 0, 0));
        assert_eq!(w.upper, at(date(2023, 6, 10), 0, 0));
        assert_eq!(w.custom, None);
    }

    #[test]
    fn sunday_reference_starts_week_today() {
        let sunday = date(2023, 6, 4);
        let w = Windows::new(sunday, None, None);
        assert_eq!(w.week_start, w.today_start);
    }

    #[test]
    fn yesterday_crosses_month_boundary() {
        let w = Windows::new(date(2023, 7, 1), None, None);
        assert_eq!(w.yesterday_start, at(date(2023, 6, 30), 0, 0));
        assert_eq!(w.month_start, w.today_start);
    }

    #[test]
    fn event_today_counts_in_overlapping_buckets() {
        let events = vec![event(at(friday(), 12, 0), 25, "dog")];
        let totals = aggregate(&events, friday(), None, None, AggregateOptions::default());
        assert_eq!(
            totals["dog"],
            TaskTotals {
                today: 1500,
                yesterday: 0,
                week: 1500,
                month: 1500,
                custom: 0,
            }
        );
    }

    #[test]
    fn yesterday_excludes_today() {
        let events = vec![
            event(at(date(2023, 6, 8), 23, 50), 20, "a"),
            event(at(friday(), 0, 0), 10, "a"),
        ];
        let totals = aggregate(&events, friday(), None, None, AggregateOptions::default());
        let a = totals["a"];
        assert_eq!(a.yesterday, 20 * 60);
        assert_eq!(a.today, 10 * 60);
        assert_eq!(a.week, 30 * 60);
    }

    #[test]
    fn work_after_reference_date_is_not_counted() {
        let events = vec![
            event(at(date(2023, 6, 20), 9, 0), 25, "dog"),
            event(at(date(2023, 6, 10), 0, 0), 25, "dog"),
        ];
        let totals = aggregate(&events, friday(), None, None, AggregateOptions::default());
        assert!(totals.is_empty());
    }

    #[test]
    fn last_minute_of_reference_day_counts() {
        let events = vec![event(at(friday(), 23, 59), 1, "late")];
        let totals = aggregate(&events, friday(), None, None, AggregateOptions::default());
        assert_eq!(totals["late"].today, 60);
        assert_eq!(totals["late"].week, 60);
        assert_eq!(totals["late"].month, 60);
    }

    #[test]
    fn blank_tasks_are_skipped() {
        let events = vec![
            event(at(friday(), 9, 0), 25, ""),
            event(at(friday(), 10, 0), 25, "   "),
        ];
        let totals = aggregate(&events, friday(), None, None, AggregateOptions::default());
        assert!(totals.is_empty());
    }

    #[test]
    fn old_tasks_drop_out() {
        let events = vec![event(at(date(2023, 5, 2), 9, 0), 25, "old")];
        let totals = aggregate(&events, friday(), None, None, AggregateOptions::default());
        assert!(totals.is_empty());
    }

    #[test]
    fn custom_range_requires_full_containment() {
        let from = date(2023, 5, 1);
        let to = date(2023, 5, 2);
        let events = vec![
            event(at(date(2023, 5, 1), 0, 0), 25, "inside"),
            event(at(date(2023, 5, 2), 23, 50), 20, "spills"),
            event(at(date(2023, 4, 30), 23, 50), 20, "early"),
        ];
        let totals = aggregate(
            &events,
            friday(),
            Some(from),
            Some(to),
            AggregateOptions::default(),
        );
        assert_eq!(totals["inside"].custom, 1500);
        assert!(!totals.contains_key("spills"));
        assert!(!totals.contains_key("early"));
    }

    #[test]
    fn custom_upper_bound_is_last_millisecond_of_day() {
        let w = Windows::new(friday(), Some(friday()), Some(friday()));
        let (lo, hi) = w.custom.unwrap();
        assert_eq!(lo, at(friday(), 0, 0));
        assert_eq!(hi, at(date(2023, 6, 10), 0, 0) - 1);
    }

    #[test]
    fn custom_only_task_can_be_filtered_out() {
        let events = vec![event(at(date(2023, 5, 1), 9, 0), 25, "old")];
        let range = (Some(date(2023, 5, 1)), Some(date(2023, 5, 31)));

        let kept = aggregate(&events, friday(), range.0, range.1, AggregateOptions::default());
        assert_eq!(kept["old"].custom, 1500);

        let dropped = aggregate(
            &events,
            friday(),
            range.0,
            range.1,
            AggregateOptions {
                custom_keeps_task: false,
            },
        );
        assert!(dropped.is_empty());
    }

    #[test]
    fn durations_floor_per_event() {
        let start = at(friday(), 8, 0);
        let events = vec![
            WorkEvent {
                start_ms: start,
                end_ms: start + 1_999,
                task: "a".into(),
            },
            WorkEvent {
                start_ms: start,
                end_ms: start + 1_999,
                task: "a".into(),
            },
        ];
        let totals = aggregate(&events, friday(), None, None, AggregateOptions::default());
        assert_eq!(totals["a"].today, 2);
    }
}
