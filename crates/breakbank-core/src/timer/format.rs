/// Countdown display: `mm:ss`. Minutes are not wrapped into hours.
pub fn format_clock(secs: u64) -> String {
    format!("{:02}:{:02}", secs / 60, secs % 60)
}

/// Accumulator display: `hh:mm:ss`.
pub fn format_duration(secs: u64) -> String {
    format!("{:02}:{:02}:{:02}", secs / 3600, (secs / 60) % 60, secs % 60)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn clock_pads_minutes_and_seconds() {
        assert_eq!(format_clock(25 * 60), "25:00");
        assert_eq!(format_clock(59), "00:59");
        assert_eq!(format_clock(0), "00:00");
    }

    #[test]
    fn clock_keeps_long_balances_in_minutes() {
        assert_eq!(format_clock(125 * 60 + 7), "125:07");
    }

    #[test]
    fn duration_splits_hours() {
        assert_eq!(format_duration(1), "00:00:01");
        assert_eq!(format_duration(25 * 60), "00:25:00");
        assert_eq!(format_duration(100 * 60), "01:40:00");
        assert_eq!(format_duration(36 * 3600 + 61), "36:01:01");
    }
}
