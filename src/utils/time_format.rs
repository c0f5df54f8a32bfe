//! Duration formatting for display

use std::time::Duration;

/// Format seconds as zero-padded `HH:MM:SS`. Hours are not wrapped at 24.
pub fn format_hms(seconds: u64) -> String {
    let hours = seconds / 3600;
    let minutes = (seconds % 3600) / 60;
    let secs = seconds % 60;
    format!("{:02}:{:02}:{:02}", hours, minutes, secs)
}

/// Short human form: `2h 30m`, `5m`, or `42s` below one minute
pub fn format_readable(seconds: u64) -> String {
    let hours = seconds / 3600;
    let minutes = (seconds % 3600) / 60;

    if hours > 0 {
        format!("{}h {}m", hours, minutes)
    } else if minutes > 0 {
        format!("{}m", minutes)
    } else {
        format!("{}s", seconds)
    }
}

/// Uptime with every non-leading unit, e.g. `1h 0m 5s`
pub fn format_uptime(duration: Duration) -> String {
    let total = duration.as_secs();
    let hours = total / 3600;
    let minutes = (total % 3600) / 60;
    let seconds = total % 60;

    if hours > 0 {
        format!("{}h {}m {}s", hours, minutes, seconds)
    } else if minutes > 0 {
        format!("{}m {}s", minutes, seconds)
    } else {
        format!("{}s", seconds)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hms_pads_every_field() {
        assert_eq!(format_hms(0), "00:00:00");
        assert_eq!(format_hms(59), "00:00:59");
        assert_eq!(format_hms(3 * 3600 + 7 * 60 + 5), "03:07:05");
    }

    #[test]
    fn hms_keeps_counting_past_a_day() {
        assert_eq!(format_hms(100 * 3600), "100:00:00");
    }

    #[test]
    fn readable_picks_largest_units() {
        assert_eq!(format_readable(42), "42s");
        assert_eq!(format_readable(5 * 60 + 10), "5m");
        assert_eq!(format_readable(2 * 3600 + 30 * 60 + 59), "2h 30m");
    }

    #[test]
    fn uptime_includes_seconds() {
        assert_eq!(format_uptime(Duration::from_secs(3605)), "1h 0m 5s");
        assert_eq!(format_uptime(Duration::from_secs(61)), "1m 1s");
        assert_eq!(format_uptime(Duration::from_millis(900)), "0s");
    }
}
