//! Display helpers

use std::time::Duration;

/// Format a duration as `mm:ss`
///
/// Minutes are not wrapped into hours, so a 75 minute video renders as `75:00`.
pub fn format_duration(duration: Duration) -> String {
    let secs = duration.as_secs();
    format!("{:02}:{:02}", secs / 60, secs % 60)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn formats_minutes_and_seconds() {
        assert_eq!(format_duration(Duration::ZERO), "00:00");
        assert_eq!(format_duration(Duration::from_millis(61_999)), "01:01");
        assert_eq!(format_duration(Duration::from_secs(75 * 60)), "75:00");
    }
}
