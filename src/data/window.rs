use anyhow::{bail, Result};
use chrono::{DateTime, Duration, Utc};

use super::reading::Reading;

/// Suffix to seconds multiplier (order matters: longer suffixes first)
const UNITS: &[(&str, i64)] = &[("ms", 0), ("s", 1), ("m", 60), ("h", 3_600), ("d", 86_400)];

/// A lookback window over the reading history.
///
/// Rows older than `now - window` are excluded from display.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TimeWindow(Duration);

impl TimeWindow {
    pub fn new(duration: Duration) -> Self {
        Self(duration)
    }

    /// Parse window strings like "90s", "15m", "1h", "7d"
    pub fn parse(s: &str) -> Result<Self> {
        let s = s.trim();

        for (suffix, seconds) in UNITS {
            if let Some(val_str) = s.strip_suffix(suffix) {
                let val: i64 = val_str.trim().parse()?;
                if *seconds == 0 {
                    bail!("Window resolution is seconds, got: {}", s);
                }
                return Ok(Self(Duration::seconds(val * seconds)));
            }
        }

        bail!("Unknown window format: {}", s)
    }

    /// Format the window for display ("15m", "1h", "36h")
    pub fn format(&self) -> String {
        let secs = self.0.num_seconds();
        if secs % 86_400 == 0 {
            format!("{}d", secs / 86_400)
        } else if secs % 3_600 == 0 {
            format!("{}h", secs / 3_600)
        } else if secs % 60 == 0 {
            format!("{}m", secs / 60)
        } else {
            format!("{}s", secs)
        }
    }

    /// The instant rows must be at or after to fall inside the window.
    pub fn cutoff(&self, now: DateTime<Utc>) -> DateTime<Utc> {
        now - self.0
    }

    /// Clip rows (ascending by timestamp) to `timestamp >= now - window`.
    pub fn clip<'a>(&self, readings: &'a [Reading], now: DateTime<Utc>) -> &'a [Reading] {
        let cutoff = self.cutoff(now);
        let start = readings.partition_point(|r| r.timestamp < cutoff);
        &readings[start..]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn reading_at(ts: DateTime<Utc>) -> Reading {
        Reading {
            timestamp: ts,
            temperature: 50.0,
            pressure: 8.0,
            vibration: 2.0,
            compressor_id: None,
        }
    }

    #[test]
    fn test_parse_minutes() {
        let w = TimeWindow::parse("15m").unwrap();
        assert_eq!(w.0, Duration::minutes(15));
    }

    #[test]
    fn test_parse_hours() {
        let w = TimeWindow::parse("1h").unwrap();
        assert_eq!(w.0, Duration::hours(1));
    }

    #[test]
    fn test_parse_rejects_garbage() {
        assert!(TimeWindow::parse("eventually").is_err());
        assert!(TimeWindow::parse("5ms").is_err());
    }

    #[test]
    fn test_format_round_trip() {
        for s in ["90s", "15m", "1h", "36h", "7d"] {
            assert_eq!(TimeWindow::parse(s).unwrap().format(), s);
        }
    }

    #[test]
    fn test_clip_inclusive_boundary() {
        let now = Utc::now();
        let rows = vec![
            reading_at(now - Duration::hours(2)),
            reading_at(now - Duration::hours(1)), // exactly at the cutoff
            reading_at(now - Duration::minutes(30)),
            reading_at(now),
        ];

        let window = TimeWindow::parse("1h").unwrap();
        let clipped = window.clip(&rows, now);
        assert_eq!(clipped.len(), 3);
        assert!(clipped.iter().all(|r| r.timestamp >= now - Duration::hours(1)));
    }

    #[test]
    fn test_clip_empty_and_all_inside() {
        let now = Utc::now();
        let window = TimeWindow::parse("1h").unwrap();
        assert!(window.clip(&[], now).is_empty());

        let rows = vec![reading_at(now), reading_at(now)];
        assert_eq!(window.clip(&rows, now).len(), 2);
    }
}
