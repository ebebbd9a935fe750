//! Historical value tracking for sparklines and rate calculations.

use std::collections::HashMap;
use std::collections::VecDeque;
use std::time::Instant;

use super::reading::Parameter;
use super::telemetry::TelemetryData;

/// Maximum number of refresh samples to keep.
const MAX_HISTORY_SIZE: usize = 60;

/// Tracks latest values across refreshes for trending and sparklines.
///
/// One sample per refresh cycle is recorded for each parameter, which
/// keeps the sparklines meaningful even when the backend serves the same
/// tail of rows for several cycles.
#[derive(Debug, Clone)]
pub struct History {
    values: HashMap<Parameter, VecDeque<f64>>,
    /// Timestamps of samples for rate calculations.
    timestamps: VecDeque<Instant>,
}

impl Default for History {
    fn default() -> Self {
        Self::new()
    }
}

impl History {
    /// Create a new empty history.
    pub fn new() -> Self {
        Self {
            values: HashMap::new(),
            timestamps: VecDeque::new(),
        }
    }

    /// Record the latest values from a processed snapshot.
    ///
    /// Snapshots without rows are skipped so gaps do not flatten the trend.
    pub fn record(&mut self, data: &TelemetryData) {
        let Some(ref latest) = data.latest else {
            return;
        };

        for &parameter in &Parameter::ALL {
            let samples = self.values.entry(parameter).or_default();
            samples.push_back(parameter.value_of(latest));
            if samples.len() > MAX_HISTORY_SIZE {
                samples.pop_front();
            }
        }

        self.timestamps.push_back(data.last_updated);
        if self.timestamps.len() > MAX_HISTORY_SIZE {
            self.timestamps.pop_front();
        }
    }

    /// Get sparkline data for a parameter (normalized to 0-7 for 8 bar levels).
    ///
    /// Returns an empty Vec if there's not enough history.
    pub fn sparkline(&self, parameter: Parameter) -> Vec<u8> {
        let Some(samples) = self.values.get(&parameter) else {
            return Vec::new();
        };

        if samples.len() < 2 {
            return Vec::new();
        }

        let max = samples.iter().copied().fold(f64::NEG_INFINITY, f64::max);
        let min = samples.iter().copied().fold(f64::INFINITY, f64::min);
        let range = (max - min).max(f64::EPSILON);

        samples
            .iter()
            .map(|&v| {
                let normalized = ((v - min) / range * 7.0) as u8;
                normalized.min(7)
            })
            .collect()
    }

    /// Rate of change (units per second) between the last two samples.
    ///
    /// Returns None if there's not enough history to calculate a rate.
    pub fn rate(&self, parameter: Parameter) -> Option<f64> {
        let samples = self.values.get(&parameter)?;
        if samples.len() < 2 || self.timestamps.len() < 2 {
            return None;
        }

        let current = *samples.back()?;
        let previous = *samples.get(samples.len() - 2)?;

        let current_time = self.timestamps.back()?;
        let previous_time = self.timestamps.get(self.timestamps.len() - 2)?;
        let elapsed = current_time.duration_since(*previous_time).as_secs_f64();

        if elapsed > 0.0 {
            Some((current - previous) / elapsed)
        } else {
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::reading::Reading;
    use crate::data::telemetry::Thresholds;
    use chrono::Utc;

    fn snapshot(temperature: f64) -> TelemetryData {
        let batch = vec![Reading {
            timestamp: Utc::now(),
            temperature,
            pressure: 8.0,
            vibration: 2.0,
            compressor_id: None,
        }];
        TelemetryData::from_batch(batch, &Thresholds::default())
    }

    #[test]
    fn test_sparkline_normalization() {
        let mut history = History::new();
        history.record(&snapshot(50.0));
        history.record(&snapshot(60.0));
        history.record(&snapshot(70.0));

        let spark = history.sparkline(Parameter::Temperature);
        assert_eq!(spark.len(), 3);
        assert_eq!(spark[0], 0);
        assert_eq!(spark[2], 7);
        assert!(spark[1] > spark[0] && spark[1] < spark[2]);
    }

    #[test]
    fn test_sparkline_needs_two_samples() {
        let mut history = History::new();
        assert!(history.sparkline(Parameter::Pressure).is_empty());
        history.record(&snapshot(50.0));
        assert!(history.sparkline(Parameter::Pressure).is_empty());
    }

    #[test]
    fn test_empty_snapshot_not_recorded() {
        let mut history = History::new();
        let empty = TelemetryData::from_batch(Vec::new(), &Thresholds::default());
        history.record(&empty);
        history.record(&snapshot(50.0));
        history.record(&snapshot(55.0));

        // Only the two non-empty snapshots were sampled
        assert_eq!(history.sparkline(Parameter::Temperature).len(), 2);
    }

    #[test]
    fn test_rate_sign() {
        let mut history = History::new();
        history.record(&snapshot(50.0));
        std::thread::sleep(std::time::Duration::from_millis(5));
        history.record(&snapshot(40.0));

        let rate = history.rate(Parameter::Temperature).unwrap();
        assert!(rate < 0.0);
    }

    #[test]
    fn test_history_is_bounded() {
        let mut history = History::new();
        for i in 0..200 {
            history.record(&snapshot(i as f64));
        }
        assert!(history.sparkline(Parameter::Temperature).len() <= 60);
    }
}
