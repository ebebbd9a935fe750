//! Telemetry processing and status classification.
//!
//! This module transforms raw reading batches into processed data
//! with per-parameter status computed against configurable thresholds.

use std::time::Instant;

use super::reading::{Parameter, Reading, ReadingBatch};

/// Classification bands for one parameter.
///
/// A value strictly above `critical` is critical, strictly above `warning`
/// is a warning, anything else is normal. A value exactly at a boundary
/// stays in the lower band.
#[derive(Debug, Clone, Copy, PartialEq, serde::Deserialize)]
pub struct Band {
    /// Boundary above which a value triggers a warning.
    pub warning: f64,
    /// Boundary above which a value is critical.
    pub critical: f64,
}

impl Band {
    pub fn new(warning: f64, critical: f64) -> Self {
        Self { warning, critical }
    }
}

/// Classify a value against a band.
///
/// Total and side-effect free; severity is non-decreasing in `value`
/// for a fixed band.
pub fn classify(value: f64, band: &Band) -> Status {
    if value > band.critical {
        Status::Critical
    } else if value > band.warning {
        Status::Warning
    } else {
        Status::Normal
    }
}

/// Thresholds for all three monitored parameters.
///
/// Defaults match the reference device profile for a small rotary screw
/// compressor: 60/80 °C, 9/12 bar, 3/5 mm/s.
#[derive(Debug, Clone, PartialEq)]
pub struct Thresholds {
    pub temperature: Band,
    pub pressure: Band,
    pub vibration: Band,
}

impl Default for Thresholds {
    fn default() -> Self {
        Self {
            temperature: Band::new(60.0, 80.0),
            pressure: Band::new(9.0, 12.0),
            vibration: Band::new(3.0, 5.0),
        }
    }
}

impl Thresholds {
    /// The band for a given parameter.
    pub fn band(&self, parameter: Parameter) -> &Band {
        match parameter {
            Parameter::Temperature => &self.temperature,
            Parameter::Pressure => &self.pressure,
            Parameter::Vibration => &self.vibration,
        }
    }

    /// Classify one channel of a reading.
    pub fn classify(&self, parameter: Parameter, reading: &Reading) -> Status {
        classify(parameter.value_of(reading), self.band(parameter))
    }
}

/// Status for a parameter or for the compressor as a whole.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Status {
    Normal,
    Warning,
    Critical,
}

impl Status {
    /// Returns a short symbol for display.
    pub fn symbol(&self) -> &'static str {
        match self {
            Status::Normal => "OK",
            Status::Warning => "WARN",
            Status::Critical => "CRIT",
        }
    }

    /// Returns the full label for display.
    pub fn label(&self) -> &'static str {
        match self {
            Status::Normal => "Normal",
            Status::Warning => "Warning",
            Status::Critical => "Critical",
        }
    }
}

/// Latest value of one parameter with its computed status.
#[derive(Debug, Clone)]
pub struct Kpi {
    pub parameter: Parameter,
    pub value: f64,
    pub status: Status,
}

/// Aggregate statistics over the displayed rows of one parameter.
#[derive(Debug, Clone, Copy)]
pub struct ParameterStats {
    pub min: f64,
    pub max: f64,
    pub mean: f64,
}

/// Complete processed telemetry ready for display.
#[derive(Debug, Clone)]
pub struct TelemetryData {
    /// Readings in ascending timestamp order.
    pub readings: Vec<Reading>,
    /// The most recent reading, if any rows were returned.
    pub latest: Option<Reading>,
    /// Per-parameter KPIs for the latest reading, in display order.
    pub kpis: Vec<Kpi>,
    /// Worst status across all parameters.
    pub overall: Status,
    pub last_updated: Instant,
}

impl TelemetryData {
    /// Convert a raw batch into processed telemetry.
    ///
    /// This is the primary conversion method used by all data sources.
    /// The batch may arrive in any order (the backend serves newest-first);
    /// rows are sorted ascending so charts read left to right.
    pub fn from_batch(mut batch: ReadingBatch, thresholds: &Thresholds) -> Self {
        batch.sort_by_key(|r| r.timestamp);

        let latest = batch.last().cloned();

        let kpis: Vec<Kpi> = match &latest {
            Some(reading) => Parameter::ALL
                .iter()
                .map(|&parameter| Kpi {
                    parameter,
                    value: parameter.value_of(reading),
                    status: thresholds.classify(parameter, reading),
                })
                .collect(),
            None => Vec::new(),
        };

        let overall = kpis.iter().map(|k| k.status).max().unwrap_or(Status::Normal);

        Self {
            readings: batch,
            latest,
            kpis,
            overall,
            last_updated: Instant::now(),
        }
    }

    /// Parameters currently outside their normal band, worst first.
    pub fn out_of_band(&self) -> Vec<&Kpi> {
        let mut result: Vec<&Kpi> =
            self.kpis.iter().filter(|k| k.status != Status::Normal).collect();
        result.sort_by(|a, b| b.status.cmp(&a.status));
        result
    }

    /// Min/max/mean of one parameter over the given rows.
    ///
    /// Returns None for an empty slice.
    pub fn stats(rows: &[Reading], parameter: Parameter) -> Option<ParameterStats> {
        if rows.is_empty() {
            return None;
        }

        let mut min = f64::INFINITY;
        let mut max = f64::NEG_INFINITY;
        let mut sum = 0.0;
        for row in rows {
            let v = parameter.value_of(row);
            min = min.min(v);
            max = max.max(v);
            sum += v;
        }

        Some(ParameterStats {
            min,
            max,
            mean: sum / rows.len() as f64,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, Utc};

    fn reading(offset_secs: i64, temperature: f64, pressure: f64, vibration: f64) -> Reading {
        Reading {
            timestamp: Utc::now() + Duration::seconds(offset_secs),
            temperature,
            pressure,
            vibration,
            compressor_id: Some("AC-01".to_string()),
        }
    }

    #[test]
    fn test_classify_bands() {
        let band = Band::new(60.0, 80.0);
        assert_eq!(classify(55.0, &band), Status::Normal);
        assert_eq!(classify(61.0, &band), Status::Warning);
        assert_eq!(classify(80.5, &band), Status::Critical);
    }

    #[test]
    fn test_classify_boundary_stays_in_lower_band() {
        let band = Band::new(60.0, 80.0);
        assert_eq!(classify(60.0, &band), Status::Normal);
        assert_eq!(classify(80.0, &band), Status::Warning);
    }

    #[test]
    fn test_classify_is_monotonic() {
        let band = Band::new(9.0, 12.0);
        let values = [0.0, 5.0, 9.0, 9.1, 11.9, 12.0, 12.1, 50.0];
        let statuses: Vec<Status> = values.iter().map(|&v| classify(v, &band)).collect();
        for pair in statuses.windows(2) {
            assert!(pair[0] <= pair[1], "severity decreased: {:?}", pair);
        }
    }

    #[test]
    fn test_from_batch_sorts_ascending_and_picks_latest() {
        let batch = vec![
            reading(10, 70.0, 8.0, 2.0),
            reading(0, 50.0, 8.0, 2.0),
            reading(5, 55.0, 8.0, 2.0),
        ];

        let data = TelemetryData::from_batch(batch, &Thresholds::default());
        assert_eq!(data.readings.len(), 3);
        assert!(data.readings.windows(2).all(|w| w[0].timestamp <= w[1].timestamp));
        assert_eq!(data.latest.as_ref().unwrap().temperature, 70.0);
    }

    #[test]
    fn test_overall_is_worst_status() {
        // Temperature warning, vibration critical
        let batch = vec![reading(0, 65.0, 8.0, 6.0)];
        let data = TelemetryData::from_batch(batch, &Thresholds::default());
        assert_eq!(data.overall, Status::Critical);

        let out = data.out_of_band();
        assert_eq!(out.len(), 2);
        assert_eq!(out[0].parameter, Parameter::Vibration);
        assert_eq!(out[0].status, Status::Critical);
        assert_eq!(out[1].parameter, Parameter::Temperature);
    }

    #[test]
    fn test_empty_batch() {
        let data = TelemetryData::from_batch(Vec::new(), &Thresholds::default());
        assert!(data.latest.is_none());
        assert!(data.kpis.is_empty());
        assert_eq!(data.overall, Status::Normal);
        assert!(data.out_of_band().is_empty());
    }

    #[test]
    fn test_stats() {
        let rows = vec![
            reading(0, 50.0, 8.0, 2.0),
            reading(1, 60.0, 8.0, 2.0),
            reading(2, 70.0, 8.0, 2.0),
        ];

        let stats = TelemetryData::stats(&rows, Parameter::Temperature).unwrap();
        assert_eq!(stats.min, 50.0);
        assert_eq!(stats.max, 70.0);
        assert!((stats.mean - 60.0).abs() < f64::EPSILON);

        assert!(TelemetryData::stats(&[], Parameter::Pressure).is_none());
    }
}
