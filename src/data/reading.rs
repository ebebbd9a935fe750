//! Shared types for sensor readings.
//!
//! These types match the row shape served by the backend's query surface.
//! They serve as the common data format between the remote `air_compressor`
//! table and this dashboard consumer.

use chrono::{DateTime, NaiveDateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};

/// A batch of readings as returned by one backend query.
pub type ReadingBatch = Vec<Reading>;

/// One timestamped sensor sample from the compressor.
///
/// Rows are written once by the device and never updated; the dashboard
/// only reads them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Reading {
    /// Sample instant, normalized to UTC.
    #[serde(deserialize_with = "deserialize_timestamp")]
    pub timestamp: DateTime<Utc>,

    /// Discharge temperature in °C.
    pub temperature: f64,

    /// Line pressure in bar.
    pub pressure: f64,

    /// Casing vibration in mm/s.
    pub vibration: f64,

    /// Device identifier, when the table carries more than one unit.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub compressor_id: Option<String>,
}

/// Accept RFC 3339 timestamps with or without an offset.
///
/// Backends with a timezone-less `timestamp` column serve strings like
/// `2024-05-14T10:00:00`; those are taken as UTC.
fn deserialize_timestamp<'de, D>(deserializer: D) -> Result<DateTime<Utc>, D::Error>
where
    D: Deserializer<'de>,
{
    let s = String::deserialize(deserializer)?;
    if let Ok(dt) = DateTime::parse_from_rfc3339(&s) {
        return Ok(dt.with_timezone(&Utc));
    }
    NaiveDateTime::parse_from_str(&s, "%Y-%m-%dT%H:%M:%S%.f")
        .map(|naive| naive.and_utc())
        .map_err(serde::de::Error::custom)
}

/// One of the three monitored channels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Parameter {
    Temperature,
    Pressure,
    Vibration,
}

impl Parameter {
    /// All channels in display order.
    pub const ALL: [Parameter; 3] = [
        Parameter::Temperature,
        Parameter::Pressure,
        Parameter::Vibration,
    ];

    /// Display label.
    pub fn label(&self) -> &'static str {
        match self {
            Parameter::Temperature => "Temperature",
            Parameter::Pressure => "Pressure",
            Parameter::Vibration => "Vibration",
        }
    }

    /// Measurement unit.
    pub fn unit(&self) -> &'static str {
        match self {
            Parameter::Temperature => "°C",
            Parameter::Pressure => "bar",
            Parameter::Vibration => "mm/s",
        }
    }

    /// Extract this channel's value from a reading.
    pub fn value_of(&self, reading: &Reading) -> f64 {
        match self {
            Parameter::Temperature => reading.temperature,
            Parameter::Pressure => reading.pressure,
            Parameter::Vibration => reading.vibration,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_deserialize_row_with_offset() {
        let json = r#"{
            "timestamp": "2024-05-14T10:00:00+00:00",
            "temperature": 55.2,
            "pressure": 8.1,
            "vibration": 2.4,
            "compressor_id": "AC-01"
        }"#;

        let reading: Reading = serde_json::from_str(json).unwrap();
        assert_eq!(reading.temperature, 55.2);
        assert_eq!(reading.pressure, 8.1);
        assert_eq!(reading.vibration, 2.4);
        assert_eq!(reading.compressor_id.as_deref(), Some("AC-01"));
        assert_eq!(reading.timestamp.to_rfc3339(), "2024-05-14T10:00:00+00:00");
    }

    #[test]
    fn test_deserialize_naive_timestamp_as_utc() {
        let json = r#"{
            "timestamp": "2024-05-14T10:00:00.250",
            "temperature": 61.0,
            "pressure": 9.5,
            "vibration": 3.1
        }"#;

        let reading: Reading = serde_json::from_str(json).unwrap();
        assert!(reading.compressor_id.is_none());
        assert_eq!(
            reading.timestamp,
            DateTime::parse_from_rfc3339("2024-05-14T10:00:00.250+00:00").unwrap()
        );
    }

    #[test]
    fn test_deserialize_batch() {
        let json = r#"[
            {"timestamp": "2024-05-14T10:00:05+00:00", "temperature": 55.0, "pressure": 8.0, "vibration": 2.0},
            {"timestamp": "2024-05-14T10:00:00+00:00", "temperature": 54.0, "pressure": 7.9, "vibration": 1.9}
        ]"#;

        let batch: ReadingBatch = serde_json::from_str(json).unwrap();
        assert_eq!(batch.len(), 2);
        assert!(batch[0].timestamp > batch[1].timestamp);
    }

    #[test]
    fn test_parameter_accessors() {
        let reading = Reading {
            timestamp: Utc::now(),
            temperature: 60.0,
            pressure: 9.0,
            vibration: 3.0,
            compressor_id: None,
        };

        assert_eq!(Parameter::Temperature.value_of(&reading), 60.0);
        assert_eq!(Parameter::Pressure.value_of(&reading), 9.0);
        assert_eq!(Parameter::Vibration.value_of(&reading), 3.0);
        assert_eq!(Parameter::Pressure.unit(), "bar");
    }
}
