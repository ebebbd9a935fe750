//! CSV export and import of reading rows.
//!
//! Export covers exactly the rows currently displayed; the same format is
//! read back by the file data source, so an exported dashboard state can be
//! reopened offline.

use std::fs::File;
use std::io::{Read, Write};
use std::path::Path;

use anyhow::{Context, Result};

use super::reading::{Reading, ReadingBatch};

/// Write rows as UTF-8 CSV with a header row.
///
/// Columns: `timestamp,temperature,pressure,vibration,compressor_id`,
/// timestamps in RFC 3339.
pub fn write_csv<W: Write>(writer: W, readings: &[Reading]) -> Result<()> {
    let mut csv_writer = csv::Writer::from_writer(writer);
    for reading in readings {
        csv_writer.serialize(ExportRow::from(reading))?;
    }
    csv_writer.flush()?;
    Ok(())
}

/// Parse rows from CSV produced by [`write_csv`].
pub fn read_csv<R: Read>(reader: R) -> Result<ReadingBatch> {
    let mut csv_reader = csv::Reader::from_reader(reader);
    let mut batch = ReadingBatch::new();
    for row in csv_reader.deserialize::<ExportRow>() {
        batch.push(row?.into());
    }
    Ok(batch)
}

/// Export rows to a file, creating or truncating it.
pub fn export_to_file(path: &Path, readings: &[Reading]) -> Result<()> {
    let file = File::create(path)
        .with_context(|| format!("Failed to create {}", path.display()))?;
    write_csv(file, readings)
}

/// Flat row shape for CSV.
///
/// `Reading` itself serializes its optional id with `skip_serializing_if`,
/// which would drop the column entirely; CSV needs a stable column count.
#[derive(Debug, serde::Serialize, serde::Deserialize)]
struct ExportRow {
    timestamp: chrono::DateTime<chrono::Utc>,
    temperature: f64,
    pressure: f64,
    vibration: f64,
    compressor_id: Option<String>,
}

impl From<&Reading> for ExportRow {
    fn from(reading: &Reading) -> Self {
        Self {
            timestamp: reading.timestamp,
            temperature: reading.temperature,
            pressure: reading.pressure,
            vibration: reading.vibration,
            compressor_id: reading.compressor_id.clone(),
        }
    }
}

impl From<ExportRow> for Reading {
    fn from(row: ExportRow) -> Self {
        Self {
            timestamp: row.timestamp,
            temperature: row.temperature,
            pressure: row.pressure,
            vibration: row.vibration,
            compressor_id: row.compressor_id.filter(|id| !id.is_empty()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, Utc};

    fn sample_rows() -> Vec<Reading> {
        let base = Utc::now();
        vec![
            Reading {
                timestamp: base,
                temperature: 55.25,
                pressure: 8.1,
                vibration: 2.4,
                compressor_id: Some("AC-01".to_string()),
            },
            Reading {
                timestamp: base + Duration::seconds(5),
                temperature: 81.0,
                pressure: 12.5,
                vibration: 5.5,
                compressor_id: None,
            },
        ]
    }

    #[test]
    fn test_csv_round_trip() {
        let rows = sample_rows();

        let mut buffer = Vec::new();
        write_csv(&mut buffer, &rows).unwrap();
        let parsed = read_csv(buffer.as_slice()).unwrap();

        assert_eq!(parsed.len(), rows.len());
        for (original, round_tripped) in rows.iter().zip(&parsed) {
            assert_eq!(original.timestamp, round_tripped.timestamp);
            assert_eq!(original.temperature, round_tripped.temperature);
            assert_eq!(original.pressure, round_tripped.pressure);
            assert_eq!(original.vibration, round_tripped.vibration);
            assert_eq!(original.compressor_id, round_tripped.compressor_id);
        }
    }

    #[test]
    fn test_csv_header_shape() {
        let mut buffer = Vec::new();
        write_csv(&mut buffer, &sample_rows()).unwrap();

        let text = String::from_utf8(buffer).unwrap();
        let header = text.lines().next().unwrap();
        assert_eq!(
            header,
            "timestamp,temperature,pressure,vibration,compressor_id"
        );
        assert_eq!(text.lines().count(), 3);
    }

    #[test]
    fn test_empty_export() {
        let mut buffer = Vec::new();
        write_csv(&mut buffer, &[]).unwrap();
        let parsed = read_csv(buffer.as_slice()).unwrap();
        assert!(parsed.is_empty());
    }

    #[test]
    fn test_malformed_csv_is_an_error() {
        let text = "timestamp,temperature,pressure,vibration,compressor_id\nnot-a-time,1,2,3,\n";
        assert!(read_csv(text.as_bytes()).is_err());
    }
}
