//! File-based data source.
//!
//! Polls a local CSV file for reading rows. This is the offline mode of
//! operation: a previously exported dashboard state (or any CSV in the
//! export format) can be reopened and watched for changes.

use std::fs::File;
use std::path::{Path, PathBuf};
use std::time::SystemTime;

use super::DataSource;
use crate::data::{export, ReadingBatch};

/// A data source that reads batches from a CSV file.
///
/// The source tracks the file's modification time and only returns
/// new data when the file has been updated.
#[derive(Debug)]
pub struct FileSource {
    path: PathBuf,
    description: String,
    last_error: Option<String>,
    last_modified: Option<SystemTime>,
}

impl FileSource {
    /// Create a new file source for the given path.
    pub fn new<P: AsRef<Path>>(path: P) -> Self {
        let path = path.as_ref().to_path_buf();
        let description = format!("file: {}", path.display());
        Self {
            path,
            description,
            last_error: None,
            last_modified: None,
        }
    }

    /// Returns the path being monitored.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Get the file's modification time.
    fn get_modified_time(&self) -> Option<SystemTime> {
        std::fs::metadata(&self.path).ok()?.modified().ok()
    }

    /// Read and parse the file.
    fn read_file(&mut self) -> Option<ReadingBatch> {
        let file = match File::open(&self.path) {
            Ok(file) => file,
            Err(e) => {
                self.last_error = Some(format!("Read error: {}", e));
                return None;
            }
        };

        match export::read_csv(file) {
            Ok(batch) => {
                self.last_error = None;
                Some(batch)
            }
            Err(e) => {
                self.last_error = Some(format!("Parse error: {}", e));
                None
            }
        }
    }
}

impl DataSource for FileSource {
    fn poll(&mut self) -> Option<ReadingBatch> {
        let current_modified = self.get_modified_time();

        // Check if file has been modified since last read
        let file_changed = match (&self.last_modified, &current_modified) {
            (None, _) => true,        // First poll, always read
            (Some(_), None) => false, // File disappeared, don't update
            (Some(last), Some(current)) => current > last,
        };

        if file_changed {
            if let Some(batch) = self.read_file() {
                self.last_modified = current_modified;
                return Some(batch);
            }
        }

        None
    }

    fn description(&self) -> &str {
        &self.description
    }

    fn error(&self) -> Option<String> {
        self.last_error.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::{Seek, Write};
    use tempfile::NamedTempFile;

    fn sample_csv() -> &'static str {
        "timestamp,temperature,pressure,vibration,compressor_id\n\
         2024-05-14T10:00:00+00:00,55.2,8.1,2.4,AC-01\n\
         2024-05-14T10:00:05+00:00,55.4,8.2,2.5,AC-01\n"
    }

    #[test]
    fn test_file_source_new() {
        let source = FileSource::new("/tmp/readings.csv");
        assert_eq!(source.path(), Path::new("/tmp/readings.csv"));
        assert_eq!(source.description(), "file: /tmp/readings.csv");
        assert!(source.error().is_none());
    }

    #[test]
    fn test_file_source_poll_reads_file() {
        let mut file = NamedTempFile::new().unwrap();
        write!(file, "{}", sample_csv()).unwrap();
        file.flush().unwrap();

        let mut source = FileSource::new(file.path());

        // First poll should return data
        let batch = source.poll();
        assert!(batch.is_some());
        let batch = batch.unwrap();
        assert_eq!(batch.len(), 2);
        assert_eq!(batch[0].compressor_id.as_deref(), Some("AC-01"));

        // Second poll without file change should return None
        assert!(source.poll().is_none());
    }

    #[test]
    fn test_file_source_detects_changes() {
        let mut file = NamedTempFile::new().unwrap();
        write!(file, "{}", sample_csv()).unwrap();
        file.flush().unwrap();

        let mut source = FileSource::new(file.path());
        let _ = source.poll();

        // Modify the file (need to wait a bit for mtime to change)
        std::thread::sleep(std::time::Duration::from_millis(10));
        file.rewind().unwrap();
        write!(
            file,
            "timestamp,temperature,pressure,vibration,compressor_id\n\
             2024-05-14T11:00:00+00:00,60.0,9.5,3.2,AC-02\n"
        )
        .unwrap();
        file.flush().unwrap();

        // Poll again - should detect change
        // Note: This test may be flaky on some filesystems with low mtime resolution
        if let Some(batch) = source.poll() {
            assert_eq!(batch[0].compressor_id.as_deref(), Some("AC-02"));
        }
    }

    #[test]
    fn test_file_source_missing_file() {
        let mut source = FileSource::new("/nonexistent/path/readings.csv");

        assert!(source.poll().is_none());
        assert!(source.error().is_some());
        assert!(source.error().unwrap().contains("Read error"));
    }

    #[test]
    fn test_file_source_invalid_csv() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, "timestamp,temperature,pressure,vibration,compressor_id").unwrap();
        writeln!(file, "not-a-time,oops,,,").unwrap();
        file.flush().unwrap();

        let mut source = FileSource::new(file.path());

        assert!(source.poll().is_none());
        assert!(source.error().is_some());
        assert!(source.error().unwrap().contains("Parse error"));
    }
}
