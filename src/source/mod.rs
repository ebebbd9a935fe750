//! Data source abstraction for receiving reading batches.
//!
//! This module provides a trait-based abstraction for receiving telemetry
//! from various sources (the hosted backend, local CSV files, in-memory
//! channels).

mod channel;
mod file;
mod rest;

pub use channel::ChannelSource;
pub use file::FileSource;
pub use rest::{build_client, fetch_batch, RestEndpoint, RestSource};

use std::fmt::Debug;

use crate::data::ReadingBatch;

/// Trait for receiving reading batches from various sources.
///
/// Implementations of this trait provide batches from different backends -
/// HTTP polling, file polling, or in-memory channels.
///
/// # Example
///
/// ```
/// use airwatch::{DataSource, FileSource};
///
/// let mut source = FileSource::new("readings.csv");
/// if let Some(batch) = source.poll() {
///     println!("Got {} readings", batch.len());
/// }
/// ```
pub trait DataSource: Send + Debug {
    /// Poll for the latest batch.
    ///
    /// Returns `Some(batch)` if new data is available, `None` otherwise.
    /// This method should be non-blocking.
    fn poll(&mut self) -> Option<ReadingBatch>;

    /// Returns a human-readable description of the source.
    ///
    /// Used for display in the TUI status bar.
    fn description(&self) -> &str;

    /// Check if the source has encountered an error.
    ///
    /// Returns the error message if an error occurred during the last
    /// fetch. Owned because REST and channel sources share error state
    /// with a background task behind a lock.
    fn error(&self) -> Option<String>;
}
