//! Channel-based data source.
//!
//! Receives reading batches via a tokio watch channel. This is useful for
//! embedding the dashboard behind another ingest path (or for tests) where
//! batches are pushed rather than polled.

use tokio::sync::watch;

use super::DataSource;
use crate::data::ReadingBatch;

/// A data source that receives batches via a channel.
///
/// The producer (e.g. a device gateway) sends batches through the channel,
/// and this source provides them to the TUI.
///
/// # Example
///
/// ```
/// use airwatch::ChannelSource;
///
/// // Create a channel pair
/// let (tx, source) = ChannelSource::create("gateway://plant-floor");
/// ```
#[derive(Debug)]
pub struct ChannelSource {
    receiver: watch::Receiver<ReadingBatch>,
    description: String,
    /// Track if we've returned the initial value yet
    initial_returned: bool,
}

impl ChannelSource {
    /// Create a new channel source.
    ///
    /// # Arguments
    ///
    /// * `receiver` - The receiving end of a watch channel
    /// * `source_description` - A description of where batches come from
    pub fn new(receiver: watch::Receiver<ReadingBatch>, source_description: &str) -> Self {
        let description = format!("channel: {}", source_description);
        Self {
            receiver,
            description,
            initial_returned: false,
        }
    }

    /// Create a channel pair for sending batches to a ChannelSource.
    ///
    /// Returns (sender, source) where the sender can be used to push
    /// batches and the source can be used with the TUI.
    pub fn create(source_description: &str) -> (watch::Sender<ReadingBatch>, Self) {
        let (tx, rx) = watch::channel(ReadingBatch::default());
        let source = Self::new(rx, source_description);
        (tx, source)
    }
}

impl DataSource for ChannelSource {
    fn poll(&mut self) -> Option<ReadingBatch> {
        // Return the initial value on first poll
        if !self.initial_returned {
            self.initial_returned = true;
            self.receiver.mark_changed();
        }

        // Check if there's a new value without blocking
        if self.receiver.has_changed().unwrap_or(false) {
            let batch = self.receiver.borrow_and_update().clone();
            Some(batch)
        } else {
            None
        }
    }

    fn description(&self) -> &str {
        &self.description
    }

    fn error(&self) -> Option<String> {
        // Connection errors would be handled by the producing side
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::Reading;
    use chrono::Utc;

    #[test]
    fn test_channel_source_poll() {
        let (tx, mut source) = ChannelSource::create("test");

        // Initially returns the default (empty) batch
        let batch = source.poll();
        assert!(batch.is_some());
        assert!(batch.unwrap().is_empty());

        // No change, so poll returns None
        assert!(source.poll().is_none());

        // Send a new batch
        tx.send(vec![Reading {
            timestamp: Utc::now(),
            temperature: 55.0,
            pressure: 8.0,
            vibration: 2.0,
            compressor_id: None,
        }])
        .unwrap();

        // Now poll returns the new batch
        let batch = source.poll();
        assert!(batch.is_some());
        assert_eq!(batch.unwrap().len(), 1);
    }
}
