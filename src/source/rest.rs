//! Backend polling data source.
//!
//! Polls the hosted backend's HTTP query surface for reading rows.
//! The query model is `SELECT * FROM {table} ORDER BY timestamp DESC
//! LIMIT n [WHERE timestamp >= bound]`, expressed as PostgREST-style
//! query parameters.

use std::sync::{Arc, Mutex};
use std::time::Duration;

use anyhow::{anyhow, Result};
use chrono::{DateTime, SecondsFormat, Utc};
use reqwest::Client;
use tokio::sync::mpsc;
use tracing::{debug, warn};

use super::DataSource;
use crate::data::{ReadingBatch, TimeWindow};

/// Per-request timeout for backend calls.
const REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

/// Connection details and query shape for the backend table.
#[derive(Debug, Clone)]
pub struct RestEndpoint {
    /// Base URL of the backend, e.g. `https://xyz.supabase.co`.
    pub base_url: String,
    /// API key, sent as both `apikey` and bearer token.
    pub api_key: String,
    /// Table holding the readings.
    pub table: String,
    /// Maximum rows per fetch (latest n).
    pub limit: u32,
    /// Optional lower timestamp bound pushed down to the query.
    pub window: Option<TimeWindow>,
}

impl RestEndpoint {
    /// Build the query URL for one fetch.
    ///
    /// Rows are requested newest-first so `limit` keeps the latest n;
    /// callers re-sort ascending for display.
    pub fn url(&self, now: DateTime<Utc>) -> String {
        let base = self.base_url.trim_end_matches('/');
        let mut url = format!(
            "{}/rest/v1/{}?select=*&order=timestamp.desc&limit={}",
            base, self.table, self.limit
        );
        if let Some(window) = self.window {
            let bound = window.cutoff(now).to_rfc3339_opts(SecondsFormat::Secs, true);
            url.push_str(&format!("&timestamp=gte.{}", bound));
        }
        url
    }
}

/// Fetch one batch from the backend.
///
/// # Errors
///
/// Returns an error if the request fails, the backend answers with a
/// non-success status, or the rows do not parse.
pub async fn fetch_batch(client: &Client, endpoint: &RestEndpoint) -> Result<ReadingBatch> {
    let url = endpoint.url(Utc::now());
    debug!(%url, "fetching readings");

    let response = client
        .get(&url)
        .header("apikey", &endpoint.api_key)
        .bearer_auth(&endpoint.api_key)
        .send()
        .await
        .map_err(|e| anyhow!("Request failed: {}", e))?;

    if !response.status().is_success() {
        return Err(anyhow!(
            "HTTP {}: {}",
            response.status(),
            response.text().await.unwrap_or_default()
        ));
    }

    response
        .json::<ReadingBatch>()
        .await
        .map_err(|e| anyhow!("Failed to parse rows: {}", e))
}

/// Build the HTTP client used for backend calls.
pub fn build_client() -> Result<Client> {
    Client::builder()
        .timeout(REQUEST_TIMEOUT)
        .build()
        .map_err(|e| anyhow!("Failed to create HTTP client: {}", e))
}

/// A data source that polls the backend on a fixed interval.
///
/// The interval doubles as the process-local cache TTL: the draw loop may
/// poll this source at any rate, but at most one backend round-trip happens
/// per interval. Fetch failures set the shared error slot (shown as the UI
/// banner) and are retried on the next tick only.
#[derive(Debug)]
pub struct RestSource {
    receiver: mpsc::Receiver<ReadingBatch>,
    description: String,
    last_error: Arc<Mutex<Option<String>>>,
}

impl RestSource {
    /// Spawn a background task that fetches every `ttl`.
    ///
    /// Must be called within a tokio runtime.
    pub fn spawn(endpoint: RestEndpoint, ttl: Duration) -> Result<Self> {
        let client = build_client()?;
        let (tx, rx) = mpsc::channel(16);
        let last_error = Arc::new(Mutex::new(None));
        let error_handle = last_error.clone();
        let description = format!("backend: {}/{}", endpoint.base_url, endpoint.table);

        tokio::spawn(async move {
            let mut ticker = tokio::time::interval(ttl);
            ticker.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Delay);

            loop {
                ticker.tick().await;
                match fetch_batch(&client, &endpoint).await {
                    Ok(batch) => {
                        if batch.is_empty() {
                            warn!("backend returned no rows");
                            *error_handle.lock().unwrap() =
                                Some("No readings returned; check the device feed".to_string());
                            continue;
                        }
                        *error_handle.lock().unwrap() = None;
                        if tx.send(batch).await.is_err() {
                            // Receiver dropped
                            break;
                        }
                    }
                    Err(e) => {
                        warn!(error = %e, "fetch failed");
                        *error_handle.lock().unwrap() = Some(e.to_string());
                    }
                }
            }
        });

        Ok(Self {
            receiver: rx,
            description,
            last_error,
        })
    }
}

impl DataSource for RestSource {
    fn poll(&mut self) -> Option<ReadingBatch> {
        match self.receiver.try_recv() {
            Ok(batch) => Some(batch),
            Err(mpsc::error::TryRecvError::Empty) => None,
            Err(mpsc::error::TryRecvError::Disconnected) => {
                *self.last_error.lock().unwrap() = Some("Poller stopped".to_string());
                None
            }
        }
    }

    fn description(&self) -> &str {
        &self.description
    }

    fn error(&self) -> Option<String> {
        self.last_error.lock().unwrap().clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn endpoint(window: Option<TimeWindow>) -> RestEndpoint {
        RestEndpoint {
            base_url: "https://example.supabase.co/".to_string(),
            api_key: "key".to_string(),
            table: "air_compressor".to_string(),
            limit: 100,
            window,
        }
    }

    #[test]
    fn test_url_without_window() {
        let url = endpoint(None).url(Utc::now());
        assert_eq!(
            url,
            "https://example.supabase.co/rest/v1/air_compressor\
             ?select=*&order=timestamp.desc&limit=100"
        );
    }

    #[test]
    fn test_url_with_window_bound() {
        let now = DateTime::parse_from_rfc3339("2024-05-14T10:00:00Z")
            .unwrap()
            .with_timezone(&Utc);
        let url = endpoint(Some(TimeWindow::parse("1h").unwrap())).url(now);
        assert!(url.ends_with("&timestamp=gte.2024-05-14T09:00:00Z"), "{url}");
    }

    #[tokio::test]
    async fn test_rest_source_poll_empty_before_first_fetch() {
        // Unroutable endpoint; the first tick fails and sets the error slot
        let mut source = RestSource::spawn(
            RestEndpoint {
                base_url: "http://127.0.0.1:1".to_string(),
                api_key: "key".to_string(),
                table: "air_compressor".to_string(),
                limit: 10,
                window: None,
            },
            Duration::from_secs(60),
        )
        .unwrap();

        assert!(source.poll().is_none());
        assert!(source.description().starts_with("backend: "));

        tokio::time::sleep(Duration::from_millis(200)).await;
        assert!(source.error().is_some());
    }
}
