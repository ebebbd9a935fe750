//! Data models and processing for sensor telemetry.
//!
//! This module handles the transformation of raw reading batches into
//! structured, status-annotated data suitable for display.
//!
//! ## Submodules
//!
//! - [`reading`]: Wire-level row types ([`Reading`], [`Parameter`])
//! - [`telemetry`]: Status classification ([`TelemetryData`], [`Thresholds`], [`Status`])
//! - [`window`]: Lookback window parsing and row clipping ([`TimeWindow`])
//! - [`history`]: Historical tracking for sparklines and rate calculations
//! - [`export`]: CSV export/import of displayed rows
//!
//! ## Data Flow
//!
//! ```text
//! ReadingBatch (raw JSON rows / CSV)
//!        │
//!        ▼
//! TelemetryData::from_batch()
//!        │
//!        ├──▶ Kpi per parameter (status computed from Thresholds)
//!        │
//!        └──▶ History::record() (for sparklines)
//! ```

pub mod export;
pub mod history;
pub mod reading;
pub mod telemetry;
pub mod window;

pub use history::History;
pub use reading::{Parameter, Reading, ReadingBatch};
pub use telemetry::{classify, Band, Kpi, ParameterStats, Status, TelemetryData, Thresholds};
pub use window::TimeWindow;
