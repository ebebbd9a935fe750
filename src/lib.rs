// Library crate: public API items may not be used by the binary
#![allow(unused)]

//! # airwatch
//!
//! A telemetry TUI and library for monitoring air compressor sensor readings.
//!
//! This crate provides tools for visualizing and classifying compressor
//! telemetry (temperature, pressure, vibration). It can receive reading
//! batches from various sources (the hosted backend, CSV files, channels)
//! and display them in an interactive terminal UI.
//!
//! ## Architecture
//!
//! The crate is organized into four main modules:
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                        Application                          │
//! │  ┌─────────┐    ┌──────────┐    ┌─────────┐    ┌─────────┐ │
//! │  │  app    │───▶│   data   │───▶│   ui    │───▶│ Terminal│ │
//! │  │ (state) │    │(processing)   │(rendering)   │         │ │
//! │  └────┬────┘    └──────────┘    └─────────┘    └─────────┘ │
//! │       │                                                     │
//! │       ▼                                                     │
//! │  ┌─────────┐                                                │
//! │  │ source  │◀── RestSource | FileSource | ChannelSource    │
//! │  │ (input) │                                                │
//! │  └─────────┘                                                │
//! └─────────────────────────────────────────────────────────────┘
//! ```
//!
//! - **[`app`]**: Application state, view navigation, and user interaction logic
//! - **[`source`]**: Data source abstraction ([`DataSource`] trait) with
//!   implementations for backend polling, CSV file polling, and channel input
//! - **[`data`]**: Data models and processing - classifies raw readings into
//!   status-annotated [`TelemetryData`], clips rows to a lookback window,
//!   tracks history for sparklines, and exports CSV
//! - **[`ui`]**: Terminal rendering using ratatui - KPI cards, gauges,
//!   time-series charts, reading tables, and theme support
//!
//! ## Features
//!
//! - **Live view**: Latest value per parameter with gauges against thresholds
//! - **Trends view**: Time-series charts with warning/critical lines
//! - **Readings view**: Sortable table of rows with per-cell classification
//! - **CSV export**: Currently displayed rows, re-openable as a file source
//!
//! ## Usage
//!
//! ### As a CLI tool
//!
//! ```bash
//! # Poll a hosted backend (API key via AIRWATCH_API_KEY or config file)
//! airwatch --url https://xyz.supabase.co
//!
//! # Watch an exported CSV file
//! airwatch --file readings.csv
//! ```
//!
//! ### As a library with a file source
//!
//! ```
//! use airwatch::{App, FileSource, Thresholds};
//!
//! let source = Box::new(FileSource::new("readings.csv"));
//! let app = App::new(source, Thresholds::default(), None);
//! ```
//!
//! ### As a library with a channel source (for custom ingest paths)
//!
//! ```
//! use airwatch::{App, ChannelSource, Thresholds};
//!
//! // Create a channel for receiving batches
//! let (tx, source) = ChannelSource::create("gateway://plant-floor");
//!
//! // Create the app
//! let app = App::new(Box::new(source), Thresholds::default(), None);
//! ```

pub mod app;
pub mod data;
pub mod events;
pub mod source;
pub mod ui;

// Re-export main types for convenience
pub use app::App;
pub use data::{
    classify, Band, History, Kpi, Parameter, Reading, ReadingBatch, Status, TelemetryData,
    Thresholds, TimeWindow,
};
pub use source::{ChannelSource, DataSource, FileSource, RestEndpoint, RestSource};
