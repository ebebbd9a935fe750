//! Application state and navigation logic.

use anyhow::Result;
use chrono::Utc;

use crate::data::{export, History, Reading, TelemetryData, Thresholds, TimeWindow};
use crate::source::DataSource;
use crate::ui::table::{sort_rows_by, SortColumn};
use crate::ui::Theme;

/// Lookback presets cycled with the `w` key; `None` shows all fetched rows.
const WINDOW_PRESETS: [Option<&str>; 5] = [Some("15m"), Some("1h"), Some("6h"), Some("24h"), None];

/// The current view/tab in the TUI.
///
/// Reading detail is shown as an overlay (controlled by
/// `App::show_detail_overlay`) rather than as a separate view.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum View {
    /// Latest values per parameter with gauges.
    Live,
    /// Time-series charts over the displayed window.
    Trends,
    /// Table of individual rows.
    Readings,
}

impl View {
    /// Cycle to the next view.
    pub fn next(self) -> Self {
        match self {
            View::Live => View::Trends,
            View::Trends => View::Readings,
            View::Readings => View::Live,
        }
    }

    /// Cycle to the previous view.
    pub fn prev(self) -> Self {
        match self {
            View::Live => View::Readings,
            View::Trends => View::Live,
            View::Readings => View::Trends,
        }
    }

    /// Returns the display label for this view.
    pub fn label(&self) -> &'static str {
        match self {
            View::Live => "Live",
            View::Trends => "Trends",
            View::Readings => "Readings",
        }
    }
}

/// Main application state.
pub struct App {
    pub running: bool,
    pub current_view: View,
    pub show_help: bool,
    pub show_detail_overlay: bool,

    // Data source
    source: Box<dyn DataSource>,
    pub data: Option<TelemetryData>,
    pub history: History,
    pub load_error: Option<String>,
    pub thresholds: Thresholds,

    // Display window
    pub window: Option<TimeWindow>,
    window_preset_index: usize,

    // Navigation state (Readings view)
    pub selected_row: usize,

    // Sorting (Readings view)
    pub sort_column: SortColumn,
    pub sort_ascending: bool,

    // Search/filter by compressor id
    pub filter_text: String,
    pub filter_active: bool,

    // UI
    pub theme: Theme,

    // Status message (temporary feedback)
    pub status_message: Option<(String, std::time::Instant)>,
}

impl App {
    /// Create a new App with the given data source, thresholds, and window.
    pub fn new(
        source: Box<dyn DataSource>,
        thresholds: Thresholds,
        window: Option<TimeWindow>,
    ) -> Self {
        let window_preset_index = WINDOW_PRESETS
            .iter()
            .position(|preset| preset.and_then(|s| TimeWindow::parse(s).ok()) == window)
            .unwrap_or(1);

        Self {
            running: true,
            current_view: View::Live,
            show_help: false,
            show_detail_overlay: false,
            source,
            data: None,
            history: History::new(),
            load_error: None,
            thresholds,
            window,
            window_preset_index,
            selected_row: 0,
            sort_column: SortColumn::default(),
            sort_ascending: false, // Default descending (newest first)
            filter_text: String::new(),
            filter_active: false,
            theme: Theme::auto_detect(),
            status_message: None,
        }
    }

    /// Returns a description of the current data source.
    pub fn source_description(&self) -> &str {
        self.source.description()
    }

    /// Set a temporary status message that will be shown for a few seconds.
    pub fn set_status_message(&mut self, message: String) {
        self.status_message = Some((message, std::time::Instant::now()));
    }

    /// Get the current status message if it hasn't expired (3 seconds).
    pub fn get_status_message(&self) -> Option<&str> {
        if let Some((msg, time)) = &self.status_message {
            if time.elapsed() < std::time::Duration::from_secs(3) {
                return Some(msg);
            }
        }
        None
    }

    /// Poll the data source for new data.
    ///
    /// Returns Ok(true) if new data was received, Ok(false) if no new data,
    /// or Err if there was an error.
    pub fn reload_data(&mut self) -> Result<bool> {
        // Poll for new data
        if let Some(batch) = self.source.poll() {
            if batch.is_empty() {
                // Keep the last good data on screen, surface a banner
                self.load_error = Some("No readings available".to_string());
                return Ok(false);
            }

            let data = TelemetryData::from_batch(batch, &self.thresholds);

            // Record history before updating
            self.history.record(&data);
            self.data = Some(data);
            self.load_error = None;

            // Clamp selection index
            let visible = self.visible_rows().len();
            if self.selected_row >= visible {
                self.selected_row = visible.saturating_sub(1);
            }
            return Ok(true);
        }

        // No new data; surface any source error as the banner
        if let Some(err) = self.source.error() {
            self.load_error = Some(err);
        }
        Ok(false)
    }

    /// Rows inside the current window matching the id filter, ascending.
    pub fn visible_rows(&self) -> Vec<&Reading> {
        let Some(ref data) = self.data else {
            return Vec::new();
        };

        let windowed = match self.window {
            Some(window) => window.clip(&data.readings, Utc::now()),
            None => &data.readings[..],
        };

        windowed.iter().filter(|r| self.matches_filter(r)).collect()
    }

    /// Check if a reading matches the current compressor id filter.
    pub fn matches_filter(&self, reading: &Reading) -> bool {
        if self.filter_text.is_empty() {
            return true;
        }
        reading
            .compressor_id
            .as_ref()
            .is_some_and(|id| id.to_lowercase().contains(&self.filter_text.to_lowercase()))
    }

    /// The reading behind the currently selected visual row, if any.
    ///
    /// The Readings view applies sorting and filtering, so the visual row
    /// index differs from the underlying data index.
    pub fn selected_reading(&self) -> Option<Reading> {
        let mut rows = self.visible_rows();
        sort_rows_by(&mut rows, self.sort_column, self.sort_ascending, &self.thresholds);
        rows.get(self.selected_row).map(|r| (*r).clone())
    }

    /// Switch to the next view (cycles through Live → Trends → Readings).
    pub fn next_view(&mut self) {
        self.current_view = self.current_view.next();
    }

    /// Switch to the previous view.
    pub fn prev_view(&mut self) {
        self.current_view = self.current_view.prev();
    }

    /// Switch to a specific view.
    pub fn set_view(&mut self, view: View) {
        self.current_view = view;
    }

    /// Move selection down by one item.
    pub fn select_next(&mut self) {
        self.select_next_n(1);
    }

    /// Move selection up by one item.
    pub fn select_prev(&mut self) {
        self.select_prev_n(1);
    }

    /// Move selection down by n items.
    pub fn select_next_n(&mut self, n: usize) {
        if self.current_view == View::Readings {
            let max = self.visible_rows().len().saturating_sub(1);
            self.selected_row = (self.selected_row + n).min(max);
        }
    }

    /// Move selection up by n items.
    pub fn select_prev_n(&mut self, n: usize) {
        if self.current_view == View::Readings {
            self.selected_row = self.selected_row.saturating_sub(n);
        }
    }

    /// Jump to the first row.
    pub fn select_first(&mut self) {
        self.selected_row = 0;
    }

    /// Jump to the last row.
    pub fn select_last(&mut self) {
        self.selected_row = self.visible_rows().len().saturating_sub(1);
    }

    /// Open the detail overlay for the currently selected reading.
    pub fn enter_detail(&mut self) {
        if self.current_view == View::Readings && !self.visible_rows().is_empty() {
            self.show_detail_overlay = true;
        }
    }

    /// Navigate back: close overlay first, then return to the Live view.
    pub fn go_back(&mut self) {
        if self.show_detail_overlay {
            self.show_detail_overlay = false;
            return;
        }
        if self.current_view != View::Live {
            self.current_view = View::Live;
        }
    }

    /// Close the detail overlay if open.
    pub fn close_overlay(&mut self) {
        self.show_detail_overlay = false;
    }

    /// Toggle the help overlay.
    pub fn toggle_help(&mut self) {
        self.show_help = !self.show_help;
    }

    /// Cycle to the next sort column (Readings view).
    pub fn cycle_sort(&mut self) {
        if self.current_view == View::Readings {
            self.sort_column = self.sort_column.next();
        }
    }

    /// Toggle sort direction between ascending and descending.
    pub fn toggle_sort_direction(&mut self) {
        if self.current_view == View::Readings {
            self.sort_ascending = !self.sort_ascending;
        }
    }

    /// Cycle through the lookback window presets.
    pub fn cycle_window(&mut self) {
        self.window_preset_index = (self.window_preset_index + 1) % WINDOW_PRESETS.len();
        self.window = WINDOW_PRESETS[self.window_preset_index]
            .and_then(|s| TimeWindow::parse(s).ok());
        self.selected_row = 0;

        let label = self.window.map_or("all".to_string(), |w| w.format());
        self.set_status_message(format!("Window: {}", label));
    }

    /// Enter filter input mode (starts capturing keystrokes for search).
    pub fn start_filter(&mut self) {
        self.filter_active = true;
    }

    /// Exit filter input mode without clearing the filter text.
    pub fn cancel_filter(&mut self) {
        self.filter_active = false;
    }

    /// Clear the filter text and exit filter mode.
    pub fn clear_filter(&mut self) {
        self.filter_text.clear();
        self.filter_active = false;
    }

    /// Append a character to the filter text.
    pub fn filter_push(&mut self, c: char) {
        self.filter_text.push(c);
    }

    /// Remove the last character from the filter text.
    pub fn filter_pop(&mut self) {
        self.filter_text.pop();
    }

    /// Signal the application to quit.
    pub fn quit(&mut self) {
        self.running = false;
    }

    /// Export the currently displayed rows to a CSV file.
    pub fn export_displayed(&self, path: &std::path::Path) -> Result<()> {
        let rows: Vec<Reading> = self.visible_rows().into_iter().cloned().collect();
        if rows.is_empty() {
            anyhow::bail!("No rows to export");
        }
        export::export_to_file(path, &rows)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::source::ChannelSource;
    use chrono::Duration;

    fn reading(offset_secs: i64, id: &str, temperature: f64) -> Reading {
        Reading {
            timestamp: Utc::now() + Duration::seconds(offset_secs),
            temperature,
            pressure: 8.0,
            vibration: 2.0,
            compressor_id: Some(id.to_string()),
        }
    }

    fn app_with_rows(rows: Vec<Reading>) -> App {
        let (tx, source) = ChannelSource::create("test");
        let mut app = App::new(Box::new(source), Thresholds::default(), None);
        tx.send(rows).unwrap();
        app.reload_data().unwrap();
        app
    }

    #[test]
    fn test_reload_sets_data_and_clears_error() {
        let app = app_with_rows(vec![reading(0, "AC-01", 55.0)]);
        assert!(app.data.is_some());
        assert!(app.load_error.is_none());
        assert_eq!(app.visible_rows().len(), 1);
    }

    #[test]
    fn test_empty_batch_sets_banner_keeps_data() {
        let (tx, source) = ChannelSource::create("test");
        let mut app = App::new(Box::new(source), Thresholds::default(), None);

        tx.send(vec![reading(0, "AC-01", 55.0)]).unwrap();
        app.reload_data().unwrap();
        assert!(app.data.is_some());

        tx.send(Vec::new()).unwrap();
        app.reload_data().unwrap();
        assert!(app.data.is_some(), "last good data stays on screen");
        assert_eq!(app.load_error.as_deref(), Some("No readings available"));
    }

    #[test]
    fn test_filter_matches_compressor_id() {
        let mut app = app_with_rows(vec![
            reading(0, "AC-01", 55.0),
            reading(1, "AC-02", 56.0),
            reading(2, "AC-02", 57.0),
        ]);

        app.filter_text = "ac-02".to_string();
        assert_eq!(app.visible_rows().len(), 2);

        app.filter_text = "AC".to_string();
        assert_eq!(app.visible_rows().len(), 3);
    }

    #[test]
    fn test_filter_skips_rows_without_id() {
        let mut rows = vec![reading(0, "AC-01", 55.0)];
        rows.push(Reading {
            compressor_id: None,
            ..reading(1, "x", 56.0)
        });
        let mut app = app_with_rows(rows);

        app.filter_text = "AC".to_string();
        assert_eq!(app.visible_rows().len(), 1);
    }

    #[test]
    fn test_window_clips_visible_rows() {
        let rows = vec![
            reading(-7200, "AC-01", 50.0),
            reading(-60, "AC-01", 55.0),
            reading(0, "AC-01", 56.0),
        ];
        let (tx, source) = ChannelSource::create("test");
        let mut app = App::new(
            Box::new(source),
            Thresholds::default(),
            Some(TimeWindow::parse("1h").unwrap()),
        );
        tx.send(rows).unwrap();
        app.reload_data().unwrap();

        assert_eq!(app.visible_rows().len(), 2);
    }

    #[test]
    fn test_selection_clamped_to_visible() {
        let mut app = app_with_rows(vec![
            reading(0, "AC-01", 55.0),
            reading(1, "AC-01", 56.0),
        ]);
        app.set_view(View::Readings);

        app.select_next_n(10);
        assert_eq!(app.selected_row, 1);
        app.select_prev_n(10);
        assert_eq!(app.selected_row, 0);
    }

    #[test]
    fn test_selected_reading_respects_sort() {
        let mut app = app_with_rows(vec![
            reading(0, "AC-01", 55.0),
            reading(10, "AC-01", 60.0),
        ]);
        app.set_view(View::Readings);

        // Default sort is time descending: row 0 is the newest reading
        let selected = app.selected_reading().unwrap();
        assert_eq!(selected.temperature, 60.0);

        app.toggle_sort_direction();
        let selected = app.selected_reading().unwrap();
        assert_eq!(selected.temperature, 55.0);
    }

    #[test]
    fn test_cycle_window_rolls_over() {
        let mut app = app_with_rows(vec![reading(0, "AC-01", 55.0)]);
        assert!(app.window.is_none());

        // None sits at the end of the preset table, so cycling wraps to 15m
        app.cycle_window();
        assert_eq!(app.window.unwrap().format(), "15m");
    }

    #[test]
    fn test_go_back_closes_overlay_then_returns_to_live() {
        let mut app = app_with_rows(vec![reading(0, "AC-01", 55.0)]);
        app.set_view(View::Readings);
        app.enter_detail();
        assert!(app.show_detail_overlay);

        app.go_back();
        assert!(!app.show_detail_overlay);
        assert_eq!(app.current_view, View::Readings);

        app.go_back();
        assert_eq!(app.current_view, View::Live);
    }
}
