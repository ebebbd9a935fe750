//! Readings view rendering.
//!
//! Displays a table of individual rows with per-cell status coloring,
//! sortable by any column.

use ratatui::{
    layout::{Constraint, Rect},
    style::Style,
    text::Span,
    widgets::{Block, Borders, Cell, Row, Table, TableState},
    Frame,
};

use crate::app::App;
use crate::data::{Parameter, Reading, Thresholds};

/// Column to sort by in the Readings view.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortColumn {
    /// Sort by timestamp.
    #[default]
    Time,
    /// Sort by temperature value.
    Temperature,
    /// Sort by pressure value.
    Pressure,
    /// Sort by vibration value.
    Vibration,
    /// Sort by worst status across parameters.
    Status,
}

impl SortColumn {
    /// Cycle to the next sort column.
    pub fn next(self) -> Self {
        match self {
            SortColumn::Time => SortColumn::Temperature,
            SortColumn::Temperature => SortColumn::Pressure,
            SortColumn::Pressure => SortColumn::Vibration,
            SortColumn::Vibration => SortColumn::Status,
            SortColumn::Status => SortColumn::Time,
        }
    }

    fn label(&self) -> &'static str {
        match self {
            SortColumn::Time => "time",
            SortColumn::Temperature => "temp",
            SortColumn::Pressure => "pressure",
            SortColumn::Vibration => "vibration",
            SortColumn::Status => "status",
        }
    }
}

/// Render the Readings view showing rows in a sortable table.
pub fn render(frame: &mut Frame, app: &mut App, area: Rect) {
    let total = app.data.as_ref().map_or(0, |d| d.readings.len());

    let mut rows_data = app.visible_rows();
    sort_rows_by(&mut rows_data, app.sort_column, app.sort_ascending, &app.thresholds);

    let header = Row::new(vec![
        Cell::from(format_header("Time", SortColumn::Time, app)),
        Cell::from("Compressor"),
        Cell::from(format_header("Temp °C", SortColumn::Temperature, app)),
        Cell::from(format_header("Pressure bar", SortColumn::Pressure, app)),
        Cell::from(format_header("Vibration mm/s", SortColumn::Vibration, app)),
        Cell::from(format_header("Status", SortColumn::Status, app)),
    ])
    .height(1)
    .style(app.theme.header);

    let table_rows: Vec<Row> = rows_data
        .iter()
        .map(|reading| {
            let worst = worst_status(reading, &app.thresholds);

            let cells = vec![
                Cell::from(reading.timestamp.format("%Y-%m-%d %H:%M:%S").to_string()),
                Cell::from(reading.compressor_id.clone().unwrap_or_else(|| "-".to_string())),
                value_cell(app, reading, Parameter::Temperature),
                value_cell(app, reading, Parameter::Pressure),
                value_cell(app, reading, Parameter::Vibration),
                Cell::from(worst.symbol()).style(app.theme.status_style(worst)),
            ];

            Row::new(cells)
        })
        .collect();

    let widths = [
        Constraint::Length(19),  // Time
        Constraint::Fill(1),     // Compressor
        Constraint::Length(10),  // Temp
        Constraint::Length(13),  // Pressure
        Constraint::Length(15),  // Vibration
        Constraint::Length(6),   // Status
    ];

    let selected_visual_index = app.selected_row.min(rows_data.len().saturating_sub(1));

    let sort_dir = if app.sort_ascending { "↑" } else { "↓" };

    // Build title with filter info
    let filter_info = if app.filter_active {
        format!(" /{}_", app.filter_text)
    } else if !app.filter_text.is_empty() {
        format!(" /{}/ [c:clear]", app.filter_text)
    } else {
        String::new()
    };

    // Show scroll position if there are rows
    let position_info = if !rows_data.is_empty() {
        format!(" [{}/{}]", selected_visual_index + 1, rows_data.len())
    } else {
        String::new()
    };

    let title = format!(
        " Readings ({}/{}) [s:sort {}{}]{}{} ",
        rows_data.len(),
        total,
        app.sort_column.label(),
        sort_dir,
        filter_info,
        position_info
    );

    let table = Table::new(table_rows, widths)
        .header(header)
        .block(
            Block::default()
                .title(title)
                .borders(Borders::ALL)
                .border_type(app.theme.border_type)
                .border_style(Style::default().fg(app.theme.border)),
        )
        .row_highlight_style(app.theme.selected)
        .highlight_symbol("▶ ");

    let mut state = TableState::default();
    state.select(Some(selected_visual_index));

    frame.render_stateful_widget(table, area, &mut state);
}

fn value_cell<'a>(app: &App, reading: &Reading, parameter: Parameter) -> Cell<'a> {
    let status = app.thresholds.classify(parameter, reading);
    let style = if status == crate::data::Status::Normal {
        Style::default()
    } else {
        app.theme.status_style(status)
    };
    Cell::from(format!("{:.2}", parameter.value_of(reading))).style(style)
}

fn format_header(name: &str, col: SortColumn, app: &App) -> Span<'static> {
    if app.sort_column == col {
        let arrow = if app.sort_ascending { "↑" } else { "↓" };
        Span::raw(format!("{}{}", name, arrow))
    } else {
        Span::raw(name.to_string())
    }
}

/// Sort rows by the given column and direction (public for use in app.rs)
pub fn sort_rows_by(
    rows: &mut [&Reading],
    column: SortColumn,
    ascending: bool,
    thresholds: &Thresholds,
) {
    rows.sort_by(|a, b| {
        let primary = match column {
            SortColumn::Time => a.timestamp.cmp(&b.timestamp),
            SortColumn::Temperature => a.temperature.total_cmp(&b.temperature),
            SortColumn::Pressure => a.pressure.total_cmp(&b.pressure),
            SortColumn::Vibration => a.vibration.total_cmp(&b.vibration),
            SortColumn::Status => {
                worst_status(a, thresholds).cmp(&worst_status(b, thresholds))
            }
        };

        // Apply direction to primary comparison
        let primary = if ascending {
            primary
        } else {
            primary.reverse()
        };

        // Use timestamp as secondary sort for stability when values are equal
        if primary == std::cmp::Ordering::Equal {
            a.timestamp.cmp(&b.timestamp)
        } else {
            primary
        }
    });
}

/// Worst classification across the three parameters of one row.
pub fn worst_status(reading: &Reading, thresholds: &Thresholds) -> crate::data::Status {
    Parameter::ALL
        .iter()
        .map(|&p| thresholds.classify(p, reading))
        .max()
        .unwrap_or(crate::data::Status::Normal)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, Utc};

    fn reading(offset_secs: i64, temperature: f64, vibration: f64) -> Reading {
        Reading {
            timestamp: Utc::now() + Duration::seconds(offset_secs),
            temperature,
            pressure: 8.0,
            vibration,
            compressor_id: None,
        }
    }

    #[test]
    fn test_sort_by_time_descending() {
        let a = reading(0, 50.0, 2.0);
        let b = reading(10, 60.0, 2.0);
        let mut rows = vec![&a, &b];

        sort_rows_by(&mut rows, SortColumn::Time, false, &Thresholds::default());
        assert_eq!(rows[0].temperature, 60.0);
    }

    #[test]
    fn test_sort_by_value() {
        let a = reading(0, 70.0, 2.0);
        let b = reading(10, 50.0, 2.0);
        let mut rows = vec![&a, &b];

        sort_rows_by(
            &mut rows,
            SortColumn::Temperature,
            true,
            &Thresholds::default(),
        );
        assert_eq!(rows[0].temperature, 50.0);
    }

    #[test]
    fn test_sort_by_status_puts_critical_first_when_descending() {
        let normal = reading(0, 50.0, 2.0);
        let critical = reading(10, 50.0, 6.0);
        let mut rows = vec![&normal, &critical];

        sort_rows_by(&mut rows, SortColumn::Status, false, &Thresholds::default());
        assert_eq!(rows[0].vibration, 6.0);
    }

    #[test]
    fn test_worst_status() {
        let thresholds = Thresholds::default();
        assert_eq!(
            worst_status(&reading(0, 50.0, 2.0), &thresholds),
            crate::data::Status::Normal
        );
        assert_eq!(
            worst_status(&reading(0, 65.0, 6.0), &thresholds),
            crate::data::Status::Critical
        );
    }
}
