//! Trends view rendering.
//!
//! One time-series chart per parameter over the displayed window, with
//! warning/critical threshold lines and a min/max/mean legend.

use ratatui::{
    layout::{Constraint, Layout, Rect},
    style::{Modifier, Style},
    symbols,
    text::Span,
    widgets::{Axis, Block, Borders, Chart, Dataset, GraphType, Paragraph},
    Frame,
};

use crate::app::App;
use crate::data::{Parameter, Reading, TelemetryData};

/// Render the Trends view with one chart per parameter, stacked.
pub fn render(frame: &mut Frame, app: &mut App, area: Rect) {
    let rows: Vec<Reading> = app.visible_rows().into_iter().cloned().collect();

    if rows.len() < 2 {
        let placeholder = Paragraph::new("Not enough readings in the current window")
            .style(Style::default().add_modifier(Modifier::DIM))
            .block(Block::default().borders(Borders::ALL).border_type(app.theme.border_type));
        frame.render_widget(placeholder, area);
        return;
    }

    let panes = Layout::vertical([
        Constraint::Ratio(1, 3),
        Constraint::Ratio(1, 3),
        Constraint::Ratio(1, 3),
    ])
    .split(area);

    for (i, (&parameter, pane)) in Parameter::ALL.iter().zip(panes.iter()).enumerate() {
        render_chart(frame, app, &rows, parameter, app.theme.series[i], *pane);
    }
}

fn render_chart(
    frame: &mut Frame,
    app: &App,
    rows: &[Reading],
    parameter: Parameter,
    series_color: ratatui::style::Color,
    area: Rect,
) {
    let band = app.thresholds.band(parameter);
    let start = rows[0].timestamp;
    let span_secs = (rows[rows.len() - 1].timestamp - start)
        .num_milliseconds() as f64
        / 1000.0;
    let span_secs = span_secs.max(1.0);

    let points: Vec<(f64, f64)> = rows
        .iter()
        .map(|r| {
            let x = (r.timestamp - start).num_milliseconds() as f64 / 1000.0;
            (x, parameter.value_of(r))
        })
        .collect();

    let warning_line = [(0.0, band.warning), (span_secs, band.warning)];
    let critical_line = [(0.0, band.critical), (span_secs, band.critical)];

    // Y bounds cover both the data and the threshold lines, with headroom
    let Some(stats) = TelemetryData::stats(rows, parameter) else {
        return;
    };
    let y_min = stats.min.min(band.warning);
    let y_max = stats.max.max(band.critical);
    let pad = ((y_max - y_min) * 0.1).max(0.5);
    let y_bounds = [y_min - pad, y_max + pad];

    let datasets = vec![
        Dataset::default()
            .name("warn")
            .marker(symbols::Marker::Dot)
            .graph_type(GraphType::Line)
            .style(Style::default().fg(app.theme.warning).add_modifier(Modifier::DIM))
            .data(&warning_line),
        Dataset::default()
            .name("crit")
            .marker(symbols::Marker::Dot)
            .graph_type(GraphType::Line)
            .style(Style::default().fg(app.theme.critical).add_modifier(Modifier::DIM))
            .data(&critical_line),
        Dataset::default()
            .name(parameter.label())
            .marker(symbols::Marker::Braille)
            .graph_type(GraphType::Line)
            .style(Style::default().fg(series_color))
            .data(&points),
    ];

    let x_labels = vec![
        Span::raw(start.format("%H:%M:%S").to_string()),
        Span::raw(rows[rows.len() / 2].timestamp.format("%H:%M:%S").to_string()),
        Span::raw(rows[rows.len() - 1].timestamp.format("%H:%M:%S").to_string()),
    ];

    let y_labels = vec![
        Span::raw(format!("{:.1}", y_bounds[0])),
        Span::raw(format!("{:.1}", (y_bounds[0] + y_bounds[1]) / 2.0)),
        Span::raw(format!("{:.1}", y_bounds[1])),
    ];

    let title = format!(
        " {} [{}]  min {:.2}  max {:.2}  mean {:.2} ",
        parameter.label(),
        parameter.unit(),
        stats.min,
        stats.max,
        stats.mean,
    );

    let chart = Chart::new(datasets)
        .block(
            Block::default()
                .title(title)
                .borders(Borders::ALL)
                .border_type(app.theme.border_type)
                .border_style(Style::default().fg(app.theme.border)),
        )
        .x_axis(
            Axis::default()
                .bounds([0.0, span_secs])
                .labels(x_labels)
                .style(Style::default().fg(app.theme.border)),
        )
        .y_axis(
            Axis::default()
                .bounds(y_bounds)
                .labels(y_labels)
                .style(Style::default().fg(app.theme.border)),
        );

    frame.render_widget(chart, area);
}
