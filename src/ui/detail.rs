//! Detail overlay rendering.
//!
//! Displays a modal overlay with the full classification of a selected reading.

use ratatui::{
    layout::{Constraint, Layout, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Cell, Clear, Paragraph, Row, Table},
    Frame,
};

use crate::app::App;
use crate::data::Parameter;
use crate::ui::table::worst_status;

/// Minimum width required for the detail overlay to render properly.
const MIN_OVERLAY_WIDTH: u16 = 50;
/// Minimum height required for the detail overlay to render properly.
const MIN_OVERLAY_HEIGHT: u16 = 14;

/// Render the reading detail as a modal overlay.
///
/// Shows the selected row's timestamp and, for each parameter, its value,
/// thresholds, and computed status.
pub fn render_overlay(frame: &mut Frame, app: &App, area: Rect) {
    // Skip rendering if terminal is too small for the overlay
    if area.width < MIN_OVERLAY_WIDTH || area.height < MIN_OVERLAY_HEIGHT {
        return;
    }

    let Some(reading) = app.selected_reading() else {
        return;
    };

    let overlay_width = (area.width * 80 / 100).clamp(MIN_OVERLAY_WIDTH, 90);
    let overlay_height = (area.height * 70 / 100).clamp(MIN_OVERLAY_HEIGHT, 24);

    let x = area.x + (area.width.saturating_sub(overlay_width)) / 2;
    let y = area.y + (area.height.saturating_sub(overlay_height)) / 2;
    let overlay_area = Rect::new(x, y, overlay_width, overlay_height);

    // Clear the area behind the overlay
    frame.render_widget(Clear, overlay_area);

    let chunks = Layout::vertical([
        Constraint::Length(5), // Header with reading info
        Constraint::Min(6),    // Per-parameter table
        Constraint::Length(1), // Footer
    ])
    .split(overlay_area);

    // ===== HEADER SECTION =====
    let overall = worst_status(&reading, &app.thresholds);
    let overall_style = app.theme.status_style(overall);

    let compressor = reading.compressor_id.as_deref().unwrap_or("-");

    let header_lines = vec![
        Line::from(vec![Span::styled(
            format!(" {} ", reading.timestamp.format("%Y-%m-%d %H:%M:%S UTC")),
            Style::default().add_modifier(Modifier::BOLD),
        )]),
        Line::from(""),
        Line::from(vec![
            Span::raw(" Compressor: "),
            Span::styled(
                compressor.to_string(),
                Style::default().add_modifier(Modifier::BOLD),
            ),
            Span::raw("    Status: "),
            Span::styled(
                format!("{} {}", overall.symbol(), overall.label()),
                overall_style.add_modifier(Modifier::BOLD),
            ),
        ]),
    ];

    let header_block = Block::default()
        .title(" Reading Detail ")
        .borders(Borders::ALL)
        .border_type(app.theme.border_type)
        .border_style(Style::default().fg(app.theme.highlight));

    frame.render_widget(Paragraph::new(header_lines).block(header_block), chunks[0]);

    // ===== PER-PARAMETER TABLE =====
    let table_header = Row::new(vec![
        Cell::from("Parameter"),
        Cell::from("Value"),
        Cell::from("Warn >"),
        Cell::from("Crit >"),
        Cell::from("Status"),
    ])
    .height(1)
    .style(app.theme.header);

    let rows: Vec<Row> = Parameter::ALL
        .iter()
        .map(|&parameter| {
            let band = app.thresholds.band(parameter);
            let status = app.thresholds.classify(parameter, &reading);
            let status_style = app.theme.status_style(status);

            Row::new(vec![
                Cell::from(format!("{} [{}]", parameter.label(), parameter.unit())),
                Cell::from(format!("{:.2}", parameter.value_of(&reading))).style(status_style),
                Cell::from(format!("{:.1}", band.warning)),
                Cell::from(format!("{:.1}", band.critical)),
                Cell::from(status.symbol()).style(status_style),
            ])
        })
        .collect();

    let widths = [
        Constraint::Fill(2),    // Parameter
        Constraint::Length(10), // Value
        Constraint::Length(8),  // Warn
        Constraint::Length(8),  // Crit
        Constraint::Length(8),  // Status
    ];

    let table = Table::new(rows, widths).header(table_header).block(
        Block::default()
            .title(" Classification ")
            .borders(Borders::ALL)
            .border_type(app.theme.border_type)
            .border_style(Style::default().fg(app.theme.border)),
    );

    frame.render_widget(table, chunks[1]);

    // ===== FOOTER =====
    let footer = Paragraph::new(Line::from(vec![Span::styled(
        " Press Esc to close ",
        Style::default().add_modifier(Modifier::DIM),
    )]));
    frame.render_widget(footer, chunks[2]);
}
