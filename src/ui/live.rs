//! Live view rendering.
//!
//! One pane per parameter: a KPI card with the latest value, trend
//! sparkline and rate, plus a gauge scaled against the critical threshold.

use ratatui::{
    layout::{Constraint, Layout, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Gauge, Paragraph},
    Frame,
};

use crate::app::App;
use crate::data::Kpi;

/// Sparkline characters (8 levels of height).
const SPARKLINE_CHARS: [char; 8] = ['▁', '▂', '▃', '▄', '▅', '▆', '▇', '█'];

/// Render the Live view with one column per parameter.
pub fn render(frame: &mut Frame, app: &mut App, area: Rect) {
    let Some(ref data) = app.data else {
        let placeholder = Paragraph::new("Waiting for first reading...")
            .style(Style::default().add_modifier(Modifier::DIM))
            .block(Block::default().borders(Borders::ALL).border_type(app.theme.border_type));
        frame.render_widget(placeholder, area);
        return;
    };

    if data.kpis.is_empty() {
        return;
    }

    let columns = Layout::horizontal([
        Constraint::Ratio(1, 3),
        Constraint::Ratio(1, 3),
        Constraint::Ratio(1, 3),
    ])
    .split(area);

    for (kpi, column) in data.kpis.iter().zip(columns.iter()) {
        render_parameter_pane(frame, app, kpi, *column);
    }
}

fn render_parameter_pane(frame: &mut Frame, app: &App, kpi: &Kpi, area: Rect) {
    let chunks = Layout::vertical([
        Constraint::Min(6),    // KPI card
        Constraint::Length(3), // Gauge
    ])
    .split(area);

    render_kpi_card(frame, app, kpi, chunks[0]);
    render_gauge(frame, app, kpi, chunks[1]);
}

fn render_kpi_card(frame: &mut Frame, app: &App, kpi: &Kpi, area: Rect) {
    let status_style = app.theme.status_style(kpi.status);
    let band = app.thresholds.band(kpi.parameter);

    let sparkline = render_sparkline(&app.history.sparkline(kpi.parameter));
    let rate = app
        .history
        .rate(kpi.parameter)
        .map(|r| format!("{:+.2} {}/s", r, kpi.parameter.unit()))
        .unwrap_or_else(|| "-".to_string());

    let lines = vec![
        Line::from(""),
        Line::from(vec![
            Span::raw("  "),
            Span::styled(
                format!("{:.2}", kpi.value),
                status_style.add_modifier(Modifier::BOLD),
            ),
            Span::raw(format!(" {}", kpi.parameter.unit())),
        ]),
        Line::from(vec![
            Span::raw("  "),
            Span::styled(
                format!("{} {}", kpi.status.symbol(), kpi.status.label()),
                status_style,
            ),
        ]),
        Line::from(""),
        Line::from(vec![
            Span::raw("  trend "),
            Span::styled(sparkline, Style::default().fg(app.theme.highlight)),
            Span::raw(format!("  {}", rate)),
        ]),
        Line::from(vec![Span::styled(
            format!("  warn >{:.1}  crit >{:.1}", band.warning, band.critical),
            Style::default().add_modifier(Modifier::DIM),
        )]),
    ];

    let block = Block::default()
        .title(format!(" {} ", kpi.parameter.label()))
        .borders(Borders::ALL)
        .border_type(app.theme.border_type)
        .border_style(Style::default().fg(app.theme.border));

    frame.render_widget(Paragraph::new(lines).block(block), area);
}

fn render_gauge(frame: &mut Frame, app: &App, kpi: &Kpi, area: Rect) {
    let band = app.thresholds.band(kpi.parameter);

    // Full bar means the critical boundary has been reached
    let ratio = if band.critical > 0.0 {
        (kpi.value / band.critical).clamp(0.0, 1.0)
    } else {
        0.0
    };

    let gauge = Gauge::default()
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_type(app.theme.border_type)
                .border_style(Style::default().fg(app.theme.border)),
        )
        .gauge_style(Style::default().fg(app.theme.status_color(kpi.status)))
        .ratio(ratio)
        .label(format!("{:.2} / {:.1} {}", kpi.value, band.critical, kpi.parameter.unit()));

    frame.render_widget(gauge, area);
}

fn render_sparkline(data: &[u8]) -> String {
    if data.is_empty() {
        return "        ".to_string(); // 8 spaces placeholder
    }

    // Take last 8 values
    let values: Vec<u8> = data.iter().rev().take(8).rev().copied().collect();

    values.iter().map(|&v| SPARKLINE_CHARS[v.min(7) as usize]).collect()
}
