//! Common UI components shared across views.
//!
//! This module contains the header bar, tab bar, status bar, and help overlay.

use ratatui::{
    layout::Rect,
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Tabs},
    Frame,
};

use crate::app::{App, View};
use crate::data::Status;

/// Render the header bar with the overall compressor status.
///
/// Displays: status indicator, latest KPI digest, reading count.
pub fn render_header(frame: &mut Frame, app: &App, area: Rect) {
    let Some(ref data) = app.data else {
        let line = Line::from(vec![
            Span::styled(
                " AIRWATCH ",
                Style::default().add_modifier(Modifier::BOLD),
            ),
            Span::raw("| Loading..."),
        ]);
        frame.render_widget(Paragraph::new(line), area);
        return;
    };

    let status_style = app.theme.status_style(data.overall);

    let compressor = data
        .latest
        .as_ref()
        .and_then(|r| r.compressor_id.clone())
        .unwrap_or_else(|| "compressor".to_string());

    let mut spans = vec![
        Span::styled(" ● ", status_style),
        Span::styled("AIRWATCH ", Style::default().add_modifier(Modifier::BOLD)),
        Span::raw("│ "),
        Span::raw(compressor),
        Span::raw(" │ "),
        Span::styled(
            format!("{} {}", data.overall.symbol(), data.overall.label()),
            status_style,
        ),
        Span::raw(" │ "),
    ];

    // Latest value digest, one entry per parameter
    for (i, kpi) in data.kpis.iter().enumerate() {
        if i > 0 {
            spans.push(Span::raw("  "));
        }
        spans.push(Span::raw(format!("{}: ", short_label(kpi.parameter.label()))));
        spans.push(Span::styled(
            format!("{:.2} {}", kpi.value, kpi.parameter.unit()),
            app.theme.status_style(kpi.status),
        ));
    }

    spans.push(Span::raw(" │ "));
    spans.push(Span::styled(
        format!("{}", data.readings.len()),
        Style::default().add_modifier(Modifier::BOLD),
    ));
    spans.push(Span::raw(" readings"));

    let alerts = data.out_of_band();
    if !alerts.is_empty() {
        spans.push(Span::raw(" │ "));
        spans.push(Span::styled(
            format!("{} alert{}", alerts.len(), if alerts.len() == 1 { "" } else { "s" }),
            app.theme.status_style(alerts[0].status),
        ));
    }

    frame.render_widget(Paragraph::new(Line::from(spans)), area);
}

fn short_label(label: &str) -> &str {
    &label[..1]
}

/// Render the tab bar showing available views.
///
/// Highlights the currently active view.
pub fn render_tabs(frame: &mut Frame, app: &App, area: Rect) {
    let titles: Vec<Line> = vec![
        Line::from(" 1:Live "),
        Line::from(" 2:Trends "),
        Line::from(" 3:Readings "),
    ];

    let selected = match app.current_view {
        View::Live => 0,
        View::Trends => 1,
        View::Readings => 2,
    };

    let tabs = Tabs::new(titles)
        .select(selected)
        .style(app.theme.tab_inactive)
        .highlight_style(app.theme.tab_active)
        .divider("|");

    frame.render_widget(tabs, area);
}

/// Render the status bar at the bottom.
///
/// Shows: data source, age of last update, window, available controls.
/// Failures surface here as a banner until the next successful refresh.
pub fn render_status_bar(frame: &mut Frame, app: &App, area: Rect) {
    // Check for temporary status message first
    if let Some(msg) = app.get_status_message() {
        let paragraph =
            Paragraph::new(format!(" {} ", msg)).style(Style::default().fg(app.theme.highlight));
        frame.render_widget(paragraph, area);
        return;
    }

    // Error banner takes precedence over the regular status line
    if let Some(ref err) = app.load_error {
        let paragraph = Paragraph::new(format!(" Error: {} | q:quit r:retry ", err))
            .style(app.theme.status_style(Status::Critical));
        frame.render_widget(paragraph, area);
        return;
    }

    let status = if let Some(ref data) = app.data {
        let elapsed = data.last_updated.elapsed();
        let window = app.window.map_or("all".to_string(), |w| w.format());

        // Context-sensitive controls
        let controls = match app.current_view {
            View::Live => "Tab:switch w:window ?:help q:quit",
            View::Trends => "Tab:switch w:window ?:help q:quit",
            View::Readings => {
                if app.filter_active {
                    "Type to search | Enter:apply Esc:cancel"
                } else {
                    "/:search s:sort Enter:detail e:export w:window ?:help q:quit"
                }
            }
        };

        format!(
            " {} | Updated {:.1}s ago | Window: {} | {}",
            app.source_description(),
            elapsed.as_secs_f64(),
            window,
            controls,
        )
    } else {
        format!(" {} | Loading... | q:quit", app.source_description())
    };

    let paragraph = Paragraph::new(status).style(Style::default().add_modifier(Modifier::DIM));

    frame.render_widget(paragraph, area);
}

/// Render the help overlay with keyboard shortcuts.
///
/// Displayed as a centered modal on top of the current view.
pub fn render_help(frame: &mut Frame, app: &App, area: Rect) {
    let help_text = vec![
        Line::from(vec![Span::styled("Keyboard Shortcuts", app.theme.header)]),
        Line::from(""),
        Line::from(vec![Span::styled(
            " Navigation",
            Style::default().add_modifier(Modifier::BOLD),
        )]),
        Line::from("  ←/→ h/l     Switch views"),
        Line::from("  ↑/↓ j/k     Navigate rows"),
        Line::from("  PgUp/PgDn   Jump 10 rows"),
        Line::from("  Home/End    Jump to first/last"),
        Line::from("  Enter       Reading detail"),
        Line::from("  Esc         Go back"),
        Line::from(""),
        Line::from(vec![Span::styled(
            " Readings",
            Style::default().add_modifier(Modifier::BOLD),
        )]),
        Line::from("  /         Filter by compressor id"),
        Line::from("  c         Clear filter"),
        Line::from("  s         Cycle sort column"),
        Line::from("  S         Toggle sort direction"),
        Line::from(""),
        Line::from(vec![Span::styled(
            " General",
            Style::default().add_modifier(Modifier::BOLD),
        )]),
        Line::from("  w         Cycle lookback window"),
        Line::from("  r         Reload data"),
        Line::from("  e         Export displayed rows to CSV"),
        Line::from("  q         Quit"),
        Line::from(""),
        Line::from(vec![Span::styled(
            "Press any key to close",
            Style::default().add_modifier(Modifier::DIM),
        )]),
    ];

    let block = Block::default()
        .title(" Help ")
        .borders(Borders::ALL)
        .border_type(app.theme.border_type)
        .border_style(Style::default().fg(app.theme.highlight));

    let paragraph = Paragraph::new(help_text).block(block);

    // Center the help overlay - responsive to terminal size
    let help_width = 46u16.min(area.width.saturating_sub(4));
    let help_height = 26u16.min(area.height.saturating_sub(2));
    let x = area.x + (area.width.saturating_sub(help_width)) / 2;
    let y = area.y + (area.height.saturating_sub(help_height)) / 2;
    let help_area = Rect::new(x, y, help_width, help_height);

    // Clear the area behind the help
    frame.render_widget(ratatui::widgets::Clear, help_area);
    frame.render_widget(paragraph, help_area);
}
