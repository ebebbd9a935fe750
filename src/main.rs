// Binary includes library modules - some public API items are only for library consumers
#![allow(unused)]

use std::io;
use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};

use anyhow::{bail, Context, Result};
use clap::Parser;
use crossterm::{
    event::{DisableMouseCapture, EnableMouseCapture, Event},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{
    backend::CrosstermBackend,
    layout::{Constraint, Layout},
    Terminal,
};

mod app;
mod data;
mod events;
mod source;
mod ui;

use app::{App, View};
use data::{Band, Thresholds, TimeWindow};
use source::{DataSource, FileSource, RestEndpoint, RestSource};

#[derive(Parser, Debug)]
#[command(name = "airwatch")]
#[command(about = "Telemetry TUI for monitoring air compressor sensor readings")]
struct Args {
    /// Backend base URL (e.g. https://xyz.supabase.co)
    #[arg(short, long)]
    url: Option<String>,

    /// Table holding the readings (default: air_compressor)
    #[arg(long)]
    table: Option<String>,

    /// Watch a readings CSV file instead of the backend
    #[arg(short, long, conflicts_with = "url")]
    file: Option<PathBuf>,

    /// TOML config file (backend credentials, threshold overrides)
    #[arg(long)]
    config: Option<PathBuf>,

    /// Refresh interval in seconds; also the fetch cache TTL
    #[arg(short, long, default_value = "5")]
    refresh: u64,

    /// Lookback window over fetched rows (e.g. "15m", "1h"), or "all"
    #[arg(short, long, default_value = "1h")]
    window: String,

    /// Maximum rows fetched per refresh
    #[arg(short, long, default_value = "100")]
    limit: u32,

    /// Temperature warning threshold (°C)
    #[arg(long)]
    temp_warn: Option<f64>,

    /// Temperature critical threshold (°C)
    #[arg(long)]
    temp_crit: Option<f64>,

    /// Pressure warning threshold (bar)
    #[arg(long)]
    pressure_warn: Option<f64>,

    /// Pressure critical threshold (bar)
    #[arg(long)]
    pressure_crit: Option<f64>,

    /// Vibration warning threshold (mm/s)
    #[arg(long)]
    vibration_warn: Option<f64>,

    /// Vibration critical threshold (mm/s)
    #[arg(long)]
    vibration_crit: Option<f64>,

    /// Export the latest rows to a CSV file and exit
    #[arg(short, long, conflicts_with = "file")]
    export: Option<PathBuf>,
}

/// File/environment settings merged below the CLI flags.
#[derive(Debug, Default, serde::Deserialize)]
struct Settings {
    url: Option<String>,
    api_key: Option<String>,
    table: Option<String>,
    thresholds: Option<ThresholdSettings>,
}

#[derive(Debug, Default, serde::Deserialize)]
struct ThresholdSettings {
    temperature: Option<Band>,
    pressure: Option<Band>,
    vibration: Option<Band>,
}

fn main() -> Result<()> {
    let args = Args::parse();

    let settings = load_settings(args.config.as_deref())?;
    let thresholds = resolve_thresholds(&args, &settings);
    let window = parse_window(&args.window)?;

    // Handle export mode (non-interactive)
    if let Some(ref export_path) = args.export {
        return export_to_csv(&args, &settings, window, export_path);
    }

    // Handle file mode
    if let Some(ref path) = args.file {
        return run_with_file(path, thresholds, window, Duration::from_secs(args.refresh));
    }

    // Default: poll the backend
    run_with_backend(&args, &settings, thresholds, window)
}

/// Load settings from an optional TOML file merged with AIRWATCH_* env vars.
fn load_settings(path: Option<&Path>) -> Result<Settings> {
    let mut builder = config::Config::builder();
    if let Some(path) = path {
        builder = builder.add_source(config::File::from(path));
    }
    let config = builder
        .add_source(config::Environment::with_prefix("AIRWATCH"))
        .build()
        .context("Failed to load configuration")?;

    config.try_deserialize().context("Invalid configuration")
}

/// Defaults, overlaid by config-file bands, overlaid by CLI flags.
fn resolve_thresholds(args: &Args, settings: &Settings) -> Thresholds {
    let mut thresholds = Thresholds::default();

    if let Some(ref bands) = settings.thresholds {
        if let Some(band) = bands.temperature {
            thresholds.temperature = band;
        }
        if let Some(band) = bands.pressure {
            thresholds.pressure = band;
        }
        if let Some(band) = bands.vibration {
            thresholds.vibration = band;
        }
    }

    if let Some(v) = args.temp_warn {
        thresholds.temperature.warning = v;
    }
    if let Some(v) = args.temp_crit {
        thresholds.temperature.critical = v;
    }
    if let Some(v) = args.pressure_warn {
        thresholds.pressure.warning = v;
    }
    if let Some(v) = args.pressure_crit {
        thresholds.pressure.critical = v;
    }
    if let Some(v) = args.vibration_warn {
        thresholds.vibration.warning = v;
    }
    if let Some(v) = args.vibration_crit {
        thresholds.vibration.critical = v;
    }

    thresholds
}

fn parse_window(s: &str) -> Result<Option<TimeWindow>> {
    if s.eq_ignore_ascii_case("all") {
        return Ok(None);
    }
    TimeWindow::parse(s).map(Some)
}

/// Build the backend endpoint from CLI flags and settings.
fn resolve_endpoint(
    args: &Args,
    settings: &Settings,
    window: Option<TimeWindow>,
) -> Result<RestEndpoint> {
    let Some(base_url) = args.url.clone().or_else(|| settings.url.clone()) else {
        bail!("No backend URL; pass --url, set AIRWATCH_URL, or use --file");
    };
    let Some(api_key) = settings.api_key.clone() else {
        bail!("No API key; set AIRWATCH_API_KEY or api_key in the config file");
    };

    let table = args
        .table
        .clone()
        .or_else(|| settings.table.clone())
        .unwrap_or_else(|| "air_compressor".to_string());

    Ok(RestEndpoint {
        base_url,
        api_key,
        table,
        limit: args.limit,
        window,
    })
}

/// Run with a CSV file data source
fn run_with_file(
    path: &Path,
    thresholds: Thresholds,
    window: Option<TimeWindow>,
    refresh: Duration,
) -> Result<()> {
    let source = Box::new(FileSource::new(path));
    run_tui(source, thresholds, window, refresh)
}

/// Run polling the hosted backend
fn run_with_backend(
    args: &Args,
    settings: &Settings,
    thresholds: Thresholds,
    window: Option<TimeWindow>,
) -> Result<()> {
    let endpoint = resolve_endpoint(args, settings, window)?;
    let ttl = Duration::from_secs(args.refresh.max(1));

    // Build a tokio runtime for the background poller
    let rt = tokio::runtime::Runtime::new()?;
    let source = rt.block_on(async { RestSource::spawn(endpoint, ttl) })?;

    // The poller controls the fetch cadence; drain it frequently
    run_tui(Box::new(source), thresholds, window, Duration::from_millis(100))
}

/// Fetch the latest rows once, write them as CSV, and exit.
fn export_to_csv(
    args: &Args,
    settings: &Settings,
    window: Option<TimeWindow>,
    export_path: &Path,
) -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "warn".into()),
        )
        .with_writer(std::io::stderr)
        .init();

    let endpoint = resolve_endpoint(args, settings, window)?;

    let rt = tokio::runtime::Runtime::new()?;
    let mut batch = rt.block_on(async {
        let client = source::build_client()?;
        source::fetch_batch(&client, &endpoint).await
    })?;

    if batch.is_empty() {
        bail!("Backend returned no readings");
    }

    // Export chronologically, matching what the TUI would display
    batch.sort_by_key(|r| r.timestamp);
    data::export::export_to_file(export_path, &batch)?;

    println!(
        "Exported {} readings to: {}",
        batch.len(),
        export_path.display()
    );
    Ok(())
}

/// Run the TUI with the given data source
fn run_tui(
    source: Box<dyn DataSource>,
    thresholds: Thresholds,
    window: Option<TimeWindow>,
    refresh_interval: Duration,
) -> Result<()> {
    // Setup terminal
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    // Setup panic hook to restore terminal
    let original_hook = std::panic::take_hook();
    std::panic::set_hook(Box::new(move |panic| {
        let _ = disable_raw_mode();
        let _ = execute!(io::stdout(), LeaveAlternateScreen);
        original_hook(panic);
    }));

    // Create app and load initial data
    let mut app = App::new(source, thresholds, window);
    let _ = app.reload_data();

    // Run the main loop
    let result = run_app(&mut terminal, &mut app, refresh_interval);

    // Restore terminal
    disable_raw_mode()?;
    execute!(
        terminal.backend_mut(),
        LeaveAlternateScreen,
        DisableMouseCapture
    )?;
    terminal.show_cursor()?;

    result
}

fn run_app(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    app: &mut App,
    refresh_interval: Duration,
) -> Result<()> {
    let mut last_refresh = Instant::now();

    // Minimum terminal size for usable display
    const MIN_WIDTH: u16 = 60;
    const MIN_HEIGHT: u16 = 12;

    while app.running {
        // Draw UI
        terminal.draw(|frame| {
            let area = frame.area();

            // Check for minimum terminal size
            if area.width < MIN_WIDTH || area.height < MIN_HEIGHT {
                let msg = format!(
                    "Terminal too small: {}x{}\nMinimum: {}x{}\n\nResize to continue",
                    area.width, area.height, MIN_WIDTH, MIN_HEIGHT
                );
                let paragraph = ratatui::widgets::Paragraph::new(msg)
                    .alignment(ratatui::layout::Alignment::Center)
                    .style(ratatui::style::Style::default().fg(ratatui::style::Color::Yellow));
                let centered = ratatui::layout::Rect::new(0, area.height / 2 - 2, area.width, 5);
                frame.render_widget(paragraph, centered);
                return;
            }

            let chunks = Layout::vertical([
                Constraint::Length(1), // Header bar
                Constraint::Length(1), // Tabs
                Constraint::Min(8),    // Content
                Constraint::Length(1), // Status bar
            ])
            .split(area);

            // Render header with overall compressor status
            ui::common::render_header(frame, app, chunks[0]);

            // Render tabs
            ui::common::render_tabs(frame, app, chunks[1]);

            // Render current view
            match app.current_view {
                View::Live => ui::live::render(frame, app, chunks[2]),
                View::Trends => ui::trends::render(frame, app, chunks[2]),
                View::Readings => ui::table::render(frame, app, chunks[2]),
            }

            // Render status bar
            ui::common::render_status_bar(frame, app, chunks[3]);

            // Render detail overlay if active
            if app.show_detail_overlay {
                ui::detail::render_overlay(frame, app, area);
            }

            // Render help overlay if active
            if app.show_help {
                ui::common::render_help(frame, app, area);
            }
        })?;

        // Poll for events with a short timeout
        if let Some(event) = events::poll_event(Duration::from_millis(100))? {
            match event {
                Event::Key(key) => events::handle_key_event(app, key),
                Event::Mouse(mouse) => {
                    // Content starts after header (1) + tabs (1) + table header (1)
                    events::handle_mouse_event(app, mouse, 3);
                }
                Event::Resize(_, _) => {
                    // Terminal will redraw on next iteration
                }
                _ => {}
            }
        }

        // Auto-refresh data periodically
        if last_refresh.elapsed() >= refresh_interval {
            let _ = app.reload_data();
            last_refresh = Instant::now();
        }
    }

    Ok(())
}
