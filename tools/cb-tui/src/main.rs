//! CB-TUI: Terminal dashboard for the Callboard call center.
//!
//! An external client of the gateway: it logs in like the web dashboard,
//! then shows active calls, call history, the request probe and the API
//! guide.
//!
//! ## Usage
//!
//! ```bash
//! # Mock data, no login
//! cb-tui
//!
//! # Live data from a gateway
//! cb-tui --base-url http://calls.example.com --username admin --password secret
//! ```

mod app;
mod ui;

use std::io;
use std::path::PathBuf;
use std::time::Duration;

use anyhow::{Context, Result};
use cb_dashboard::{
    CallFeed, ClientConfig, GatewayClient, GatewayFeed, MockFeed, DEFAULT_BASE_URL, TICK_INTERVAL,
};
use cb_telemetry::{init_logging, TelemetryConfig};
use clap::Parser;
use crossterm::{
    event::{self, DisableMouseCapture, EnableMouseCapture, Event, KeyEventKind},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::prelude::*;
use tracing::info;

use app::{Action, App};

/// Callboard Terminal User Interface
#[derive(Parser, Debug)]
#[command(name = "cb-tui")]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Gateway base URL (default: CALLBOARD_API_BASE_URL, then http://localhost:3001)
    #[arg(long)]
    base_url: Option<String>,

    /// Operator username; together with --password, logs in and shows live data
    #[arg(long)]
    username: Option<String>,

    /// Operator password
    #[arg(long)]
    password: Option<String>,

    /// Show mock data even when logged in
    #[arg(long)]
    mock: bool,

    /// Feed refresh interval in milliseconds
    #[arg(long, default_value = "5000")]
    refresh_ms: u64,

    /// Log file (the terminal belongs to the UI)
    #[arg(long, default_value = "cb-tui.log")]
    log_file: PathBuf,
}

#[tokio::main]
async fn main() -> Result<()> {
    let _ = dotenvy::dotenv();
    let args = Args::parse();

    let mut telemetry = TelemetryConfig::for_component("tui");
    telemetry.console_output = false;
    telemetry.log_file = Some(args.log_file.clone());
    init_logging(&telemetry).context("Failed to initialize logging")?;

    let config = match &args.base_url {
        Some(url) => ClientConfig::new(url.trim_end_matches('/')),
        None => ClientConfig::from_env(DEFAULT_BASE_URL),
    };
    let client = GatewayClient::new(&config).context("Failed to build HTTP client")?;

    let session = match (&args.username, &args.password) {
        (Some(username), Some(password)) => Some(
            client
                .login(username, password)
                .await
                .with_context(|| format!("Login to {} failed", client.base_url()))?,
        ),
        (None, None) => None,
        _ => anyhow::bail!("--username and --password must be given together"),
    };

    let feed: Box<dyn CallFeed> = match &session {
        Some(session) if !args.mock => Box::new(GatewayFeed::from_session(session)),
        _ => Box::new(MockFeed::new()),
    };
    info!(feed = %feed.describe(), base_url = %client.base_url(), "Starting dashboard");

    // Setup terminal with panic hook for cleanup
    let original_hook = std::panic::take_hook();
    std::panic::set_hook(Box::new(move |info| {
        let _ = disable_raw_mode();
        let _ = execute!(io::stdout(), LeaveAlternateScreen, DisableMouseCapture);
        original_hook(info);
    }));

    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let mut app = App::new(feed, client, session);
    let ticker = app.board.start_ticker(TICK_INTERVAL);
    let refresh_interval = Duration::from_millis(args.refresh_ms);

    let result = run_app(&mut terminal, &mut app, refresh_interval).await;

    drop(ticker);
    if let Some(session) = app.take_session() {
        session.logout();
    }

    // Restore terminal
    disable_raw_mode()?;
    execute!(
        terminal.backend_mut(),
        LeaveAlternateScreen,
        DisableMouseCapture
    )?;
    terminal.show_cursor()?;

    if let Err(e) = result {
        eprintln!("Error: {}", e);
    }

    Ok(())
}

/// Main application loop.
async fn run_app<B: Backend>(
    terminal: &mut Terminal<B>,
    app: &mut App,
    refresh_interval: Duration,
) -> Result<()> {
    app.refresh().await;

    loop {
        terminal.draw(|frame| ui::render(frame, app))?;

        match next_action(app, Duration::from_millis(100))? {
            Action::Refresh => app.refresh().await,
            Action::Probe(preset) => app.fire(preset).await,
            Action::None => {}
        }

        if app.since_refresh() >= refresh_interval {
            app.refresh().await;
        }

        if app.should_quit {
            return Ok(());
        }
    }
}

/// Poll one terminal key event and translate it.
fn next_action(app: &mut App, poll_timeout: Duration) -> Result<Action> {
    if !event::poll(poll_timeout)? {
        return Ok(Action::None);
    }

    let Event::Key(key) = event::read()? else {
        return Ok(Action::None);
    };

    if key.kind != KeyEventKind::Press {
        return Ok(Action::None);
    }

    Ok(app.on_key(key.code))
}
