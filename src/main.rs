//! cinedeck - Video player controls in your terminal
//!
//! # Usage
//!
//! ```bash
//! # Play with controls
//! cinedeck movie.mkv --title "Movie"
//!
//! # Simulated 90 second clip, no mpv needed
//! cinedeck --demo 90
//! ```

use std::io::{stdout, Stdout};
use std::time::Duration;

use anyhow::Result;
use clap::Parser;
use crossterm::{
    event::{self, DisableMouseCapture, EnableMouseCapture},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{backend::CrosstermBackend, Terminal};
use tracing::{error, info};

use cinedeck::cli::{Cli, ExitCode};
use cinedeck::config::Config;
use cinedeck::{logging, ui};
use cinedeck::{App, FullscreenApi, MediaWidget, MemoryWidget, MpvWidget};

/// Terminal type alias for convenience
type Tui = Terminal<CrosstermBackend<Stdout>>;

/// Input poll timeout, also the redraw cadence
const TICK_RATE: Duration = Duration::from_millis(50);

#[tokio::main]
async fn main() -> std::process::ExitCode {
    let cli = Cli::parse();
    run(cli).await.into()
}

async fn run(cli: Cli) -> ExitCode {
    let config = match cli.load_config() {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Error: {:#}", e);
            return ExitCode::InvalidArgs;
        }
    };

    if let Some(path) = config.log_path() {
        if let Err(e) = logging::init(&path, cli.log_level.as_deref()) {
            eprintln!("Warning: logging disabled: {:#}", e);
        }
    }
    info!(urls = ?cli.urls, demo = ?cli.demo, "starting cinedeck");

    let props = config.defaults.initial_state().props();
    let title = cli.effective_title();

    match cli.demo {
        Some(duration) => {
            let mut widget = MemoryWidget::new(duration)
                .with_interval(config.overlay.progress_interval())
                .with_playlist(cli.urls.len().max(1));
            if let Err(e) = widget.sync(&props) {
                error!(error = %e, "demo widget rejected initial props");
            }
            let app = App::from_config(&config, title).with_subtitle(cli.subtitle.clone());
            run_app(app, widget).await
        }
        None => match launch_mpv(&config, &cli.urls, &props).await {
            Ok(widget) => {
                let app = App::from_config(&config, title).with_subtitle(cli.subtitle.clone());
                run_app(app, widget).await
            }
            Err(code) => code,
        },
    }
}

async fn launch_mpv(
    config: &Config,
    urls: &[String],
    props: &cinedeck::PlaybackProps,
) -> Result<MpvWidget, ExitCode> {
    MpvWidget::launch(&config.player, urls, props, config.overlay.progress_interval())
        .await
        .map_err(|e| {
            error!(error = %e, "failed to launch mpv");
            eprintln!("Error: {}", e);
            ExitCode::from(&e)
        })
}

/// Mount the widget and run the TUI until quit or the widget closes
async fn run_app<W: MediaWidget + FullscreenApi>(mut app: App<W>, widget: W) -> ExitCode {
    app.attach_widget(widget);

    let mut terminal = match init_terminal() {
        Ok(terminal) => terminal,
        Err(e) => {
            eprintln!("Error: cannot open terminal: {:#}", e);
            return ExitCode::Error;
        }
    };

    let result = run_event_loop(&mut terminal, &mut app).await;

    // Always restore terminal, even on error
    if let Err(e) = restore_terminal(&mut terminal) {
        eprintln!("Warning: failed to restore terminal: {:#}", e);
    }

    match result {
        Ok(()) => {
            if let Some(reason) = &app.exit_reason {
                info!(%reason, "player closed");
            }
            info!("exiting");
            ExitCode::Success
        }
        Err(e) => {
            error!(error = %e, "event loop failed");
            eprintln!("Error: {:#}", e);
            ExitCode::Error
        }
    }
}

// =============================================================================
// TUI Mode
// =============================================================================

/// Initialize the terminal for TUI mode
fn init_terminal() -> Result<Tui> {
    enable_raw_mode()?;
    let mut stdout = stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
    let backend = CrosstermBackend::new(stdout);
    let terminal = Terminal::new(backend)?;
    Ok(terminal)
}

/// Restore terminal to normal state
fn restore_terminal(terminal: &mut Tui) -> Result<()> {
    disable_raw_mode()?;
    execute!(
        terminal.backend_mut(),
        DisableMouseCapture,
        LeaveAlternateScreen
    )?;
    terminal.show_cursor()?;
    Ok(())
}

/// Main event loop - handles input, pumps widget events, renders the overlay
async fn run_event_loop<W: MediaWidget + FullscreenApi>(
    terminal: &mut Tui,
    app: &mut App<W>,
) -> Result<()> {
    while app.running {
        // Render current state
        let mut hits = None;
        terminal.draw(|frame| hits = Some(ui::render(frame, app)))?;
        if let Some(hits) = hits {
            app.hit_map = hits;
        }

        // Poll for input with timeout so widget events keep flowing
        if event::poll(TICK_RATE)? {
            app.handle_event(event::read()?);
        }

        app.pump_widget_events();
        app.sync_widget();

        // Let the IPC session task run between frames
        tokio::task::yield_now().await;
    }

    Ok(())
}
