use std::io;
use std::time::Duration;

use anyhow::{Context, Result};
use crossterm::{
    event::{self, DisableMouseCapture, EnableMouseCapture, Event, KeyEventKind},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{backend::CrosstermBackend, Terminal};
use roster_core::{RecordStore, Route};
use tokio::sync::mpsc;

mod app;
mod config;
mod editor;
mod logging;
mod ui;

use app::{App, AppEvent};
use config::Config;

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();

    let mut config = Config::load().context("Failed to load configuration")?;

    // Parse CLI arguments
    let args: Vec<String> = std::env::args().collect();
    let mut i = 1;
    while i < args.len() {
        match args[i].as_str() {
            "--route" => {
                if i + 1 < args.len() {
                    config.initial_route = args[i + 1].clone();
                    i += 2;
                } else {
                    eprintln!("Error: --route requires a path argument");
                    std::process::exit(1);
                }
            }
            "--help" | "-h" => {
                println!("Usage: roster [OPTIONS]");
                println!();
                println!("Options:");
                println!("  --route <PATH>  Start at /, /addform or /updateform/<id>");
                println!("  --help, -h      Show this help message");
                return Ok(());
            }
            _ => {
                eprintln!("Unknown argument: {}", args[i]);
                std::process::exit(1);
            }
        }
    }

    logging::init_logging(&config)?;

    // Setup terminal
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    // Run app
    let app = App::new(RecordStore::new(), Route::parse(&config.initial_route));
    let res = run_app(&mut terminal, app, Duration::from_millis(config.tick_ms)).await;

    // Restore terminal
    disable_raw_mode()?;
    execute!(
        terminal.backend_mut(),
        LeaveAlternateScreen,
        DisableMouseCapture
    )?;
    terminal.show_cursor()?;

    if let Err(err) = res {
        tracing::error!(error = ?err, "roster exited with an error");
        eprintln!("Error: {:?}", err);
    }

    Ok(())
}

async fn run_app<B: ratatui::backend::Backend>(
    terminal: &mut Terminal<B>,
    mut app: App,
    tick: Duration,
) -> Result<()> {
    let (tx, mut rx) = mpsc::channel::<AppEvent>(100);

    // Spawn input handler
    let tx_input = tx.clone();
    tokio::spawn(async move {
        loop {
            if event::poll(tick).unwrap_or(false) {
                if let Ok(Event::Key(key)) = event::read() {
                    if key.kind == KeyEventKind::Press {
                        let _ = tx_input.send(AppEvent::Key(key)).await;
                    }
                }
            }
            // Send tick events for UI refresh
            let _ = tx_input.send(AppEvent::Tick).await;
        }
    });

    loop {
        terminal.draw(|f| ui::draw(f, &app))?;

        if let Some(event) = rx.recv().await {
            match event {
                AppEvent::Key(key) => {
                    if app.handle_key(key, &tx)? {
                        tracing::info!(records = app.store.len(), "quitting");
                        return Ok(());
                    }
                }
                AppEvent::Tick => {}
                AppEvent::ImageDecoded { ticket, result } => {
                    app.on_image_decoded(ticket, result);
                }
            }
        }
    }
}
