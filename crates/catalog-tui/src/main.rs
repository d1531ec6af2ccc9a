//! Catalog Admin - A terminal console for a research-publication catalog.
//!
//! This application provides a keyboard-driven interface for browsing the
//! authors, articles, institutions and awards held by the catalog backend.
//! Every catalog screen sits behind a sign-in gate.

mod app;
mod ui;
mod utils;

use std::io::{self, Write};
use std::time::Duration;

use anyhow::{bail, Result};
use crossterm::{
    event::{self, DisableMouseCapture, EnableMouseCapture, Event, KeyCode, KeyEventKind, KeyModifiers},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{backend::CrosstermBackend, Terminal};
use tokio::sync::mpsc;
use tracing::info;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_appender::rolling::{RollingFileAppender, Rotation};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use catalog_core::api::error::is_unauthorized;
use catalog_core::auth::{AuthState, Persistence};
use catalog_core::{ApiClient, Config, Navigation, SessionStore};

use app::{App, AppState};
use ui::input::handle_input;
use ui::render::render;

// ============================================================================
// Constants
// ============================================================================

/// Timeout for polling terminal events (in milliseconds)
const EVENT_POLL_TIMEOUT_MS: u64 = 100;

const LOG_FILE_PREFIX: &str = "catalog-admin";

const USAGE: &str = "\
Usage: catalog-admin [OPTION]

Options:
  --status    Show the saved session and check it against the backend
  --login     Sign in from the terminal and save the session
  --logout    Forget the saved session
  --help      Show this message

Without an option the interactive console starts.";

/// Initialize the tracing subscriber for logging.
///
/// The alternate screen owns the terminal, so output goes to a daily log file
/// under the data directory. Use RUST_LOG to control the level.
fn init_tracing() -> Option<WorkerGuard> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));

    let appender = Config::log_dir().ok().and_then(|dir| {
        RollingFileAppender::builder()
            .rotation(Rotation::DAILY)
            .filename_prefix(LOG_FILE_PREFIX)
            .filename_suffix("log")
            .build(dir)
            .ok()
    });

    match appender {
        Some(appender) => {
            let (writer, guard) = tracing_appender::non_blocking(appender);
            tracing_subscriber::registry()
                .with(fmt::layer().with_writer(writer).with_ansi(false))
                .with(filter)
                .init();
            Some(guard)
        }
        None => {
            tracing_subscriber::registry()
                .with(fmt::layer().with_writer(io::sink))
                .with(filter)
                .init();
            None
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env file if present (silently ignore if not found)
    let _ = dotenvy::dotenv();

    let _log_guard = init_tracing();

    let mut config = Config::load_or_default();
    config.apply_env();

    // Check for CLI commands
    let args: Vec<String> = std::env::args().collect();
    if let Some(command) = args.get(1) {
        return match command.as_str() {
            "--status" => show_status(&config).await,
            "--login" => login_from_terminal(&mut config).await,
            "--logout" => logout(&config),
            "--help" | "-h" => {
                println!("{}", USAGE);
                Ok(())
            }
            other => bail!("Unknown option '{}'\n\n{}", other, USAGE),
        };
    }

    info!("Catalog admin starting");

    // Setup terminal
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let result = match App::new(config) {
        Ok(mut app) => {
            app.initialize_session();
            run_app(&mut terminal, &mut app).await
        }
        Err(e) => Err(e),
    };

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

    info!("Catalog admin shutting down");
    Ok(())
}

/// Session store for one-shot commands. The receiver keeps the navigator
/// connected; nothing routes outside the console.
fn cli_store(config: &Config) -> Result<(SessionStore, mpsc::UnboundedReceiver<Navigation>)> {
    let storage = config.token_storage()?;
    let (nav_tx, nav_rx) = mpsc::unbounded_channel();
    let store = SessionStore::new(storage, nav_tx, config.destinations());
    store.initialize();
    Ok((store, nav_rx))
}

/// Print the saved session and, when signed in, verify the token.
async fn show_status(config: &Config) -> Result<()> {
    let (store, _nav_rx) = cli_store(config)?;
    let session = store.read();

    println!("Backend:        {}", config.api_base_url);
    println!("Token storage:  {:?}", config.token_backend);

    if store.persistence() == Persistence::MemoryOnly {
        println!("Session:        unavailable (token storage could not be read)");
        return Ok(());
    }

    let token = match (session.state(), session.token()) {
        (AuthState::Authenticated, Some(token)) => token.to_string(),
        _ => {
            println!("Session:        signed out");
            return Ok(());
        }
    };
    println!("Session:        signed in");

    let client = ApiClient::new(&config.api_base_url)?.with_token(Some(token));
    match client.fetch_summary().await {
        Ok(summary) => {
            println!(
                "Catalog:        {} authors, {} articles, {} institutions, {} awards",
                summary.author_count,
                summary.article_count,
                summary.institution_count,
                summary.award_count
            );
        }
        Err(e) if is_unauthorized(&e) => {
            store.logout();
            println!("Catalog:        token rejected, session cleared");
        }
        Err(e) => println!("Catalog:        unreachable ({:#})", e),
    }
    Ok(())
}

async fn login_from_terminal(config: &mut Config) -> Result<()> {
    let (store, _nav_rx) = cli_store(config)?;

    let prompt = match config.last_username.as_deref() {
        Some(name) => format!("Username [{}]: ", name),
        None => "Username: ".to_string(),
    };
    print!("{}", prompt);
    io::stdout().flush()?;

    let mut input = String::new();
    io::stdin().read_line(&mut input)?;
    let username = match input.trim() {
        "" => config.last_username.clone().unwrap_or_default(),
        name => name.to_string(),
    };
    if username.is_empty() {
        bail!("A username is required");
    }

    let password = rpassword::prompt_password("Password: ")?;
    if password.is_empty() {
        bail!("A password is required");
    }

    let client = ApiClient::new(&config.api_base_url)?;
    let token = match client.sign_in(&username, &password).await {
        Ok(token) => token,
        Err(e) if is_unauthorized(&e) => bail!("Invalid username or password"),
        Err(e) => return Err(e),
    };
    store.login(&token)?;

    if config.last_username.as_deref() != Some(username.as_str()) {
        config.last_username = Some(username.clone());
        config.save()?;
    }

    if store.persistence() == Persistence::MemoryOnly {
        println!("Signed in as {}, but the session could not be saved", username);
    } else {
        println!("Signed in as {}", username);
    }
    Ok(())
}

fn logout(config: &Config) -> Result<()> {
    let (store, _nav_rx) = cli_store(config)?;
    store.logout();
    if store.persistence() == Persistence::MemoryOnly {
        bail!("Token storage is unavailable; the saved session could not be removed");
    }
    println!("Signed out");
    Ok(())
}

async fn run_app(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    app: &mut App,
) -> Result<()> {
    loop {
        // Apply session changes and redirects before drawing
        app.settle();

        // Draw UI
        terminal.draw(|f| render(f, app))?;

        // Poll for events with timeout to allow background updates
        if event::poll(Duration::from_millis(EVENT_POLL_TIMEOUT_MS))? {
            if let Event::Key(key) = event::read()? {
                if key.kind == KeyEventKind::Press {
                    // Ctrl+C to quit
                    if key.code == KeyCode::Char('c') && key.modifiers.contains(KeyModifiers::CONTROL) {
                        return Ok(());
                    }

                    // Handle input
                    if handle_input(app, key) {
                        return Ok(());
                    }
                }
            }
        }

        // Check for completed background tasks
        app.check_background_tasks();

        // Check if we should quit
        if matches!(app.state, AppState::Quitting) {
            return Ok(());
        }
    }
}
