use std::io;
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::Parser;
use crossterm::{
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{backend::CrosstermBackend, Terminal};
use rspotify::{clients::OAuthClient, AuthCodeSpotify};
use tokio::sync::mpsc;

use song_guesser::app::{self, App};
use song_guesser::auth::{self, AuthConfig, FileSessionStore, SessionStore};
use song_guesser::config::GameArgs;
use song_guesser::game::GameController;
use song_guesser::library::{spotify_client, SpotifyLibrary};
use song_guesser::logging;
use song_guesser::playback::{ConnectPlayback, LocalDevice};

const LOGIN_ATTEMPTS: usize = 3;

#[tokio::main]
async fn main() -> Result<()> {
    let args = GameArgs::parse();

    if let Err(e) = logging::init_file_logging() {
        eprintln!("Warning: Failed to initialize logging: {}", e);
    }

    tracing::info!("=== Song Guesser Starting ===");

    let auth_config = args.auth_config().context("Invalid configuration")?;
    let schedule = Arc::new(args.schedule().context("Invalid segment schedule")?);
    let session = FileSessionStore::new(&args.session_file);
    if args.logout {
        session.clear_token()?;
    }

    let (client, access_token) = authenticate(&auth_config, &session).await?;

    let playback = ConnectPlayback::new(client.clone(), Some(args.device_name.clone()));
    let (notice_tx, notice_rx) = mpsc::unbounded_channel();
    // Subscribes to playback events, so it must exist before the local device announces itself
    let controller = GameController::new(playback.clone(), schedule, notice_tx);

    let local_device = if args.no_local_device {
        None
    } else {
        let events = playback.event_sender();
        let name = args.device_name.clone();
        Some(tokio::spawn(async move {
            match LocalDevice::start(&access_token, &name, events).await {
                Ok(device) => Some(device),
                Err(e) => {
                    tracing::warn!(error = %e, "Local device unavailable, using other Spotify devices");
                    None
                }
            }
        }))
    };

    let mut app = App::new(controller, SpotifyLibrary::new(client), notice_rx);
    app.load_liked_songs().await;

    tracing::info!("Starting TUI...");

    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let res = app::run(&mut terminal, &mut app).await;

    // Restore terminal
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    if let Err(err) = res {
        tracing::error!(error = ?err, "Application error");
    }

    if let Some(handle) = local_device {
        if handle.is_finished() {
            if let Ok(Some(device)) = handle.await {
                device.shutdown();
            }
        } else {
            handle.abort();
        }
    }

    tracing::info!("Song Guesser shutting down");
    Ok(())
}

/// Log in, verify the token against the API, and start over with a fresh
/// login whenever a step fails.
async fn authenticate(config: &AuthConfig, session: &FileSessionStore) -> Result<(Arc<AuthCodeSpotify>, String)> {
    for attempt in 1..=LOGIN_ATTEMPTS {
        let token = match auth::login(config, session).await {
            Ok(token) => token,
            Err(e) => {
                tracing::warn!(attempt, error = %e, "Login failed");
                eprintln!("Login failed: {}", e);
                session.clear_token()?;
                continue;
            }
        };

        let client = spotify_client(&token).await;
        match client.me().await {
            Ok(user) => {
                tracing::info!(user_id = %user.id, "Spotify authorized successfully");
                return Ok((client, token));
            }
            Err(e) => {
                tracing::warn!(attempt, error = %e, "Session token rejected, logging in again");
                session.clear_token()?;
            }
        }
    }

    anyhow::bail!("Could not log in to Spotify after {} attempts", LOGIN_ATTEMPTS)
}
