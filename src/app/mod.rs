//! App module - terminal front-end for the game
//!
//! - `input`: key handling
//! - `view`: ratatui rendering
//!
//! The event loop multiplexes three sources: key presses from a blocking
//! reader thread, completion signals from the game controller, and a UI
//! tick for expiring notices.

mod input;
mod view;

use std::io;
use std::time::{Duration, Instant};

use crossterm::event::{self, Event, KeyEvent};
use ratatui::{backend::CrosstermBackend, Terminal};
use tokio::sync::mpsc;

use crate::error::GameError;
use crate::game::{GameController, GameNotice};
use crate::library::{TrackSource, LIKED_SONGS_LIMIT, SEARCH_LIMIT};
use crate::playback::PlaybackAdapter;

pub use view::render;

const NOTICE_TIMEOUT: Duration = Duration::from_secs(5);
const TICK_INTERVAL: Duration = Duration::from_millis(250);
const INPUT_POLL: Duration = Duration::from_millis(50);

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Focus {
    Guess,
    Search,
}

/// A notice currently on screen
#[derive(Clone, Debug)]
pub struct Banner {
    pub title: String,
    pub detail: String,
    pub is_error: bool,
    shown_at: Instant,
}

impl Banner {
    fn new(title: impl Into<String>, detail: impl Into<String>, is_error: bool) -> Self {
        Self {
            title: title.into(),
            detail: detail.into(),
            is_error,
            shown_at: Instant::now(),
        }
    }

    fn from_notice(notice: &GameNotice) -> Self {
        let (title, detail) = notice.message();
        Self::new(title, detail, notice.is_error())
    }
}

/// Presentation-only state
#[derive(Clone, Debug)]
pub struct UiState {
    pub focus: Focus,
    pub search_query: String,
    pub banner: Option<Banner>,
    pub source_label: String,
    pub should_quit: bool,
}

impl Default for UiState {
    fn default() -> Self {
        Self {
            focus: Focus::Guess,
            search_query: String::new(),
            banner: None,
            source_label: "Liked Songs".to_string(),
            should_quit: false,
        }
    }
}

pub struct App<P: PlaybackAdapter, S: TrackSource> {
    controller: GameController<P>,
    library: S,
    notices: mpsc::UnboundedReceiver<GameNotice>,
    ui: UiState,
}

impl<P: PlaybackAdapter, S: TrackSource> App<P, S> {
    pub fn new(controller: GameController<P>, library: S, notices: mpsc::UnboundedReceiver<GameNotice>) -> Self {
        Self {
            controller,
            library,
            notices,
            ui: UiState::default(),
        }
    }

    pub fn controller(&self) -> &GameController<P> {
        &self.controller
    }

    pub fn ui(&self) -> &UiState {
        &self.ui
    }

    pub fn should_quit(&self) -> bool {
        self.ui.should_quit
    }

    /// Replace the pool with the user's liked songs and start on the first
    pub async fn load_liked_songs(&mut self) {
        match self.library.list_saved_tracks(LIKED_SONGS_LIMIT).await {
            Ok(tracks) if tracks.is_empty() => {
                self.show_error("No liked songs", "Like some songs on Spotify or search instead.");
            }
            Ok(tracks) => {
                let first = tracks.first().cloned();
                self.controller.load_track(first, Some(tracks)).await;
                self.ui.source_label = "Liked Songs".to_string();
            }
            Err(e) => {
                tracing::error!(error = %e, "Loading liked songs failed");
                self.show_error("Could not load liked songs", e.to_string());
            }
        }
    }

    /// Replace the pool with search results and start on the first
    pub async fn search(&mut self) {
        let query = self.ui.search_query.trim().to_string();
        if query.is_empty() {
            return;
        }

        match self.library.search_tracks(&query, SEARCH_LIMIT).await {
            Ok(tracks) if tracks.is_empty() => {
                self.show_error("No results", format!("Nothing found for \"{}\"", query));
            }
            Ok(tracks) => {
                let first = tracks.first().cloned();
                self.controller.load_track(first, Some(tracks)).await;
                self.ui.source_label = format!("Search: {}", query);
                self.ui.focus = Focus::Guess;
            }
            Err(e) => {
                tracing::error!(error = %e, query = %query, "Search failed");
                self.show_error("Search failed", e.to_string());
            }
        }
    }

    pub async fn unlock_next_segment(&mut self) {
        // Failures were already raised as notices by the controller
        let _ = self.controller.unlock_next_segment().await;
    }

    pub async fn replay(&mut self) {
        let _ = self.controller.play(None).await;
    }

    pub async fn new_song(&mut self) {
        if let Err(e) = self.controller.reset_game(None).await {
            match e {
                GameError::NoCandidateTracks => self.show_error("No songs to pick from", e.to_string()),
                other => self.show_error("Reset failed", other.to_string()),
            }
        }
    }

    pub fn submit_guess(&mut self) {
        self.controller.submit_guess();
    }

    /// Apply queued controller signals, pick up notices, expire the banner
    pub async fn tick(&mut self) {
        self.controller.process_pending().await;
        self.drain_notices();

        if let Some(banner) = &self.ui.banner {
            if banner.shown_at.elapsed() >= NOTICE_TIMEOUT {
                self.ui.banner = None;
            }
        }
    }

    fn drain_notices(&mut self) {
        while let Ok(notice) = self.notices.try_recv() {
            self.ui.banner = Some(Banner::from_notice(&notice));
        }
    }

    fn show_error(&mut self, title: impl Into<String>, detail: impl Into<String>) {
        self.ui.banner = Some(Banner::new(title, detail, true));
    }
}

/// Read key presses on a blocking thread and forward them to the event loop
fn spawn_input_reader() -> mpsc::Receiver<KeyEvent> {
    let (tx, rx) = mpsc::channel(64);
    std::thread::spawn(move || {
        loop {
            match event::poll(INPUT_POLL) {
                Ok(true) => match event::read() {
                    Ok(Event::Key(key)) => {
                        if tx.blocking_send(key).is_err() {
                            break;
                        }
                    }
                    Ok(_) => {}
                    Err(e) => {
                        tracing::error!(error = %e, "Reading terminal input failed");
                        break;
                    }
                },
                Ok(false) => {
                    if tx.is_closed() {
                        break;
                    }
                }
                Err(e) => {
                    tracing::error!(error = %e, "Polling terminal input failed");
                    break;
                }
            }
        }
    });
    rx
}

/// Drive the app until the user quits
pub async fn run<P, S>(terminal: &mut Terminal<CrosstermBackend<io::Stdout>>, app: &mut App<P, S>) -> io::Result<()>
where
    P: PlaybackAdapter,
    S: TrackSource,
{
    let mut keys = spawn_input_reader();
    let mut ticker = tokio::time::interval(TICK_INTERVAL);

    loop {
        app.tick().await;
        terminal.draw(|f| render(f, app.controller.state(), app.controller.schedule(), &app.ui))?;

        if app.should_quit() {
            break;
        }

        tokio::select! {
            signal = app.controller.next_signal() => {
                app.controller.handle_signal(signal).await;
            }
            key = keys.recv() => match key {
                Some(key) => app.handle_key_event(key).await,
                None => break,
            },
            _ = ticker.tick() => {}
        }
    }

    app.controller.stop().await;
    Ok(())
}
