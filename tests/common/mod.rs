//! Shared helpers for integration tests

#![allow(dead_code)]

use std::sync::{Arc, Mutex};

use tokio::sync::{broadcast, mpsc};

use song_guesser::error::{LibraryError, PlaybackError};
use song_guesser::game::{GameController, GameNotice, SegmentSchedule};
use song_guesser::library::TrackSource;
use song_guesser::model::Track;
use song_guesser::playback::{HandleCounter, PlaybackAdapter, PlaybackEvent, PlaybackHandle};

#[derive(Default)]
struct Recorded {
    started: Vec<(String, PlaybackHandle)>,
    stopped: Vec<PlaybackHandle>,
    fail_next_start: Option<PlaybackError>,
}

/// In-memory playback backend that records calls
#[derive(Clone)]
pub struct FakePlayback {
    recorded: Arc<Mutex<Recorded>>,
    handles: Arc<HandleCounter>,
    events: broadcast::Sender<PlaybackEvent>,
}

impl FakePlayback {
    pub fn new() -> Self {
        let (events, _) = broadcast::channel(16);
        Self {
            recorded: Arc::new(Mutex::new(Recorded::default())),
            handles: Arc::new(HandleCounter::default()),
            events,
        }
    }

    pub fn fail_next_start(&self, error: PlaybackError) {
        self.recorded.lock().unwrap().fail_next_start = Some(error);
    }

    pub fn started(&self) -> Vec<(String, PlaybackHandle)> {
        self.recorded.lock().unwrap().started.clone()
    }

    pub fn stopped(&self) -> Vec<PlaybackHandle> {
        self.recorded.lock().unwrap().stopped.clone()
    }

    pub fn last_handle(&self) -> Option<PlaybackHandle> {
        self.recorded.lock().unwrap().started.last().map(|(_, h)| *h)
    }

    pub fn emit(&self, event: PlaybackEvent) {
        self.events.send(event).unwrap();
    }
}

impl PlaybackAdapter for FakePlayback {
    async fn start(&self, track: &Track) -> Result<PlaybackHandle, PlaybackError> {
        let mut recorded = self.recorded.lock().unwrap();
        if let Some(error) = recorded.fail_next_start.take() {
            return Err(error);
        }
        let handle = self.handles.next();
        recorded.started.push((track.id.clone(), handle));
        Ok(handle)
    }

    async fn stop(&self, handle: PlaybackHandle) -> Result<(), PlaybackError> {
        self.recorded.lock().unwrap().stopped.push(handle);
        Ok(())
    }

    fn subscribe(&self) -> broadcast::Receiver<PlaybackEvent> {
        self.events.subscribe()
    }
}

/// Track source with canned liked songs and search results
#[derive(Clone, Default)]
pub struct FakeLibrary {
    pub saved: Vec<Track>,
    pub results: Vec<(String, Vec<Track>)>,
    pub failure: Option<String>,
}

impl FakeLibrary {
    pub fn with_saved(saved: Vec<Track>) -> Self {
        Self {
            saved,
            ..Default::default()
        }
    }

    pub fn with_results(mut self, query: &str, tracks: Vec<Track>) -> Self {
        self.results.push((query.to_string(), tracks));
        self
    }
}

impl TrackSource for FakeLibrary {
    async fn search_tracks(&self, query: &str, limit: u32) -> Result<Vec<Track>, LibraryError> {
        if let Some(reason) = &self.failure {
            return Err(LibraryError::Api(reason.clone()));
        }
        Ok(self
            .results
            .iter()
            .find(|(q, _)| q == query)
            .map(|(_, tracks)| tracks.iter().take(limit as usize).cloned().collect())
            .unwrap_or_default())
    }

    async fn list_saved_tracks(&self, limit: u32) -> Result<Vec<Track>, LibraryError> {
        if let Some(reason) = &self.failure {
            return Err(LibraryError::Api(reason.clone()));
        }
        Ok(self.saved.iter().take(limit as usize).cloned().collect())
    }
}

pub fn track(id: &str, title: &str) -> Track {
    Track::new(id, title, vec!["Test Artist".to_string()])
}

pub fn pool() -> Vec<Track> {
    vec![
        track("t1", "Chime"),
        track("t2", "Faded"),
        track("t3", "Yesterday (Remastered 2009)"),
    ]
}

pub fn controller() -> (
    GameController<FakePlayback>,
    FakePlayback,
    mpsc::UnboundedReceiver<GameNotice>,
) {
    let playback = FakePlayback::new();
    let (tx, rx) = mpsc::unbounded_channel();
    let controller = GameController::new(playback.clone(), Arc::new(SegmentSchedule::default()), tx).with_rng_seed(7);
    (controller, playback, rx)
}

pub fn drain(rx: &mut mpsc::UnboundedReceiver<GameNotice>) -> Vec<GameNotice> {
    let mut notices = Vec::new();
    while let Ok(notice) = rx.try_recv() {
        notices.push(notice);
    }
    notices
}
