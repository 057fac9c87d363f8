//! Game progression controller
//!
//! Owns the [`GameState`] of one game and is the only thing that mutates it.
//! Clip cutoffs run as spawned sleep tasks that post a [`GameSignal`] back to
//! the controller; the event loop feeds those signals (and the adapter's
//! playback events) into [`GameController::handle_signal`], so every state
//! transition happens on the caller's task, one at a time.

use std::sync::Arc;
use std::time::Duration;

use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::SeedableRng;
use tokio::sync::{broadcast, mpsc};
use tokio::task::JoinHandle;

use crate::error::GameError;
use crate::model::Track;
use crate::playback::{PlaybackAdapter, PlaybackEvent, PlaybackHandle};

use super::notice::GameNotice;
use super::schedule::SegmentSchedule;
use super::state::{GamePhase, GameState};

/// Completion signals delivered to the controller
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum GameSignal {
    /// The cutoff timer with this id fired
    CutoffElapsed { cutoff: u64 },
    /// Event forwarded from the playback adapter subscription
    Playback(PlaybackEvent),
}

/// Result of [`GameController::submit_guess`]
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum GuessOutcome {
    Correct { attempts: u32 },
    Incorrect,
    /// Preconditions not met: empty guess, no track, or already won
    Ignored,
}

/// The playback currently bounded by a cutoff timer
struct ActivePlayback {
    handle: PlaybackHandle,
    cutoff_id: u64,
    cutoff: JoinHandle<()>,
}

pub struct GameController<P: PlaybackAdapter> {
    schedule: Arc<SegmentSchedule>,
    state: GameState,
    playback: P,
    active: Option<ActivePlayback>,
    next_cutoff_id: u64,
    signal_tx: mpsc::UnboundedSender<GameSignal>,
    signal_rx: mpsc::UnboundedReceiver<GameSignal>,
    playback_events: broadcast::Receiver<PlaybackEvent>,
    events_closed: bool,
    notices: mpsc::UnboundedSender<GameNotice>,
    rng: StdRng,
}

impl<P: PlaybackAdapter> GameController<P> {
    /// Create a controller in the NoTrack state and subscribe to `playback`
    pub fn new(
        playback: P,
        schedule: Arc<SegmentSchedule>,
        notices: mpsc::UnboundedSender<GameNotice>,
    ) -> Self {
        let (signal_tx, signal_rx) = mpsc::unbounded_channel();
        let playback_events = playback.subscribe();

        Self {
            schedule,
            state: GameState::default(),
            playback,
            active: None,
            next_cutoff_id: 0,
            signal_tx,
            signal_rx,
            playback_events,
            events_closed: false,
            notices,
            rng: StdRng::from_entropy(),
        }
    }

    /// Use a seeded generator for reset picks
    pub fn with_rng_seed(mut self, seed: u64) -> Self {
        self.rng = StdRng::seed_from_u64(seed);
        self
    }

    pub fn state(&self) -> &GameState {
        &self.state
    }

    pub fn phase(&self) -> GamePhase {
        self.state.phase()
    }

    pub fn schedule(&self) -> &SegmentSchedule {
        &self.schedule
    }

    /// Duration of the highest unlocked segment
    pub fn unlocked_duration(&self) -> Option<Duration> {
        self.state
            .unlocked_segment()
            .and_then(|index| self.schedule.get(index))
    }

    // ========================================================================
    // Round lifecycle
    // ========================================================================

    /// Start a round on `track`. `candidates` replaces the pool when given.
    /// With `track == None` the controller sits in NoTrack.
    pub async fn load_track(&mut self, track: Option<Track>, candidates: Option<Vec<Track>>) {
        self.stop().await;

        if let Some(candidates) = candidates {
            self.state.candidate_tracks = candidates;
        }

        match &track {
            Some(t) => tracing::info!(
                track_id = %t.id,
                candidates = self.state.candidate_tracks.len(),
                "Loaded track"
            ),
            None => tracing::debug!("Cleared current track"),
        }

        self.state.restart(track);
    }

    /// Start a new round on `next_track`, or on a random pick from the pool.
    /// Fails with [`GameError::NoCandidateTracks`] and leaves the state
    /// untouched when there is nothing to pick from.
    pub async fn reset_game(&mut self, next_track: Option<Track>) -> Result<(), GameError> {
        let track = match next_track {
            Some(track) => track,
            None => self
                .state
                .candidate_tracks
                .choose(&mut self.rng)
                .cloned()
                .ok_or(GameError::NoCandidateTracks)?,
        };

        self.stop().await;
        tracing::info!(track_id = %track.id, "Game reset");
        self.state.restart(Some(track));
        Ok(())
    }

    // ========================================================================
    // Segments & playback
    // ========================================================================

    /// Unlock the next segment, consume an attempt and play it.
    ///
    /// Returns the unlocked duration, or `None` when there is no track, the
    /// game is won, or every segment is already unlocked.
    pub async fn unlock_next_segment(&mut self) -> Result<Option<Duration>, GameError> {
        if self.state.current_track.is_none() || self.state.is_won {
            return Ok(None);
        }

        let next_index = self.state.unlocked_segment_index + 1;
        let Some(segment) = usize::try_from(next_index)
            .ok()
            .and_then(|index| self.schedule.get(index))
        else {
            tracing::debug!(index = self.state.unlocked_segment_index, "All segments already unlocked");
            return Ok(None);
        };

        self.state.unlocked_segment_index = next_index;
        self.state.attempts += 1;
        tracing::info!(
            index = next_index,
            segment = ?segment,
            attempts = self.state.attempts,
            "Unlocked segment"
        );
        self.notify(GameNotice::Unlocked {
            segment,
            attempt: self.state.attempts,
        });

        self.play(Some(segment)).await?;
        Ok(Some(segment))
    }

    /// Play the current track from the start for `duration_override`, or for
    /// the highest unlocked segment. Returns whether playback started.
    pub async fn play(&mut self, duration_override: Option<Duration>) -> Result<bool, GameError> {
        let Some(track) = self.state.current_track.clone() else {
            return Ok(false);
        };
        let Some(limit) = duration_override.or_else(|| self.unlocked_duration()) else {
            tracing::debug!("Nothing unlocked yet, ignoring play");
            return Ok(false);
        };

        // A pending cutoff must never stop the playback that replaces it
        let superseded = self.active.take().map(|previous| {
            previous.cutoff.abort();
            tracing::trace!(cutoff = previous.cutoff_id, "Superseded pending cutoff");
            previous.handle
        });

        self.state.is_playing = true;
        match self.playback.start(&track).await {
            Ok(handle) => {
                let cutoff_id = self.next_cutoff_id;
                self.next_cutoff_id += 1;

                let signal_tx = self.signal_tx.clone();
                let cutoff = tokio::spawn(async move {
                    tokio::time::sleep(limit).await;
                    let _ = signal_tx.send(GameSignal::CutoffElapsed { cutoff: cutoff_id });
                });

                self.active = Some(ActivePlayback {
                    handle,
                    cutoff_id,
                    cutoff,
                });
                tracing::debug!(
                    track_id = %track.id,
                    limit = ?limit,
                    handle = handle.0,
                    "Clip playing"
                );
                Ok(true)
            }
            Err(e) => {
                self.state.is_playing = false;
                tracing::warn!(error = %e, track_id = %track.id, "Playback start failed");
                // Nothing replaced the earlier clip and its cutoff is gone
                if let Some(handle) = superseded {
                    self.halt(handle).await;
                }
                self.notify(GameNotice::PlaybackFailed {
                    reason: e.to_string(),
                });
                Err(GameError::PlaybackStart(e))
            }
        }
    }

    /// Cancel the cutoff, halt the adapter and clear `is_playing`. Idempotent.
    pub async fn stop(&mut self) {
        if let Some(active) = self.active.take() {
            active.cutoff.abort();
            self.halt(active.handle).await;
        }
        self.state.is_playing = false;
    }

    async fn halt(&self, handle: PlaybackHandle) {
        if let Err(e) = self.playback.stop(handle).await {
            tracing::warn!(error = %e, handle = handle.0, "Failed to halt playback");
        }
    }

    // ========================================================================
    // Guessing
    // ========================================================================

    pub fn set_guess_text(&mut self, text: impl Into<String>) {
        if self.state.is_won {
            return;
        }
        self.state.guess_text = text.into();
    }

    /// Compare the guess with the current title, case-insensitively
    pub fn submit_guess(&mut self) -> GuessOutcome {
        if self.state.is_won {
            return GuessOutcome::Ignored;
        }
        let Some(track) = &self.state.current_track else {
            return GuessOutcome::Ignored;
        };
        let guess = self.state.guess_text.trim();
        if guess.is_empty() {
            return GuessOutcome::Ignored;
        }

        if titles_match(guess, &track.title) {
            self.state.is_won = true;
            let attempts = self.state.attempts;
            let title = track.title.clone();
            tracing::info!(attempts, title = %title, "Correct guess");
            self.notify(GameNotice::Won { attempts, title });
            GuessOutcome::Correct { attempts }
        } else {
            tracing::debug!(guess = %guess, "Incorrect guess");
            self.state.guess_text.clear();
            self.notify(GameNotice::Retry);
            GuessOutcome::Incorrect
        }
    }

    // ========================================================================
    // Signals
    // ========================================================================

    /// Apply one completion signal. Signals for superseded playbacks are ignored.
    pub async fn handle_signal(&mut self, signal: GameSignal) {
        match signal {
            GameSignal::CutoffElapsed { cutoff } => {
                if self.active.as_ref().is_some_and(|a| a.cutoff_id == cutoff) {
                    tracing::debug!(cutoff, "Cutoff elapsed");
                    self.stop().await;
                } else {
                    tracing::trace!(cutoff, "Ignoring stale cutoff");
                }
            }
            GameSignal::Playback(PlaybackEvent::Ended { handle }) => {
                let current = match (&self.active, handle) {
                    (Some(active), Some(ended)) => active.handle == ended,
                    (Some(_), None) => true,
                    (None, _) => false,
                };
                if current {
                    tracing::debug!(handle = ?handle, "Playback ended before cutoff");
                    if let Some(active) = self.active.take() {
                        active.cutoff.abort();
                    }
                    self.state.is_playing = false;
                } else {
                    tracing::trace!(handle = ?handle, "Ignoring end of stale playback");
                }
            }
            GameSignal::Playback(PlaybackEvent::DeviceReady { device }) => {
                tracing::info!(device = %device, "Playback device ready");
                self.notify(GameNotice::DeviceReady { device });
            }
        }
    }

    /// Handle every signal already queued without waiting. Returns the count.
    pub async fn process_pending(&mut self) -> usize {
        let mut handled = 0;
        while let Some(signal) = self.try_next_signal() {
            self.handle_signal(signal).await;
            handled += 1;
        }
        handled
    }

    /// Wait for the next completion signal
    pub async fn next_signal(&mut self) -> GameSignal {
        loop {
            if self.events_closed {
                return match self.signal_rx.recv().await {
                    Some(signal) => signal,
                    None => std::future::pending().await,
                };
            }

            tokio::select! {
                signal = self.signal_rx.recv() => {
                    if let Some(signal) = signal {
                        return signal;
                    }
                }
                event = self.playback_events.recv() => match event {
                    Ok(event) => return GameSignal::Playback(event),
                    Err(broadcast::error::RecvError::Lagged(skipped)) => {
                        tracing::warn!(skipped, "Playback events lagged");
                    }
                    Err(broadcast::error::RecvError::Closed) => {
                        tracing::debug!("Playback event source closed");
                        self.events_closed = true;
                    }
                },
            }
        }
    }

    fn try_next_signal(&mut self) -> Option<GameSignal> {
        if let Ok(signal) = self.signal_rx.try_recv() {
            return Some(signal);
        }
        loop {
            match self.playback_events.try_recv() {
                Ok(event) => return Some(GameSignal::Playback(event)),
                Err(broadcast::error::TryRecvError::Lagged(skipped)) => {
                    tracing::warn!(skipped, "Playback events lagged");
                }
                Err(_) => return None,
            }
        }
    }

    fn notify(&self, notice: GameNotice) {
        // Presentation may already be gone during shutdown
        let _ = self.notices.send(notice);
    }
}

impl<P: PlaybackAdapter> Drop for GameController<P> {
    fn drop(&mut self) {
        if let Some(active) = self.active.take() {
            active.cutoff.abort();
        }
    }
}

/// Exact title match ignoring case and surrounding whitespace in the guess
pub fn titles_match(guess: &str, title: &str) -> bool {
    guess.trim().to_lowercase() == title.to_lowercase()
}
