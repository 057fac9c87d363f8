//! Playback module - audio backends behind a common adapter
//!
//! The game controller only needs to start a track, stop it, and hear when
//! it ended. Backends:
//!
//! - `connect`: Spotify Connect routing through the Web API player endpoints
//! - `local`: an in-process librespot device reporting end-of-track

mod connect;
mod local;

use std::future::Future;
use std::sync::atomic::{AtomicU64, Ordering};

use tokio::sync::broadcast;

use crate::error::PlaybackError;
use crate::model::Track;

pub use connect::ConnectPlayback;
pub use local::LocalDevice;

/// Capacity of adapter event channels; lagging subscribers drop old events
pub const EVENT_CHANNEL_CAPACITY: usize = 32;

/// Identifies one started playback
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct PlaybackHandle(pub u64);

/// Hands out increasing playback handles
#[derive(Debug, Default)]
pub struct HandleCounter(AtomicU64);

impl HandleCounter {
    pub fn next(&self) -> PlaybackHandle {
        PlaybackHandle(self.0.fetch_add(1, Ordering::Relaxed) + 1)
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum PlaybackEvent {
    /// Playback finished on its own. `None` when the backend cannot tell
    /// which playback it was.
    Ended { handle: Option<PlaybackHandle> },
    /// A playback device became available
    DeviceReady { device: String },
}

/// Audio backend consumed by the game controller
pub trait PlaybackAdapter {
    /// Begin playing `track` from its start
    fn start(&self, track: &Track) -> impl Future<Output = Result<PlaybackHandle, PlaybackError>> + Send;

    /// Halt the playback identified by `handle`
    fn stop(&self, handle: PlaybackHandle) -> impl Future<Output = Result<(), PlaybackError>> + Send;

    /// Subscribe to end-of-playback and device notifications.
    /// Dropping the receiver unsubscribes.
    fn subscribe(&self) -> broadcast::Receiver<PlaybackEvent>;
}
