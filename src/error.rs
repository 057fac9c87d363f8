//! Error types for the game, playback, auth and relay layers
//!
//! Library code returns these typed errors; the binaries wrap them in
//! `anyhow` at the edge.

use std::time::Duration;
use thiserror::Error;

/// Invalid segment schedule
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ScheduleError {
    #[error("segment schedule is empty")]
    Empty,

    #[error("segment {index} has a non-positive duration")]
    NonPositive { index: usize },

    #[error("segment {index} is too long")]
    OutOfRange { index: usize },

    #[error("segment {index} ({current:?}) is not longer than the segment before it ({previous:?})")]
    NotIncreasing {
        index: usize,
        previous: Duration,
        current: Duration,
    },
}

/// Failure reported by a playback backend
#[derive(Error, Debug, Clone)]
pub enum PlaybackError {
    #[error("No active device. Open Spotify on a device or enable the local device.")]
    NoActiveDevice,

    #[error("Invalid track reference: {0}")]
    InvalidTrack(String),

    #[error("Spotify API error: {0}")]
    Api(String),

    #[error("Audio backend error: {0}")]
    Backend(String),
}

/// Errors raised by game controller operations
#[derive(Error, Debug)]
pub enum GameError {
    /// Reset attempted with an empty pool and no explicit track
    #[error("No candidate tracks to choose from. Load liked songs or search first.")]
    NoCandidateTracks,

    /// The adapter could not begin playback; the game state is unaffected
    #[error("Could not start playback: {0}")]
    PlaybackStart(#[source] PlaybackError),
}

/// Failure fetching tracks from the track source
#[derive(Error, Debug)]
pub enum LibraryError {
    #[error("Spotify API error: {0}")]
    Api(String),
}

/// Errors raised during the login flow
#[derive(Error, Debug)]
pub enum AuthError {
    /// The provider redirect carried neither a code nor an error
    #[error("No authorization code in the provider redirect")]
    MissingAuthorizationCode,

    /// The provider redirect carried an `error` parameter
    #[error("Authorization denied: {0}")]
    AuthorizationDenied(String),

    /// The relay or the provider rejected the code
    #[error("Token exchange failed: {0}")]
    TokenExchange(String),

    #[error("Session storage error: {0}")]
    Session(#[from] std::io::Error),

    #[error("Redirect listener error: {0}")]
    Redirect(String),
}

impl From<reqwest::Error> for AuthError {
    fn from(e: reqwest::Error) -> Self {
        AuthError::TokenExchange(friendly_network_error(&e))
    }
}

/// Invalid or missing configuration
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Missing configuration value: {0}")]
    Missing(&'static str),

    #[error("Invalid URL for {name}: {reason}")]
    InvalidUrl { name: &'static str, reason: String },
}

/// Render a reqwest error without echoing request details such as headers
pub fn friendly_network_error(e: &reqwest::Error) -> String {
    if e.is_builder() {
        return "Invalid URL".to_string();
    }
    if e.is_connect() {
        if let Some(url) = e.url() {
            return format!("Could not connect to {}", url.host_str().unwrap_or("server"));
        }
        return "Could not connect to server".to_string();
    }
    if e.is_timeout() {
        return "Connection timed out".to_string();
    }
    if e.is_decode() {
        return "Invalid response from server".to_string();
    }
    match e.status() {
        Some(status) => format!("Server responded with {status}"),
        None => "Network error".to_string(),
    }
}
