//! Command-line and environment configuration for both binaries

use std::path::PathBuf;

use clap::Parser;
use reqwest::Url;

use crate::auth::{AuthConfig, DEFAULT_SESSION_FILE};
use crate::error::{ConfigError, ScheduleError};
use crate::game::SegmentSchedule;
use crate::relay::{RelayConfig, DEFAULT_PORT, DEFAULT_TOKEN_URL};

pub const DEFAULT_DEVICE_NAME: &str = "Song Guesser";
pub const DEFAULT_REDIRECT_URI: &str = "http://127.0.0.1:8898/callback";
pub const DEFAULT_RELAY_URL: &str = "http://127.0.0.1:3001";

/// Command-line arguments for the game
#[derive(Parser, Debug, Clone)]
#[command(name = "song-guesser")]
#[command(about = "Guess the song from ever-longer clips")]
#[command(version)]
pub struct GameArgs {
    /// Spotify application client id
    #[arg(long, env = "SPOTIFY_CLIENT_ID", default_value = "")]
    pub client_id: String,

    /// Redirect URI registered for the Spotify application
    #[arg(long, env = "SPOTIFY_REDIRECT_URI", default_value = DEFAULT_REDIRECT_URI)]
    pub redirect_uri: String,

    /// Base URL of the token-exchange relay
    #[arg(long, env = "SONG_GUESSER_RELAY_URL", default_value = DEFAULT_RELAY_URL)]
    pub relay_url: String,

    /// Name of the local Spotify Connect device
    #[arg(long, env = "SONG_GUESSER_DEVICE_NAME", default_value = DEFAULT_DEVICE_NAME)]
    pub device_name: String,

    /// Do not start the local device; play on another Spotify client instead
    #[arg(long)]
    pub no_local_device: bool,

    /// Unlock durations in seconds, comma separated
    #[arg(long, env = "SONG_GUESSER_SEGMENTS", value_delimiter = ',')]
    pub segments: Option<Vec<f64>>,

    /// File holding the session token
    #[arg(long, env = "SONG_GUESSER_SESSION_FILE", default_value = DEFAULT_SESSION_FILE)]
    pub session_file: PathBuf,

    /// Forget the stored session token and log in again
    #[arg(long)]
    pub logout: bool,
}

impl GameArgs {
    pub fn auth_config(&self) -> Result<AuthConfig, ConfigError> {
        Ok(AuthConfig {
            client_id: required("SPOTIFY_CLIENT_ID", &self.client_id)?,
            redirect_uri: parse_url("SPOTIFY_REDIRECT_URI", &self.redirect_uri)?,
            relay_url: parse_url("SONG_GUESSER_RELAY_URL", &self.relay_url)?,
        })
    }

    pub fn schedule(&self) -> Result<SegmentSchedule, ScheduleError> {
        match &self.segments {
            Some(secs) => SegmentSchedule::from_secs_f64(secs),
            None => Ok(SegmentSchedule::default()),
        }
    }
}

/// Command-line arguments for the token relay
#[derive(Parser, Debug, Clone)]
#[command(name = "token-relay")]
#[command(about = "Trades Spotify authorization codes for access tokens")]
#[command(version)]
pub struct RelayArgs {
    /// Port to listen on
    #[arg(short, long, env = "TOKEN_RELAY_PORT", default_value_t = DEFAULT_PORT)]
    pub port: u16,

    /// Spotify application client id
    #[arg(long, env = "SPOTIFY_CLIENT_ID", default_value = "")]
    pub client_id: String,

    /// Spotify application client secret
    #[arg(long, env = "SPOTIFY_CLIENT_SECRET", default_value = "", hide_env_values = true)]
    pub client_secret: String,

    /// Redirect URI the authorization code was issued for
    #[arg(long, env = "SPOTIFY_REDIRECT_URI", default_value = DEFAULT_REDIRECT_URI)]
    pub redirect_uri: String,

    /// Provider token endpoint
    #[arg(long, env = "SPOTIFY_TOKEN_URL", default_value = DEFAULT_TOKEN_URL)]
    pub token_url: String,
}

impl RelayArgs {
    pub fn relay_config(&self) -> Result<RelayConfig, ConfigError> {
        Ok(RelayConfig {
            client_id: required("SPOTIFY_CLIENT_ID", &self.client_id)?,
            client_secret: required("SPOTIFY_CLIENT_SECRET", &self.client_secret)?,
            redirect_uri: required("SPOTIFY_REDIRECT_URI", &self.redirect_uri)?,
            token_url: parse_url("SPOTIFY_TOKEN_URL", &self.token_url)?,
        })
    }
}

fn required(name: &'static str, value: &str) -> Result<String, ConfigError> {
    let value = value.trim();
    if value.is_empty() {
        return Err(ConfigError::Missing(name));
    }
    Ok(value.to_string())
}

fn parse_url(name: &'static str, value: &str) -> Result<Url, ConfigError> {
    Url::parse(value.trim()).map_err(|e| ConfigError::InvalidUrl {
        name,
        reason: e.to_string(),
    })
}
