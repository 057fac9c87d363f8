//! In-process Spotify Connect device backed by librespot
//!
//! Lets the game play without another Spotify client open. The device shows
//! up in the Web API device list under its name, so [`super::ConnectPlayback`]
//! can route clips to it; its end-of-track events are forwarded to the
//! adapter's subscribers.

use librespot::connect::{ConnectConfig, Spirc};
use librespot::core::authentication::Credentials;
use librespot::core::config::SessionConfig;
use librespot::core::session::Session;
use librespot::playback::config::{AudioFormat, Bitrate, PlayerConfig};
use librespot::playback::mixer::{MixerConfig, NoOpVolume};
use librespot::playback::player::{Player, PlayerEvent, PlayerEventChannel};
use librespot::playback::{audio_backend, mixer};
use tokio::sync::broadcast;

use crate::error::PlaybackError;

use super::PlaybackEvent;

pub struct LocalDevice {
    spirc: Spirc,
}

impl LocalDevice {
    /// Connect a librespot device named `name` using `access_token`, and
    /// forward its playback events to `events`.
    pub async fn start(
        access_token: &str,
        name: &str,
        events: broadcast::Sender<PlaybackEvent>,
    ) -> Result<Self, PlaybackError> {
        tracing::info!(device = name, "Connecting local librespot device");

        let session_config = SessionConfig {
            device_id: device_id(name),
            ..Default::default()
        };
        let player_config = PlayerConfig {
            bitrate: Bitrate::Bitrate160,
            ..Default::default()
        };
        let connect_config = ConnectConfig {
            name: name.to_string(),
            ..Default::default()
        };
        let audio_format = AudioFormat::default();

        let sink_builder = audio_backend::find(None)
            .ok_or_else(|| PlaybackError::Backend("no audio sink available".to_string()))?;
        let mixer_builder = mixer::find(None)
            .ok_or_else(|| PlaybackError::Backend("no mixer available".to_string()))?;

        let session = Session::new(session_config, None);
        let mixer = mixer_builder(MixerConfig::default()).map_err(backend_error)?;

        let player = Player::new(
            player_config,
            session.clone(),
            Box::new(NoOpVolume),
            move || sink_builder(None, audio_format),
        );
        let event_channel = player.get_player_event_channel();

        let (spirc, spirc_task) = Spirc::new(
            connect_config,
            session.clone(),
            Credentials::with_access_token(access_token),
            player.clone(),
            mixer,
        )
        .await
        .map_err(backend_error)?;

        spirc.activate().map_err(backend_error)?;

        tokio::spawn(async move {
            let _spirc_task_res = spirc_task.await;
            tracing::debug!("Spirc task finished");
        });

        forward_player_events(event_channel, events.clone());

        tracing::info!(device = name, "Local device ready");
        let _ = events.send(PlaybackEvent::DeviceReady {
            device: name.to_string(),
        });

        Ok(Self { spirc })
    }

    pub fn shutdown(&self) {
        if let Err(e) = self.spirc.shutdown() {
            tracing::warn!(error = %e, "Local device shutdown failed");
        }
    }
}

fn forward_player_events(mut event_channel: PlayerEventChannel, events: broadcast::Sender<PlaybackEvent>) {
    tokio::spawn(async move {
        while let Some(event) = event_channel.recv().await {
            match event {
                PlayerEvent::EndOfTrack { .. } => {
                    tracing::debug!("PlayerEvent::EndOfTrack");
                    let _ = events.send(PlaybackEvent::Ended { handle: None });
                }
                PlayerEvent::Stopped { .. } => {
                    tracing::debug!("PlayerEvent::Stopped");
                }
                PlayerEvent::Playing { position_ms, .. } => {
                    tracing::trace!(position_ms, "PlayerEvent::Playing");
                }
                PlayerEvent::Paused { position_ms, .. } => {
                    tracing::trace!(position_ms, "PlayerEvent::Paused");
                }
                _ => {
                    tracing::trace!("PlayerEvent: other event received");
                }
            }
        }
        tracing::debug!("Player event channel closed");
    });
}

fn device_id(name: &str) -> String {
    // Stable per machine so the device keeps its identity across runs
    let hostname = hostname::get()
        .map(|h| h.to_string_lossy().to_string())
        .unwrap_or_else(|_| "unknown".to_string());
    format!("{}-{}", name.to_lowercase().replace(' ', "-"), hostname)
}

fn backend_error(e: impl std::fmt::Display) -> PlaybackError {
    PlaybackError::Backend(e.to_string())
}
