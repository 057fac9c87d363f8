//! Spotify Connect playback through the Web API player endpoints

use std::sync::Arc;

use rspotify::{
    model::{PlayableId, TrackId},
    prelude::*,
    AuthCodeSpotify,
};
use tokio::sync::broadcast;

use crate::error::PlaybackError;
use crate::model::Track;

use super::{HandleCounter, PlaybackAdapter, PlaybackEvent, PlaybackHandle, EVENT_CHANNEL_CAPACITY};

/// Routes clips to the active Connect device, falling back to a named
/// device (usually our own [`super::LocalDevice`]).
#[derive(Clone)]
pub struct ConnectPlayback {
    client: Arc<AuthCodeSpotify>,
    preferred_device: Option<String>,
    handles: Arc<HandleCounter>,
    events: broadcast::Sender<PlaybackEvent>,
}

impl ConnectPlayback {
    pub fn new(client: Arc<AuthCodeSpotify>, preferred_device: Option<String>) -> Self {
        let (events, _) = broadcast::channel(EVENT_CHANNEL_CAPACITY);
        Self {
            client,
            preferred_device,
            handles: Arc::new(HandleCounter::default()),
            events,
        }
    }

    /// Sender shared with backends that report playback events for this adapter
    pub fn event_sender(&self) -> broadcast::Sender<PlaybackEvent> {
        self.events.clone()
    }

    async fn resolve_device(&self) -> Result<String, PlaybackError> {
        let devices = self
            .client
            .device()
            .await
            .map_err(|e| PlaybackError::Api(e.to_string()))?;

        if let Some(device) = devices.iter().find(|d| d.is_active) {
            if let Some(id) = &device.id {
                tracing::debug!(device_name = %device.name, device_id = %id, "Found active device");
                return Ok(id.clone());
            }
        }

        if let Some(name) = &self.preferred_device {
            if let Some(device) = devices.iter().find(|d| &d.name == name) {
                if let Some(id) = &device.id {
                    tracing::debug!(device_name = %device.name, device_id = %id, "No active device, using preferred device");
                    return Ok(id.clone());
                }
            }
        }

        tracing::debug!(available_devices = devices.len(), "No usable playback device");
        Err(PlaybackError::NoActiveDevice)
    }
}

impl PlaybackAdapter for ConnectPlayback {
    async fn start(&self, track: &Track) -> Result<PlaybackHandle, PlaybackError> {
        let id = TrackId::from_id(track.id.as_str())
            .map_err(|e| PlaybackError::InvalidTrack(format!("{}: {}", track.id, e)))?;
        let device_id = self.resolve_device().await?;

        tracing::debug!(uri = %track.uri, device_id = %device_id, "API: start_uris_playback");
        self.client
            .start_uris_playback([PlayableId::Track(id)], Some(device_id.as_str()), None, None)
            .await
            .map_err(|e| PlaybackError::Api(e.to_string()))?;

        Ok(self.handles.next())
    }

    async fn stop(&self, handle: PlaybackHandle) -> Result<(), PlaybackError> {
        let device_id = self.resolve_device().await.ok();
        tracing::debug!(handle = handle.0, device_id = ?device_id, "API: pause_playback");
        self.client
            .pause_playback(device_id.as_deref())
            .await
            .map_err(|e| PlaybackError::Api(e.to_string()))?;
        Ok(())
    }

    fn subscribe(&self) -> broadcast::Receiver<PlaybackEvent> {
        self.events.subscribe()
    }
}
