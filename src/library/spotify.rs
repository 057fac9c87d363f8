//! Track source over the Spotify Web API

use std::collections::HashSet;
use std::sync::Arc;

use futures::{StreamExt, TryStreamExt};
use rspotify::{
    model::{Market, SearchResult, SearchType},
    prelude::*,
    AuthCodeSpotify, Config, Token,
};

use crate::auth::SCOPES;
use crate::error::LibraryError;
use crate::model::Track;

use super::TrackSource;

/// Build a Web API client around an access token obtained by the login flow
pub async fn spotify_client(access_token: &str) -> Arc<AuthCodeSpotify> {
    let spotify = AuthCodeSpotify::with_config(
        Default::default(),
        Default::default(),
        Config {
            token_cached: false,
            token_refreshing: false,
            ..Default::default()
        },
    );

    let token = Token {
        access_token: access_token.to_string(),
        expires_in: chrono::Duration::seconds(3600),
        expires_at: Some(chrono::Utc::now() + chrono::Duration::seconds(3600)),
        scopes: SCOPES
            .split_whitespace()
            .map(|s| s.to_string())
            .collect::<HashSet<String>>(),
        refresh_token: None,
    };

    match spotify.token.lock().await {
        Ok(mut guard) => *guard = Some(token),
        Err(_) => tracing::error!("rspotify token lock poisoned"),
    }
    tracing::debug!("rspotify client initialized");

    Arc::new(spotify)
}

#[derive(Clone)]
pub struct SpotifyLibrary {
    client: Arc<AuthCodeSpotify>,
}

impl SpotifyLibrary {
    pub fn new(client: Arc<AuthCodeSpotify>) -> Self {
        Self { client }
    }
}

impl TrackSource for SpotifyLibrary {
    async fn search_tracks(&self, query: &str, limit: u32) -> Result<Vec<Track>, LibraryError> {
        let query = query.trim();
        if query.is_empty() {
            return Ok(Vec::new());
        }

        tracing::debug!(query, limit, "API: search tracks");
        // None lets Spotify use the account's country
        let market: Option<Market> = None;
        let result = self
            .client
            .search(query, SearchType::Track, market, None, Some(limit), None)
            .await
            .map_err(|e| LibraryError::Api(e.to_string()))?;

        let tracks: Vec<Track> = match result {
            SearchResult::Tracks(page) => page.items.into_iter().filter_map(Track::from_full_track).collect(),
            _ => Vec::new(),
        };

        tracing::info!(query, count = tracks.len(), "Search finished");
        Ok(tracks)
    }

    async fn list_saved_tracks(&self, limit: u32) -> Result<Vec<Track>, LibraryError> {
        tracing::debug!(limit, "API: current_user_saved_tracks");
        let saved: Vec<_> = self
            .client
            .current_user_saved_tracks(None)
            .take(limit as usize)
            .try_collect()
            .await
            .map_err(|e| LibraryError::Api(e.to_string()))?;

        let tracks: Vec<Track> = saved
            .into_iter()
            .filter_map(|saved| Track::from_full_track(saved.track))
            .collect();

        tracing::info!(count = tracks.len(), "Liked songs loaded");
        Ok(tracks)
    }
}
