//! Track records shared by the library, playback and game layers

use rspotify::model::FullTrack;
use rspotify::prelude::Id;
use serde::{Deserialize, Serialize};

/// A playable track as the game sees it
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Track {
    pub id: String,
    pub title: String,
    pub artists: Vec<String>,
    pub uri: String,
}

impl Track {
    pub fn new(id: impl Into<String>, title: impl Into<String>, artists: Vec<String>) -> Self {
        let id = id.into();
        Self {
            uri: format!("spotify:track:{}", id),
            id,
            title: title.into(),
            artists,
        }
    }

    /// Artist names joined for display
    pub fn artist_line(&self) -> String {
        self.artists.join(", ")
    }

    /// Convert a Web API track. Tracks without an id (local files) yield `None`.
    pub fn from_full_track(track: FullTrack) -> Option<Self> {
        let id = track.id.as_ref().map(|id| id.id().to_string())?;
        let artists: Vec<String> = track.artists.into_iter().map(|a| a.name).collect();
        Some(Self::new(id, track.name, artists))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn uri_is_derived_from_id() {
        let track = Track::new("4uLU6hMCjMI75M1A2tKUQC", "Chime", vec!["Alan Walker".into()]);
        assert_eq!(track.uri, "spotify:track:4uLU6hMCjMI75M1A2tKUQC");
    }

    #[test]
    fn artist_line_joins_names() {
        let track = Track::new("x", "Song", vec!["A".into(), "B".into()]);
        assert_eq!(track.artist_line(), "A, B");
    }
}
