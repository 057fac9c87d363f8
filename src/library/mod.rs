//! Track sources: where the target track and the candidate pool come from

mod spotify;

use std::future::Future;

use crate::error::LibraryError;
use crate::model::Track;

pub use spotify::{spotify_client, SpotifyLibrary};

pub const SEARCH_LIMIT: u32 = 10;
pub const LIKED_SONGS_LIMIT: u32 = 50;

pub trait TrackSource {
    /// Tracks matching `query`. A blank query yields no tracks.
    fn search_tracks(&self, query: &str, limit: u32) -> impl Future<Output = Result<Vec<Track>, LibraryError>> + Send;

    /// The user's saved ("liked") tracks, most recent first
    fn list_saved_tracks(&self, limit: u32) -> impl Future<Output = Result<Vec<Track>, LibraryError>> + Send;
}
