//! Song Guesser: guess a Spotify track from ever-longer clips.

pub mod app;
pub mod auth;
pub mod config;
pub mod error;
pub mod game;
pub mod library;
pub mod logging;
pub mod model;
pub mod playback;
pub mod relay;
