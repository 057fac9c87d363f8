//! Terminal front-end flows driven through key events, without a terminal

mod common;

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

use song_guesser::app::{App, Focus};
use song_guesser::game::GamePhase;

use common::{controller, pool, track, FakeLibrary, FakePlayback};

fn app(library: FakeLibrary) -> (App<FakePlayback, FakeLibrary>, FakePlayback) {
    let (game, playback, notices) = controller();
    (App::new(game, library, notices), playback)
}

fn key(code: KeyCode) -> KeyEvent {
    KeyEvent::new(code, KeyModifiers::NONE)
}

fn ctrl(c: char) -> KeyEvent {
    KeyEvent::new(KeyCode::Char(c), KeyModifiers::CONTROL)
}

async fn type_text(app: &mut App<FakePlayback, FakeLibrary>, text: &str) {
    for c in text.chars() {
        app.handle_key_event(key(KeyCode::Char(c))).await;
    }
}

async fn search_for(app: &mut App<FakePlayback, FakeLibrary>, query: &str) {
    app.handle_key_event(key(KeyCode::Tab)).await;
    assert_eq!(app.ui().focus, Focus::Search);
    type_text(app, query).await;
    app.handle_key_event(key(KeyCode::Enter)).await;
}

#[tokio::test(start_paused = true)]
async fn liked_songs_start_on_first_track() {
    let (mut app, _playback) = app(FakeLibrary::with_saved(pool()));
    app.load_liked_songs().await;

    let state = app.controller().state();
    assert_eq!(state.current_track().unwrap().id, "t1");
    assert_eq!(state.candidate_tracks(), pool().as_slice());
    assert_eq!(app.controller().phase(), GamePhase::Ready);
    assert_eq!(app.ui().source_label, "Liked Songs");
}

#[tokio::test(start_paused = true)]
async fn search_replaces_track_and_pool() {
    let results = vec![track("s1", "Windowlicker"), track("s2", "Xtal")];
    let library = FakeLibrary::with_saved(pool()).with_results("aphex", results.clone());
    let (mut app, _playback) = app(library);
    app.load_liked_songs().await;

    search_for(&mut app, "aphex").await;

    let state = app.controller().state();
    assert_eq!(state.current_track().unwrap().id, "s1");
    assert_eq!(state.candidate_tracks(), results.as_slice());
    assert_eq!(app.ui().source_label, "Search: aphex");
    assert_eq!(app.ui().focus, Focus::Guess);
}

#[tokio::test(start_paused = true)]
async fn empty_search_keeps_current_round() {
    let (mut app, _playback) = app(FakeLibrary::with_saved(pool()));
    app.load_liked_songs().await;
    app.handle_key_event(ctrl('n')).await;

    search_for(&mut app, "nothing matches").await;

    let state = app.controller().state();
    assert_eq!(state.current_track().unwrap().id, "t1");
    assert_eq!(state.candidate_tracks().len(), 3);
    assert_eq!(state.attempts(), 1);
    let banner = app.ui().banner.as_ref().unwrap();
    assert_eq!(banner.title, "No results");
    assert!(banner.is_error);
}

#[tokio::test(start_paused = true)]
async fn search_failure_shows_error() {
    let library = FakeLibrary {
        failure: Some("rate limited".to_string()),
        ..Default::default()
    };
    let (mut app, _playback) = app(library);

    search_for(&mut app, "aphex").await;

    let banner = app.ui().banner.as_ref().unwrap();
    assert_eq!(banner.title, "Search failed");
    assert!(banner.detail.contains("rate limited"));
    assert_eq!(app.controller().phase(), GamePhase::NoTrack);
}

#[tokio::test(start_paused = true)]
async fn new_song_without_pool_shows_banner() {
    let (mut app, _playback) = app(FakeLibrary::default());
    app.load_liked_songs().await;
    assert_eq!(app.ui().banner.as_ref().unwrap().title, "No liked songs");

    app.handle_key_event(ctrl('r')).await;

    let banner = app.ui().banner.as_ref().unwrap();
    assert_eq!(banner.title, "No songs to pick from");
    assert!(banner.is_error);
    assert_eq!(app.controller().phase(), GamePhase::NoTrack);
}

#[tokio::test(start_paused = true)]
async fn new_song_picks_from_pool() {
    let (mut app, playback) = app(FakeLibrary::with_saved(pool()));
    app.load_liked_songs().await;
    app.handle_key_event(ctrl('n')).await;
    app.handle_key_event(ctrl('r')).await;

    let state = app.controller().state();
    assert!(pool().contains(state.current_track().unwrap()));
    assert_eq!(state.attempts(), 0);
    assert_eq!(playback.stopped().len(), 1);
}

#[tokio::test(start_paused = true)]
async fn typed_guess_wins_and_shows_notice() {
    let (mut app, _playback) = app(FakeLibrary::with_saved(pool()));
    app.load_liked_songs().await;
    app.handle_key_event(ctrl('n')).await;

    type_text(&mut app, "chimx").await;
    app.handle_key_event(key(KeyCode::Backspace)).await;
    app.handle_key_event(key(KeyCode::Char('e'))).await;
    app.handle_key_event(key(KeyCode::Enter)).await;
    app.tick().await;

    assert_eq!(app.controller().phase(), GamePhase::Won);
    assert_eq!(app.ui().banner.as_ref().unwrap().title, "Correct!");
}
