//! Game state aggregate and the phase derived from it

use crate::model::Track;

/// Index value meaning no segment has been unlocked yet
pub const NO_SEGMENT: i32 = -1;

/// Mutable state of a single game. Only the controller writes it.
#[derive(Clone, Debug, PartialEq)]
pub struct GameState {
    pub(crate) current_track: Option<Track>,
    pub(crate) candidate_tracks: Vec<Track>,
    pub(crate) unlocked_segment_index: i32,
    pub(crate) attempts: u32,
    pub(crate) is_playing: bool,
    pub(crate) is_won: bool,
    pub(crate) guess_text: String,
}

impl Default for GameState {
    fn default() -> Self {
        Self {
            current_track: None,
            candidate_tracks: Vec::new(),
            unlocked_segment_index: NO_SEGMENT,
            attempts: 0,
            is_playing: false,
            is_won: false,
            guess_text: String::new(),
        }
    }
}

impl GameState {
    pub fn current_track(&self) -> Option<&Track> {
        self.current_track.as_ref()
    }

    pub fn candidate_tracks(&self) -> &[Track] {
        &self.candidate_tracks
    }

    pub fn unlocked_segment_index(&self) -> i32 {
        self.unlocked_segment_index
    }

    /// Index of the highest unlocked segment, if any
    pub fn unlocked_segment(&self) -> Option<usize> {
        usize::try_from(self.unlocked_segment_index).ok()
    }

    pub fn attempts(&self) -> u32 {
        self.attempts
    }

    pub fn is_playing(&self) -> bool {
        self.is_playing
    }

    pub fn is_won(&self) -> bool {
        self.is_won
    }

    pub fn guess_text(&self) -> &str {
        &self.guess_text
    }

    pub fn phase(&self) -> GamePhase {
        if self.current_track.is_none() {
            GamePhase::NoTrack
        } else if self.is_won {
            GamePhase::Won
        } else if self.unlocked_segment_index == NO_SEGMENT {
            GamePhase::Ready
        } else {
            GamePhase::Unlocking
        }
    }

    /// Start a fresh round on `track`, keeping the candidate pool
    pub(crate) fn restart(&mut self, track: Option<Track>) {
        self.current_track = track;
        self.unlocked_segment_index = NO_SEGMENT;
        self.attempts = 0;
        self.is_playing = false;
        self.is_won = false;
        self.guess_text.clear();
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum GamePhase {
    NoTrack,
    Ready,
    Unlocking,
    Won,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fresh_state_has_no_track() {
        let state = GameState::default();
        assert_eq!(state.phase(), GamePhase::NoTrack);
        assert_eq!(state.unlocked_segment(), None);
    }

    #[test]
    fn phase_follows_progress() {
        let mut state = GameState::default();
        state.restart(Some(Track::new("1", "Chime", vec![])));
        assert_eq!(state.phase(), GamePhase::Ready);

        state.unlocked_segment_index = 0;
        assert_eq!(state.phase(), GamePhase::Unlocking);
        assert_eq!(state.unlocked_segment(), Some(0));

        state.is_won = true;
        assert_eq!(state.phase(), GamePhase::Won);
    }

    #[test]
    fn restart_keeps_candidates() {
        let mut state = GameState::default();
        state.candidate_tracks = vec![Track::new("1", "A", vec![])];
        state.attempts = 4;
        state.guess_text = "abc".into();
        state.restart(None);
        assert_eq!(state.candidate_tracks.len(), 1);
        assert_eq!(state.attempts, 0);
        assert!(state.guess_text.is_empty());
    }
}
