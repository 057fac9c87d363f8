//! Game module - the guessing game's core rules
//!
//! - `schedule`: unlockable clip durations
//! - `state`: the per-game state aggregate
//! - `controller`: segment unlocking, clip cutoffs, guesses and resets
//! - `notice`: notifications for the presentation layer

mod controller;
mod notice;
mod schedule;
mod state;

pub use controller::{titles_match, GameController, GameSignal, GuessOutcome};
pub use notice::GameNotice;
pub use schedule::{format_segment, SegmentSchedule};
pub use state::{GamePhase, GameState, NO_SEGMENT};
