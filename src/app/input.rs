//! Key event handling

use crossterm::event::{KeyCode, KeyEvent, KeyEventKind, KeyModifiers};

use crate::library::TrackSource;
use crate::playback::PlaybackAdapter;

use super::{App, Focus};

impl<P: PlaybackAdapter, S: TrackSource> App<P, S> {
    pub async fn handle_key_event(&mut self, key: KeyEvent) {
        // Only handle key press events, not release or repeat
        if key.kind != KeyEventKind::Press {
            return;
        }

        if key.modifiers.contains(KeyModifiers::CONTROL) {
            match key.code {
                KeyCode::Char('c') | KeyCode::Char('q') => self.ui.should_quit = true,
                KeyCode::Char('n') => self.unlock_next_segment().await,
                KeyCode::Char('p') => self.replay().await,
                KeyCode::Char('r') => self.new_song().await,
                KeyCode::Char('l') => self.load_liked_songs().await,
                _ => {}
            }
            return;
        }

        match key.code {
            KeyCode::Esc => {
                if self.ui.banner.is_some() {
                    self.ui.banner = None;
                } else {
                    self.ui.should_quit = true;
                }
            }
            KeyCode::Tab | KeyCode::BackTab => {
                self.ui.focus = match self.ui.focus {
                    Focus::Guess => Focus::Search,
                    Focus::Search => Focus::Guess,
                };
            }
            KeyCode::Enter => match self.ui.focus {
                Focus::Guess => self.submit_guess(),
                Focus::Search => self.search().await,
            },
            KeyCode::Backspace => match self.ui.focus {
                Focus::Guess => {
                    let mut guess = self.controller.state().guess_text().to_string();
                    guess.pop();
                    self.controller.set_guess_text(guess);
                }
                Focus::Search => {
                    self.ui.search_query.pop();
                }
            },
            KeyCode::Char(c) => match self.ui.focus {
                Focus::Guess => {
                    let mut guess = self.controller.state().guess_text().to_string();
                    guess.push(c);
                    self.controller.set_guess_text(guess);
                }
                Focus::Search => self.ui.search_query.push(c),
            },
            _ => {}
        }
    }
}
