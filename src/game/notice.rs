//! Notifications the controller raises for the presentation layer

use std::time::Duration;

use super::schedule::format_segment;

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum GameNotice {
    Unlocked { segment: Duration, attempt: u32 },
    Won { attempts: u32, title: String },
    Retry,
    PlaybackFailed { reason: String },
    DeviceReady { device: String },
}

impl GameNotice {
    /// Headline and detail text for display
    pub fn message(&self) -> (String, String) {
        match self {
            GameNotice::Unlocked { segment, attempt } => (
                format!("Unlocked {}!", format_segment(*segment)),
                format!("Attempt #{}", attempt),
            ),
            GameNotice::Won { attempts, title } => (
                "Correct!".to_string(),
                format!("\"{}\" guessed in {} attempts!", title, attempts),
            ),
            GameNotice::Retry => (
                "Not quite right".to_string(),
                "Try listening to more of the song!".to_string(),
            ),
            GameNotice::PlaybackFailed { reason } => ("Playback failed".to_string(), reason.clone()),
            GameNotice::DeviceReady { device } => ("Device ready".to_string(), device.clone()),
        }
    }

    pub fn is_error(&self) -> bool {
        matches!(self, GameNotice::Retry | GameNotice::PlaybackFailed { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unlocked_message_names_segment_and_attempt() {
        let notice = GameNotice::Unlocked {
            segment: Duration::from_millis(500),
            attempt: 2,
        };
        assert_eq!(
            notice.message(),
            ("Unlocked 0.5s!".to_string(), "Attempt #2".to_string())
        );
        assert!(!notice.is_error());
    }

    #[test]
    fn retry_is_an_error_notice() {
        assert!(GameNotice::Retry.is_error());
    }
}
