//! Playback state machine for the trim preview.

use crate::core::time::Time;

/// Preview playback state
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlaybackState {
    /// No playback active
    Stopped,
    /// Actively playing; the sync loop is running
    Playing,
    /// Paused at a position
    Paused { position: Time },
    /// A manual scrub is in progress; playback and the sync loop are held
    Scrubbing { position: Time },
}

impl PlaybackState {
    pub fn is_playing(&self) -> bool {
        matches!(self, PlaybackState::Playing)
    }

    pub fn is_paused(&self) -> bool {
        matches!(self, PlaybackState::Paused { .. })
    }

    pub fn is_stopped(&self) -> bool {
        matches!(self, PlaybackState::Stopped)
    }

    pub fn is_scrubbing(&self) -> bool {
        matches!(self, PlaybackState::Scrubbing { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_state_predicates() {
        assert!(PlaybackState::Stopped.is_stopped());
        assert!(PlaybackState::Playing.is_playing());
        assert!(PlaybackState::Paused { position: 0 }.is_paused());
        assert!(PlaybackState::Scrubbing { position: 0 }.is_scrubbing());
        assert!(!PlaybackState::Playing.is_paused());
    }
}
