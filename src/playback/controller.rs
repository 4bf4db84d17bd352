//! Preview playback controller.
//!
//! Owns the player handle, the trim range, and the sync loop lifecycle:
//! the loop runs exactly while playback runs, manual scrubbing pauses both,
//! and the include-audio flag drives preview muting. All state changes
//! happen on the owning context; the loop only posts updates back over the
//! event channel.

use std::sync::{Arc, Mutex};

use crossbeam::channel;

use crate::core::range::TrimRange;
use crate::core::time::Time;
use crate::playback::state::PlaybackState;
use crate::playback::sync::{PlayerControl, ScrubUpdate, SyncLoop};

pub struct TrimPreview<P: PlayerControl + 'static> {
    player: Arc<Mutex<P>>,
    range: TrimRange,
    include_audio: bool,
    state: PlaybackState,
    sync: Option<SyncLoop>,
    events_tx: channel::Sender<ScrubUpdate>,
    events_rx: channel::Receiver<ScrubUpdate>,
}

impl<P: PlayerControl + 'static> TrimPreview<P> {
    pub fn new(player: P, range: TrimRange) -> Self {
        let (events_tx, events_rx) = channel::unbounded();
        Self {
            player: Arc::new(Mutex::new(player)),
            range,
            include_audio: true,
            state: PlaybackState::Stopped,
            sync: None,
            events_tx,
            events_rx,
        }
    }

    /// Scrub updates posted by the sync loop.
    pub fn events(&self) -> &channel::Receiver<ScrubUpdate> {
        &self.events_rx
    }

    pub fn state(&self) -> PlaybackState {
        self.state
    }

    pub fn range(&self) -> TrimRange {
        self.range
    }

    /// Replace the trim range. Takes effect on the next play.
    pub fn set_range(&mut self, range: TrimRange) {
        self.range = range;
    }

    pub fn is_looping(&self) -> bool {
        self.sync.as_ref().map(SyncLoop::is_active).unwrap_or(false)
    }

    /// Toggle audio for the preview; an excluded track plays muted.
    pub fn set_include_audio(&mut self, include: bool) {
        self.include_audio = include;
        self.with_player(|p| p.set_muted(!include));
    }

    /// Start playback and the sync loop.
    pub fn play(&mut self) {
        let include_audio = self.include_audio;
        self.with_player(|p| {
            p.set_muted(!include_audio);
            p.play();
        });
        self.state = PlaybackState::Playing;
        self.start_loop();
    }

    /// Pause playback; the sync loop stops with it.
    pub fn pause(&mut self) {
        self.stop_loop();
        let position = self.with_player(|p| {
            p.pause();
            p.position()
        });
        self.state = PlaybackState::Paused { position };
    }

    /// Stop playback and rewind to the trim start.
    pub fn stop(&mut self) {
        self.stop_loop();
        let start = self.range.start();
        self.with_player(|p| {
            p.pause();
            p.seek(start);
        });
        self.state = PlaybackState::Stopped;
    }

    /// A manual scrub began: hold the loop, pause, and follow the handle.
    pub fn begin_scrub(&mut self, to: Time) {
        self.stop_loop();
        self.with_player(|p| {
            p.pause();
            p.seek(to);
        });
        self.state = PlaybackState::Scrubbing { position: to };
    }

    /// Track a scrub in progress.
    pub fn scrub_to(&mut self, to: Time) {
        if self.state.is_scrubbing() {
            self.with_player(|p| p.seek(to));
            self.state = PlaybackState::Scrubbing { position: to };
        }
    }

    /// The scrub ended: resume playback and the loop from here.
    pub fn end_scrub(&mut self) {
        if self.state.is_scrubbing() {
            self.play();
        }
    }

    fn start_loop(&mut self) {
        self.stop_loop();
        self.sync = Some(SyncLoop::start(
            Arc::clone(&self.player),
            self.range,
            self.events_tx.clone(),
        ));
    }

    fn stop_loop(&mut self) {
        if let Some(mut sync) = self.sync.take() {
            sync.stop();
        }
    }

    fn with_player<R>(&self, f: impl FnOnce(&mut P) -> R) -> R {
        let mut player = self.player.lock().unwrap_or_else(|poisoned| poisoned.into_inner());
        f(&mut player)
    }
}

impl<P: PlayerControl + 'static> Drop for TrimPreview<P> {
    fn drop(&mut self) {
        self.stop_loop();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::time::from_seconds;
    use crate::playback::sync::tests::MockPlayer;

    fn preview() -> TrimPreview<MockPlayer> {
        TrimPreview::new(
            MockPlayer::new(from_seconds(7.0), from_seconds(60.0)),
            TrimRange::new(from_seconds(5.0), from_seconds(15.0)),
        )
    }

    #[test]
    fn test_play_starts_loop_and_player() {
        let mut preview = preview();
        preview.play();

        assert!(preview.state().is_playing());
        assert!(preview.is_looping());
        assert!(preview.with_player(|p| p.playing));
    }

    #[test]
    fn test_pause_stops_loop() {
        let mut preview = preview();
        preview.play();
        preview.pause();

        assert!(preview.state().is_paused());
        assert!(!preview.is_looping());
        assert!(!preview.with_player(|p| p.playing));
    }

    #[test]
    fn test_stop_rewinds_to_trim_start() {
        let mut preview = preview();
        preview.play();
        preview.stop();

        assert!(preview.state().is_stopped());
        assert_eq!(preview.with_player(|p| p.position), from_seconds(5.0));
    }

    #[test]
    fn test_scrub_pauses_seeks_then_resumes() {
        let mut preview = preview();
        preview.play();

        preview.begin_scrub(from_seconds(9.0));
        assert!(preview.state().is_scrubbing());
        assert!(!preview.is_looping());
        assert!(!preview.with_player(|p| p.playing));
        assert_eq!(preview.with_player(|p| p.position), from_seconds(9.0));

        preview.scrub_to(from_seconds(11.0));
        assert_eq!(preview.with_player(|p| p.position), from_seconds(11.0));

        preview.end_scrub();
        assert!(preview.state().is_playing());
        assert!(preview.is_looping());
        assert!(preview.with_player(|p| p.playing));
    }

    #[test]
    fn test_end_scrub_without_scrub_is_noop() {
        let mut preview = preview();
        preview.end_scrub();
        assert!(preview.state().is_stopped());
        assert!(!preview.is_looping());
    }

    #[test]
    fn test_include_audio_drives_muting() {
        let mut preview = preview();

        preview.set_include_audio(false);
        assert!(preview.with_player(|p| p.muted));

        preview.play();
        assert!(preview.with_player(|p| p.muted));

        preview.set_include_audio(true);
        assert!(!preview.with_player(|p| p.muted));
    }

    #[test]
    fn test_loop_event_reaches_owner() {
        let mut preview = preview();
        preview.play();

        let update = preview
            .events()
            .recv_timeout(std::time::Duration::from_secs(2))
            .expect("sync loop should post updates");
        assert_eq!(update.handle, from_seconds(7.0));

        preview.pause();
    }
}
