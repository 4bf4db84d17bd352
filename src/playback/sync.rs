//! Trim-bounds synchronization loop.
//!
//! While the preview plays, a fixed-interval ticker polls the player
//! position, derives the scrub overlay update, and loops playback back to
//! the trim start once the position reaches the trim end. Each tick runs to
//! completion on the worker before the next is scheduled, so ticks never
//! overlap; updates are posted over a channel back to the owning context.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};
use std::thread;
use std::time::Duration;

use crossbeam::channel;

use crate::core::range::TrimRange;
use crate::core::time::Time;

/// Poll interval for the sync loop.
pub const TICK_INTERVAL: Duration = Duration::from_millis(100);

/// Minimal control surface of a preview player.
///
/// The real player is an external collaborator; tests drive the loop with a
/// mock.
pub trait PlayerControl: Send {
    /// Current playback position
    fn position(&self) -> Time;
    /// Duration of the loaded source
    fn duration(&self) -> Time;
    fn seek(&mut self, to: Time);
    fn play(&mut self);
    fn pause(&mut self);
    fn set_muted(&mut self, muted: bool);
}

/// What one tick observed, for the scrub overlay.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScrubUpdate {
    /// Trimmed footage exists before the range: show the back affordance
    pub show_back: bool,
    /// Trimmed footage exists after the range: show the forward affordance
    pub show_forward: bool,
    /// Position the scrub handle should indicate
    pub handle: Time,
    /// The tick wrapped playback back to the trim start
    pub looped: bool,
}

/// Run one sync tick against a player.
///
/// When the position has reached or passed the trim end, the player is
/// seeked back to the trim start; the reported handle position is then the
/// trim start, never a position past the end.
pub fn tick(player: &mut dyn PlayerControl, range: &TrimRange) -> ScrubUpdate {
    let show_back = range.start() > 0;
    let show_forward = range.end() < player.duration();

    let position = player.position();
    if position >= range.end() {
        player.seek(range.start());
        ScrubUpdate {
            show_back,
            show_forward,
            handle: range.start(),
            looped: true,
        }
    } else {
        ScrubUpdate {
            show_back,
            show_forward,
            handle: position,
            looped: false,
        }
    }
}

/// Handle to a running sync loop.
///
/// Started when playback starts and stopped when it pauses or a manual
/// scrub begins. Stopping joins the worker, so no tick runs after `stop`
/// returns.
pub struct SyncLoop {
    active: Arc<AtomicBool>,
    handle: Option<thread::JoinHandle<()>>,
}

impl SyncLoop {
    /// Start ticking `player` against `range`, posting updates on `events`.
    pub fn start<P: PlayerControl + 'static>(
        player: Arc<Mutex<P>>,
        range: TrimRange,
        events: channel::Sender<ScrubUpdate>,
    ) -> Self {
        let active = Arc::new(AtomicBool::new(true));
        let flag = Arc::clone(&active);

        let handle = thread::spawn(move || {
            while flag.load(Ordering::SeqCst) {
                let update = {
                    let Ok(mut player) = player.lock() else {
                        break;
                    };
                    tick(&mut *player, &range)
                };
                if events.send(update).is_err() {
                    // Receiver gone; the owning context went away
                    break;
                }
                thread::sleep(TICK_INTERVAL);
            }
        });

        Self {
            active,
            handle: Some(handle),
        }
    }

    pub fn is_active(&self) -> bool {
        self.active.load(Ordering::SeqCst)
    }

    /// Stop the loop and wait for the worker to exit. Idempotent.
    pub fn stop(&mut self) {
        self.active.store(false, Ordering::SeqCst);
        if let Some(handle) = self.handle.take() {
            let _ = handle.join();
        }
    }
}

impl Drop for SyncLoop {
    fn drop(&mut self) {
        self.stop();
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use crate::core::time::from_seconds;

    pub(crate) struct MockPlayer {
        pub position: Time,
        pub duration: Time,
        pub playing: bool,
        pub muted: bool,
        pub seeks: Vec<Time>,
    }

    impl MockPlayer {
        pub fn new(position: Time, duration: Time) -> Self {
            Self {
                position,
                duration,
                playing: false,
                muted: false,
                seeks: Vec::new(),
            }
        }
    }

    impl PlayerControl for MockPlayer {
        fn position(&self) -> Time {
            self.position
        }

        fn duration(&self) -> Time {
            self.duration
        }

        fn seek(&mut self, to: Time) {
            self.position = to;
            self.seeks.push(to);
        }

        fn play(&mut self) {
            self.playing = true;
        }

        fn pause(&mut self) {
            self.playing = false;
        }

        fn set_muted(&mut self, muted: bool) {
            self.muted = muted;
        }
    }

    fn range(start: f64, end: f64) -> TrimRange {
        TrimRange::new(from_seconds(start), from_seconds(end))
    }

    #[test]
    fn test_tick_inside_range() {
        let mut player = MockPlayer::new(from_seconds(7.0), from_seconds(60.0));
        let update = tick(&mut player, &range(5.0, 15.0));

        assert_eq!(update.handle, from_seconds(7.0));
        assert!(!update.looped);
        assert!(player.seeks.is_empty());
    }

    #[test]
    fn test_tick_loops_at_trim_end() {
        // Position passed the trim end: the next observed position is the
        // trim start, not end + epsilon
        let mut player = MockPlayer::new(from_seconds(15.05), from_seconds(60.0));
        let update = tick(&mut player, &range(5.0, 15.0));

        assert!(update.looped);
        assert_eq!(update.handle, from_seconds(5.0));
        assert_eq!(player.position, from_seconds(5.0));
        assert_eq!(player.seeks, vec![from_seconds(5.0)]);
    }

    #[test]
    fn test_tick_loops_exactly_at_end() {
        let mut player = MockPlayer::new(from_seconds(15.0), from_seconds(60.0));
        let update = tick(&mut player, &range(5.0, 15.0));
        assert!(update.looped);
    }

    #[test]
    fn test_affordances_interior_range() {
        let mut player = MockPlayer::new(from_seconds(7.0), from_seconds(60.0));
        let update = tick(&mut player, &range(5.0, 15.0));

        assert!(update.show_back);
        assert!(update.show_forward);
    }

    #[test]
    fn test_affordances_full_range() {
        let mut player = MockPlayer::new(from_seconds(7.0), from_seconds(60.0));
        let update = tick(&mut player, &range(0.0, 60.0));

        assert!(!update.show_back);
        assert!(!update.show_forward);
    }

    #[test]
    fn test_loop_posts_updates_and_stops() {
        let player = Arc::new(Mutex::new(MockPlayer::new(
            from_seconds(7.0),
            from_seconds(60.0),
        )));
        let (tx, rx) = channel::unbounded();

        let mut sync = SyncLoop::start(Arc::clone(&player), range(5.0, 15.0), tx);

        let update = rx
            .recv_timeout(Duration::from_secs(2))
            .expect("loop should tick");
        assert_eq!(update.handle, from_seconds(7.0));
        assert!(sync.is_active());

        sync.stop();
        assert!(!sync.is_active());

        // No tick runs after stop returns
        while rx.try_recv().is_ok() {}
        thread::sleep(TICK_INTERVAL * 2);
        assert!(rx.try_recv().is_err());
    }

    #[test]
    fn test_stop_is_idempotent() {
        let player = Arc::new(Mutex::new(MockPlayer::new(0, from_seconds(60.0))));
        let (tx, _rx) = channel::unbounded();

        let mut sync = SyncLoop::start(player, range(0.0, 15.0), tx);
        sync.stop();
        sync.stop();
    }
}
