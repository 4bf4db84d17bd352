//! Preview playback: state machine, trim-bounds sync loop, and controller.

pub mod controller;
pub mod state;
pub mod sync;

pub use controller::TrimPreview;
pub use state::PlaybackState;
pub use sync::{PlayerControl, ScrubUpdate, SyncLoop, TICK_INTERVAL};
