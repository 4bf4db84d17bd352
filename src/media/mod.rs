pub mod asset;
pub mod orientation;

pub use asset::{AudioTrackInfo, MediaError, SourceAsset, TrackKind, VideoTrackInfo};
pub use orientation::{Orientation, Transform};
