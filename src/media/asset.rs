//! Source asset probing via FFmpeg.
//!
//! A `SourceAsset` is an immutable description of a local media file: its
//! duration and what the container says about its video and audio tracks.
//! All FFmpeg calls are isolated in this module; the rest of the crate only
//! sees the probed metadata.

use std::path::{Path, PathBuf};

use ffmpeg_next as ffmpeg;

use crate::core::time::{self, Time};
use crate::media::orientation::Transform;

/// Which track an operation needed but could not find.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TrackKind {
    Video,
    Audio,
}

impl std::fmt::Display for TrackKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TrackKind::Video => write!(f, "video"),
            TrackKind::Audio => write!(f, "audio"),
        }
    }
}

/// Error type for probing operations
#[derive(Debug, thiserror::Error)]
pub enum MediaError {
    #[error("file not found: {0}")]
    FileNotFound(PathBuf),
    #[error("failed to open {path}: {source}")]
    Open {
        path: PathBuf,
        source: ffmpeg::Error,
    },
    #[error("source has no {0} track")]
    MissingTrack(TrackKind),
    #[error("probe failed: {0}")]
    Probe(#[from] ffmpeg::Error),
}

/// Probed video track metadata.
#[derive(Debug, Clone)]
pub struct VideoTrackInfo {
    pub stream_index: usize,
    /// Coded pixel dimensions before any display transform
    pub natural_size: (f64, f64),
    /// Display transform from the container, identity when absent
    pub transform: Transform,
    pub frame_rate: f64,
}

/// Probed audio track metadata.
#[derive(Debug, Clone)]
pub struct AudioTrackInfo {
    pub stream_index: usize,
    pub sample_rate: u32,
    pub channels: u16,
}

/// An immutable, probed reference to a local source video file.
///
/// Owns no media data; the file itself stays external. Zero or one video
/// track and zero or one audio track are recognized (the best stream of each
/// medium, matching how a single-source trimmer consumes a file).
#[derive(Debug, Clone)]
pub struct SourceAsset {
    path: PathBuf,
    duration: Time,
    video: Option<VideoTrackInfo>,
    audio: Option<AudioTrackInfo>,
}

impl SourceAsset {
    /// Probe a local file.
    pub fn probe<P: AsRef<Path>>(path: P) -> Result<Self, MediaError> {
        let path = path.as_ref();
        if !path.exists() {
            return Err(MediaError::FileNotFound(path.to_path_buf()));
        }

        ffmpeg::init()?;

        let ictx = ffmpeg::format::input(&path).map_err(|source| MediaError::Open {
            path: path.to_path_buf(),
            source,
        })?;

        // Container duration is reported in AV_TIME_BASE (microsecond) units
        let duration = time::from_micros(ictx.duration().max(0));

        let video = match ictx.streams().best(ffmpeg::media::Type::Video) {
            Some(stream) => Some(Self::probe_video_track(&stream)?),
            None => None,
        };
        let audio = match ictx.streams().best(ffmpeg::media::Type::Audio) {
            Some(stream) => Some(Self::probe_audio_track(&stream)?),
            None => None,
        };

        log::debug!(
            "probed {:?}: duration={} video={} audio={}",
            path,
            time::format_time(duration),
            video.is_some(),
            audio.is_some(),
        );

        Ok(Self {
            path: path.to_path_buf(),
            duration,
            video,
            audio,
        })
    }

    fn probe_video_track(stream: &ffmpeg::format::stream::Stream) -> Result<VideoTrackInfo, MediaError> {
        let context = ffmpeg::codec::context::Context::from_parameters(stream.parameters())?;
        let decoder = context.decoder().video()?;
        let natural_size = (decoder.width() as f64, decoder.height() as f64);

        // Containers carry recording orientation as a rotation tag; the
        // full affine transform is reconstructed from it
        let rotation = stream
            .metadata()
            .get("rotate")
            .and_then(|v| v.parse::<f64>().ok())
            .unwrap_or(0.0);
        let transform = Transform::for_rotation(rotation, natural_size);

        Ok(VideoTrackInfo {
            stream_index: stream.index(),
            natural_size,
            transform,
            frame_rate: f64::from(stream.avg_frame_rate()),
        })
    }

    fn probe_audio_track(stream: &ffmpeg::format::stream::Stream) -> Result<AudioTrackInfo, MediaError> {
        let context = ffmpeg::codec::context::Context::from_parameters(stream.parameters())?;
        let decoder = context.decoder().audio()?;

        Ok(AudioTrackInfo {
            stream_index: stream.index(),
            sample_rate: decoder.rate(),
            channels: decoder.channels(),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn duration(&self) -> Time {
        self.duration
    }

    /// The video track, or `MissingTrack` when the source has none.
    pub fn video_track(&self) -> Result<&VideoTrackInfo, MediaError> {
        self.video
            .as_ref()
            .ok_or(MediaError::MissingTrack(TrackKind::Video))
    }

    /// The audio track, or `MissingTrack` when the source has none.
    pub fn audio_track(&self) -> Result<&AudioTrackInfo, MediaError> {
        self.audio
            .as_ref()
            .ok_or(MediaError::MissingTrack(TrackKind::Audio))
    }

    pub fn has_audio(&self) -> bool {
        self.audio.is_some()
    }

    /// Test constructor building an asset without touching FFmpeg.
    #[cfg(test)]
    pub(crate) fn synthetic(
        duration: Time,
        video: Option<VideoTrackInfo>,
        audio: Option<AudioTrackInfo>,
    ) -> Self {
        Self {
            path: PathBuf::from("synthetic.mp4"),
            duration,
            video,
            audio,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_probe_missing_file() {
        let err = SourceAsset::probe("/no/such/file.mp4").unwrap_err();
        assert!(matches!(err, MediaError::FileNotFound(_)));
    }

    #[test]
    fn test_track_accessors() {
        let asset = SourceAsset::synthetic(
            crate::core::time::from_seconds(20.0),
            Some(VideoTrackInfo {
                stream_index: 0,
                natural_size: (1920.0, 1080.0),
                transform: Transform::IDENTITY,
                frame_rate: 30.0,
            }),
            None,
        );

        assert!(asset.video_track().is_ok());
        assert!(!asset.has_audio());

        let err = asset.audio_track().unwrap_err();
        assert!(matches!(err, MediaError::MissingTrack(TrackKind::Audio)));
        assert_eq!(err.to_string(), "source has no audio track");
    }
}
