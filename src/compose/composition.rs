//! Builder for assembling trimmed slices into an output plan.

use crate::core::range::TrimRange;
use crate::core::time::{self, Time};
use crate::media::asset::{SourceAsset, TrackKind};
use crate::media::orientation::{self, Orientation, Transform};

/// Error type for composition assembly
#[derive(Debug, thiserror::Error)]
pub enum ComposeError {
    #[error("source has no {0} track")]
    MissingTrack(TrackKind),
    #[error("slice {index} {range} could not be inserted: {reason}")]
    InsertionFailure {
        index: usize,
        range: TrimRange,
        reason: String,
    },
    #[error("composition has no slices")]
    Empty,
}

/// One slice of the source placed on the output timeline.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Segment {
    /// Range within the source media
    pub source: TrimRange,
    /// Start position within the output
    pub offset: Time,
}

/// An assembled output plan: ordered segments, corrective transform, and
/// whether the audio track is carried along.
#[derive(Debug, Clone)]
pub struct Composition {
    source: SourceAsset,
    segments: Vec<Segment>,
    include_audio: bool,
    orientation: Orientation,
    video_transform: Transform,
    video_stream: usize,
    audio_stream: Option<usize>,
}

impl Composition {
    pub fn source(&self) -> &SourceAsset {
        &self.source
    }

    pub fn segments(&self) -> &[Segment] {
        &self.segments
    }

    pub fn include_audio(&self) -> bool {
        self.include_audio
    }

    pub fn orientation(&self) -> Orientation {
        self.orientation
    }

    /// Transform the output video track carries so the footage renders
    /// upright.
    pub fn video_transform(&self) -> &Transform {
        &self.video_transform
    }

    /// Total output duration: the sum of all segment durations.
    pub fn duration(&self) -> Time {
        self.segments.iter().map(|s| s.source.duration()).sum()
    }

    /// Container stream index of the source's video track.
    pub fn video_stream(&self) -> usize {
        self.video_stream
    }

    /// Container stream index of the audio track, when audio is carried.
    pub fn audio_stream(&self) -> Option<usize> {
        self.audio_stream
    }
}

/// Assembles a [`Composition`] from ordered slices of a source asset.
///
/// Slices are laid out in insertion order at an accumulated output time that
/// advances by each slice's duration whether or not audio is included;
/// skipping the advance for silent exports would misalign every slice after
/// the first.
pub struct CompositionBuilder {
    asset: SourceAsset,
    slices: Vec<TrimRange>,
    include_audio: bool,
}

impl CompositionBuilder {
    pub fn new(asset: SourceAsset) -> Self {
        Self {
            asset,
            slices: Vec::new(),
            include_audio: true,
        }
    }

    pub fn include_audio(mut self, include: bool) -> Self {
        self.include_audio = include;
        self
    }

    /// Append a slice. Order is preserved in the output.
    pub fn slice(mut self, range: TrimRange) -> Self {
        self.slices.push(range);
        self
    }

    /// Validate tracks and slices, then lay the segments out.
    ///
    /// The first invalid slice aborts the build; a partially assembled
    /// composition is never returned.
    pub fn build(self) -> Result<Composition, ComposeError> {
        let video = self
            .asset
            .video_track()
            .map_err(|_| ComposeError::MissingTrack(TrackKind::Video))?;

        if self.include_audio && !self.asset.has_audio() {
            return Err(ComposeError::MissingTrack(TrackKind::Audio));
        }

        if self.slices.is_empty() {
            return Err(ComposeError::Empty);
        }

        let (orientation, video_transform) =
            orientation::resolve(video.natural_size, &video.transform);
        let video_stream = video.stream_index;
        let audio_stream = if self.include_audio {
            self.asset.audio_track().ok().map(|a| a.stream_index)
        } else {
            None
        };

        let duration = self.asset.duration();
        let mut segments = Vec::with_capacity(self.slices.len());
        let mut accumulated: Time = time::ZERO;

        for (index, range) in self.slices.iter().enumerate() {
            if range.duration() <= 0 {
                return Err(ComposeError::InsertionFailure {
                    index,
                    range: *range,
                    reason: "slice is empty".into(),
                });
            }
            if range.end() > duration {
                return Err(ComposeError::InsertionFailure {
                    index,
                    range: *range,
                    reason: format!(
                        "slice ends past source duration {}",
                        time::format_time(duration)
                    ),
                });
            }

            segments.push(Segment {
                source: *range,
                offset: accumulated,
            });
            // Advances for every slice, audio or not
            accumulated += range.duration();
        }

        Ok(Composition {
            source: self.asset,
            segments,
            include_audio: self.include_audio,
            orientation,
            video_transform,
            video_stream,
            audio_stream,
        })
    }
}
