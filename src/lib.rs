//! cliptrim: trim a local video to a sub-range and export it.
//!
//! The pipeline runs in dependency order: a [`TrimRange`](core::TrimRange)
//! selected against the source duration, orientation resolution from the
//! probed video track, composition assembly, and an asynchronous passthrough
//! export that hands back the output path exactly once. A separate playback
//! module keeps a preview's scrub overlay and loop-within-trim behavior in
//! step while the user adjusts the range.

pub mod compose;
pub mod core;
pub mod export;
pub mod media;
pub mod playback;

use std::path::Path;

use crate::compose::CompositionBuilder;
use crate::core::range::{TrimBounds, TrimRange};
use crate::export::engine::{ExportError, ExportJob, Preset};
use crate::export::output::OutputLocation;
use crate::media::asset::SourceAsset;

/// Everything a single trim needs.
#[derive(Debug, Clone)]
pub struct TrimRequest {
    pub range: TrimRange,
    pub bounds: TrimBounds,
    pub include_audio: bool,
    pub preset: Preset,
    pub output: OutputLocation,
}

/// Probe, compose, and start an asynchronous trim export.
///
/// The selected range is clamped against the probed duration and the span
/// bounds before composition, so handle positions can be passed in raw.
/// Returns the in-flight job; completion is observed via
/// [`ExportJob::wait`] or [`ExportJob::try_result`].
pub fn trim<P: AsRef<Path>>(input: P, request: TrimRequest) -> Result<ExportJob, ExportError> {
    let asset = SourceAsset::probe(input)?;

    let range = request.range.clamped(asset.duration(), &request.bounds);
    log::info!("trimming {} from {}", asset.path().display(), range);

    let composition = CompositionBuilder::new(asset)
        .include_audio(request.include_audio)
        .slice(range)
        .build()?;

    let destination = request.output.prepare()?;
    Ok(ExportJob::start(composition, destination, request.preset))
}
