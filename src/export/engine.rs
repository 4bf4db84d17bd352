//! Asynchronous export jobs.
//!
//! An export runs on its own worker thread and reports back exactly once
//! over a channel: the output path on success, a single error otherwise.
//! There is no retry, no cancellation of an in-flight job, and no progress
//! reporting beyond completion. Once the render starts the job owns the
//! composition; nothing mutates it from the outside.

use std::path::{Path, PathBuf};
use std::thread;

use crossbeam::channel;
use ffmpeg_next as ffmpeg;

use crate::compose::{ComposeError, Composition};
use crate::export::output::remove_if_exists;
use crate::export::remux;
use crate::media::asset::SourceAsset;

/// Export compatibility preset.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Preset {
    /// Copy the source encoding untouched.
    Passthrough,
    /// Passthrough remux with the index relocated for progressive streaming.
    NetworkOptimized,
}

impl Preset {
    /// Whether the source can satisfy this preset.
    ///
    /// Passthrough is always accepted, whatever the asset looks like.
    /// NetworkOptimized needs a video track with a usable frame rate, since
    /// the relocated index is built from frame timing.
    pub fn supported_by(&self, asset: &SourceAsset) -> bool {
        match self {
            Preset::Passthrough => true,
            Preset::NetworkOptimized => asset
                .video_track()
                .map(|v| v.frame_rate > 0.0)
                .unwrap_or(false),
        }
    }

    pub(crate) fn faststart(&self) -> bool {
        matches!(self, Preset::NetworkOptimized)
    }
}

/// Error type for export operations
#[derive(Debug, thiserror::Error)]
pub enum ExportError {
    #[error("no compatible export preset for the input video ({0:?})")]
    UnsupportedPreset(Preset),
    #[error("composition error: {0}")]
    Compose(#[from] ComposeError),
    #[error(transparent)]
    Media(#[from] crate::media::asset::MediaError),
    #[error("render failed: {0}")]
    Render(#[from] ffmpeg::Error),
    #[error("file system error: {0}")]
    FileSystem(#[from] std::io::Error),
}

/// Completion value: the populated destination path, or a single error.
pub type ExportResult = Result<PathBuf, ExportError>;

/// Handle to an in-flight export.
///
/// The worker sends its result over a one-shot channel, so completion is
/// observed exactly once: either by blocking on [`wait`](ExportJob::wait) or
/// by polling [`try_result`](ExportJob::try_result).
pub struct ExportJob {
    rx: channel::Receiver<ExportResult>,
    handle: Option<thread::JoinHandle<()>>,
}

impl ExportJob {
    /// Start rendering a composition to `destination` on a worker thread.
    ///
    /// Any pre-existing file at the destination is deleted first. The
    /// destination's parent directory must already exist.
    pub fn start(composition: Composition, destination: PathBuf, preset: Preset) -> Self {
        Self::start_with(composition, destination, preset, move |comp, dest, preset| {
            remux::render(comp, dest, preset)
        })
    }

    /// Start a job with an injected render step. Used by `start` and by
    /// tests that exercise the job lifecycle without touching FFmpeg.
    pub(crate) fn start_with<F>(
        composition: Composition,
        destination: PathBuf,
        preset: Preset,
        render: F,
    ) -> Self
    where
        F: FnOnce(&Composition, &Path, Preset) -> Result<(), ExportError> + Send + 'static,
    {
        let (tx, rx) = channel::bounded(1);

        let handle = thread::spawn(move || {
            let result = Self::run(&composition, &destination, preset, render);
            match &result {
                Ok(path) => log::info!("export finished: {:?}", path),
                Err(err) => log::error!("export failed: {}", err),
            }
            // The caller may have dropped the handle; a dead receiver is fine
            let _ = tx.send(result);
        });

        Self {
            rx,
            handle: Some(handle),
        }
    }

    fn run<F>(
        composition: &Composition,
        destination: &Path,
        preset: Preset,
        render: F,
    ) -> ExportResult
    where
        F: FnOnce(&Composition, &Path, Preset) -> Result<(), ExportError>,
    {
        if !preset.supported_by(composition.source()) {
            return Err(ExportError::UnsupportedPreset(preset));
        }

        remove_if_exists(destination);

        match render(composition, destination, preset) {
            Ok(()) => Ok(destination.to_path_buf()),
            Err(err) => {
                // Never leave a partial output behind
                remove_if_exists(destination);
                Err(err)
            }
        }
    }

    /// Block until the export completes and take its result.
    pub fn wait(mut self) -> ExportResult {
        let result = self
            .rx
            .recv()
            .unwrap_or_else(|_| Err(ExportError::Render(ffmpeg::Error::Unknown)));
        if let Some(handle) = self.handle.take() {
            let _ = handle.join();
        }
        result
    }

    /// Take the result if the export has completed, without blocking.
    pub fn try_result(&mut self) -> Option<ExportResult> {
        match self.rx.try_recv() {
            Ok(result) => {
                if let Some(handle) = self.handle.take() {
                    let _ = handle.join();
                }
                Some(result)
            }
            Err(_) => None,
        }
    }
}

impl Drop for ExportJob {
    fn drop(&mut self) {
        // An in-flight export cannot be cancelled; let it run to completion
        // so the destination is never left half-written.
        if let Some(handle) = self.handle.take() {
            let _ = handle.join();
        }
    }
}
