//! Export engine: asynchronous passthrough rendering of a composition.

pub mod engine;
pub mod output;
mod remux;

pub use engine::{ExportError, ExportJob, ExportResult, Preset};
pub use output::OutputLocation;
