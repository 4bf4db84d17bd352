//! Composition assembly.
//!
//! A composition is the transient, in-memory plan for an export: an ordered
//! list of source slices laid out back-to-back on an output timeline, plus
//! the corrective display transform for the video track. It is consumed by
//! the export engine and dropped once the render completes.

mod composition;

pub use composition::{ComposeError, Composition, CompositionBuilder, Segment};
