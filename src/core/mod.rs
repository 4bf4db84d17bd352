//! Core types for the trim pipeline.
//!
//! Time representation and the user-selected trim range. All time values
//! are nanoseconds (i64).

pub mod range;
pub mod time;

pub use range::{TrimBounds, TrimRange};
pub use time::{Time, ZERO};
