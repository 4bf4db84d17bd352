//! Trim range selection over a source duration.
//!
//! A range is what the trim handles produce: a `[start, end)` interval inside
//! the source media. Invalid positions are corrected by clamping to the
//! nearest valid boundary, never by erroring, so handle drags can be applied
//! verbatim.

use crate::core::time::{self, Time};

/// Configurable span limits for a trim selection.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TrimBounds {
    /// Smallest allowed `end - start`
    pub min_span: Time,
    /// Largest allowed `end - start`
    pub max_span: Time,
}

impl Default for TrimBounds {
    /// 5 to 30 seconds, the stock trimmer window.
    fn default() -> Self {
        Self {
            min_span: time::from_seconds(5.0),
            max_span: time::from_seconds(30.0),
        }
    }
}

/// A `[start, end)` interval selected out of a source asset.
///
/// Maintains `0 <= start <= end`; `clamp` additionally folds in the source
/// duration and the span limits. The range is consumed once by the export
/// call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TrimRange {
    start: Time,
    end: Time,
}

impl TrimRange {
    /// Create a range, ordering the endpoints and flooring at zero.
    pub fn new(start: Time, end: Time) -> Self {
        let lo = start.min(end).max(0);
        let hi = start.max(end).max(0);
        Self { start: lo, end: hi }
    }

    pub fn start(&self) -> Time {
        self.start
    }

    pub fn end(&self) -> Time {
        self.end
    }

    pub fn duration(&self) -> Time {
        self.end - self.start
    }

    /// Move the start handle. Clamped into `[0, end]`.
    pub fn set_start(&mut self, t: Time) {
        self.start = t.clamp(0, self.end);
    }

    /// Move the end handle. Clamped to not cross the start handle.
    pub fn set_end(&mut self, t: Time) {
        self.end = t.max(self.start);
    }

    /// Check whether a position falls inside the range.
    pub fn contains(&self, t: Time) -> bool {
        t >= self.start && t < self.end
    }

    /// Fit the range to a source duration and span limits.
    ///
    /// Order matters: endpoints are pulled inside `[0, duration]` first, then
    /// the span is widened to `min_span` (pushing the end forward, or the
    /// start back when the end hits the source duration) or narrowed to
    /// `max_span` (pulling the end in). A source shorter than `min_span`
    /// yields the whole source.
    pub fn clamp(&mut self, duration: Time, bounds: &TrimBounds) {
        self.start = self.start.clamp(0, duration);
        self.end = self.end.clamp(self.start, duration);

        if self.duration() < bounds.min_span {
            self.end = (self.start + bounds.min_span).min(duration);
            if self.duration() < bounds.min_span {
                self.start = (self.end - bounds.min_span).max(0);
            }
        }

        if self.duration() > bounds.max_span {
            self.end = self.start + bounds.max_span;
        }
    }

    /// Clamped copy, for callers that keep the raw handle positions around.
    pub fn clamped(mut self, duration: Time, bounds: &TrimBounds) -> Self {
        self.clamp(duration, bounds);
        self
    }
}

impl std::fmt::Display for TrimRange {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "[{} .. {})",
            time::format_time(self.start),
            time::format_time(self.end)
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::time::from_seconds;

    fn secs(s: f64) -> Time {
        from_seconds(s)
    }

    #[test]
    fn test_new_orders_endpoints() {
        let r = TrimRange::new(secs(10.0), secs(5.0));
        assert_eq!(r.start(), secs(5.0));
        assert_eq!(r.end(), secs(10.0));
    }

    #[test]
    fn test_new_floors_at_zero() {
        let r = TrimRange::new(secs(-3.0), secs(8.0));
        assert_eq!(r.start(), 0);
        assert_eq!(r.end(), secs(8.0));
    }

    #[test]
    fn test_set_start_clamps() {
        let mut r = TrimRange::new(secs(2.0), secs(10.0));

        r.set_start(secs(-1.0));
        assert_eq!(r.start(), 0);

        // Cannot cross the end handle
        r.set_start(secs(12.0));
        assert_eq!(r.start(), secs(10.0));
    }

    #[test]
    fn test_set_end_clamps() {
        let mut r = TrimRange::new(secs(2.0), secs(10.0));

        r.set_end(secs(1.0));
        assert_eq!(r.end(), secs(2.0));

        r.set_end(secs(20.0));
        assert_eq!(r.end(), secs(20.0));
    }

    #[test]
    fn test_contains_half_open() {
        let r = TrimRange::new(secs(2.0), secs(10.0));
        assert!(r.contains(secs(2.0)));
        assert!(r.contains(secs(9.9)));
        assert!(!r.contains(secs(10.0)));
        assert!(!r.contains(secs(1.0)));
    }

    #[test]
    fn test_clamp_to_duration() {
        let mut r = TrimRange::new(secs(50.0), secs(90.0));
        r.clamp(secs(60.0), &TrimBounds::default());

        assert_eq!(r.start(), secs(50.0));
        assert_eq!(r.end(), secs(60.0));
    }

    #[test]
    fn test_clamp_widens_to_min_span() {
        let mut r = TrimRange::new(secs(10.0), secs(11.0));
        r.clamp(secs(60.0), &TrimBounds::default());

        assert_eq!(r.start(), secs(10.0));
        assert_eq!(r.end(), secs(15.0));
    }

    #[test]
    fn test_clamp_widens_backwards_at_tail() {
        // Selection near the end of the source: the start handle has to give
        let mut r = TrimRange::new(secs(58.0), secs(59.0));
        r.clamp(secs(60.0), &TrimBounds::default());

        assert_eq!(r.start(), secs(55.0));
        assert_eq!(r.end(), secs(60.0));
        assert_eq!(r.duration(), secs(5.0));
    }

    #[test]
    fn test_clamp_narrows_to_max_span() {
        let mut r = TrimRange::new(secs(0.0), secs(50.0));
        r.clamp(secs(60.0), &TrimBounds::default());

        assert_eq!(r.start(), secs(0.0));
        assert_eq!(r.end(), secs(30.0));
    }

    #[test]
    fn test_clamp_short_source_yields_whole_source() {
        let mut r = TrimRange::new(secs(0.0), secs(1.0));
        r.clamp(secs(3.0), &TrimBounds::default());

        assert_eq!(r.start(), 0);
        assert_eq!(r.end(), secs(3.0));
    }

    #[test]
    fn test_clamped_copy() {
        let r = TrimRange::new(secs(0.0), secs(50.0));
        let c = r.clamped(secs(60.0), &TrimBounds::default());

        assert_eq!(r.end(), secs(50.0)); // original untouched
        assert_eq!(c.end(), secs(30.0));
    }
}
