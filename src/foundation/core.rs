pub use kurbo::{Affine, Rect, Size, Vec2};

/// Half-open time window `[start, end)` in timeline seconds.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct TimeRange {
    /// Inclusive window start.
    pub start: f64,
    /// Exclusive window end.
    pub end: f64,
}

impl TimeRange {
    /// Create a window starting at `start` lasting `len` seconds.
    pub fn from_start_len(start: f64, len: f64) -> Self {
        Self {
            start,
            end: start + len,
        }
    }

    /// Window length in seconds.
    pub fn len_secs(self) -> f64 {
        (self.end - self.start).max(0.0)
    }

    /// Return `true` when the window has no extent.
    pub fn is_empty(self) -> bool {
        self.end <= self.start
    }

    /// Return `true` when `t` is inside `[start, end)`.
    pub fn contains(self, t: f64) -> bool {
        self.start <= t && t < self.end
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/core.rs"]
mod tests;
