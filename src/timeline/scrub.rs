/// Target of a seek command: an absolute time or a normalized pointer position.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum SeekTarget {
    /// Absolute timeline time in seconds.
    Time(f64),
    /// Pointer position within the timeline widget, `0..=1`.
    Ratio(f64),
}

impl SeekTarget {
    /// Absolute time this target designates in a project of `duration` seconds (unclamped for
    /// [`SeekTarget::Time`]; the clock clamps on seek).
    pub fn to_time(self, duration: f64) -> f64 {
        match self {
            SeekTarget::Time(t) => t,
            SeekTarget::Ratio(r) => map_pointer_to_time(r, duration),
        }
    }
}

/// Map a normalized pointer position to an absolute time.
///
/// The ratio is re-clamped to `[0, 1]` (NaN maps to 0) so an out-of-bounds pointer never
/// produces a negative or over-range time.
pub fn map_pointer_to_time(pointer_ratio: f64, project_duration: f64) -> f64 {
    let ratio = if pointer_ratio.is_nan() {
        0.0
    } else {
        pointer_ratio.clamp(0.0, 1.0)
    };
    ratio * project_duration
}

/// Inverse of [`map_pointer_to_time`], used to place the playhead.
pub fn map_time_to_pointer(time: f64, project_duration: f64) -> f64 {
    if project_duration.is_nan() || project_duration <= 0.0 || time.is_nan() {
        return 0.0;
    }
    (time / project_duration).clamp(0.0, 1.0)
}

#[cfg(test)]
#[path = "../../tests/unit/timeline/scrub.rs"]
mod tests;
