//! Segment resolution: which scene is on screen at a given timeline position.
//!
//! Scenes are laid out back to back in list order. A scene without an explicit duration gets
//! an equal share of the project duration. Windows are half-open, so a boundary instant
//! belongs to the later scene, and `time == duration` resolves to no scene at all.

use crate::foundation::core::TimeRange;
use crate::project::model::Scene;

/// Effective duration of `scene` in a project of `scene_count` scenes.
pub fn effective_duration(scene: &Scene, project_duration: f64, scene_count: usize) -> f64 {
    scene
        .duration
        .unwrap_or_else(|| project_duration / scene_count.max(1) as f64)
}

/// Id of the scene active at `time`, or `None` when no window contains it.
///
/// Pure and total: callers re-run it after every change to the scene list, the duration, or
/// the time instead of patching a cached answer.
pub fn resolve_active_scene(scenes: &[Scene], project_duration: f64, time: f64) -> Option<&str> {
    Windows::new(scenes, project_duration)
        .find(|(_, window)| window.contains(time))
        .map(|(id, _)| id)
}

/// `[start, end)` window of every scene, laid out exactly as [`resolve_active_scene`] does.
pub fn scene_windows(scenes: &[Scene], project_duration: f64) -> Vec<(&str, TimeRange)> {
    Windows::new(scenes, project_duration).collect()
}

/// Back-to-back window layout.
///
/// Window edges are derived from the explicit-duration sum plus the fraction of equal-split
/// scenes seen so far, never by accumulating `duration / n`. With only equal-split scenes the
/// last window therefore ends at exactly `project_duration`.
struct Windows<'a> {
    scenes: std::slice::Iter<'a, Scene>,
    project_duration: f64,
    count: usize,
    explicit: f64,
    shares: usize,
    start: f64,
}

impl<'a> Windows<'a> {
    fn new(scenes: &'a [Scene], project_duration: f64) -> Self {
        Self {
            scenes: scenes.iter(),
            project_duration,
            count: scenes.len().max(1),
            explicit: 0.0,
            shares: 0,
            start: 0.0,
        }
    }
}

impl<'a> Iterator for Windows<'a> {
    type Item = (&'a str, TimeRange);

    fn next(&mut self) -> Option<Self::Item> {
        let scene = self.scenes.next()?;
        match scene.duration {
            Some(d) => self.explicit += d,
            None => self.shares += 1,
        }
        let split = self.project_duration * (self.shares as f64 / self.count as f64);
        let window = TimeRange {
            start: self.start,
            end: self.explicit + split,
        };
        self.start = window.end;
        Some((scene.id.as_str(), window))
    }
}

#[cfg(test)]
#[path = "../../tests/unit/timeline/resolve.rs"]
mod tests;
