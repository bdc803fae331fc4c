use std::collections::BTreeMap;

use crate::foundation::core::TimeRange;
use crate::foundation::error::{ScenecutError, ScenecutResult};
use crate::project::model::{Project, Scene, validate_duration};
use crate::project::properties::{CompositeProperties, PropertyKey, PropertyValue};
use crate::timeline::resolve::{resolve_active_scene, scene_windows};

/// Ordered scene list plus a property arena keyed by scene id.
///
/// Properties live beside the scenes rather than inside them, so removing or replacing a scene
/// can never orphan or duplicate its property record.
#[derive(Clone, Debug)]
pub struct SceneStore {
    duration: f64,
    style: String,
    scenes: Vec<Scene>,
    properties: BTreeMap<String, CompositeProperties>,
}

/// Borrowed view of the timeline layout consumed by the resolver and the clock.
#[derive(Clone, Copy, Debug)]
pub struct TimelineView<'a> {
    /// Scenes in playback order.
    pub scenes: &'a [Scene],
    /// Project duration in seconds.
    pub duration: f64,
}

impl<'a> TimelineView<'a> {
    /// Scene active at `time`, if any.
    pub fn resolve(self, time: f64) -> Option<&'a str> {
        resolve_active_scene(self.scenes, self.duration, time)
    }

    /// `[start, end)` window of every scene, in list order.
    pub fn windows(self) -> Vec<(&'a str, TimeRange)> {
        scene_windows(self.scenes, self.duration)
    }

    /// Return `true` when a scene with `id` exists.
    pub fn contains(self, id: &str) -> bool {
        self.scenes.iter().any(|s| s.id == id)
    }
}

/// Partial update applied by [`SceneStore::update_scene`]. `None` fields are left unchanged.
#[derive(Clone, Debug, Default)]
pub struct ScenePatch {
    /// New description.
    pub description: Option<String>,
    /// New image source.
    pub image_url: Option<String>,
    /// New video source (`Some(None)` clears it).
    pub video_url: Option<Option<String>>,
    /// New explicit duration (`Some(None)` reverts to the equal split).
    pub duration: Option<Option<f64>>,
}

impl SceneStore {
    /// Build a store from a validated project.
    pub fn new(project: Project) -> ScenecutResult<Self> {
        project.validate()?;
        Ok(Self {
            duration: project.duration,
            style: project.style,
            scenes: project.scenes,
            properties: BTreeMap::new(),
        })
    }

    /// Snapshot of the current project data.
    pub fn project(&self) -> Project {
        Project {
            duration: self.duration,
            style: self.style.clone(),
            scenes: self.scenes.clone(),
        }
    }

    /// Project duration in seconds.
    pub fn duration(&self) -> f64 {
        self.duration
    }

    /// Project style label.
    pub fn style(&self) -> &str {
        &self.style
    }

    /// Scenes in playback order.
    pub fn scenes(&self) -> &[Scene] {
        &self.scenes
    }

    /// Look up a scene by id.
    pub fn scene(&self, id: &str) -> Option<&Scene> {
        self.scenes.iter().find(|s| s.id == id)
    }

    /// Layout view for resolution.
    pub fn timeline(&self) -> TimelineView<'_> {
        TimelineView {
            scenes: &self.scenes,
            duration: self.duration,
        }
    }

    /// Append a scene. Ids must be unique.
    pub fn add_scene(&mut self, scene: Scene) -> ScenecutResult<()> {
        scene.validate()?;
        if self.scene(&scene.id).is_some() {
            return Err(ScenecutError::validation(format!(
                "duplicate scene id '{}'",
                scene.id
            )));
        }
        tracing::debug!(scene = %scene.id, "scene added");
        self.scenes.push(scene);
        Ok(())
    }

    /// Remove a scene and its properties. Unknown ids are a no-op returning `false`.
    pub fn remove_scene(&mut self, id: &str) -> bool {
        let Some(idx) = self.index_of(id) else {
            return false;
        };
        self.scenes.remove(idx);
        self.properties.remove(id);
        tracing::debug!(scene = id, "scene removed");
        true
    }

    /// Apply a partial update to a scene. Unknown ids are a no-op returning `Ok(false)`.
    pub fn update_scene(&mut self, id: &str, patch: ScenePatch) -> ScenecutResult<bool> {
        let Some(idx) = self.index_of(id) else {
            return Ok(false);
        };
        let mut next = self.scenes[idx].clone();
        if let Some(description) = patch.description {
            next.description = description;
        }
        if let Some(image_url) = patch.image_url {
            next.image_url = image_url;
        }
        if let Some(video_url) = patch.video_url {
            next.video_url = video_url;
        }
        if let Some(duration) = patch.duration {
            next.duration = duration;
        }
        next.validate()?;
        self.scenes[idx] = next;
        Ok(true)
    }

    /// Move a scene to `index` (clamped to the list end). Returns `false` for unknown ids.
    pub fn move_scene(&mut self, id: &str, index: usize) -> bool {
        let Some(from) = self.index_of(id) else {
            return false;
        };
        let scene = self.scenes.remove(from);
        let to = index.min(self.scenes.len());
        self.scenes.insert(to, scene);
        true
    }

    /// Change the project duration.
    pub fn set_duration(&mut self, duration: f64) -> ScenecutResult<()> {
        validate_duration(duration)?;
        self.duration = duration;
        Ok(())
    }

    /// Stored properties of a scene, or the canonical defaults when none were written.
    pub fn get_properties(&self, scene_id: &str) -> CompositeProperties {
        self.properties
            .get(scene_id)
            .cloned()
            .unwrap_or_default()
    }

    /// Write one property of one scene, clamped to the field's range.
    ///
    /// Unknown scene ids and unusable values are no-ops returning `false`; other scenes are
    /// never touched.
    pub fn set_property(
        &mut self,
        scene_id: &str,
        key: PropertyKey,
        value: impl Into<PropertyValue>,
    ) -> bool {
        if self.scene(scene_id).is_none() {
            tracing::debug!(scene = scene_id, %key, "set_property on unknown scene ignored");
            return false;
        }
        let value = value.into();
        let props = self.properties.entry(scene_id.to_owned()).or_default();
        let applied = props.apply(key, &value);
        if !applied {
            tracing::debug!(scene = scene_id, %key, ?value, "set_property value not applicable");
        }
        applied
    }

    /// Drop a scene's property record so it reads as defaults again.
    pub fn reset_properties(&mut self, scene_id: &str) -> bool {
        self.properties.remove(scene_id).is_some()
    }

    fn index_of(&self, id: &str) -> Option<usize> {
        self.scenes.iter().position(|s| s.id == id)
    }
}

#[cfg(test)]
#[path = "../../tests/unit/project/store.rs"]
mod tests;
