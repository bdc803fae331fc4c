use std::collections::BTreeSet;
use std::path::Path;

use crate::foundation::error::{ScenecutError, ScenecutResult};

#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
/// A generated video project: an ordered list of scenes laid out back to back.
///
/// This is the input shape produced by the project-generation service. Scene order is
/// significant: it alone defines each scene's time window.
pub struct Project {
    /// Total timeline duration in seconds (must be finite and > 0).
    pub duration: f64,
    /// Free-form visual style label.
    #[serde(default)]
    pub style: String,
    /// Scenes in playback order.
    pub scenes: Vec<Scene>,
}

#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "camelCase")]
/// One time-bounded unit of visual content.
pub struct Scene {
    /// Scene identifier, unique within a project.
    pub id: String,
    /// Narrative description; its first sentence becomes the caption.
    #[serde(default)]
    pub description: String,
    /// Still image source for the scene.
    #[serde(default)]
    pub image_url: String,
    /// Optional video source; preferred over the image when present.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub video_url: Option<String>,
    /// Explicit duration in seconds; absent means an equal share of the project.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub duration: Option<f64>,
}

impl Scene {
    /// Validate per-scene invariants.
    pub fn validate(&self) -> ScenecutResult<()> {
        if self.id.trim().is_empty() {
            return Err(ScenecutError::validation("scene id must be non-empty"));
        }
        if let Some(d) = self.duration
            && (!d.is_finite() || d <= 0.0)
        {
            return Err(ScenecutError::validation(format!(
                "scene '{}' duration must be finite and > 0 when set",
                self.id
            )));
        }
        Ok(())
    }
}

impl Project {
    /// Validate project invariants: positive duration and unique, valid scenes.
    pub fn validate(&self) -> ScenecutResult<()> {
        validate_duration(self.duration)?;

        let mut seen = BTreeSet::new();
        for scene in &self.scenes {
            scene.validate()?;
            if !seen.insert(scene.id.as_str()) {
                return Err(ScenecutError::validation(format!(
                    "duplicate scene id '{}'",
                    scene.id
                )));
            }
        }
        Ok(())
    }

    /// Parse and validate a project from JSON text.
    pub fn from_json_str(s: &str) -> ScenecutResult<Self> {
        let project: Project = serde_json::from_str(s)?;
        project.validate()?;
        Ok(project)
    }

    /// Read, parse and validate a project JSON file.
    pub fn from_path(path: impl AsRef<Path>) -> ScenecutResult<Self> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|e| {
            ScenecutError::Other(anyhow::Error::new(e).context(format!(
                "read project '{}'",
                path.display()
            )))
        })?;
        Self::from_json_str(&text)
    }
}

pub(crate) fn validate_duration(duration: f64) -> ScenecutResult<()> {
    if !duration.is_finite() || duration <= 0.0 {
        return Err(ScenecutError::validation(
            "project duration must be finite and > 0",
        ));
    }
    Ok(())
}

#[cfg(test)]
#[path = "../../tests/unit/project/model.rs"]
mod tests;
