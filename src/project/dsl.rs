use crate::foundation::error::{ScenecutError, ScenecutResult};
use crate::project::model::{Project, Scene};

/// Builder for [`Project`](crate::Project).
pub struct ProjectBuilder {
    duration: f64,
    style: String,
    scenes: Vec<Scene>,
}

impl ProjectBuilder {
    /// Create a builder for a project lasting `duration` seconds.
    pub fn new(duration: f64) -> Self {
        Self {
            duration,
            style: String::new(),
            scenes: Vec::new(),
        }
    }

    /// Set the style label.
    pub fn style(mut self, style: impl Into<String>) -> Self {
        self.style = style.into();
        self
    }

    /// Append a scene under a unique id.
    pub fn scene(mut self, scene: Scene) -> ScenecutResult<Self> {
        if self.scenes.iter().any(|s| s.id == scene.id) {
            return Err(ScenecutError::validation(format!(
                "duplicate scene id '{}'",
                scene.id
            )));
        }
        self.scenes.push(scene);
        Ok(self)
    }

    /// Build and validate the final [`Project`](crate::Project).
    pub fn build(self) -> ScenecutResult<Project> {
        let project = Project {
            duration: self.duration,
            style: self.style,
            scenes: self.scenes,
        };
        project.validate()?;
        Ok(project)
    }
}

/// Create an image-backed scene with an equal-split duration and no description.
pub fn scene(id: impl Into<String>, image_url: impl Into<String>) -> Scene {
    Scene {
        id: id.into(),
        description: String::new(),
        image_url: image_url.into(),
        video_url: None,
        duration: None,
    }
}

impl Scene {
    /// Set the description.
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    /// Set a video source.
    pub fn with_video(mut self, video_url: impl Into<String>) -> Self {
        self.video_url = Some(video_url.into());
        self
    }

    /// Set an explicit duration in seconds.
    pub fn with_duration(mut self, duration: f64) -> Self {
        self.duration = Some(duration);
        self
    }
}

#[cfg(test)]
#[path = "../../tests/unit/project/dsl.rs"]
mod tests;
