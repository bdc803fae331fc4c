use crate::compositor::frame::{CompositeFrame, composite};
use crate::foundation::core::{Rect, Size, TimeRange};
use crate::project::model::Scene;
use crate::project::properties::CompositeProperties;
use crate::project::store::SceneStore;

#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "camelCase")]
/// Everything the external renderer needs to encode the project.
pub struct ExportManifest {
    /// Project duration in seconds.
    pub duration: f64,
    /// Project style label.
    pub style: String,
    /// Frame box the clip rectangles were computed for.
    pub frame_size: Size,
    /// Scenes in playback order.
    pub scenes: Vec<ExportScene>,
}

#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "camelCase")]
/// One scene with its layout and resolved appearance.
pub struct ExportScene {
    /// Scene data as authored.
    pub scene: Scene,
    /// Timeline window `[start, end)`.
    pub window: TimeRange,
    /// Sanitized properties.
    pub properties: CompositeProperties,
    /// Composite description with the blend mode resolved.
    pub frame: CompositeFrame,
    /// Visible rectangle after cropping, in frame coordinates.
    pub clip_rect: Rect,
}

/// Build the export manifest for the store's current state.
pub fn build_manifest(store: &SceneStore, frame_size: Size) -> ExportManifest {
    let scenes = store
        .timeline()
        .windows()
        .into_iter()
        .zip(store.scenes())
        .map(|((_, window), scene)| {
            let properties = store.get_properties(&scene.id).sanitized();
            let frame = composite(scene, &properties);
            ExportScene {
                scene: scene.clone(),
                window,
                clip_rect: frame.crop().clip_rect(frame_size),
                properties,
                frame,
            }
        })
        .collect();

    ExportManifest {
        duration: store.duration(),
        style: store.style().to_owned(),
        frame_size,
        scenes,
    }
}

#[cfg(test)]
#[path = "../../tests/unit/export/manifest.rs"]
mod tests;
