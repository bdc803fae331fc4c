use crate::compositor::fingerprint::fingerprint_frame;
use crate::foundation::core::{Affine, Rect, Size, Vec2};
use crate::project::model::Scene;
use crate::project::properties::{BlendMode, CompositeProperties};

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "camelCase")]
/// Load state of a scene's source surface, reported by the external asset loader.
pub enum SourceStatus {
    /// The surface can be drawn.
    #[default]
    Ready,
    /// Still loading; the frame is emitted without a source layer.
    Pending,
}

#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(tag = "kind", content = "url", rename_all = "camelCase")]
/// Opaque external surface drawn as the scene's layer.
pub enum SourceRef {
    /// Still image URL.
    Image(String),
    /// Current frame of a video URL.
    Video(String),
}

#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "camelCase")]
/// Scale, then rotate, then translate.
pub struct GeometricTransform {
    /// Uniform scale factor (`scale / 100`).
    pub scale: f64,
    /// Rotation in degrees, clockwise in y-down frame space.
    pub rotation_deg: f64,
    /// Translation in frame units.
    pub translate: Vec2,
}

impl GeometricTransform {
    /// Compose into one affine matrix. `kurbo` applies the right-most factor first, so the
    /// product reads translate * rotate * scale.
    pub fn to_affine(self) -> Affine {
        Affine::translate(self.translate)
            * Affine::rotate(self.rotation_deg.to_radians())
            * Affine::scale(self.scale)
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "camelCase")]
/// Edge insets as percentages of the frame's own box.
pub struct CropInset {
    /// Top inset percentage.
    pub top: f64,
    /// Right inset percentage.
    pub right: f64,
    /// Bottom inset percentage.
    pub bottom: f64,
    /// Left inset percentage.
    pub left: f64,
}

impl CropInset {
    /// Return `true` when nothing is clipped.
    pub fn is_none(self) -> bool {
        self.top == 0.0 && self.right == 0.0 && self.bottom == 0.0 && self.left == 0.0
    }

    /// Visible rectangle of a frame of `size` after clipping. Opposing insets that sum past
    /// 100% collapse to an empty rectangle at the near edge.
    pub fn clip_rect(self, size: Size) -> Rect {
        let x0 = size.width * self.left / 100.0;
        let y0 = size.height * self.top / 100.0;
        let x1 = (size.width * (1.0 - self.right / 100.0)).max(x0);
        let y1 = (size.height * (1.0 - self.bottom / 100.0)).max(y0);
        Rect::new(x0, y0, x1, y1)
    }
}

#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(tag = "op", rename_all = "camelCase")]
/// One stage of the composite pipeline.
pub enum CompositeOp {
    /// Draw the scene's surface.
    Source {
        /// Surface to draw.
        source: SourceRef,
    },
    /// Multiply the layer's alpha.
    Opacity {
        /// Alpha multiplier in `[0, 1]`.
        alpha: f64,
    },
    /// Geometric transform of the layer.
    Transform {
        /// Transform parameters.
        transform: GeometricTransform,
        /// The same transform as one matrix.
        affine: Affine,
    },
    /// Composite the layer onto the background.
    Blend {
        /// Resolved blend operator.
        mode: BlendMode,
    },
    /// Clip the composited result.
    Crop {
        /// Insets relative to the untransformed frame box.
        inset: CropInset,
    },
}

#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "camelCase")]
/// Renderer-facing description of one scene's visual state.
///
/// `ops` are in strict application order: source, opacity, transform, blend, crop. The source
/// op is absent while the surface is still loading.
pub struct CompositeFrame {
    /// Scene this frame describes.
    pub scene_id: String,
    /// Pipeline stages in application order.
    pub ops: Vec<CompositeOp>,
    /// Advisory caption (first sentence of the description).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub caption: Option<String>,
}

impl CompositeFrame {
    /// The source surface, if one is drawn.
    pub fn source(&self) -> Option<&SourceRef> {
        self.ops.iter().find_map(|op| match op {
            CompositeOp::Source { source } => Some(source),
            _ => None,
        })
    }

    /// Alpha multiplier.
    pub fn alpha(&self) -> f64 {
        self.ops
            .iter()
            .find_map(|op| match op {
                CompositeOp::Opacity { alpha } => Some(*alpha),
                _ => None,
            })
            .unwrap_or(1.0)
    }

    /// Geometric transform.
    pub fn transform(&self) -> Option<GeometricTransform> {
        self.ops.iter().find_map(|op| match op {
            CompositeOp::Transform { transform, .. } => Some(*transform),
            _ => None,
        })
    }

    /// Resolved blend mode.
    pub fn blend(&self) -> BlendMode {
        self.ops
            .iter()
            .find_map(|op| match op {
                CompositeOp::Blend { mode } => Some(*mode),
                _ => None,
            })
            .unwrap_or(BlendMode::Normal)
    }

    /// Crop insets.
    pub fn crop(&self) -> CropInset {
        self.ops
            .iter()
            .find_map(|op| match op {
                CompositeOp::Crop { inset } => Some(*inset),
                _ => None,
            })
            .unwrap_or_default()
    }

    /// Stable content hash; equal frames hash equal.
    pub fn fingerprint(&self) -> u64 {
        fingerprint_frame(self)
    }
}

/// Composite a scene whose source is ready.
pub fn composite(scene: &Scene, properties: &CompositeProperties) -> CompositeFrame {
    composite_with_source(scene, properties, SourceStatus::Ready)
}

/// Composite a scene, omitting the source layer while it is still loading.
///
/// Never fails: properties are sanitized first and unknown blend names composite as
/// [`BlendMode::Normal`].
#[tracing::instrument(skip_all, fields(scene = %scene.id))]
pub fn composite_with_source(
    scene: &Scene,
    properties: &CompositeProperties,
    status: SourceStatus,
) -> CompositeFrame {
    let props = properties.sanitized();
    let mut ops = Vec::with_capacity(5);

    if status == SourceStatus::Ready
        && let Some(source) = source_for(scene)
    {
        ops.push(CompositeOp::Source { source });
    }

    ops.push(CompositeOp::Opacity {
        alpha: props.opacity / 100.0,
    });

    let transform = GeometricTransform {
        scale: props.scale / 100.0,
        rotation_deg: props.rotation,
        translate: Vec2::new(props.position_x, props.position_y),
    };
    ops.push(CompositeOp::Transform {
        transform,
        affine: transform.to_affine(),
    });

    let mode = match BlendMode::parse(&props.blend_mode) {
        Some(mode) => mode,
        None => {
            tracing::warn!(blend = %props.blend_mode, "unknown blend mode; compositing as Normal");
            BlendMode::Normal
        }
    };
    ops.push(CompositeOp::Blend { mode });

    ops.push(CompositeOp::Crop {
        inset: CropInset {
            top: props.crop_top,
            right: props.crop_right,
            bottom: props.crop_bottom,
            left: props.crop_left,
        },
    });

    CompositeFrame {
        scene_id: scene.id.clone(),
        ops,
        caption: caption_for(&scene.description),
    }
}

/// First sentence of a description: the trimmed text before the first period.
pub fn caption_for(description: &str) -> Option<String> {
    let head = description.split('.').next().unwrap_or_default().trim();
    (!head.is_empty()).then(|| head.to_owned())
}

fn source_for(scene: &Scene) -> Option<SourceRef> {
    if let Some(url) = scene.video_url.as_deref()
        && !url.trim().is_empty()
    {
        return Some(SourceRef::Video(url.to_owned()));
    }
    if scene.image_url.trim().is_empty() {
        return None;
    }
    Some(SourceRef::Image(scene.image_url.clone()))
}

#[cfg(test)]
#[path = "../../tests/unit/compositor/frame.rs"]
mod tests;
