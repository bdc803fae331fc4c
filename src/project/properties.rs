use std::fmt;
use std::str::FromStr;

use crate::foundation::error::{ScenecutError, ScenecutResult};
use crate::foundation::math::clamp_finite;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
/// Pixel-compositing operator combining a scene layer with its background.
pub enum BlendMode {
    /// Source over destination.
    Normal,
    /// Channel-wise product; darkens.
    Multiply,
    /// Inverted product of inverses; lightens.
    Screen,
    /// Multiply or screen depending on the backdrop.
    Overlay,
    /// Saturating linear dodge.
    Add,
    /// Gentle dodge/burn (W3C soft-light).
    #[serde(rename = "Soft Light")]
    SoftLight,
}

impl BlendMode {
    /// Every supported mode, in inspector order.
    pub const ALL: [BlendMode; 6] = [
        BlendMode::Normal,
        BlendMode::Multiply,
        BlendMode::Screen,
        BlendMode::Overlay,
        BlendMode::Add,
        BlendMode::SoftLight,
    ];

    /// Display name as stored in property records.
    pub fn name(self) -> &'static str {
        match self {
            BlendMode::Normal => "Normal",
            BlendMode::Multiply => "Multiply",
            BlendMode::Screen => "Screen",
            BlendMode::Overlay => "Overlay",
            BlendMode::Add => "Add",
            BlendMode::SoftLight => "Soft Light",
        }
    }

    /// CSS `mix-blend-mode` keyword for web renderers.
    pub fn css_name(self) -> &'static str {
        match self {
            BlendMode::Normal => "normal",
            BlendMode::Multiply => "multiply",
            BlendMode::Screen => "screen",
            BlendMode::Overlay => "overlay",
            BlendMode::Add => "plus-lighter",
            BlendMode::SoftLight => "soft-light",
        }
    }

    /// Look up a mode by display name or CSS keyword.
    pub fn parse(name: &str) -> Option<Self> {
        Self::ALL
            .into_iter()
            .find(|m| m.name() == name || m.css_name() == name)
    }

    /// Render-time resolution: unknown names composite as [`BlendMode::Normal`].
    pub fn resolve(name: &str) -> Self {
        Self::parse(name).unwrap_or(BlendMode::Normal)
    }
}

impl fmt::Display for BlendMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
/// Addressable field of [`CompositeProperties`].
pub enum PropertyKey {
    /// Opacity percentage.
    Opacity,
    /// Blend mode name.
    BlendMode,
    /// Horizontal offset in frame units.
    PositionX,
    /// Vertical offset in frame units.
    PositionY,
    /// Scale percentage.
    Scale,
    /// Rotation in degrees.
    Rotation,
    /// Top crop percentage.
    CropTop,
    /// Bottom crop percentage.
    CropBottom,
    /// Left crop percentage.
    CropLeft,
    /// Right crop percentage.
    CropRight,
}

/// Valid range and default of a numeric property.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct FieldSpec {
    /// Inclusive lower bound.
    pub min: f64,
    /// Inclusive upper bound.
    pub max: f64,
    /// Value used when none (or a non-finite one) was written.
    pub default: f64,
}

const OPACITY: FieldSpec = FieldSpec {
    min: 0.0,
    max: 100.0,
    default: 100.0,
};
const POSITION: FieldSpec = FieldSpec {
    min: f64::MIN,
    max: f64::MAX,
    default: 0.0,
};
const SCALE: FieldSpec = FieldSpec {
    min: 10.0,
    max: 200.0,
    default: 100.0,
};
const ROTATION: FieldSpec = FieldSpec {
    min: -180.0,
    max: 180.0,
    default: 0.0,
};
const CROP: FieldSpec = FieldSpec {
    min: 0.0,
    max: 100.0,
    default: 0.0,
};

impl PropertyKey {
    /// Every key, in inspector order.
    pub const ALL: [PropertyKey; 10] = [
        PropertyKey::Opacity,
        PropertyKey::BlendMode,
        PropertyKey::PositionX,
        PropertyKey::PositionY,
        PropertyKey::Scale,
        PropertyKey::Rotation,
        PropertyKey::CropTop,
        PropertyKey::CropBottom,
        PropertyKey::CropLeft,
        PropertyKey::CropRight,
    ];

    /// camelCase field name used on the wire.
    pub fn name(self) -> &'static str {
        match self {
            PropertyKey::Opacity => "opacity",
            PropertyKey::BlendMode => "blendMode",
            PropertyKey::PositionX => "positionX",
            PropertyKey::PositionY => "positionY",
            PropertyKey::Scale => "scale",
            PropertyKey::Rotation => "rotation",
            PropertyKey::CropTop => "cropTop",
            PropertyKey::CropBottom => "cropBottom",
            PropertyKey::CropLeft => "cropLeft",
            PropertyKey::CropRight => "cropRight",
        }
    }

    /// Range and default for numeric keys; `None` for `blendMode`.
    pub fn spec(self) -> Option<FieldSpec> {
        match self {
            PropertyKey::Opacity => Some(OPACITY),
            PropertyKey::BlendMode => None,
            PropertyKey::PositionX | PropertyKey::PositionY => Some(POSITION),
            PropertyKey::Scale => Some(SCALE),
            PropertyKey::Rotation => Some(ROTATION),
            PropertyKey::CropTop
            | PropertyKey::CropBottom
            | PropertyKey::CropLeft
            | PropertyKey::CropRight => Some(CROP),
        }
    }
}

impl fmt::Display for PropertyKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for PropertyKey {
    type Err = ScenecutError;

    fn from_str(s: &str) -> ScenecutResult<Self> {
        Self::ALL
            .into_iter()
            .find(|k| k.name() == s)
            .ok_or_else(|| ScenecutError::validation(format!("unknown property key '{s}'")))
    }
}

#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(untagged)]
/// Value written through `set_property`.
pub enum PropertyValue {
    /// Numeric value for range-bound fields.
    Number(f64),
    /// Textual value, used by `blendMode`.
    Text(String),
}

impl PropertyValue {
    /// Numeric view; text is parsed leniently.
    pub fn as_number(&self) -> Option<f64> {
        match self {
            PropertyValue::Number(v) => Some(*v),
            PropertyValue::Text(s) => s.trim().parse().ok(),
        }
    }

    /// Textual view; numbers use their shortest display form.
    pub fn to_text(&self) -> String {
        match self {
            PropertyValue::Number(v) => v.to_string(),
            PropertyValue::Text(s) => s.clone(),
        }
    }
}

impl From<f64> for PropertyValue {
    fn from(v: f64) -> Self {
        PropertyValue::Number(v)
    }
}

impl From<&str> for PropertyValue {
    fn from(v: &str) -> Self {
        PropertyValue::Text(v.to_owned())
    }
}

impl From<String> for PropertyValue {
    fn from(v: String) -> Self {
        PropertyValue::Text(v)
    }
}

impl From<BlendMode> for PropertyValue {
    fn from(v: BlendMode) -> Self {
        PropertyValue::Text(v.name().to_owned())
    }
}

#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "camelCase", default)]
/// Per-scene transform, blend and crop values controlling the rendered appearance.
///
/// `blend_mode` is kept as the raw name that was written so an inspector can show an invalid
/// choice; use [`CompositeProperties::blend`] for the render-time mode.
pub struct CompositeProperties {
    /// Opacity percentage, `0..=100`.
    pub opacity: f64,
    /// Blend mode name as written.
    pub blend_mode: String,
    /// Horizontal offset.
    pub position_x: f64,
    /// Vertical offset.
    pub position_y: f64,
    /// Scale percentage, `10..=200`.
    pub scale: f64,
    /// Rotation in degrees, `-180..=180`.
    pub rotation: f64,
    /// Top crop percentage, `0..=100`.
    pub crop_top: f64,
    /// Bottom crop percentage, `0..=100`.
    pub crop_bottom: f64,
    /// Left crop percentage, `0..=100`.
    pub crop_left: f64,
    /// Right crop percentage, `0..=100`.
    pub crop_right: f64,
}

impl Default for CompositeProperties {
    fn default() -> Self {
        Self {
            opacity: OPACITY.default,
            blend_mode: BlendMode::Normal.name().to_owned(),
            position_x: POSITION.default,
            position_y: POSITION.default,
            scale: SCALE.default,
            rotation: ROTATION.default,
            crop_top: CROP.default,
            crop_bottom: CROP.default,
            crop_left: CROP.default,
            crop_right: CROP.default,
        }
    }
}

impl CompositeProperties {
    /// Render-time blend mode; unknown names resolve to [`BlendMode::Normal`].
    pub fn blend(&self) -> BlendMode {
        BlendMode::resolve(&self.blend_mode)
    }

    /// Read one field.
    pub fn get(&self, key: PropertyKey) -> PropertyValue {
        match key {
            PropertyKey::BlendMode => PropertyValue::Text(self.blend_mode.clone()),
            _ => PropertyValue::Number(self.number(key).unwrap_or_default()),
        }
    }

    /// Canonical merge with defaults: every numeric field clamped into range, non-finite
    /// values replaced by their default. The blend name is left verbatim.
    pub fn sanitized(&self) -> Self {
        let mut out = self.clone();
        for key in PropertyKey::ALL {
            if let (Some(spec), Some(slot)) = (key.spec(), out.number_slot_mut(key)) {
                *slot = clamp_finite(*slot, spec.min, spec.max, spec.default);
            }
        }
        out
    }

    /// Write one field with clamping. Returns `false` when the value could not be applied.
    pub(crate) fn apply(&mut self, key: PropertyKey, value: &PropertyValue) -> bool {
        if key == PropertyKey::BlendMode {
            self.blend_mode = value.to_text();
            return true;
        }
        let Some(v) = value.as_number() else {
            return false;
        };
        let (Some(spec), Some(slot)) = (key.spec(), self.number_slot_mut(key)) else {
            return false;
        };
        *slot = clamp_finite(v, spec.min, spec.max, spec.default);
        true
    }

    fn number(&self, key: PropertyKey) -> Option<f64> {
        match key {
            PropertyKey::Opacity => Some(self.opacity),
            PropertyKey::PositionX => Some(self.position_x),
            PropertyKey::PositionY => Some(self.position_y),
            PropertyKey::Scale => Some(self.scale),
            PropertyKey::Rotation => Some(self.rotation),
            PropertyKey::CropTop => Some(self.crop_top),
            PropertyKey::CropBottom => Some(self.crop_bottom),
            PropertyKey::CropLeft => Some(self.crop_left),
            PropertyKey::CropRight => Some(self.crop_right),
            PropertyKey::BlendMode => None,
        }
    }

    fn number_slot_mut(&mut self, key: PropertyKey) -> Option<&mut f64> {
        match key {
            PropertyKey::Opacity => Some(&mut self.opacity),
            PropertyKey::PositionX => Some(&mut self.position_x),
            PropertyKey::PositionY => Some(&mut self.position_y),
            PropertyKey::Scale => Some(&mut self.scale),
            PropertyKey::Rotation => Some(&mut self.rotation),
            PropertyKey::CropTop => Some(&mut self.crop_top),
            PropertyKey::CropBottom => Some(&mut self.crop_bottom),
            PropertyKey::CropLeft => Some(&mut self.crop_left),
            PropertyKey::CropRight => Some(&mut self.crop_right),
            PropertyKey::BlendMode => None,
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/project/properties.rs"]
mod tests;
