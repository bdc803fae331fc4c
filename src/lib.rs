//! Scenecut is the core of a timeline-driven scene compositor.
//!
//! A project is an ordered list of scenes laid out on a fixed-length timeline. The crate
//! provides:
//!
//! - a [`SceneStore`] holding scenes and per-scene [`CompositeProperties`]
//! - a [`PlaybackClock`] advanced by a cancellable [`TickScheduler`]
//! - [`composite`], turning a scene and its properties into a [`CompositeFrame`]
//! - an [`EditorSession`] wiring everything together and exporting to an [`ExportSink`]
#![forbid(unsafe_code)]

mod compositor;
mod export;
mod foundation;
mod project;
mod session;
mod timeline;

pub use crate::compositor::blend::{PremulRgba8, blend_in_place, blend_pixel};
pub use crate::compositor::frame::{
    CompositeFrame, CompositeOp, CropInset, GeometricTransform, SourceRef, SourceStatus,
    caption_for, composite, composite_with_source,
};
pub use crate::export::manifest::{ExportManifest, ExportScene, build_manifest};
pub use crate::export::sink::{
    ExportSink, InMemoryExportSink, JsonFileSink, JsonFileSinkOpts, ensure_parent_dir,
};
pub use crate::foundation::core::{Affine, Rect, Size, TimeRange, Vec2};
pub use crate::foundation::error::{ScenecutError, ScenecutResult};
pub use crate::project::dsl::{ProjectBuilder, scene};
pub use crate::project::model::{Project, Scene};
pub use crate::project::properties::{
    BlendMode, CompositeProperties, FieldSpec, PropertyKey, PropertyValue,
};
pub use crate::project::store::{ScenePatch, SceneStore, TimelineView};
pub use crate::session::config::SessionConfig;
pub use crate::session::editor::EditorSession;
pub use crate::timeline::clock::{ClockState, PlaybackClock, PlaybackState, TickOutcome};
pub use crate::timeline::resolve::{effective_duration, resolve_active_scene, scene_windows};
pub use crate::timeline::scrub::{SeekTarget, map_pointer_to_time, map_time_to_pointer};
pub use crate::timeline::ticker::{
    CancelToken, ManualTicker, ThreadTicker, TickHandle, TickLoop, TickScheduler,
};
