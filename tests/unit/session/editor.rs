use std::time::Duration;

use super::*;
use crate::export::sink::InMemoryExportSink;
use crate::foundation::core::Size;
use crate::foundation::error::ScenecutError;
use crate::project::dsl::{ProjectBuilder, scene};
use crate::timeline::ticker::TickHandle;

fn project() -> Project {
    ProjectBuilder::new(30.0)
        .scene(scene("a", "a.png").with_description("Opening shot. Wide."))
        .unwrap()
        .scene(scene("b", "b.png").with_video("b.mp4"))
        .unwrap()
        .scene(scene("c", "c.png"))
        .unwrap()
        .build()
        .unwrap()
}

fn session() -> EditorSession {
    EditorSession::new(project(), SessionConfig::default(), ManualTicker::new()).unwrap()
}

#[test]
fn new_session_rejects_bad_config() {
    let cfg = SessionConfig {
        tick_interval_ms: 0,
        ..SessionConfig::default()
    };
    let err = EditorSession::new(project(), cfg, ManualTicker::new()).unwrap_err();
    assert!(matches!(err, ScenecutError::Validation(_)));
}

#[test]
fn step_advances_by_configured_dt() {
    let cfg = SessionConfig {
        tick_dt_sec: Some(1.0),
        ..SessionConfig::default()
    };
    let mut s = EditorSession::new(project(), cfg, ManualTicker::new()).unwrap();
    assert!(!s.step());
    s.play().unwrap();
    assert!(s.step());
    assert!(s.step());
    assert_eq!(s.state().current_time, 2.0);
    assert!(s.state().is_playing);
}

#[test]
fn playback_stops_and_rewinds_at_the_end() {
    let mut s = session();
    s.seek(SeekTarget::Time(29.95));
    s.play().unwrap();
    let mut steps = 0;
    while s.state().is_playing && steps < 10 {
        s.step();
        steps += 1;
    }
    assert!(!s.state().is_playing);
    assert_eq!(s.state().current_time, 0.0);
    assert_eq!(s.state().active_scene_id.as_deref(), Some("a"));
    assert!(!s.scheduler_mut().is_armed());
}

#[test]
fn ticks_from_a_replaced_loop_are_dropped() {
    let mut s = session();
    s.play().unwrap();
    assert!(s.scheduler_mut().fire());
    assert!(s.pause());
    s.play().unwrap();
    // The queued tick carries the first generation.
    assert_eq!(s.pump_ticks(), 0);
    assert_eq!(s.state().current_time, 0.0);
    assert!(s.step());
    assert!(s.state().current_time > 0.0);
}

#[derive(Debug)]
struct RefusingScheduler;

impl TickScheduler for RefusingScheduler {
    fn schedule(&mut self, _handle: TickHandle, _interval: Duration) -> ScenecutResult<()> {
        Err(ScenecutError::scheduling("no timers"))
    }

    fn poll(&mut self) -> Vec<u64> {
        Vec::new()
    }
}

#[test]
fn scheduling_failure_leaves_playback_stopped() {
    let mut s = EditorSession::new(project(), SessionConfig::default(), RefusingScheduler).unwrap();
    let err = s.play().unwrap_err();
    assert!(matches!(err, ScenecutError::Scheduling(_)));
    assert!(!s.state().is_playing);
    assert!(!s.clock().tick_loop().is_running());
}

#[test]
fn seek_by_ratio_maps_onto_duration() {
    let mut s = session();
    s.seek(SeekTarget::Ratio(0.5));
    assert_eq!(s.state().current_time, 15.0);
    assert_eq!(s.state().active_scene_id.as_deref(), Some("b"));
}

#[test]
fn current_frame_follows_selection_and_properties() {
    let mut s = session();
    assert!(s.select_scene("c"));
    assert!(s.set_property("c", PropertyKey::Opacity, 50.0));
    let frame = s.current_frame().unwrap();
    assert_eq!(frame.scene_id, "c");
    assert_eq!(frame.alpha(), 0.5);
    assert_eq!(s.store().get_properties("a").opacity, 100.0);
}

#[test]
fn video_scene_prefers_video_source() {
    let mut s = session();
    s.seek(SeekTarget::Time(12.0));
    let frame = s.current_frame().unwrap();
    assert_eq!(
        frame.source(),
        Some(&crate::compositor::frame::SourceRef::Video("b.mp4".into()))
    );
}

#[test]
fn pending_source_omits_the_source_layer() {
    let mut s = session();
    assert!(s.set_source_status("a", SourceStatus::Pending));
    assert!(!s.set_source_status("missing", SourceStatus::Pending));
    assert!(s.current_frame().unwrap().source().is_none());
    s.set_source_status("a", SourceStatus::Ready);
    assert!(s.current_frame().unwrap().source().is_some());
}

#[test]
fn poll_frame_elides_unchanged_frames() {
    let mut s = session();
    assert!(s.poll_frame().is_some());
    assert!(s.poll_frame().is_none());

    // Same scene, cursor moved: identical composite.
    s.seek(SeekTarget::Time(1.0));
    assert!(s.poll_frame().is_none());

    s.set_property("a", PropertyKey::Rotation, 45.0);
    assert!(s.poll_frame().is_some());
    s.seek(SeekTarget::Time(30.0));
    assert!(s.poll_frame().is_none());
    s.seek(SeekTarget::Time(0.0));
    assert!(s.poll_frame().is_some());
}

#[test]
fn removing_scenes_re_resolves_the_cursor() {
    let mut s = session();
    s.seek(SeekTarget::Time(15.0));
    assert_eq!(s.state().active_scene_id.as_deref(), Some("b"));
    assert!(s.remove_scene("b"));
    assert_eq!(s.state().active_scene_id.as_deref(), Some("c"));
    assert!(!s.remove_scene("b"));
}

#[test]
fn manual_selection_survives_unrelated_edits_only() {
    let mut s = session();
    s.select_scene("c");
    s.add_scene(scene("d", "d.png")).unwrap();
    assert_eq!(s.state().active_scene_id.as_deref(), Some("c"));
    s.remove_scene("c");
    assert_eq!(s.state().active_scene_id.as_deref(), Some("a"));
}

#[test]
fn shrinking_duration_clamps_the_cursor() {
    let mut s = session();
    s.seek(SeekTarget::Time(25.0));
    s.set_duration(10.0).unwrap();
    assert_eq!(s.state().current_time, 10.0);
    assert_eq!(s.state().active_scene_id, None);
    assert!(s.set_duration(0.0).is_err());
}

#[test]
fn move_and_update_reorder_the_timeline() {
    let mut s = session();
    assert!(s.move_scene("c", 0));
    assert_eq!(s.state().active_scene_id.as_deref(), Some("c"));
    let patch = ScenePatch {
        duration: Some(Some(20.0)),
        ..ScenePatch::default()
    };
    assert!(s.update_scene("c", patch).unwrap());
    s.seek(SeekTarget::Time(19.0));
    assert_eq!(s.state().active_scene_id.as_deref(), Some("c"));
    assert!(!s.update_scene("zzz", ScenePatch::default()).unwrap());
}

#[test]
fn export_hands_the_manifest_to_the_sink() {
    let cfg = SessionConfig {
        frame_width: 640.0,
        frame_height: 360.0,
        ..SessionConfig::default()
    };
    let mut s = EditorSession::new(project(), cfg, ManualTicker::new()).unwrap();
    s.set_property("b", PropertyKey::BlendMode, "Garbage");
    let mut sink = InMemoryExportSink::new();
    s.export(&mut sink).unwrap();
    let manifest = &sink.manifests()[0];
    assert_eq!(manifest.frame_size, Size::new(640.0, 360.0));
    assert_eq!(manifest.scenes.len(), 3);
    assert_eq!(
        manifest.scenes[1].frame.blend(),
        crate::project::properties::BlendMode::Normal
    );
    assert_eq!(manifest, &s.manifest());
}
