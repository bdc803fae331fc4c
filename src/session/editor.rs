use std::collections::BTreeMap;

use crate::compositor::frame::{CompositeFrame, SourceStatus, composite_with_source};
use crate::export::manifest::{ExportManifest, build_manifest};
use crate::export::sink::ExportSink;
use crate::foundation::error::ScenecutResult;
use crate::project::model::{Project, Scene};
use crate::project::properties::{PropertyKey, PropertyValue};
use crate::project::store::{ScenePatch, SceneStore};
use crate::session::config::SessionConfig;
use crate::timeline::clock::{PlaybackClock, PlaybackState, TickOutcome};
use crate::timeline::scrub::SeekTarget;
use crate::timeline::ticker::{ManualTicker, TickScheduler};

/// Single owner of an editing session: project data, playback clock and tick scheduler.
///
/// All mutation goes through `&mut self`. Ticks produced by the scheduler are only applied in
/// [`EditorSession::pump_ticks`], on the owner's thread.
#[derive(Debug)]
pub struct EditorSession<S: TickScheduler = ManualTicker> {
    store: SceneStore,
    clock: PlaybackClock,
    scheduler: S,
    config: SessionConfig,
    sources: BTreeMap<String, SourceStatus>,
    last_fingerprint: Option<u64>,
}

impl<S: TickScheduler> EditorSession<S> {
    /// Validate `project` and `config` and open a stopped session at time zero.
    pub fn new(project: Project, config: SessionConfig, scheduler: S) -> ScenecutResult<Self> {
        config.validate()?;
        let store = SceneStore::new(project)?;
        let clock = PlaybackClock::new(store.timeline());
        Ok(Self {
            store,
            clock,
            scheduler,
            config,
            sources: BTreeMap::new(),
            last_fingerprint: None,
        })
    }

    pub fn store(&self) -> &SceneStore {
        &self.store
    }

    pub fn clock(&self) -> &PlaybackClock {
        &self.clock
    }

    pub fn config(&self) -> &SessionConfig {
        &self.config
    }

    /// Access the scheduler, e.g. to [`ManualTicker::fire`] it.
    pub fn scheduler_mut(&mut self) -> &mut S {
        &mut self.scheduler
    }

    /// Observable playback state.
    pub fn state(&self) -> &PlaybackState {
        self.clock.state()
    }

    /// Start playback and schedule the new tick loop. A no-op while already playing.
    ///
    /// If the scheduler refuses the loop, playback is stopped again and the error returned.
    pub fn play(&mut self) -> ScenecutResult<()> {
        let Some(handle) = self.clock.play(self.store.timeline()) else {
            return Ok(());
        };
        if let Err(err) = self.scheduler.schedule(handle, self.config.tick_interval()) {
            self.clock.pause(self.store.timeline());
            return Err(err);
        }
        Ok(())
    }

    /// Stop playback. Returns `false` when already stopped.
    pub fn pause(&mut self) -> bool {
        self.clock.pause(self.store.timeline())
    }

    /// Move the cursor to an absolute time or a pointer ratio.
    pub fn seek(&mut self, target: SeekTarget) {
        let time = target.to_time(self.store.duration());
        self.clock.seek(self.store.timeline(), time);
    }

    /// Manually select a scene while stopped.
    pub fn select_scene(&mut self, id: &str) -> bool {
        self.clock.select_scene(self.store.timeline(), id)
    }

    /// Write one clamped property of one scene.
    pub fn set_property(
        &mut self,
        scene_id: &str,
        key: PropertyKey,
        value: impl Into<PropertyValue>,
    ) -> bool {
        self.store.set_property(scene_id, key, value)
    }

    /// Restore a scene's properties to defaults.
    pub fn reset_properties(&mut self, scene_id: &str) -> bool {
        self.store.reset_properties(scene_id)
    }

    pub fn add_scene(&mut self, scene: Scene) -> ScenecutResult<()> {
        self.store.add_scene(scene)?;
        self.clock.timeline_changed(self.store.timeline());
        Ok(())
    }

    pub fn remove_scene(&mut self, id: &str) -> bool {
        if !self.store.remove_scene(id) {
            return false;
        }
        self.sources.remove(id);
        self.clock.timeline_changed(self.store.timeline());
        true
    }

    pub fn move_scene(&mut self, id: &str, index: usize) -> bool {
        if !self.store.move_scene(id, index) {
            return false;
        }
        self.clock.timeline_changed(self.store.timeline());
        true
    }

    pub fn update_scene(&mut self, id: &str, patch: ScenePatch) -> ScenecutResult<bool> {
        let updated = self.store.update_scene(id, patch)?;
        if updated {
            self.clock.timeline_changed(self.store.timeline());
        }
        Ok(updated)
    }

    pub fn set_duration(&mut self, duration: f64) -> ScenecutResult<()> {
        self.store.set_duration(duration)?;
        self.clock.timeline_changed(self.store.timeline());
        Ok(())
    }

    /// Record the loading state of a scene's media. Unknown ids are ignored.
    pub fn set_source_status(&mut self, scene_id: &str, status: SourceStatus) -> bool {
        if self.store.scene(scene_id).is_none() {
            return false;
        }
        self.sources.insert(scene_id.to_owned(), status);
        true
    }

    pub fn source_status(&self, scene_id: &str) -> SourceStatus {
        self.sources.get(scene_id).copied().unwrap_or_default()
    }

    /// Apply every tick the scheduler fired since the last call. Returns how many advanced
    /// the cursor (a finishing tick counts).
    pub fn pump_ticks(&mut self) -> usize {
        let dt = self.config.tick_dt();
        let mut applied = 0;
        for generation in self.scheduler.poll() {
            match self
                .clock
                .tick_generation(self.store.timeline(), generation, dt)
            {
                TickOutcome::Ignored => {}
                TickOutcome::Advanced | TickOutcome::Finished => applied += 1,
            }
        }
        applied
    }

    /// The active scene, if any.
    pub fn active_scene(&self) -> Option<&Scene> {
        self.clock
            .active_scene_id()
            .and_then(|id| self.store.scene(id))
    }

    /// Composite of the active scene.
    pub fn current_frame(&self) -> Option<CompositeFrame> {
        let scene = self.active_scene()?;
        let props = self.store.get_properties(&scene.id);
        Some(composite_with_source(
            scene,
            &props,
            self.source_status(&scene.id),
        ))
    }

    /// Like [`EditorSession::current_frame`], but yields only when the frame differs from the
    /// last one handed out.
    pub fn poll_frame(&mut self) -> Option<CompositeFrame> {
        let Some(frame) = self.current_frame() else {
            self.last_fingerprint = None;
            return None;
        };
        let fp = frame.fingerprint();
        if self.last_fingerprint == Some(fp) {
            return None;
        }
        self.last_fingerprint = Some(fp);
        Some(frame)
    }

    pub fn manifest(&self) -> ExportManifest {
        build_manifest(&self.store, self.config.frame_size())
    }

    /// Build the export manifest and hand it to `sink`. Sink errors are returned as-is.
    #[tracing::instrument(skip_all, fields(scenes = self.store.scenes().len()))]
    pub fn export(&self, sink: &mut dyn ExportSink) -> ScenecutResult<()> {
        let manifest = self.manifest();
        sink.export(&manifest)
    }
}

impl EditorSession<ManualTicker> {
    /// Fire the manual ticker once and apply the tick. Returns `false` when nothing was armed.
    pub fn step(&mut self) -> bool {
        if !self.scheduler.fire() {
            return false;
        }
        self.pump_ticks() > 0
    }
}

#[cfg(test)]
#[path = "../../tests/unit/session/editor.rs"]
mod tests;
