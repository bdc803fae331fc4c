use crate::project::store::TimelineView;
use crate::timeline::ticker::{TickHandle, TickLoop};

#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "camelCase")]
/// Observable playback state handed to the UI shell.
pub struct PlaybackState {
    /// Cursor position in seconds, within `[0, duration]`.
    pub current_time: f64,
    /// `true` while the tick loop advances the cursor.
    pub is_playing: bool,
    /// Scene under the cursor (or manually selected while stopped).
    pub active_scene_id: Option<String>,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
/// The clock's two states.
pub enum ClockState {
    /// Cursor held in place.
    Stopped,
    /// Cursor advancing on ticks.
    Playing,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
/// What a tick did.
pub enum TickOutcome {
    /// The tick was stale, non-finite, or arrived while stopped.
    Ignored,
    /// The cursor moved forward.
    Advanced,
    /// The cursor reached the end; playback stopped and rewound to zero.
    Finished,
}

/// Playback state machine advancing the timeline cursor.
///
/// Every operation takes the current [`TimelineView`] so the active scene is re-resolved from
/// scratch after each change.
#[derive(Debug)]
pub struct PlaybackClock {
    state: PlaybackState,
    manual_selection: bool,
    ticks: TickLoop,
}

impl PlaybackClock {
    /// Create a stopped clock at time zero.
    pub fn new(timeline: TimelineView<'_>) -> Self {
        let mut clock = Self {
            state: PlaybackState {
                current_time: 0.0,
                is_playing: false,
                active_scene_id: None,
            },
            manual_selection: false,
            ticks: TickLoop::default(),
        };
        clock.resolve(timeline);
        clock
    }

    /// Current observable state.
    pub fn state(&self) -> &PlaybackState {
        &self.state
    }

    /// Current state-machine state.
    pub fn clock_state(&self) -> ClockState {
        if self.state.is_playing {
            ClockState::Playing
        } else {
            ClockState::Stopped
        }
    }

    /// Cursor position in seconds.
    pub fn current_time(&self) -> f64 {
        self.state.current_time
    }

    /// Return `true` while playing.
    pub fn is_playing(&self) -> bool {
        self.state.is_playing
    }

    /// Active scene id, if any.
    pub fn active_scene_id(&self) -> Option<&str> {
        self.state.active_scene_id.as_deref()
    }

    /// Return `true` while a manual scene selection overrides resolution.
    pub fn has_manual_selection(&self) -> bool {
        self.manual_selection
    }

    /// The clock's tick loop.
    pub fn tick_loop(&self) -> &TickLoop {
        &self.ticks
    }

    /// `Stopped -> Playing`. Returns the handle of the fresh tick loop to schedule, or `None`
    /// when already playing.
    pub fn play(&mut self, timeline: TimelineView<'_>) -> Option<TickHandle> {
        if self.state.is_playing {
            return None;
        }
        self.state.is_playing = true;
        let handle = self.ticks.start();
        tracing::debug!(
            time = self.state.current_time,
            generation = handle.generation,
            "playback started"
        );
        self.resolve(timeline);
        Some(handle)
    }

    /// `Playing -> Stopped`, cancelling the tick loop. Returns `false` when already stopped.
    pub fn pause(&mut self, timeline: TimelineView<'_>) -> bool {
        if !self.state.is_playing {
            return false;
        }
        self.state.is_playing = false;
        self.ticks.stop();
        tracing::debug!(time = self.state.current_time, "playback paused");
        self.refresh(timeline);
        true
    }

    /// Advance by `dt` seconds. Reaching the end stops playback and rewinds to zero.
    pub fn tick(&mut self, timeline: TimelineView<'_>, dt: f64) -> TickOutcome {
        if !self.state.is_playing {
            return TickOutcome::Ignored;
        }
        if !dt.is_finite() || dt < 0.0 {
            tracing::warn!(dt, "ignoring invalid tick delta");
            return TickOutcome::Ignored;
        }

        self.state.current_time += dt;
        let outcome = if self.state.current_time >= timeline.duration {
            self.state.is_playing = false;
            self.state.current_time = 0.0;
            self.ticks.stop();
            tracing::debug!("end of timeline; stopped and rewound");
            TickOutcome::Finished
        } else {
            TickOutcome::Advanced
        };
        self.resolve(timeline);
        outcome
    }

    /// Apply a tick delivered by a scheduler for loop `generation`; stale generations are
    /// dropped.
    pub fn tick_generation(
        &mut self,
        timeline: TimelineView<'_>,
        generation: u64,
        dt: f64,
    ) -> TickOutcome {
        if !self.ticks.accepts(generation) {
            tracing::trace!(generation, "dropping stale tick");
            return TickOutcome::Ignored;
        }
        self.tick(timeline, dt)
    }

    /// Move the cursor to `time`, clamped to `[0, duration]`. Valid in either state.
    pub fn seek(&mut self, timeline: TimelineView<'_>, time: f64) {
        let time = if time.is_nan() { 0.0 } else { time };
        self.state.current_time = time.clamp(0.0, timeline.duration);
        self.resolve(timeline);
    }

    /// Manually select a scene while stopped. The selection sticks until the next seek, tick
    /// or play. Ignored while playing or for unknown ids.
    pub fn select_scene(&mut self, timeline: TimelineView<'_>, id: &str) -> bool {
        if self.state.is_playing {
            tracing::debug!(scene = id, "scene selection ignored while playing");
            return false;
        }
        if !timeline.contains(id) {
            tracing::debug!(scene = id, "selection of unknown scene ignored");
            return false;
        }
        self.state.active_scene_id = Some(id.to_owned());
        self.manual_selection = true;
        true
    }

    /// Re-clamp and re-resolve after the scene list or duration changed.
    ///
    /// A manual selection survives only while its scene still exists.
    pub fn timeline_changed(&mut self, timeline: TimelineView<'_>) {
        self.state.current_time = self.state.current_time.clamp(0.0, timeline.duration);
        let keep = self.manual_selection
            && self
                .state
                .active_scene_id
                .as_deref()
                .is_some_and(|id| timeline.contains(id));
        if keep {
            return;
        }
        self.resolve(timeline);
    }

    /// Resolve unless a manual selection holds.
    fn refresh(&mut self, timeline: TimelineView<'_>) {
        if !self.manual_selection {
            self.resolve(timeline);
        }
    }

    fn resolve(&mut self, timeline: TimelineView<'_>) {
        self.manual_selection = false;
        self.state.active_scene_id = timeline.resolve(self.state.current_time).map(str::to_owned);
    }
}

#[cfg(test)]
#[path = "../../tests/unit/timeline/clock.rs"]
mod tests;
