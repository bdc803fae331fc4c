//! Cancellable repeating tick timers.
//!
//! The playback clock owns a [`TickLoop`]: every `play()` starts a new generation and cancels
//! the previous one, so at most one loop is ever live. Schedulers only deliver generation
//! numbers; the owner applies ticks on its own thread and drops any whose generation is stale.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::mpsc::{self, Receiver, SyncSender, TrySendError};
use std::time::Duration;

use crate::foundation::error::{ScenecutError, ScenecutResult};

/// Shared cancellation flag for one tick loop.
#[derive(Clone, Debug, Default)]
pub struct CancelToken(Arc<AtomicBool>);

impl CancelToken {
    /// Create a live token.
    pub fn new() -> Self {
        Self::default()
    }

    /// Cancel the loop; idempotent.
    pub fn cancel(&self) {
        self.0.store(true, Ordering::Release);
    }

    /// Return `true` once [`CancelToken::cancel`] was called.
    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::Acquire)
    }
}

/// Identity of one started tick loop.
#[derive(Clone, Debug)]
pub struct TickHandle {
    /// Monotonic loop generation.
    pub generation: u64,
    /// Token cancelled when the loop stops.
    pub token: CancelToken,
}

/// The clock's single tick loop slot.
#[derive(Debug, Default)]
pub struct TickLoop {
    generation: u64,
    active: Option<TickHandle>,
}

impl TickLoop {
    /// Start a new generation, cancelling whatever loop was running.
    pub fn start(&mut self) -> TickHandle {
        self.stop();
        self.generation += 1;
        let handle = TickHandle {
            generation: self.generation,
            token: CancelToken::new(),
        };
        self.active = Some(handle.clone());
        handle
    }

    /// Cancel the running loop, if any.
    pub fn stop(&mut self) {
        if let Some(handle) = self.active.take() {
            handle.token.cancel();
        }
    }

    /// Return `true` while a loop is live.
    pub fn is_running(&self) -> bool {
        self.active
            .as_ref()
            .is_some_and(|h| !h.token.is_cancelled())
    }

    /// Return `true` when a tick from `generation` belongs to the live loop.
    pub fn accepts(&self, generation: u64) -> bool {
        self.active
            .as_ref()
            .is_some_and(|h| h.generation == generation && !h.token.is_cancelled())
    }

    /// Generation of the most recently started loop.
    pub fn generation(&self) -> u64 {
        self.generation
    }
}

/// Repeating timer backend driven by the editor session.
pub trait TickScheduler {
    /// Begin firing ticks for `handle` every `interval` until its token is cancelled.
    fn schedule(&mut self, handle: TickHandle, interval: Duration) -> ScenecutResult<()>;

    /// Drain generations of the ticks fired since the last poll, in firing order.
    fn poll(&mut self) -> Vec<u64>;
}

/// Scheduler fired explicitly by the shell, e.g. from a render-loop callback.
#[derive(Debug, Default)]
pub struct ManualTicker {
    armed: Option<TickHandle>,
    fired: Vec<u64>,
}

impl ManualTicker {
    /// Create an unarmed ticker.
    pub fn new() -> Self {
        Self::default()
    }

    /// Fire one tick for the armed loop. Returns `false` when nothing is armed or the loop was
    /// cancelled.
    pub fn fire(&mut self) -> bool {
        match &self.armed {
            Some(handle) if !handle.token.is_cancelled() => {
                self.fired.push(handle.generation);
                true
            }
            _ => false,
        }
    }

    /// Return `true` while an uncancelled loop is armed.
    pub fn is_armed(&self) -> bool {
        self.armed
            .as_ref()
            .is_some_and(|h| !h.token.is_cancelled())
    }
}

impl TickScheduler for ManualTicker {
    fn schedule(&mut self, handle: TickHandle, _interval: Duration) -> ScenecutResult<()> {
        self.armed = Some(handle);
        Ok(())
    }

    fn poll(&mut self) -> Vec<u64> {
        std::mem::take(&mut self.fired)
    }
}

/// Scheduler backed by one background sleeper thread per loop.
///
/// Threads only post generation numbers over a bounded channel; they exit once their token is
/// cancelled or the ticker is dropped. While the owner is not polling, ticks beyond
/// [`ThreadTicker::QUEUE_DEPTH`] are dropped rather than queued.
#[derive(Debug)]
pub struct ThreadTicker {
    tx: SyncSender<u64>,
    rx: Receiver<u64>,
}

impl ThreadTicker {
    /// Pending ticks held between two polls.
    pub const QUEUE_DEPTH: usize = 8;

    /// Create a ticker with no running loops.
    pub fn new() -> Self {
        let (tx, rx) = mpsc::sync_channel(Self::QUEUE_DEPTH);
        Self { tx, rx }
    }
}

impl Default for ThreadTicker {
    fn default() -> Self {
        Self::new()
    }
}

impl TickScheduler for ThreadTicker {
    fn schedule(&mut self, handle: TickHandle, interval: Duration) -> ScenecutResult<()> {
        if interval.is_zero() {
            return Err(ScenecutError::scheduling("tick interval must be > 0"));
        }
        let tx = self.tx.clone();
        std::thread::Builder::new()
            .name(format!("scenecut-tick-{}", handle.generation))
            .spawn(move || {
                loop {
                    std::thread::sleep(interval);
                    if handle.token.is_cancelled() {
                        break;
                    }
                    match tx.try_send(handle.generation) {
                        Ok(()) | Err(TrySendError::Full(_)) => {}
                        Err(TrySendError::Disconnected(_)) => break,
                    }
                }
            })
            .map_err(|e| ScenecutError::scheduling(format!("spawn tick thread: {e}")))?;
        Ok(())
    }

    fn poll(&mut self) -> Vec<u64> {
        self.rx.try_iter().collect()
    }
}

#[cfg(test)]
#[path = "../../tests/unit/timeline/ticker.rs"]
mod tests;
