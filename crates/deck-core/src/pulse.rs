//! Cooperative per-frame pulses
//!
//! The host event loop calls [`PulseLoop::run_frame`] once per display
//! refresh. Every registered callback is invoked with the current clock
//! reading until it asks to stop or its [`PulseHandle`] is cancelled.

use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::{Arc, Weak};
use std::time::Instant;

use parking_lot::Mutex;

/// Source of monotonic time in milliseconds
pub trait Clock: Send + Sync {
    fn now_ms(&self) -> f64;
}

/// Wall clock backed by [`Instant`]
#[derive(Debug, Clone)]
pub struct MonotonicClock {
    origin: Instant,
}

impl MonotonicClock {
    pub fn new() -> Self {
        Self {
            origin: Instant::now(),
        }
    }
}

impl Default for MonotonicClock {
    fn default() -> Self {
        Self::new()
    }
}

impl Clock for MonotonicClock {
    fn now_ms(&self) -> f64 {
        self.origin.elapsed().as_secs_f64() * 1000.0
    }
}

/// Hand-driven clock for tests and deterministic replay
#[derive(Debug, Default)]
pub struct ManualClock {
    now: Mutex<f64>,
}

impl ManualClock {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set(&self, now_ms: f64) {
        *self.now.lock() = now_ms;
    }

    pub fn advance(&self, delta_ms: f64) {
        *self.now.lock() += delta_ms;
    }
}

impl Clock for ManualClock {
    fn now_ms(&self) -> f64 {
        *self.now.lock()
    }
}

/// What a pulse callback wants after running
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PulseControl {
    Continue,
    Stop,
}

type PulseFn = Box<dyn FnMut(f64) -> PulseControl + Send>;

struct PulseEntry {
    id: u64,
    live: Arc<AtomicBool>,
    callback: PulseFn,
}

type Registry = Arc<Mutex<Vec<PulseEntry>>>;

/// Frame-driven callback registry
#[derive(Clone)]
pub struct PulseLoop {
    clock: Arc<dyn Clock>,
    registry: Registry,
    next_id: Arc<AtomicU64>,
}

impl PulseLoop {
    pub fn new(clock: Arc<dyn Clock>) -> Self {
        Self {
            clock,
            registry: Arc::new(Mutex::new(Vec::new())),
            next_id: Arc::new(AtomicU64::new(0)),
        }
    }

    pub fn now_ms(&self) -> f64 {
        self.clock.now_ms()
    }

    /// Register a callback to run on every frame until stopped
    pub fn register<F>(&self, callback: F) -> PulseHandle
    where
        F: FnMut(f64) -> PulseControl + Send + 'static,
    {
        let id = self.next_id.fetch_add(1, Ordering::Relaxed);
        let live = Arc::new(AtomicBool::new(true));
        self.registry.lock().push(PulseEntry {
            id,
            live: live.clone(),
            callback: Box::new(callback),
        });
        PulseHandle {
            id,
            live,
            registry: Arc::downgrade(&self.registry),
        }
    }

    /// Run one frame; returns how many callbacks were invoked.
    ///
    /// The registry lock is released while callbacks run, so callbacks may
    /// register or cancel pulses. Pulses registered during the frame first
    /// run on the next one.
    pub fn run_frame(&self) -> usize {
        let now = self.clock.now_ms();
        let mut due = std::mem::take(&mut *self.registry.lock());
        let mut invoked = 0;

        due.retain_mut(|entry| {
            if !entry.live.load(Ordering::Acquire) {
                return false;
            }
            invoked += 1;
            match (entry.callback)(now) {
                PulseControl::Continue => entry.live.load(Ordering::Acquire),
                PulseControl::Stop => {
                    entry.live.store(false, Ordering::Release);
                    false
                }
            }
        });

        let stale = {
            let mut registry = self.registry.lock();
            let added = std::mem::replace(&mut *registry, due);
            registry.extend(added);
            let (live, stale): (Vec<_>, Vec<_>) = registry
                .drain(..)
                .partition(|entry| entry.live.load(Ordering::Acquire));
            *registry = live;
            stale
        };
        // Dropped outside the lock; captured state may hold other handles
        drop(stale);

        invoked
    }

    /// Number of live registrations
    pub fn pending(&self) -> usize {
        self.registry
            .lock()
            .iter()
            .filter(|entry| entry.live.load(Ordering::Acquire))
            .count()
    }
}

/// Cancellable registration; dropping it cancels the pulse
pub struct PulseHandle {
    id: u64,
    live: Arc<AtomicBool>,
    registry: Weak<Mutex<Vec<PulseEntry>>>,
}

impl PulseHandle {
    /// Release the registration. Idempotent.
    pub fn cancel(&self) {
        if !self.live.swap(false, Ordering::AcqRel) {
            return;
        }
        let Some(registry) = self.registry.upgrade() else {
            return;
        };
        let removed = {
            let mut entries = registry.lock();
            let (removed, kept): (Vec<PulseEntry>, Vec<PulseEntry>) =
                entries.drain(..).partition(|entry| entry.id == self.id);
            *entries = kept;
            removed
        };
        drop(removed);
    }

    /// Whether the pulse will run on the next frame
    pub fn is_active(&self) -> bool {
        self.live.load(Ordering::Acquire)
    }
}

impl Drop for PulseHandle {
    fn drop(&mut self) {
        self.cancel();
    }
}

impl std::fmt::Debug for PulseHandle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PulseHandle")
            .field("id", &self.id)
            .field("active", &self.is_active())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::AtomicUsize;

    fn pulse_loop() -> (Arc<ManualClock>, PulseLoop) {
        let clock = Arc::new(ManualClock::new());
        let pulses = PulseLoop::new(clock.clone());
        (clock, pulses)
    }

    #[test]
    fn test_callback_sees_clock() {
        let (clock, pulses) = pulse_loop();
        let seen = Arc::new(Mutex::new(Vec::new()));
        let sink = seen.clone();
        let _handle = pulses.register(move |now| {
            sink.lock().push(now);
            PulseControl::Continue
        });

        pulses.run_frame();
        clock.set(16.0);
        pulses.run_frame();

        assert_eq!(*seen.lock(), vec![0.0, 16.0]);
    }

    #[test]
    fn test_stop_removes_registration() {
        let (_clock, pulses) = pulse_loop();
        let handle = pulses.register(|_| PulseControl::Stop);

        assert_eq!(pulses.run_frame(), 1);
        assert!(!handle.is_active());
        assert_eq!(pulses.pending(), 0);
        assert_eq!(pulses.run_frame(), 0);
    }

    #[test]
    fn test_cancel_is_idempotent_and_drop_cancels() {
        let (_clock, pulses) = pulse_loop();
        let handle = pulses.register(|_| PulseControl::Continue);
        handle.cancel();
        handle.cancel();
        assert_eq!(pulses.pending(), 0);
        assert_eq!(pulses.run_frame(), 0);

        {
            let _scoped = pulses.register(|_| PulseControl::Continue);
            assert_eq!(pulses.pending(), 1);
        }
        assert_eq!(pulses.pending(), 0);
    }

    #[test]
    fn test_cancel_during_frame_skips_later_pulse() {
        let (_clock, pulses) = pulse_loop();
        let hits = Arc::new(AtomicUsize::new(0));

        let victim_slot: Arc<Mutex<Option<PulseHandle>>> = Arc::new(Mutex::new(None));
        let slot = victim_slot.clone();
        let _killer = pulses.register(move |_| {
            if let Some(victim) = slot.lock().take() {
                victim.cancel();
            }
            PulseControl::Continue
        });

        let counter = hits.clone();
        *victim_slot.lock() = Some(pulses.register(move |_| {
            counter.fetch_add(1, Ordering::SeqCst);
            PulseControl::Continue
        }));

        pulses.run_frame();
        pulses.run_frame();
        assert_eq!(hits.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn test_register_during_frame_runs_next_frame() {
        let (_clock, pulses) = pulse_loop();
        let hits = Arc::new(AtomicUsize::new(0));
        let spawned: Arc<Mutex<Vec<PulseHandle>>> = Arc::new(Mutex::new(Vec::new()));

        let inner_loop = pulses.clone();
        let counter = hits.clone();
        let store = spawned.clone();
        let _parent = pulses.register(move |_| {
            let counter = counter.clone();
            store.lock().push(inner_loop.register(move |_| {
                counter.fetch_add(1, Ordering::SeqCst);
                PulseControl::Stop
            }));
            PulseControl::Stop
        });

        assert_eq!(pulses.run_frame(), 1);
        assert_eq!(hits.load(Ordering::SeqCst), 0);
        assert_eq!(pulses.run_frame(), 1);
        assert_eq!(hits.load(Ordering::SeqCst), 1);
    }
}
