//! Auto-advance countdown
//!
//! A restartable one-shot countdown on top of [`PulseLoop`]. Each pulse
//! reports `min(1, elapsed / duration)`; the completion callback runs once
//! when the ratio reaches 1 and the countdown then stops.

use tracing::trace;

use crate::pulse::{PulseControl, PulseHandle, PulseLoop};

/// Restartable countdown bound to the frame pulse
pub struct AutoAdvanceScheduler {
    pulses: PulseLoop,
    handle: Option<PulseHandle>,
}

impl AutoAdvanceScheduler {
    pub fn new(pulses: PulseLoop) -> Self {
        Self {
            pulses,
            handle: None,
        }
    }

    /// Start a countdown of `duration_ms`, replacing any running one.
    ///
    /// Returns `false` without registering anything when `duration_ms` is 0,
    /// which is how auto-advance is disabled.
    pub fn start<T, C>(&mut self, duration_ms: u64, mut on_tick: T, on_complete: C) -> bool
    where
        T: FnMut(f32) + Send + 'static,
        C: FnOnce() + Send + 'static,
    {
        self.cancel();
        if duration_ms == 0 {
            trace!("auto-advance disabled");
            return false;
        }

        let started_at = self.pulses.now_ms();
        let duration = duration_ms as f64;
        let mut on_complete = Some(on_complete);
        let mut last_ratio = 0.0_f32;

        self.handle = Some(self.pulses.register(move |now| {
            let elapsed = (now - started_at).max(0.0);
            // Never report a smaller ratio, even if the clock steps back
            let ratio = ((elapsed / duration).min(1.0) as f32).max(last_ratio);
            last_ratio = ratio;
            on_tick(ratio);

            if ratio < 1.0 {
                return PulseControl::Continue;
            }
            if let Some(complete) = on_complete.take() {
                complete();
            }
            PulseControl::Stop
        }));
        trace!(duration_ms, started_at, "countdown started");
        true
    }

    /// Stop the countdown. Safe to call at any time, any number of times.
    pub fn cancel(&mut self) {
        if let Some(handle) = self.handle.take() {
            if handle.is_active() {
                trace!("countdown cancelled");
            }
            handle.cancel();
        }
    }

    /// Whether a countdown is still pulsing
    pub fn is_running(&self) -> bool {
        self.handle.as_ref().is_some_and(PulseHandle::is_active)
    }
}

impl Drop for AutoAdvanceScheduler {
    fn drop(&mut self) {
        self.cancel();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pulse::ManualClock;
    use parking_lot::Mutex;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    struct Harness {
        clock: Arc<ManualClock>,
        pulses: PulseLoop,
        ticks: Arc<Mutex<Vec<f32>>>,
        completions: Arc<AtomicUsize>,
    }

    impl Harness {
        fn new() -> Self {
            let clock = Arc::new(ManualClock::new());
            let pulses = PulseLoop::new(clock.clone());
            Self {
                clock,
                pulses,
                ticks: Arc::new(Mutex::new(Vec::new())),
                completions: Arc::new(AtomicUsize::new(0)),
            }
        }

        fn start(&self, scheduler: &mut AutoAdvanceScheduler, duration_ms: u64) -> bool {
            let ticks = self.ticks.clone();
            let completions = self.completions.clone();
            scheduler.start(
                duration_ms,
                move |ratio| ticks.lock().push(ratio),
                move || {
                    completions.fetch_add(1, Ordering::SeqCst);
                },
            )
        }

        fn frame_at(&self, now_ms: f64) {
            self.clock.set(now_ms);
            self.pulses.run_frame();
        }
    }

    #[test]
    fn test_reports_ratio_and_completes_once() {
        let harness = Harness::new();
        let mut scheduler = AutoAdvanceScheduler::new(harness.pulses.clone());
        assert!(harness.start(&mut scheduler, 4000));

        harness.frame_at(1000.0);
        harness.frame_at(2000.0);
        harness.frame_at(4000.0);
        harness.frame_at(6000.0);

        assert_eq!(*harness.ticks.lock(), vec![0.25, 0.5, 1.0]);
        assert_eq!(harness.completions.load(Ordering::SeqCst), 1);
        assert!(!scheduler.is_running());
    }

    #[test]
    fn test_overshoot_is_clamped() {
        let harness = Harness::new();
        let mut scheduler = AutoAdvanceScheduler::new(harness.pulses.clone());
        harness.start(&mut scheduler, 100);

        harness.frame_at(250.0);

        assert_eq!(*harness.ticks.lock(), vec![1.0]);
        assert_eq!(harness.completions.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_ratio_never_decreases() {
        let harness = Harness::new();
        let mut scheduler = AutoAdvanceScheduler::new(harness.pulses.clone());
        harness.clock.set(1000.0);
        harness.start(&mut scheduler, 1000);

        harness.frame_at(1500.0);
        harness.frame_at(1200.0);

        assert_eq!(*harness.ticks.lock(), vec![0.5, 0.5]);
    }

    #[test]
    fn test_zero_duration_never_starts() {
        let harness = Harness::new();
        let mut scheduler = AutoAdvanceScheduler::new(harness.pulses.clone());
        assert!(!harness.start(&mut scheduler, 0));
        assert_eq!(harness.pulses.pending(), 0);

        harness.frame_at(10_000.0);
        assert!(harness.ticks.lock().is_empty());
        assert_eq!(harness.completions.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn test_cancel_before_first_pulse_and_after_completion() {
        let harness = Harness::new();
        let mut scheduler = AutoAdvanceScheduler::new(harness.pulses.clone());
        harness.start(&mut scheduler, 1000);
        scheduler.cancel();
        scheduler.cancel();
        harness.frame_at(2000.0);
        assert!(harness.ticks.lock().is_empty());

        harness.start(&mut scheduler, 1000);
        harness.frame_at(3000.0);
        scheduler.cancel();
        assert_eq!(harness.completions.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_restart_discards_previous_countdown() {
        let harness = Harness::new();
        let mut scheduler = AutoAdvanceScheduler::new(harness.pulses.clone());
        harness.start(&mut scheduler, 1000);
        harness.frame_at(900.0);

        harness.start(&mut scheduler, 1000);
        harness.frame_at(1000.0);

        assert_eq!(harness.completions.load(Ordering::SeqCst), 0);
        assert_eq!(harness.pulses.pending(), 1);
        let ticks = harness.ticks.lock().clone();
        assert_eq!(ticks.len(), 2);
        assert!((ticks[1] - 0.1).abs() < 1e-6);
    }

    #[test]
    fn test_dropping_scheduler_releases_pulse() {
        let harness = Harness::new();
        {
            let mut scheduler = AutoAdvanceScheduler::new(harness.pulses.clone());
            harness.start(&mut scheduler, 1000);
            assert_eq!(harness.pulses.pending(), 1);
        }
        assert_eq!(harness.pulses.pending(), 0);
        harness.frame_at(5000.0);
        assert_eq!(harness.completions.load(Ordering::SeqCst), 0);
    }
}
