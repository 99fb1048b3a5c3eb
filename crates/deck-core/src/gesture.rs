//! Horizontal swipe classification
//!
//! A drag release is reduced to a `(offset, velocity)` pair and classified
//! into a [`Direction`]. Either the distance or the speed alone is enough to
//! trigger navigation.

use std::collections::VecDeque;

use serde::{Deserialize, Serialize};

use crate::navigation::Direction;

/// Default release distance in pixels
pub const SWIPE_DISTANCE_PX: f32 = 100.0;

/// Default release speed in pixels per second
pub const SWIPE_VELOCITY_PX_PER_S: f32 = 500.0;

/// Trailing window used to estimate release velocity
const VELOCITY_WINDOW_MS: f64 = 100.0;

/// One drag release: signed pixels and signed pixels per second
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct GestureSample {
    pub offset_x: f32,
    pub velocity_x: f32,
}

impl GestureSample {
    pub fn new(offset_x: f32, velocity_x: f32) -> Self {
        Self { offset_x, velocity_x }
    }
}

/// Swipe thresholds
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GestureThresholds {
    /// Minimum travel in pixels
    pub distance_px: f32,

    /// Minimum release speed in pixels per second
    pub velocity_px_per_s: f32,
}

impl Default for GestureThresholds {
    fn default() -> Self {
        Self {
            distance_px: SWIPE_DISTANCE_PX,
            velocity_px_per_s: SWIPE_VELOCITY_PX_PER_S,
        }
    }
}

impl GestureThresholds {
    /// Classify a release against these thresholds.
    ///
    /// Dragging left (negative x) moves forward. A sample with any
    /// non-finite component is malformed and classifies as `Neutral`.
    pub fn classify(&self, offset_x: f32, velocity_x: f32) -> Direction {
        if !offset_x.is_finite() || !velocity_x.is_finite() {
            return Direction::Neutral;
        }
        if offset_x <= -self.distance_px || velocity_x <= -self.velocity_px_per_s {
            Direction::Forward
        } else if offset_x >= self.distance_px || velocity_x >= self.velocity_px_per_s {
            Direction::Backward
        } else {
            Direction::Neutral
        }
    }

    pub fn classify_sample(&self, sample: GestureSample) -> Direction {
        self.classify(sample.offset_x, sample.velocity_x)
    }
}

/// Classify a release with the default thresholds
pub fn classify(offset_x: f32, velocity_x: f32) -> Direction {
    GestureThresholds::default().classify(offset_x, velocity_x)
}

/// Tracks a single drag interaction from press to release
#[derive(Debug, Default)]
pub struct DragTracker {
    active: bool,
    offset_x: f32,
    samples: VecDeque<(f64, f32)>,
}

impl DragTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start a new interaction, discarding any previous one
    pub fn begin(&mut self, t_ms: f64) {
        self.active = true;
        self.offset_x = 0.0;
        self.samples.clear();
        self.samples.push_back((t_ms, 0.0));
    }

    /// Record the total horizontal offset since `begin`
    pub fn update(&mut self, offset_x: f32, t_ms: f64) {
        if !self.active || !offset_x.is_finite() {
            return;
        }
        self.offset_x = offset_x;
        self.samples.push_back((t_ms, offset_x));

        // Keep one sample older than the window as the velocity anchor
        while self.samples.len() > 2 && self.samples[1].0 <= t_ms - VELOCITY_WINDOW_MS {
            self.samples.pop_front();
        }
    }

    /// Record a relative movement, as reported by most pointer APIs
    pub fn update_by(&mut self, delta_x: f32, t_ms: f64) {
        self.update(self.offset_x + delta_x, t_ms);
    }

    pub fn is_active(&self) -> bool {
        self.active
    }

    /// Live offset for "follow the finger" rendering
    pub fn offset(&self) -> f32 {
        if self.active {
            self.offset_x
        } else {
            0.0
        }
    }

    /// Finish the interaction and hand back its sample.
    ///
    /// A platform-provided velocity wins over the estimate when it is finite.
    pub fn release(&mut self, velocity_x: Option<f32>) -> GestureSample {
        if !self.active {
            return GestureSample::default();
        }
        let velocity_x = velocity_x
            .filter(|v| v.is_finite())
            .unwrap_or_else(|| self.estimate_velocity());
        let sample = GestureSample::new(self.offset_x, velocity_x);
        self.cancel();
        sample
    }

    /// Abandon the interaction without producing a sample
    pub fn cancel(&mut self) {
        self.active = false;
        self.offset_x = 0.0;
        self.samples.clear();
    }

    fn estimate_velocity(&self) -> f32 {
        let (Some(&(t0, x0)), Some(&(t1, x1))) = (self.samples.front(), self.samples.back()) else {
            return 0.0;
        };
        let dt = t1 - t0;
        if dt <= 0.0 {
            return 0.0;
        }
        ((x1 - x0) as f64 / dt * 1000.0) as f32
    }
}
