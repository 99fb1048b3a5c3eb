//! Directional enter/exit motion

use serde::{Deserialize, Serialize};

use crate::navigation::Direction;

/// Position, opacity and scale of a page
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Pose {
    pub offset_x: f32,
    pub opacity: f32,
    pub scale: f32,
}

impl Pose {
    /// Fully visible, centred
    pub const REST: Pose = Pose {
        offset_x: 0.0,
        opacity: 1.0,
        scale: 1.0,
    };

    pub fn lerp(self, to: Pose, t: f32) -> Pose {
        Pose {
            offset_x: self.offset_x + (to.offset_x - self.offset_x) * t,
            opacity: self.opacity + (to.opacity - self.opacity) * t,
            scale: self.scale + (to.scale - self.scale) * t,
        }
    }
}

/// Animation between two poses
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Motion {
    pub from: Pose,
    pub to: Pose,
}

impl Motion {
    /// Pose at normalised time `t`, eased out
    pub fn sample(&self, t: f32) -> Pose {
        let t = if t.is_nan() { 0.0 } else { t.clamp(0.0, 1.0) };
        self.from.lerp(self.to, ease_out_cubic(t))
    }
}

/// Motion for both pages of one transition
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TransitionMotion {
    pub enter: Motion,
    pub exit: Motion,
    pub duration_ms: u64,
}

/// Transition tuning
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TransitionStyle {
    /// Horizontal travel in pixels
    pub offset_px: f32,

    /// Opacity of a page at the off-screen end of its motion
    pub hidden_opacity: f32,

    /// Scale of a page at the off-screen end of its motion
    pub hidden_scale: f32,

    pub duration_ms: u64,
}

impl Default for TransitionStyle {
    fn default() -> Self {
        Self {
            offset_px: 300.0,
            hidden_opacity: 0.0,
            hidden_scale: 0.95,
            duration_ms: 300,
        }
    }
}

/// Maps a direction to enter/exit motion
#[derive(Debug, Clone, Default)]
pub struct TransitionAnimator {
    style: TransitionStyle,
}

impl TransitionAnimator {
    pub fn new(style: TransitionStyle) -> Self {
        Self { style }
    }

    pub fn style(&self) -> &TransitionStyle {
        &self.style
    }

    /// Forward enters from +x and leaves toward -x; Backward mirrors it.
    /// `Neutral` (initial mount) has no motion.
    pub fn motion(&self, direction: Direction) -> Option<TransitionMotion> {
        let sign = match direction {
            Direction::Forward => 1.0,
            Direction::Backward => -1.0,
            Direction::Neutral => return None,
        };
        Some(TransitionMotion {
            enter: Motion {
                from: self.hidden(sign),
                to: Pose::REST,
            },
            exit: Motion {
                from: Pose::REST,
                to: self.hidden(-sign),
            },
            duration_ms: self.style.duration_ms,
        })
    }

    fn hidden(&self, side: f32) -> Pose {
        Pose {
            offset_x: side * self.style.offset_px,
            opacity: self.style.hidden_opacity,
            scale: self.style.hidden_scale,
        }
    }
}

fn ease_out_cubic(t: f32) -> f32 {
    let inv = 1.0 - t;
    1.0 - inv * inv * inv
}
