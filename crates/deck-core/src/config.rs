//! Deck configuration

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{DeckError, Result};
use crate::gesture::GestureThresholds;
use crate::transition::TransitionStyle;

/// Configuration for one deck instance
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DeckConfig {
    /// Auto-advance interval; `None` or 0 disables auto-advance
    pub auto_advance_ms: Option<u64>,

    /// Swipe thresholds
    pub gesture: GestureThresholds,

    /// Enter/exit animation
    pub transition: TransitionStyle,
}

impl DeckConfig {
    pub fn with_auto_advance(mut self, interval_ms: u64) -> Self {
        self.auto_advance_ms = Some(interval_ms);
        self
    }

    /// Effective auto-advance interval, if enabled
    pub fn auto_advance(&self) -> Option<u64> {
        self.auto_advance_ms.filter(|ms| *ms > 0)
    }

    /// Parse and validate a JSON config
    pub fn from_json_str(json: &str) -> Result<Self> {
        let config: DeckConfig = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Load and validate a JSON config file
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let contents = std::fs::read_to_string(path.as_ref())?;
        Self::from_json_str(&contents)
    }

    pub fn validate(&self) -> Result<()> {
        let gesture = &self.gesture;
        if !(gesture.distance_px.is_finite() && gesture.distance_px > 0.0) {
            return Err(DeckError::InvalidConfig(format!(
                "gesture.distance_px must be a positive number, got {}",
                gesture.distance_px
            )));
        }
        if !(gesture.velocity_px_per_s.is_finite() && gesture.velocity_px_per_s > 0.0) {
            return Err(DeckError::InvalidConfig(format!(
                "gesture.velocity_px_per_s must be a positive number, got {}",
                gesture.velocity_px_per_s
            )));
        }

        let transition = &self.transition;
        if !transition.offset_px.is_finite() || transition.offset_px < 0.0 {
            return Err(DeckError::InvalidConfig(format!(
                "transition.offset_px must be non-negative, got {}",
                transition.offset_px
            )));
        }
        if !(0.0..=1.0).contains(&transition.hidden_opacity) {
            return Err(DeckError::InvalidConfig(format!(
                "transition.hidden_opacity must be within [0, 1], got {}",
                transition.hidden_opacity
            )));
        }
        if !(transition.hidden_scale.is_finite() && transition.hidden_scale > 0.0) {
            return Err(DeckError::InvalidConfig(format!(
                "transition.hidden_scale must be positive, got {}",
                transition.hidden_scale
            )));
        }

        Ok(())
    }
}
