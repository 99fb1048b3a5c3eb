//! Core functionality for paginated deck navigation
//!
//! This crate provides the content-agnostic pieces of a deck: gesture
//! classification, the auto-advance countdown, transition motion, and the
//! controller that arbitrates between all input sources.

pub mod config;
pub mod error;
pub mod gesture;
pub mod navigation;
pub mod progress;
pub mod pulse;
pub mod routing;
pub mod scheduler;
pub mod transition;

// Re-export commonly used types
pub use config::DeckConfig;
pub use error::{DeckError, Result};
pub use gesture::{classify, DragTracker, GestureSample, GestureThresholds};
pub use navigation::{
    CursorRequest, DeckContext, DeckController, DeckKey, DeckPhase, DeckSubscriber, Direction,
    InMemoryCursor, InputSource, NavigationCursor, Transition,
};
pub use progress::{markers, Marker, MarkerState};
pub use pulse::{Clock, ManualClock, MonotonicClock, PulseControl, PulseHandle, PulseLoop};
pub use routing::{LinkedSwipeRoutes, RouteNavigator, SwipeRouter, SwipeRoutes};
pub use scheduler::AutoAdvanceScheduler;
pub use transition::{Motion, Pose, TransitionAnimator, TransitionMotion, TransitionStyle};
