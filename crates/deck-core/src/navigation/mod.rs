mod controller;
mod cursor;
mod subscriber;

pub use controller::DeckController;
pub use cursor::{CursorRequest, InMemoryCursor, NavigationCursor};
pub use subscriber::DeckSubscriber;

/// Navigation direction
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Direction {
    Backward = -1,
    #[default]
    Neutral = 0,
    Forward = 1,
}

impl Direction {
    /// Direction of travel between two indices
    pub fn between(from: Option<usize>, to: Option<usize>) -> Self {
        match (from, to) {
            (Some(from), Some(to)) if to > from => Direction::Forward,
            (Some(from), Some(to)) if to < from => Direction::Backward,
            _ => Direction::Neutral,
        }
    }
}

/// Controller phase
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DeckPhase {
    /// No pending change
    #[default]
    Idle,
    /// A change was requested and its animation is in flight
    Transitioning(Direction),
}

/// Keys the deck reacts to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeckKey {
    ArrowLeft,
    ArrowRight,
    Other,
}

/// Where a navigation request came from
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputSource {
    Gesture,
    Keyboard,
    Timer,
    Programmatic,
}

/// One observed index change, handed to the animator once
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Transition {
    pub from: Option<usize>,
    pub to: usize,
    pub direction: Direction,
}

/// Snapshot passed to subscribers and the rendering layer
#[derive(Debug, Clone, PartialEq)]
pub struct DeckContext {
    pub index: Option<usize>,
    pub len: usize,
    pub direction: Direction,
    pub progress: f32,
    pub phase: DeckPhase,
    pub can_go_forward: bool,
    pub can_go_backward: bool,
}
