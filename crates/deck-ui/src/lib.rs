//! egui bindings for deck navigation
//!
//! This crate renders a [`deck_core::DeckController`] as a swipeable page
//! surface and wires pointer drags and arrow keys into it.

pub mod deck_view;
pub mod input;
pub mod markers;
pub mod theme;

/// Re-export commonly used types
pub use deck_view::{DeckView, DeckViewConfig, DeckViewResponse};
pub use input::{bind_drag, deck_key, forward_keys, RouteSwipe};
pub use markers::{progress_markers, MarkerStyle};
pub use theme::{apply_theme, Theme};
