//! Deck subscriber trait

use super::{DeckContext, Transition};

/// Trait for components that need to respond to page changes
pub trait DeckSubscriber: Send + Sync {
    /// Called after the active index changed, from any source
    fn on_page_change(&self, transition: &Transition, context: &DeckContext);
}
