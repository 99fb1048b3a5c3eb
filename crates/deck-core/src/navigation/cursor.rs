use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use parking_lot::RwLock;

/// Write request sent to the routing layer
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CursorRequest {
    Absolute(usize),
    Relative(isize),
}

impl CursorRequest {
    /// Resolve against `current`, clamped to `[0, len - 1]`.
    /// Returns `None` for an empty page list.
    pub fn resolve(self, current: usize, len: usize) -> Option<usize> {
        let last = len.checked_sub(1)?;
        let target = match self {
            CursorRequest::Absolute(index) => index,
            CursorRequest::Relative(delta) => current.min(last).saturating_add_signed(delta),
        };
        Some(target.min(last))
    }
}

/// The externally owned index of a deck
///
/// The routing layer performs the actual write and is the single source of
/// truth; the deck only reads `current` and sends requests. A request must be
/// visible through `current` no later than the next turn of the event loop;
/// one that is not is dropped, and a refused auto-advance counts down again.
pub trait NavigationCursor: Send + Sync {
    fn current(&self) -> usize;

    fn request(&self, request: CursorRequest);
}

impl<T: NavigationCursor + ?Sized> NavigationCursor for Arc<T> {
    fn current(&self) -> usize {
        (**self).current()
    }

    fn request(&self, request: CursorRequest) {
        (**self).request(request)
    }
}

/// Cursor that applies requests immediately
#[derive(Debug)]
pub struct InMemoryCursor {
    len: usize,
    index: RwLock<usize>,
    changes: AtomicUsize,
}

impl InMemoryCursor {
    pub fn new(len: usize) -> Self {
        Self::with_index(len, 0)
    }

    /// Start at `index`; deliberately not clamped so callers can model a
    /// routing layer that reports an out-of-range value
    pub fn with_index(len: usize, index: usize) -> Self {
        Self {
            len,
            index: RwLock::new(index),
            changes: AtomicUsize::new(0),
        }
    }

    /// External write, bypassing the deck
    pub fn set(&self, index: usize) {
        let mut current = self.index.write();
        if *current != index {
            *current = index;
            self.changes.fetch_add(1, Ordering::Relaxed);
        }
    }

    /// Number of writes that changed the index
    pub fn change_count(&self) -> usize {
        self.changes.load(Ordering::Relaxed)
    }
}

impl NavigationCursor for InMemoryCursor {
    fn current(&self) -> usize {
        *self.index.read()
    }

    fn request(&self, request: CursorRequest) {
        let mut current = self.index.write();
        if let Some(target) = request.resolve(*current, self.len) {
            if target != *current {
                *current = target;
                self.changes.fetch_add(1, Ordering::Relaxed);
            }
        }
    }
}
