//! Pointer and keyboard plumbing between egui and the deck

use deck_core::{DeckController, DeckKey, DragTracker, SwipeRoutes};
use egui::{Context, Key, Response, Ui};

/// Keys the deck listens to at the window scope
const DECK_KEYS: [Key; 2] = [Key::ArrowLeft, Key::ArrowRight];

pub fn deck_key(key: Key) -> DeckKey {
    match key {
        Key::ArrowLeft => DeckKey::ArrowLeft,
        Key::ArrowRight => DeckKey::ArrowRight,
        _ => DeckKey::Other,
    }
}

/// Forward this frame's arrow presses to an active deck.
/// Returns whether any of them requested a page change.
pub fn forward_keys<P>(ctx: &Context, deck: &DeckController<P>) -> bool {
    if !deck.is_active() {
        return false;
    }
    let mut requested = false;
    for key in DECK_KEYS {
        if ctx.input(|i| i.key_pressed(key)) {
            requested |= deck.handle_key(deck_key(key));
        }
    }
    requested
}

/// Egui input time in milliseconds
fn input_time_ms(ui: &Ui) -> f64 {
    ui.input(|i| i.time) * 1000.0
}

/// Feed a drag-sensing response into the deck's pointer handlers.
/// Returns whether the release requested a page change.
pub fn bind_drag<P>(ui: &Ui, response: &Response, deck: &DeckController<P>) -> bool {
    let now_ms = input_time_ms(ui);
    if response.drag_started() {
        deck.drag_begin(now_ms);
    }
    if response.dragged() {
        deck.drag_move(response.drag_delta().x, now_ms);
    }
    if response.drag_released() {
        let velocity_x = ui.input(|i| i.pointer.velocity().x);
        return deck.drag_end(Some(velocity_x));
    }
    false
}

/// Drag state for swiping between routes on one surface
#[derive(Debug, Default)]
pub struct RouteSwipe {
    tracker: DragTracker,
}

impl RouteSwipe {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn offset(&self) -> f32 {
        self.tracker.offset()
    }

    pub fn begin(&mut self, t_ms: f64) {
        self.tracker.begin(t_ms);
    }

    pub fn update_by(&mut self, delta_x: f32, t_ms: f64) {
        self.tracker.update_by(delta_x, t_ms);
    }

    /// Classify the release against `routes`; returns the route navigated to
    pub fn release(
        &mut self,
        current: &str,
        velocity_x: Option<f32>,
        routes: &dyn SwipeRoutes,
    ) -> Option<String> {
        let sample = self.tracker.release(velocity_x);
        routes.on_release(current, sample)
    }

    /// Drive the swipe from a drag-sensing response
    pub fn bind(
        &mut self,
        ui: &Ui,
        response: &Response,
        current: &str,
        routes: &dyn SwipeRoutes,
    ) -> Option<String> {
        let now_ms = input_time_ms(ui);
        if response.drag_started() {
            self.begin(now_ms);
        }
        if response.dragged() {
            self.update_by(response.drag_delta().x, now_ms);
        }
        if response.drag_released() {
            let velocity_x = ui.input(|i| i.pointer.velocity().x);
            let target = self.release(current, Some(velocity_x), routes);
            if let Some(target) = &target {
                tracing::info!("Swiped from {} to {}", current, target);
            }
            return target;
        }
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use deck_core::{RouteNavigator, SwipeRouter};
    use parking_lot::Mutex;
    use std::sync::Arc;

    #[test]
    fn test_deck_key_mapping() {
        assert_eq!(deck_key(Key::ArrowLeft), DeckKey::ArrowLeft);
        assert_eq!(deck_key(Key::ArrowRight), DeckKey::ArrowRight);
        assert_eq!(deck_key(Key::ArrowUp), DeckKey::Other);
        assert_eq!(deck_key(Key::Space), DeckKey::Other);
    }

    #[test]
    fn test_route_swipe_follows_drag() {
        let visited = Arc::new(Mutex::new(Vec::new()));
        let sink = visited.clone();
        let navigator: Arc<dyn RouteNavigator> =
            Arc::new(move |route: &str| sink.lock().push(route.to_owned()));
        let router = SwipeRouter::new(["/welcome", "/stories"], navigator);

        let mut swipe = RouteSwipe::new();
        swipe.begin(0.0);
        swipe.update_by(-60.0, 400.0);
        swipe.update_by(-60.0, 800.0);
        assert_eq!(swipe.offset(), -120.0);
        assert_eq!(
            swipe.release("/welcome", Some(-50.0), &router),
            Some("/stories".to_string())
        );
        assert_eq!(swipe.offset(), 0.0);

        swipe.begin(1000.0);
        swipe.update_by(40.0, 1400.0);
        assert!(swipe.release("/stories", Some(90.0), &router).is_none());
        assert_eq!(*visited.lock(), vec!["/stories"]);
    }
}
