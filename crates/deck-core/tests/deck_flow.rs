//! End-to-end deck scenarios driven by a manual clock

use std::sync::Arc;

use deck_core::{
    DeckConfig, DeckController, DeckKey, DeckPhase, Direction, InMemoryCursor, ManualClock,
    MarkerState, PulseLoop,
};

struct Fixture {
    clock: Arc<ManualClock>,
    pulses: PulseLoop,
    cursor: Arc<InMemoryCursor>,
    deck: DeckController<&'static str>,
}

impl Fixture {
    fn new(pages: Vec<&'static str>, interval_ms: u64) -> Self {
        let clock = Arc::new(ManualClock::new());
        let pulses = PulseLoop::new(clock.clone());
        let cursor = Arc::new(InMemoryCursor::new(pages.len()));
        let config = DeckConfig::default().with_auto_advance(interval_ms);
        let deck = DeckController::new(pages, cursor.clone(), pulses.clone(), config);
        deck.activate();
        Self {
            clock,
            pulses,
            cursor,
            deck,
        }
    }

    /// One host turn: read the cursor back, then run the frame pulse
    fn turn_at(&self, now_ms: f64) {
        self.clock.set(now_ms);
        self.deck.sync();
        self.pulses.run_frame();
    }
}

#[test]
fn auto_advance_walks_to_last_page_and_holds() {
    let fx = Fixture::new(vec!["intro", "middle", "outro"], 4000);

    fx.turn_at(2000.0);
    assert_eq!(fx.deck.progress(), 0.5);
    assert!(fx.deck.is_counting_down());

    fx.turn_at(4000.0);
    fx.deck.sync();
    assert_eq!(fx.deck.index(), Some(1));
    assert_eq!(fx.deck.progress(), 0.0);
    assert_eq!(fx.deck.direction(), Direction::Forward);

    fx.turn_at(8000.0);
    fx.deck.sync();
    assert_eq!(fx.deck.index(), Some(2));
    assert_eq!(fx.deck.current_page(), Some(&"outro"));

    fx.turn_at(12_000.0);
    fx.turn_at(16_000.0);
    assert_eq!(fx.deck.index(), Some(2));
    assert_eq!(fx.cursor.change_count(), 2);
    assert_eq!(fx.deck.progress(), 1.0);
    assert_eq!(fx.pulses.pending(), 0);
    assert!(!fx.deck.is_counting_down());

    let last = fx.deck.markers()[2];
    assert_eq!(last.state, MarkerState::Done);
}

#[test]
fn progress_resets_for_every_change_source() {
    let fx = Fixture::new(vec!["a", "b", "c", "d"], 1000);

    fx.turn_at(500.0);
    assert_eq!(fx.deck.progress(), 0.5);
    fx.deck.handle_key(DeckKey::ArrowRight);
    fx.deck.sync();
    assert_eq!(fx.deck.progress(), 0.0);

    fx.turn_at(800.0);
    assert!(fx.deck.progress() > 0.0);
    fx.deck.drag_begin(800.0);
    fx.deck.drag_move(-120.0, 820.0);
    fx.deck.drag_end(None);
    fx.deck.sync();
    assert_eq!(fx.deck.index(), Some(2));
    assert_eq!(fx.deck.progress(), 0.0);

    fx.turn_at(1000.0);
    assert!(fx.deck.progress() > 0.0);
    fx.cursor.set(0);
    fx.deck.sync();
    assert_eq!(fx.deck.progress(), 0.0);
    assert_eq!(fx.deck.direction(), Direction::Backward);
}

#[test]
fn countdown_restarts_from_zero_after_manual_change() {
    let fx = Fixture::new(vec!["a", "b", "c"], 4000);

    fx.turn_at(3500.0);
    fx.deck.handle_key(DeckKey::ArrowRight);
    fx.turn_at(3600.0);
    assert_eq!(fx.deck.index(), Some(1));

    // The old countdown would have fired at 4000
    fx.turn_at(4500.0);
    fx.deck.sync();
    assert_eq!(fx.deck.index(), Some(1));
    assert!((fx.deck.progress() - 0.225).abs() < 1e-6);

    fx.turn_at(7600.0);
    fx.deck.sync();
    assert_eq!(fx.deck.index(), Some(2));
}

#[test]
fn simultaneous_key_and_timer_change_index_once() {
    let fx = Fixture::new(vec!["a", "b", "c"], 4000);

    // Same turn: key press handled, then the frame pulse completes the countdown
    fx.clock.set(4000.0);
    fx.deck.sync();
    assert!(fx.deck.handle_key(DeckKey::ArrowRight));
    fx.pulses.run_frame();

    fx.deck.sync();
    assert_eq!(fx.deck.index(), Some(1));
    assert_eq!(fx.cursor.change_count(), 1);
}

#[test]
fn simultaneous_timer_then_key_change_index_once() {
    let fx = Fixture::new(vec!["a", "b", "c"], 4000);

    fx.clock.set(4000.0);
    fx.deck.sync();
    fx.pulses.run_frame();
    assert!(fx.deck.handle_key(DeckKey::ArrowRight));

    fx.deck.sync();
    assert_eq!(fx.deck.index(), Some(1));
    assert_eq!(fx.cursor.change_count(), 1);
}

#[test]
fn dispose_stops_all_scheduler_effects() {
    let fx = Fixture::new(vec!["a", "b", "c"], 4000);
    fx.turn_at(1000.0);
    let progress = fx.deck.progress();

    fx.deck.dispose();
    assert_eq!(fx.pulses.pending(), 0);

    fx.turn_at(4000.0);
    fx.turn_at(9000.0);
    assert_eq!(fx.cursor.change_count(), 0);
    assert_eq!(fx.deck.progress(), progress);
    assert!(!fx.deck.handle_key(DeckKey::ArrowRight));
}

#[test]
fn dropping_controller_releases_pulse() {
    let clock = Arc::new(ManualClock::new());
    let pulses = PulseLoop::new(clock.clone());
    let cursor = Arc::new(InMemoryCursor::new(3));
    {
        let deck = DeckController::new(
            vec![1, 2, 3],
            cursor.clone(),
            pulses.clone(),
            DeckConfig::default().with_auto_advance(1000),
        );
        deck.activate();
        assert_eq!(pulses.pending(), 1);
    }
    assert_eq!(pulses.pending(), 0);

    clock.set(5000.0);
    assert_eq!(pulses.run_frame(), 0);
    assert_eq!(cursor.change_count(), 0);
}

#[test]
fn disabled_auto_advance_never_moves() {
    let fx = Fixture::new(vec!["a", "b"], 0);
    assert_eq!(fx.pulses.pending(), 0);
    assert!(!fx.deck.is_counting_down());

    fx.turn_at(60_000.0);
    assert_eq!(fx.deck.index(), Some(0));
    assert_eq!(fx.deck.progress(), 0.0);
}

#[test]
fn transition_phase_follows_animation() {
    let fx = Fixture::new(vec!["a", "b"], 0);
    fx.deck.handle_key(DeckKey::ArrowRight);
    assert_eq!(fx.deck.phase(), DeckPhase::Transitioning(Direction::Forward));

    fx.deck.sync();
    let transition = fx.deck.take_transition().unwrap();
    let motion = fx.deck.motion(transition.direction).unwrap();
    assert!(motion.enter.from.offset_x > 0.0);
    assert!(motion.exit.to.offset_x < 0.0);

    fx.deck.finish_transition();
    assert_eq!(fx.deck.phase(), DeckPhase::Idle);
    assert!(!fx.deck.can_go_forward());
    assert!(fx.deck.can_go_backward());
}
