//! Deck controller implementation
//!
//! The controller is the single arbiter between gesture, keyboard and timer
//! input. It never writes the index itself: accepted intents become absolute
//! requests to the [`NavigationCursor`], and the value read back by
//! [`DeckController::sync`] drives progress reset, countdown restart and the
//! enter/exit transition.

use std::fmt;
use std::sync::{Arc, Weak};

use parking_lot::{Mutex, RwLock};
use tracing::{debug, info, trace};

use super::{
    CursorRequest, DeckContext, DeckKey, DeckPhase, DeckSubscriber, Direction, InputSource,
    NavigationCursor, Transition,
};
use crate::config::DeckConfig;
use crate::gesture::{DragTracker, GestureThresholds};
use crate::progress::{self, Marker};
use crate::pulse::PulseLoop;
use crate::scheduler::AutoAdvanceScheduler;
use crate::transition::{TransitionAnimator, TransitionMotion};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Lifecycle {
    Inactive,
    Active,
    Disposed,
}

#[derive(Debug, Clone, Copy)]
struct PendingRequest {
    target: usize,
    direction: Direction,
    source: InputSource,
}

/// Deck state stored internally
#[derive(Debug)]
struct DeckState {
    lifecycle: Lifecycle,
    /// Cursor value visible in the current turn, already clamped
    index: Option<usize>,
    direction: Direction,
    progress: f32,
    phase: DeckPhase,
    pending: Option<PendingRequest>,
    transition: Option<Transition>,
    animating: bool,
    /// Bumped whenever a countdown becomes stale
    countdown: u64,
}

impl Default for DeckState {
    fn default() -> Self {
        Self {
            lifecycle: Lifecycle::Inactive,
            index: None,
            direction: Direction::Neutral,
            progress: 0.0,
            phase: DeckPhase::Idle,
            pending: None,
            transition: None,
            animating: false,
            countdown: 0,
        }
    }
}

struct DeckCore {
    len: usize,
    gesture: GestureThresholds,
    auto_advance_ms: Option<u64>,
    cursor: Arc<dyn NavigationCursor>,
    state: RwLock<DeckState>,
    scheduler: Mutex<AutoAdvanceScheduler>,
    drag: Mutex<DragTracker>,
    subscribers: RwLock<Vec<Weak<dyn DeckSubscriber>>>,
}

impl DeckCore {
    fn observe_cursor(&self) -> Option<usize> {
        let last = self.len.checked_sub(1)?;
        let raw = self.cursor.current();
        if raw > last {
            debug!(raw, last, "cursor index out of range, clamping");
        }
        Some(raw.min(last))
    }

    fn is_active(&self) -> bool {
        self.state.read().lifecycle == Lifecycle::Active
    }

    fn activate(self: &Arc<Self>) {
        let observed = self.observe_cursor();
        let generation = {
            let mut state = self.state.write();
            if state.lifecycle != Lifecycle::Inactive {
                return;
            }
            state.lifecycle = Lifecycle::Active;
            state.index = observed;
            state.progress = 0.0;
            state.countdown += 1;
            state.countdown
        };
        info!(len = self.len, index = ?observed, "deck activated");
        self.restart_countdown(generation);
    }

    fn request(&self, direction: Direction, source: InputSource) -> bool {
        if direction == Direction::Neutral {
            return false;
        }
        let target = {
            let mut state = self.state.write();
            if state.lifecycle != Lifecycle::Active {
                trace!(?source, "request ignored, deck not active");
                return false;
            }
            let Some(index) = state.index else {
                return false;
            };
            let target = match direction {
                Direction::Forward if index + 1 < self.len => index + 1,
                Direction::Backward if index > 0 => index - 1,
                _ => {
                    debug!(
                        ?source,
                        ?direction,
                        index,
                        len = self.len,
                        "request dropped at boundary"
                    );
                    return false;
                }
            };
            state.direction = direction;
            state.phase = DeckPhase::Transitioning(direction);
            state.pending = Some(PendingRequest {
                target,
                direction,
                source,
            });
            target
        };

        debug!(?source, ?direction, target, "requesting page change");
        self.cursor.request(CursorRequest::Absolute(target));
        true
    }

    fn go_to(&self, index: usize, source: InputSource) -> bool {
        let target = {
            let mut state = self.state.write();
            if state.lifecycle != Lifecycle::Active {
                return false;
            }
            let (Some(current), Some(last)) = (state.index, self.len.checked_sub(1)) else {
                return false;
            };
            let target = index.min(last);
            if target == current {
                return false;
            }
            let direction = Direction::between(Some(current), Some(target));
            state.direction = direction;
            state.phase = DeckPhase::Transitioning(direction);
            state.pending = Some(PendingRequest {
                target,
                direction,
                source,
            });
            target
        };

        debug!(?source, target, "requesting jump");
        self.cursor.request(CursorRequest::Absolute(target));
        true
    }

    fn sync(self: &Arc<Self>) -> Option<Transition> {
        let observed = self.observe_cursor();
        let (transition, generation) = {
            let mut state = self.state.write();
            if state.lifecycle != Lifecycle::Active {
                return None;
            }
            if state.index == observed {
                let Some(pending) = state.pending.take() else {
                    return None;
                };
                debug!(
                    target = pending.target,
                    source = ?pending.source,
                    "request was not applied, dropping"
                );
                if !state.animating && state.transition.is_none() {
                    state.phase = DeckPhase::Idle;
                }
                drop(state);
                self.resume_countdown();
                return None;
            }

            let from = state.index;
            let to = observed?;
            let direction = match state.pending.take() {
                Some(pending) if pending.target == to => pending.direction,
                _ => Direction::between(from, observed),
            };
            let transition = Transition {
                from,
                to,
                direction,
            };

            state.index = observed;
            state.direction = direction;
            state.progress = 0.0;
            state.phase = DeckPhase::Transitioning(direction);
            state.transition = Some(transition);
            state.animating = false;
            state.countdown += 1;
            (transition, state.countdown)
        };

        debug!(
            from = ?transition.from,
            to = transition.to,
            direction = ?transition.direction,
            "page changed"
        );
        self.restart_countdown(generation);
        self.notify_subscribers(&transition);
        Some(transition)
    }

    fn restart_countdown(self: &Arc<Self>, generation: u64) {
        let mut scheduler = self.scheduler.lock();
        let Some(interval_ms) = self.auto_advance_ms.filter(|_| self.len > 0) else {
            scheduler.cancel();
            return;
        };

        let on_tick = Arc::downgrade(self);
        let on_complete = on_tick.clone();
        scheduler.start(
            interval_ms,
            move |ratio| {
                if let Some(core) = on_tick.upgrade() {
                    core.report_progress(generation, ratio);
                }
            },
            move || {
                if let Some(core) = on_complete.upgrade() {
                    core.countdown_finished(generation);
                }
            },
        );
    }

    /// Start a fresh countdown when a finished one left a page that can
    /// still advance without a timer
    fn resume_countdown(self: &Arc<Self>) {
        if self.auto_advance_ms.is_none() || self.scheduler.lock().is_running() {
            return;
        }
        let generation = {
            let mut state = self.state.write();
            let advancing = state.index.is_some_and(|index| index + 1 < self.len);
            if state.lifecycle != Lifecycle::Active || !advancing {
                return;
            }
            state.progress = 0.0;
            state.countdown += 1;
            state.countdown
        };
        trace!("countdown resumed after unapplied request");
        self.restart_countdown(generation);
    }

    fn report_progress(&self, generation: u64, ratio: f32) {
        let mut state = self.state.write();
        if state.lifecycle == Lifecycle::Active && state.countdown == generation {
            state.progress = ratio.clamp(0.0, 1.0);
        }
    }

    fn countdown_finished(&self, generation: u64) {
        {
            let state = self.state.read();
            if state.lifecycle != Lifecycle::Active || state.countdown != generation {
                return;
            }
        }
        if !self.request(Direction::Forward, InputSource::Timer) {
            trace!("countdown finished on last page, holding");
        }
    }

    fn take_transition(&self) -> Option<Transition> {
        let mut state = self.state.write();
        if state.lifecycle != Lifecycle::Active {
            return None;
        }
        let transition = state.transition.take()?;
        state.animating = true;
        Some(transition)
    }

    fn finish_transition(&self) {
        let mut state = self.state.write();
        state.animating = false;
        if state.pending.is_none() && state.transition.is_none() {
            state.phase = DeckPhase::Idle;
        }
    }

    fn context(&self) -> DeckContext {
        let state = self.state.read();
        DeckContext {
            index: state.index,
            len: self.len,
            direction: state.direction,
            progress: state.progress,
            phase: state.phase,
            can_go_forward: state.index.is_some_and(|index| index + 1 < self.len),
            can_go_backward: state.index.is_some_and(|index| index > 0),
        }
    }

    fn dispose(&self) {
        {
            let mut state = self.state.write();
            if state.lifecycle == Lifecycle::Disposed {
                return;
            }
            state.lifecycle = Lifecycle::Disposed;
            state.pending = None;
            state.transition = None;
            state.animating = false;
            state.phase = DeckPhase::Idle;
            state.countdown += 1;
        }
        self.scheduler.lock().cancel();
        self.drag.lock().cancel();
        self.subscribers.write().clear();
        info!("deck disposed");
    }

    fn notify_subscribers(&self, transition: &Transition) {
        let context = self.context();
        let live: Vec<Arc<dyn DeckSubscriber>> = {
            let mut subscribers = self.subscribers.write();

            // Remove any dead weak references
            subscribers.retain(|weak| weak.strong_count() > 0);
            subscribers.iter().filter_map(Weak::upgrade).collect()
        };

        // Called without holding the lock so subscribers may call back in
        for subscriber in live {
            subscriber.on_page_change(transition, &context);
        }
    }
}

/// Navigation controller for one deck of pages
///
/// Dropping the controller disposes it.
pub struct DeckController<P> {
    pages: Vec<P>,
    animator: TransitionAnimator,
    core: Arc<DeckCore>,
}

impl<P> DeckController<P> {
    /// Create an inactive controller; call [`activate`](Self::activate) to
    /// attach input handling and start the countdown
    pub fn new(
        pages: Vec<P>,
        cursor: Arc<dyn NavigationCursor>,
        pulses: PulseLoop,
        config: DeckConfig,
    ) -> Self {
        let core = DeckCore {
            len: pages.len(),
            gesture: config.gesture,
            auto_advance_ms: config.auto_advance(),
            cursor,
            state: RwLock::new(DeckState::default()),
            scheduler: Mutex::new(AutoAdvanceScheduler::new(pulses)),
            drag: Mutex::new(DragTracker::new()),
            subscribers: RwLock::new(Vec::new()),
        };

        Self {
            pages,
            animator: TransitionAnimator::new(config.transition),
            core: Arc::new(core),
        }
    }

    pub fn activate(&self) {
        self.core.activate();
    }

    pub fn is_active(&self) -> bool {
        self.core.is_active()
    }

    pub fn is_disposed(&self) -> bool {
        self.core.state.read().lifecycle == Lifecycle::Disposed
    }

    /// Release the countdown, drag tracking and subscribers. Idempotent.
    pub fn dispose(&self) {
        self.core.dispose();
    }

    /// Read the cursor back at the start of a turn.
    ///
    /// Returns the transition when the index changed since the last turn.
    pub fn sync(&self) -> Option<Transition> {
        self.core.sync()
    }

    pub fn pages(&self) -> &[P] {
        &self.pages
    }

    pub fn len(&self) -> usize {
        self.pages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pages.is_empty()
    }

    pub fn page(&self, index: usize) -> Option<&P> {
        self.pages.get(index)
    }

    pub fn current_page(&self) -> Option<&P> {
        self.index().and_then(|index| self.pages.get(index))
    }

    pub fn index(&self) -> Option<usize> {
        self.core.state.read().index
    }

    pub fn direction(&self) -> Direction {
        self.core.state.read().direction
    }

    pub fn progress(&self) -> f32 {
        self.core.state.read().progress
    }

    pub fn phase(&self) -> DeckPhase {
        self.core.state.read().phase
    }

    pub fn can_go_forward(&self) -> bool {
        self.core.context().can_go_forward
    }

    pub fn can_go_backward(&self) -> bool {
        self.core.context().can_go_backward
    }

    pub fn context(&self) -> DeckContext {
        self.core.context()
    }

    /// Keyboard handler, to be attached at the window scope
    pub fn handle_key(&self, key: DeckKey) -> bool {
        let direction = match key {
            DeckKey::ArrowLeft => Direction::Backward,
            DeckKey::ArrowRight => Direction::Forward,
            DeckKey::Other => return false,
        };
        self.core.request(direction, InputSource::Keyboard)
    }

    pub fn drag_begin(&self, t_ms: f64) {
        if self.core.is_active() {
            self.core.drag.lock().begin(t_ms);
        }
    }

    /// Relative horizontal movement since the previous drag event
    pub fn drag_move(&self, delta_x: f32, t_ms: f64) {
        self.core.drag.lock().update_by(delta_x, t_ms);
    }

    /// Classify the release and request navigation if it is a swipe
    pub fn drag_end(&self, velocity_x: Option<f32>) -> bool {
        let sample = self.core.drag.lock().release(velocity_x);
        let direction = self.core.gesture.classify_sample(sample);
        trace!(
            offset_x = sample.offset_x,
            velocity_x = sample.velocity_x,
            ?direction,
            "drag released"
        );
        self.core.request(direction, InputSource::Gesture)
    }

    /// Live drag offset for rendering
    pub fn drag_offset(&self) -> f32 {
        self.core.drag.lock().offset()
    }

    pub fn go_forward(&self) -> bool {
        self.core.request(Direction::Forward, InputSource::Programmatic)
    }

    pub fn go_backward(&self) -> bool {
        self.core.request(Direction::Backward, InputSource::Programmatic)
    }

    /// Jump to `index`, clamped to the page range
    pub fn go_to(&self, index: usize) -> bool {
        self.core.go_to(index, InputSource::Programmatic)
    }

    /// Hand the latest transition to the animator. Each transition is
    /// returned once.
    pub fn take_transition(&self) -> Option<Transition> {
        self.core.take_transition()
    }

    /// Report that the enter animation finished
    pub fn finish_transition(&self) {
        self.core.finish_transition();
    }

    /// Whether an auto-advance countdown is currently scheduled
    pub fn is_counting_down(&self) -> bool {
        self.core.scheduler.lock().is_running()
    }

    pub fn animator(&self) -> &TransitionAnimator {
        &self.animator
    }

    pub fn motion(&self, direction: Direction) -> Option<TransitionMotion> {
        self.animator.motion(direction)
    }

    pub fn markers(&self) -> Vec<Marker> {
        let context = self.core.context();
        progress::markers(context.index, context.len, context.progress)
    }

    /// Add a subscriber; only a weak reference is kept
    pub fn add_subscriber(&self, subscriber: Arc<dyn DeckSubscriber>) {
        self.core.subscribers.write().push(Arc::downgrade(&subscriber));
    }
}

impl<P> Drop for DeckController<P> {
    fn drop(&mut self) {
        self.core.dispose();
    }
}

impl<P: fmt::Debug> fmt::Debug for DeckController<P> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DeckController")
            .field("pages", &self.pages)
            .field("context", &self.core.context())
            .finish()
    }
}
