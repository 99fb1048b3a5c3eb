//! Swipe navigation between routes
//!
//! Two variants share the gesture classifier: [`SwipeRouter`] walks an
//! ordered list of routes, [`LinkedSwipeRoutes`] follows explicit per-route
//! neighbours. Neither owns the current route; both forward the chosen
//! target to an injected [`RouteNavigator`].

use std::sync::Arc;

use ahash::AHashMap;
use tracing::debug;

use crate::gesture::{GestureSample, GestureThresholds};
use crate::navigation::Direction;

/// Write path into the host router
pub trait RouteNavigator: Send + Sync {
    fn navigate(&self, route: &str);
}

impl<F> RouteNavigator for F
where
    F: Fn(&str) + Send + Sync,
{
    fn navigate(&self, route: &str) {
        self(route)
    }
}

/// Route table that resolves swipe directions to neighbouring routes
pub trait SwipeRoutes {
    /// Neighbour of `current` in `direction`, if there is one
    fn target(&self, current: &str, direction: Direction) -> Option<&str>;

    fn thresholds(&self) -> GestureThresholds;

    fn navigator(&self) -> &dyn RouteNavigator;

    /// Classify a drag release on `current` and navigate if it is a swipe.
    /// Returns the route navigated to.
    fn on_release(&self, current: &str, sample: GestureSample) -> Option<String> {
        let direction = self.thresholds().classify_sample(sample);
        let target = self.target(current, direction)?.to_owned();
        debug!(from = current, to = %target, ?direction, "swipe route change");
        self.navigator().navigate(&target);
        Some(target)
    }
}

/// Trailing slashes do not make a different route
fn normalize(route: &str) -> &str {
    let trimmed = route.trim_end_matches('/');
    if trimmed.is_empty() {
        "/"
    } else {
        trimmed
    }
}

/// Swipe between neighbours in an ordered route list
pub struct SwipeRouter {
    routes: Vec<String>,
    thresholds: GestureThresholds,
    navigator: Arc<dyn RouteNavigator>,
}

impl SwipeRouter {
    pub fn new<I, S>(routes: I, navigator: Arc<dyn RouteNavigator>) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            routes: routes.into_iter().map(Into::into).collect(),
            thresholds: GestureThresholds::default(),
            navigator,
        }
    }

    pub fn with_thresholds(mut self, thresholds: GestureThresholds) -> Self {
        self.thresholds = thresholds;
        self
    }

    pub fn routes(&self) -> &[String] {
        &self.routes
    }
}

impl SwipeRoutes for SwipeRouter {
    fn target(&self, current: &str, direction: Direction) -> Option<&str> {
        let current = normalize(current);
        let position = self
            .routes
            .iter()
            .position(|route| normalize(route) == current)?;
        let target = match direction {
            Direction::Forward => position.checked_add(1)?,
            Direction::Backward => position.checked_sub(1)?,
            Direction::Neutral => return None,
        };
        self.routes.get(target).map(String::as_str)
    }

    fn thresholds(&self) -> GestureThresholds {
        self.thresholds
    }

    fn navigator(&self) -> &dyn RouteNavigator {
        self.navigator.as_ref()
    }
}

#[derive(Debug, Clone, Default)]
struct RouteLinks {
    backward: Option<String>,
    forward: Option<String>,
}

/// Swipe routes where each route names its own neighbours
pub struct LinkedSwipeRoutes {
    links: AHashMap<String, RouteLinks>,
    thresholds: GestureThresholds,
    navigator: Arc<dyn RouteNavigator>,
}

impl LinkedSwipeRoutes {
    pub fn new(navigator: Arc<dyn RouteNavigator>) -> Self {
        Self {
            links: AHashMap::new(),
            thresholds: GestureThresholds::default(),
            navigator,
        }
    }

    pub fn with_thresholds(mut self, thresholds: GestureThresholds) -> Self {
        self.thresholds = thresholds;
        self
    }

    /// Declare where swiping from `route` leads. Later calls for the same
    /// route replace earlier ones.
    pub fn link(mut self, route: &str, backward: Option<&str>, forward: Option<&str>) -> Self {
        self.links.insert(
            normalize(route).to_owned(),
            RouteLinks {
                backward: backward.map(str::to_owned),
                forward: forward.map(str::to_owned),
            },
        );
        self
    }
}

impl SwipeRoutes for LinkedSwipeRoutes {
    fn target(&self, current: &str, direction: Direction) -> Option<&str> {
        let links = self.links.get(normalize(current))?;
        match direction {
            Direction::Forward => links.forward.as_deref(),
            Direction::Backward => links.backward.as_deref(),
            Direction::Neutral => None,
        }
    }

    fn thresholds(&self) -> GestureThresholds {
        self.thresholds
    }

    fn navigator(&self) -> &dyn RouteNavigator {
        self.navigator.as_ref()
    }
}
