//! Reactive route state for a map view.
//!
//! [`RouteWatcher`] is fed the current keypoints whenever they change and
//! publishes a [`RouteState`] through a `tokio::sync::watch` channel. Each
//! accepted input starts a new generation: the previous generation's debounce
//! timer and in-flight request are cancelled, and nothing it produces after
//! that point reaches the published state.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;

use geojson::{Feature, FeatureCollection};
use serde::Serialize;
use tokio::sync::watch;
use tokio::task::JoinHandle;

use super::error::RoutingError;
use super::geometry::{feature_collection, Bounds};
use super::points::{InputPoint, OrderedPoints};
use super::route::RouteResolver;
use crate::sdk::util::cancel::{CancelToken, Generations};

/// What the map renders.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct RouteState {
    pub segments: Vec<Feature>,
    pub bounds: Option<Bounds>,
    pub loading: bool,
    pub error: Option<String>,
}

impl RouteState {
    pub fn resolved(segment: Feature, bounds: Bounds) -> Self {
        Self {
            segments: vec![segment],
            bounds: Some(bounds),
            loading: false,
            error: None,
        }
    }

    pub fn failed(err: &RoutingError) -> Self {
        Self {
            error: Some(err.to_string()),
            ..Self::default()
        }
    }

    pub fn feature_collection(&self) -> FeatureCollection {
        feature_collection(&self.segments)
    }
}

#[derive(Default)]
struct Pending {
    // (cache key, point count) of the last accepted input
    input: Option<(String, usize)>,
    task: Option<JoinHandle<()>>,
}

pub struct RouteWatcher {
    resolver: Arc<RouteResolver>,
    debounce: Duration,
    generations: Generations,
    state: Arc<watch::Sender<RouteState>>,
    pending: Mutex<Pending>,
}

impl RouteWatcher {
    pub fn new(resolver: Arc<RouteResolver>, debounce: Duration) -> Self {
        let (state, _rx) = watch::channel(RouteState::default());
        Self {
            resolver,
            debounce,
            generations: Generations::new(),
            state: Arc::new(state),
            pending: Mutex::new(Pending::default()),
        }
    }

    pub fn state(&self) -> RouteState {
        self.state.borrow().clone()
    }

    pub fn subscribe(&self) -> watch::Receiver<RouteState> {
        self.state.subscribe()
    }

    /// Feeds the current points. Must be called from within a Tokio runtime.
    ///
    /// Input that normalizes to the same key and count as the previous call
    /// is ignored. Fewer than two points clears the state immediately;
    /// otherwise work starts once the input has been stable for the debounce
    /// interval.
    pub fn set_points(&self, points: &[InputPoint]) {
        let ordered = OrderedPoints::normalize(points);
        let input = (ordered.cache_key(), ordered.len());

        let mut pending = self.lock();
        if pending.input.as_ref() == Some(&input) {
            return;
        }
        pending.input = Some(input);

        let token = self.generations.advance();
        if let Some(task) = pending.task.take() {
            task.abort();
        }

        if !ordered.is_routable() {
            publish(&self.state, &token, |state| *state = RouteState::default());
            return;
        }

        pending.task = Some(tokio::spawn(run_generation(
            Arc::clone(&self.resolver),
            Arc::clone(&self.state),
            ordered,
            token,
            self.debounce,
        )));
    }

    /// Cancels pending and in-flight work. The last route or error stays
    /// published; `loading` is cleared since nothing is in flight any more.
    pub fn shutdown(&self) {
        self.generations.cancel();
        let mut pending = self.lock();
        if let Some(task) = pending.task.take() {
            task.abort();
        }
        pending.input = None;
        self.state.send_if_modified(|s| std::mem::replace(&mut s.loading, false));
    }

    fn lock(&self) -> MutexGuard<'_, Pending> {
        self.pending.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl Drop for RouteWatcher {
    fn drop(&mut self) {
        self.shutdown();
    }
}

/// Applies `update` unless `token`'s generation has been superseded. The
/// check runs under the channel's write lock, so a newer generation always
/// publishes last.
fn publish(
    state: &watch::Sender<RouteState>,
    token: &CancelToken,
    update: impl FnOnce(&mut RouteState),
) -> bool {
    state.send_if_modified(|current| {
        if token.is_cancelled() {
            return false;
        }
        update(current);
        true
    })
}

async fn run_generation(
    resolver: Arc<RouteResolver>,
    state: Arc<watch::Sender<RouteState>>,
    points: OrderedPoints,
    token: CancelToken,
    debounce: Duration,
) {
    tokio::select! {
        biased;
        _ = token.cancelled() => return,
        _ = tokio::time::sleep(debounce) => {}
    }

    publish(&state, &token, |s| {
        s.loading = true;
        s.error = None;
    });

    match resolver.resolve(&points, &token).await {
        Ok(route) => {
            publish(&state, &token, |s| {
                *s = RouteState::resolved(route.segment, route.bounds)
            });
        }
        Err(RoutingError::Cancelled) => {
            log::debug!("Route generation {} superseded", token.generation());
        }
        Err(err) => {
            log::error!("Routing error: {}", err);
            publish(&state, &token, |s| *s = RouteState::failed(&err));
        }
    }
}
