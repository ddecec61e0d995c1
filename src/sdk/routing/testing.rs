//! In-memory provider with a scripted sequence of replies.

use std::collections::VecDeque;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;
use std::time::Duration;

use async_trait::async_trait;

use super::error::RoutingError;
use super::points::OrderedPoints;
use super::provider::types::DirectionsResponse;
use super::service::RoutingProvider;

#[derive(Debug, Clone)]
pub(crate) enum Reply {
    Line(Vec<Vec<f64>>),
    Status(u16),
    Network,
    NoRoutes,
    Body(serde_json::Value),
}

impl Reply {
    pub(crate) fn line(coords: &[[f64; 2]]) -> Self {
        Reply::Line(coords.iter().map(|c| c.to_vec()).collect())
    }

    fn into_result(self) -> Result<DirectionsResponse, RoutingError> {
        match self {
            Reply::Line(coords) => Ok(serde_json::from_value(serde_json::json!({
                "code": "Ok",
                "routes": [{
                    "geometry": { "type": "LineString", "coordinates": coords }
                }]
            }))?),
            Reply::Status(status) => Err(RoutingError::Http { status }),
            Reply::Network => Err(RoutingError::Network("connection reset".to_string())),
            Reply::NoRoutes => Ok(serde_json::from_value(serde_json::json!({ "code": "Ok", "routes": [] }))?),
            Reply::Body(body) => Ok(serde_json::from_value(body)?),
        }
    }
}

/// Pops one reply per call; the last reply repeats once the script runs out.
pub(crate) struct ScriptedProvider {
    replies: Mutex<VecDeque<Reply>>,
    latency: Duration,
    calls: AtomicUsize,
    requested: Mutex<Vec<String>>,
}

impl ScriptedProvider {
    pub(crate) fn new(replies: Vec<Reply>) -> Self {
        Self {
            replies: Mutex::new(replies.into()),
            latency: Duration::ZERO,
            calls: AtomicUsize::new(0),
            requested: Mutex::new(Vec::new()),
        }
    }

    pub(crate) fn with_latency(mut self, latency: Duration) -> Self {
        self.latency = latency;
        self
    }

    pub(crate) fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    /// Cache keys of every request made so far.
    pub(crate) fn requested(&self) -> Vec<String> {
        self.requested.lock().unwrap().clone()
    }

    fn next_reply(&self) -> Reply {
        let mut replies = self.replies.lock().unwrap();
        if replies.len() > 1 {
            replies.pop_front().unwrap()
        } else {
            replies.front().cloned().expect("script needs at least one reply")
        }
    }
}

#[async_trait]
impl RoutingProvider for ScriptedProvider {
    async fn directions(&self, points: &OrderedPoints) -> Result<DirectionsResponse, RoutingError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.requested.lock().unwrap().push(points.cache_key());
        let reply = self.next_reply();
        if !self.latency.is_zero() {
            tokio::time::sleep(self.latency).await;
        }
        reply.into_result()
    }
}
