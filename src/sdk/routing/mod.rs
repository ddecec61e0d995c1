pub mod cache;
pub mod error;
pub mod geometry;
pub mod points;
pub mod provider;
pub mod retry;
pub mod route;
pub mod service;
pub mod watch;

#[cfg(test)]
pub(crate) mod testing;

pub use cache::{RouteCache, RouteCacheEntry};
pub use error::RoutingError;
pub use geometry::Bounds;
pub use points::{InputPoint, OrderedPoints};
pub use provider::RemoteOsrmProvider;
pub use retry::{fetch_with_retry, RetryPolicy};
pub use route::{ResolvedRoute, RouteResolver};
pub use service::RoutingProvider;
pub use watch::{RouteState, RouteWatcher};
