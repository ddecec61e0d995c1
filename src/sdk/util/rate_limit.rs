use std::num::NonZeroU32;
use std::sync::Arc;
use governor::{Quota, RateLimiter};
use governor::state::{NotKeyed, InMemoryState};
use governor::clock::DefaultClock;

pub type Limiter = Arc<RateLimiter<NotKeyed, InMemoryState, DefaultClock>>;

/// Shared limiter for the routing service; the public OSRM demo server
/// asks for no more than one request per second.
pub fn osrm_limiter(per_minute: NonZeroU32) -> Limiter {
    Arc::new(RateLimiter::direct(Quota::per_minute(per_minute)))
}
