use std::time::Duration;

use super::error::RoutingError;
use super::points::OrderedPoints;
use super::provider::types::DirectionsResponse;
use super::service::RoutingProvider;
use crate::sdk::util::cancel::CancelToken;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    /// Total attempts, including the first one.
    pub max_attempts: u32,
    /// Wait before the second attempt; doubles after every retry.
    pub initial_backoff: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: 3,
            initial_backoff: Duration::from_millis(400),
        }
    }
}

/// Runs one directions request, retrying 429, 5xx and transport failures.
///
/// Other statuses and parse failures are returned straight away. Once the
/// token is cancelled no further request or backoff wait is started and
/// [`RoutingError::Cancelled`] is returned.
pub async fn fetch_with_retry(
    provider: &dyn RoutingProvider,
    points: &OrderedPoints,
    cancel: &CancelToken,
    policy: &RetryPolicy,
) -> Result<DirectionsResponse, RoutingError> {
    let mut attempt = 0;
    let mut delay = policy.initial_backoff;

    loop {
        attempt += 1;
        if cancel.is_cancelled() {
            return Err(RoutingError::Cancelled);
        }

        let result = tokio::select! {
            biased;
            _ = cancel.cancelled() => return Err(RoutingError::Cancelled),
            result = provider.directions(points) => result,
        };

        let err = match result {
            Ok(response) => return Ok(response),
            Err(err) if !err.is_retriable() => return Err(err),
            Err(err) => err,
        };

        if attempt >= policy.max_attempts {
            return Err(match err {
                RoutingError::Http { status } => RoutingError::RetriesExhausted { status },
                other => other,
            });
        }

        log::warn!(
            "Route request failed (attempt {}/{}): {}. Retrying in {:?}",
            attempt,
            policy.max_attempts,
            err,
            delay
        );

        tokio::select! {
            biased;
            _ = cancel.cancelled() => return Err(RoutingError::Cancelled),
            _ = tokio::time::sleep(delay) => {}
        }
        delay *= 2;
    }
}
