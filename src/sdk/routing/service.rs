use super::error::RoutingError;
use super::points::OrderedPoints;
use super::provider::types::DirectionsResponse;
use async_trait::async_trait;

#[async_trait]
pub trait RoutingProvider: Send + Sync {
    /// Issues a single directions request through every point, in order.
    ///
    /// Implementations do not retry: a non-2xx status is reported as
    /// [`RoutingError::Http`] and a transport failure as
    /// [`RoutingError::Network`], leaving the policy to the caller.
    async fn directions(&self, points: &OrderedPoints) -> Result<DirectionsResponse, RoutingError>;
}
