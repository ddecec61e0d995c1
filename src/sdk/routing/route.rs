use std::sync::Arc;

use geojson::Feature;
use serde::Serialize;

use super::cache::{RouteCache, RouteCacheEntry};
use super::error::RoutingError;
use super::geometry::{route_line, Bounds};
use super::points::OrderedPoints;
use super::retry::{fetch_with_retry, RetryPolicy};
use super::service::RoutingProvider;
use crate::sdk::util::cancel::CancelToken;

/// A route ready to draw: one segment spanning every point, plus its bounds.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ResolvedRoute {
    pub segment: Feature,
    pub bounds: Bounds,
    #[serde(skip)]
    pub from_cache: bool,
}

/// Looks routes up in the cache, fetching and storing them on a miss.
pub struct RouteResolver {
    provider: Arc<dyn RoutingProvider>,
    cache: RouteCache,
    retry: RetryPolicy,
}

impl RouteResolver {
    pub fn new(provider: Arc<dyn RoutingProvider>, cache: RouteCache, retry: RetryPolicy) -> Self {
        Self {
            provider,
            cache,
            retry,
        }
    }

    pub fn cache(&self) -> &RouteCache {
        &self.cache
    }

    pub async fn resolve(
        &self,
        points: &OrderedPoints,
        cancel: &CancelToken,
    ) -> Result<ResolvedRoute, RoutingError> {
        if !points.is_routable() {
            return Err(RoutingError::NotEnoughPoints(points.len()));
        }

        let key = points.cache_key();
        if let Some(entry) = self.cache.get(&key) {
            log::debug!("[CACHE HIT] {}", key);
            return Ok(ResolvedRoute {
                segment: entry.segment(points.last_index()),
                bounds: entry.bounds,
                from_cache: true,
            });
        }

        let response = fetch_with_retry(self.provider.as_ref(), points, cancel, &self.retry).await?;
        if cancel.is_cancelled() {
            return Err(RoutingError::Cancelled);
        }

        let entry = RouteCacheEntry::from_line(route_line(response.first_geometry())?)?;
        self.cache.insert(key, entry.clone());
        log::debug!("Cached route #{} for {} points", self.cache.len(), points.len());

        Ok(ResolvedRoute {
            segment: entry.segment(points.last_index()),
            bounds: entry.bounds,
            from_cache: false,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sdk::routing::points::InputPoint;
    use crate::sdk::routing::testing::{Reply, ScriptedProvider};

    fn three_points() -> OrderedPoints {
        OrderedPoints::normalize(&[
            InputPoint::new(50.0, 10.0, 1),
            InputPoint::new(52.0, 12.0, 2),
            InputPoint::new(49.0, 9.0, 3),
        ])
    }

    fn resolver(provider: &Arc<ScriptedProvider>) -> RouteResolver {
        let provider: Arc<dyn RoutingProvider> = provider.clone();
        RouteResolver::new(provider, RouteCache::new(), RetryPolicy::default())
    }

    #[tokio::test(start_paused = true)]
    async fn second_resolve_is_served_from_cache() {
        let provider = Arc::new(ScriptedProvider::new(vec![Reply::line(&[
            [10.0, 50.0],
            [12.0, 52.0],
            [9.0, 49.0],
        ])]));
        let resolver = resolver(&provider);
        let token = CancelToken::detached();

        let first = resolver.resolve(&three_points(), &token).await.unwrap();
        let second = resolver.resolve(&three_points(), &token).await.unwrap();

        assert_eq!(provider.calls(), 1);
        assert!(!first.from_cache);
        assert!(second.from_cache);
        assert_eq!(first.bounds, [[9.0, 49.0], [12.0, 52.0]]);
        assert_eq!(first.segment, second.segment);
        assert_eq!(first.segment.properties.as_ref().unwrap()["toIdx"], 2);
    }

    #[tokio::test(start_paused = true)]
    async fn empty_geometry_is_an_error_and_not_cached() {
        let provider = Arc::new(ScriptedProvider::new(vec![Reply::NoRoutes]));
        let resolver = resolver(&provider);

        let err = resolver
            .resolve(&three_points(), &CancelToken::detached())
            .await
            .unwrap_err();

        assert!(matches!(err, RoutingError::EmptyGeometry));
        assert!(resolver.cache().is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn empty_line_is_an_error() {
        let provider = Arc::new(ScriptedProvider::new(vec![Reply::Line(vec![])]));
        let resolver = resolver(&provider);

        let err = resolver
            .resolve(&three_points(), &CancelToken::detached())
            .await
            .unwrap_err();

        assert!(matches!(err, RoutingError::EmptyGeometry));
    }

    #[tokio::test(start_paused = true)]
    async fn polyline_geometry_is_an_empty_geometry_error() {
        let provider = Arc::new(ScriptedProvider::new(vec![Reply::Body(serde_json::json!({
            "code": "Ok",
            "routes": [{ "geometry": "_p~iF~ps|U_ulLnnqC" }]
        }))]));
        let resolver = resolver(&provider);

        let err = resolver
            .resolve(&three_points(), &CancelToken::detached())
            .await
            .unwrap_err();

        assert!(matches!(err, RoutingError::EmptyGeometry));
        assert_eq!(err.to_string(), "Empty route geometry");
        assert_eq!(provider.calls(), 1);
        assert!(resolver.cache().is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn single_point_never_reaches_the_provider() {
        let provider = Arc::new(ScriptedProvider::new(vec![Reply::Status(500)]));
        let resolver = resolver(&provider);
        let points = OrderedPoints::normalize(&[InputPoint::new(50.0, 10.0, 1)]);

        let err = resolver
            .resolve(&points, &CancelToken::detached())
            .await
            .unwrap_err();

        assert!(matches!(err, RoutingError::NotEnoughPoints(1)));
        assert_eq!(provider.calls(), 0);
    }

    #[tokio::test(start_paused = true)]
    async fn same_coordinates_with_other_ordinals_miss_the_cache() {
        let provider = Arc::new(ScriptedProvider::new(vec![Reply::line(&[
            [10.0, 50.0],
            [12.0, 52.0],
        ])]));
        let resolver = resolver(&provider);
        let token = CancelToken::detached();
        let a = OrderedPoints::normalize(&[
            InputPoint::new(50.0, 10.0, 1),
            InputPoint::new(52.0, 12.0, 2),
        ]);
        let b = OrderedPoints::normalize(&[
            InputPoint::new(50.0, 10.0, 5),
            InputPoint::new(52.0, 12.0, 6),
        ]);

        resolver.resolve(&a, &token).await.unwrap();
        resolver.resolve(&b, &token).await.unwrap();

        assert_eq!(provider.calls(), 2);
        assert_eq!(resolver.cache().len(), 2);
    }
}
