use super::types::DirectionsResponse;
use crate::sdk::config::RouterConfig;
use crate::sdk::routing::error::{OsrmErrorPayload, RoutingError};
use crate::sdk::routing::points::OrderedPoints;
use crate::sdk::routing::service::RoutingProvider;
use crate::sdk::util::rate_limit::Limiter;
use async_trait::async_trait;
use reqwest::Client;

pub struct RemoteOsrmProvider {
    client: Client,
    base_url: String,
    profile: String,
    limiter: Limiter,
}

impl RemoteOsrmProvider {
    pub fn new(config: &RouterConfig, limiter: Limiter) -> Result<Self, RoutingError> {
        Ok(Self {
            client: Client::builder().timeout(config.request_timeout).build()?,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            profile: config.profile.clone(),
            limiter,
        })
    }

    pub fn route_url(&self, points: &OrderedPoints) -> String {
        format!(
            "{}/route/v1/{}/{}?geometries=geojson&overview=full&steps=false",
            self.base_url,
            self.profile,
            points.coordinate_path()
        )
    }
}

#[async_trait]
impl RoutingProvider for RemoteOsrmProvider {
    async fn directions(&self, points: &OrderedPoints) -> Result<DirectionsResponse, RoutingError> {
        let url = self.route_url(points);

        self.limiter.until_ready().await;
        log::debug!(
            "[PROVIDER] Calling OSRM route for {} points: {}",
            points.len(),
            url
        );

        let response = match self.client.get(&url).send().await {
            Ok(resp) => resp,
            Err(e) => {
                log::error!("Failed to send GET request. URL: {}\nError: {}", url, e);
                return Err(e.into());
            }
        };

        let status = response.status();
        let text = response.text().await?;

        if !status.is_success() {
            match serde_json::from_str::<OsrmErrorPayload>(&text) {
                Ok(payload) => log::error!(
                    "OSRM returned {} ({}): {}",
                    status,
                    payload.code,
                    payload.message
                ),
                Err(_) => log::error!(
                    "OSRM returned non-success status: {}. Unparseable Body: {}",
                    status,
                    text
                ),
            }
            return Err(RoutingError::Http {
                status: status.as_u16(),
            });
        }

        serde_json::from_str(&text).map_err(|e| {
            log::error!(
                "Failed to parse DirectionsResponse. URL: {}\nError: {}. Body: {}",
                url,
                e,
                text
            );
            e.into()
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sdk::routing::points::InputPoint;
    use crate::sdk::util::rate_limit::osrm_limiter;
    use std::num::NonZeroU32;

    #[test]
    fn builds_route_url() {
        let config = RouterConfig {
            base_url: "http://localhost:5000/".to_string(),
            ..RouterConfig::default()
        };
        let provider =
            RemoteOsrmProvider::new(&config, osrm_limiter(NonZeroU32::new(60).unwrap())).unwrap();
        let points = OrderedPoints::normalize(&[
            InputPoint::new(45.25, 19.5, 1),
            InputPoint::new(45.5, 19.75, 2),
        ]);

        assert_eq!(
            provider.route_url(&points),
            "http://localhost:5000/route/v1/driving/19.5,45.25;19.75,45.5?geometries=geojson&overview=full&steps=false"
        );
    }
}
