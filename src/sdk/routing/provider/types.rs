use geojson::{Geometry, JsonValue};
use serde::Deserialize;

// --- Data Structures for parsing OSRM route responses ---

/// Any JSON body deserializes; routes or geometries that don't have the
/// expected shape come out empty and are rejected later as empty geometry.
#[derive(Debug, Default, Deserialize)]
#[serde(from = "JsonValue")]
pub struct DirectionsResponse {
    pub routes: Vec<Route>,
}

#[derive(Debug, Default)]
pub struct Route {
    pub geometry: Option<Geometry>,
}

impl From<JsonValue> for DirectionsResponse {
    fn from(body: JsonValue) -> Self {
        let routes = match body.get("routes") {
            Some(JsonValue::Array(routes)) => routes.iter().map(Route::from_json).collect(),
            _ => Vec::new(),
        };
        Self { routes }
    }
}

impl Route {
    fn from_json(route: &JsonValue) -> Self {
        Self {
            geometry: route
                .get("geometry")
                .and_then(|g| Geometry::from_json_value(g.clone()).ok()),
        }
    }
}

impl DirectionsResponse {
    pub fn first_geometry(&self) -> Option<&Geometry> {
        self.routes.first().and_then(|r| r.geometry.as_ref())
    }
}
