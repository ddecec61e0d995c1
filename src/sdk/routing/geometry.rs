use geo::{BoundingRect, LineString};
use geojson::{Feature, FeatureCollection, Geometry, JsonObject, JsonValue, PointType, Value};

use super::error::RoutingError;

/// `[[min_lon, min_lat], [max_lon, max_lat]]`
pub type Bounds = [[f64; 2]; 2];

/// Pulls a non-empty LineString out of an upstream route geometry.
pub fn route_line(geometry: Option<&Geometry>) -> Result<Vec<PointType>, RoutingError> {
    match geometry.map(|g| &g.value) {
        Some(Value::LineString(positions))
            if !positions.is_empty() && positions.iter().all(|p| p.len() >= 2) =>
        {
            Ok(positions.clone())
        }
        _ => Err(RoutingError::EmptyGeometry),
    }
}

pub fn compute_bounds(positions: &[PointType]) -> Option<Bounds> {
    let line: LineString<f64> = positions
        .iter()
        .filter_map(|p| match p.as_slice() {
            [lon, lat, ..] => Some((*lon, *lat)),
            _ => None,
        })
        .collect();

    line.bounding_rect()
        .map(|rect| [[rect.min().x, rect.min().y], [rect.max().x, rect.max().y]])
}

/// A bare LineString feature with empty properties.
pub fn line_feature(positions: Vec<PointType>) -> Feature {
    Feature {
        bbox: None,
        geometry: Some(Geometry::new(Value::LineString(positions))),
        id: None,
        properties: Some(JsonObject::new()),
        foreign_members: None,
    }
}

/// Annotates a route line as the single segment spanning points `0..=to_idx`.
pub fn segment_feature(line: &Feature, to_idx: usize) -> Feature {
    let mut properties = JsonObject::new();
    properties.insert("legIndex".to_string(), JsonValue::from(0));
    properties.insert("fromIdx".to_string(), JsonValue::from(0));
    properties.insert("toIdx".to_string(), JsonValue::from(to_idx));

    Feature {
        properties: Some(properties),
        ..line.clone()
    }
}

pub fn feature_collection(segments: &[Feature]) -> FeatureCollection {
    FeatureCollection {
        bbox: None,
        features: segments.to_vec(),
        foreign_members: None,
    }
}
