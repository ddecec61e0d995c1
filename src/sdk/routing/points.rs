use serde::{Deserialize, Serialize};

/// A waypoint tagged with its position in the tour sequence.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InputPoint {
    pub latitude: f64,
    pub longitude: f64,
    pub ordinal: i64,
}

impl InputPoint {
    pub fn new(latitude: f64, longitude: f64, ordinal: i64) -> Self {
        Self {
            latitude,
            longitude,
            ordinal,
        }
    }

    fn same_coordinates(&self, other: &InputPoint) -> bool {
        self.latitude == other.latitude && self.longitude == other.longitude
    }
}

/// Points sorted by ordinal with adjacent coordinate duplicates removed.
///
/// Sorting is stable, so points sharing an ordinal keep their input order.
/// Only *adjacent* duplicates are dropped and the comparison is exact; a
/// point that reappears later in the sequence is kept.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct OrderedPoints(Vec<InputPoint>);

impl OrderedPoints {
    pub fn normalize(points: &[InputPoint]) -> Self {
        let mut sorted = points.to_vec();
        sorted.sort_by_key(|p| p.ordinal);
        // `dedup_by` hands us (current, previously kept)
        sorted.dedup_by(|current, previous| current.same_coordinates(previous));
        Self(sorted)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// A route needs at least two distinct consecutive points.
    pub fn is_routable(&self) -> bool {
        self.0.len() >= 2
    }

    pub fn last_index(&self) -> usize {
        self.0.len().saturating_sub(1)
    }

    pub fn iter(&self) -> impl Iterator<Item = &InputPoint> {
        self.0.iter()
    }

    pub fn as_slice(&self) -> &[InputPoint] {
        &self.0
    }

    /// Cache key of the form `ordinal:lon,lat|ordinal:lon,lat|...`.
    ///
    /// Floats are printed in their shortest round-trip form, so two sequences
    /// share a key only when every coordinate is bit-for-bit equal.
    pub fn cache_key(&self) -> String {
        self.0
            .iter()
            .map(|p| format!("{}:{},{}", p.ordinal, p.longitude, p.latitude))
            .collect::<Vec<_>>()
            .join("|")
    }

    /// Path segment for the directions request: `lon,lat;lon,lat;...`.
    pub fn coordinate_path(&self) -> String {
        self.0
            .iter()
            .map(|p| format!("{},{}", p.longitude, p.latitude))
            .collect::<Vec<_>>()
            .join(";")
    }
}

impl From<&[InputPoint]> for OrderedPoints {
    fn from(points: &[InputPoint]) -> Self {
        Self::normalize(points)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn drops_adjacent_duplicate_after_sorting() {
        let input = [
            InputPoint::new(11.0, 21.0, 3),
            InputPoint::new(10.0, 20.0, 1),
            InputPoint::new(10.0, 20.0, 2),
        ];

        let ordered = OrderedPoints::normalize(&input);

        assert_eq!(
            ordered.as_slice(),
            &[InputPoint::new(10.0, 20.0, 1), InputPoint::new(11.0, 21.0, 3)]
        );
    }

    #[test]
    fn keeps_non_adjacent_duplicates() {
        let input = [
            InputPoint::new(10.0, 20.0, 1),
            InputPoint::new(11.0, 21.0, 2),
            InputPoint::new(10.0, 20.0, 3),
        ];

        assert_eq!(OrderedPoints::normalize(&input).len(), 3);
    }

    #[test]
    fn ties_keep_input_order() {
        let input = [
            InputPoint::new(1.0, 1.0, 5),
            InputPoint::new(2.0, 2.0, 5),
            InputPoint::new(0.0, 0.0, 1),
        ];

        let ordered = OrderedPoints::normalize(&input);
        let lats: Vec<f64> = ordered.iter().map(|p| p.latitude).collect();

        assert_eq!(lats, vec![0.0, 1.0, 2.0]);
    }

    #[test]
    fn near_identical_points_are_not_merged() {
        let input = [
            InputPoint::new(45.2671, 19.8335, 1),
            InputPoint::new(45.267100000001, 19.8335, 2),
        ];

        assert!(OrderedPoints::normalize(&input).is_routable());
    }

    #[test]
    fn single_point_after_dedup_is_not_routable() {
        let input = [
            InputPoint::new(10.0, 20.0, 1),
            InputPoint::new(10.0, 20.0, 2),
        ];

        let ordered = OrderedPoints::normalize(&input);

        assert_eq!(ordered.len(), 1);
        assert!(!ordered.is_routable());
    }

    #[test]
    fn key_and_path_use_lon_lat_order() {
        let input = [
            InputPoint::new(45.25, 19.5, 1),
            InputPoint::new(44.75, 20.0, 2),
        ];

        let ordered = OrderedPoints::normalize(&input);

        assert_eq!(ordered.cache_key(), "1:19.5,45.25|2:20,44.75");
        assert_eq!(ordered.coordinate_path(), "19.5,45.25;20,44.75");
        assert_eq!(ordered.last_index(), 1);
    }
}
