use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::{fs, path::Path};

use super::routing::points::InputPoint;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TourDifficulty {
    Easy,
    Medium,
    Hard,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TourStatus {
    Draft,
    Published,
    Archived,
}

/// A named waypoint of a tour.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Keypoint {
    pub id: i64,
    pub tour_id: i64,
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub image_url: String,
    pub latitude: f64,
    pub longitude: f64,
    pub ordinal: i64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Tour {
    pub id: i64,
    pub author_id: i64,
    pub name: String,
    #[serde(default)]
    pub description: String,
    pub difficulty: TourDifficulty,
    #[serde(default)]
    pub tags: Vec<String>,
    pub status: TourStatus,
    pub price: f64,
    #[serde(default)]
    pub keypoints: Vec<Keypoint>,
}

impl Tour {
    pub fn route_points(&self) -> Vec<InputPoint> {
        self.keypoints.iter().map(InputPoint::from).collect()
    }
}

impl From<&Keypoint> for InputPoint {
    fn from(k: &Keypoint) -> Self {
        InputPoint::new(k.latitude, k.longitude, k.ordinal)
    }
}

// Either a bare list of keypoints or a whole tour
#[derive(Deserialize)]
#[serde(untagged)]
enum KeypointSource {
    Keypoints(Vec<Keypoint>),
    Tour(Box<Tour>),
}

/// Reads keypoints from a JSON file holding a keypoint array or a tour.
pub fn load_keypoints<P: AsRef<Path>>(path: P) -> Result<Vec<Keypoint>> {
    let path = path.as_ref();
    let data = fs::read_to_string(path)
        .with_context(|| format!("Failed to read keypoints from {}", path.display()))?;
    parse_keypoints(&data).with_context(|| format!("Failed to parse keypoints in {}", path.display()))
}

fn parse_keypoints(data: &str) -> Result<Vec<Keypoint>> {
    Ok(match serde_json::from_str::<KeypointSource>(data)? {
        KeypointSource::Keypoints(keypoints) => keypoints,
        KeypointSource::Tour(tour) => tour.keypoints,
    })
}
