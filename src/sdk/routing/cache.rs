use super::error::RoutingError;
use super::geometry::{compute_bounds, line_feature, segment_feature, Bounds};
use geojson::{Feature, PointType};
use serde::{Deserialize, Serialize};
use std::{
    collections::HashMap,
    fs,
    io::Result as IoResult,
    path::Path,
    sync::{Arc, Mutex, MutexGuard, PoisonError},
};

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct RouteCacheEntry {
    pub feature: Feature,
    pub bounds: Bounds,
}

impl RouteCacheEntry {
    pub fn from_line(positions: Vec<PointType>) -> Result<Self, RoutingError> {
        let bounds = compute_bounds(&positions).ok_or(RoutingError::EmptyGeometry)?;
        Ok(Self {
            feature: line_feature(positions),
            bounds,
        })
    }

    /// The single segment drawn for a route through `last_index + 1` points.
    pub fn segment(&self, last_index: usize) -> Feature {
        segment_feature(&self.feature, last_index)
    }
}

/// Computed routes keyed by [`OrderedPoints::cache_key`].
///
/// Entries are never evicted: the map grows for as long as the handle lives.
/// Clones share the same storage.
///
/// [`OrderedPoints::cache_key`]: super::points::OrderedPoints::cache_key
#[derive(Clone, Default, Debug)]
pub struct RouteCache {
    routes: Arc<Mutex<HashMap<String, RouteCacheEntry>>>,
}

impl RouteCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn load_from_file<P: AsRef<Path>>(path: P) -> IoResult<Self> {
        if path.as_ref().exists() {
            let data = fs::read_to_string(path)?;
            let routes: HashMap<String, RouteCacheEntry> = serde_json::from_str(&data)?;
            Ok(Self {
                routes: Arc::new(Mutex::new(routes)),
            })
        } else {
            Ok(Self::default())
        }
    }

    pub fn save_to_file<P: AsRef<Path>>(&self, path: P) -> IoResult<()> {
        let data = serde_json::to_string_pretty(&*self.lock())?;
        fs::write(path, data)
    }

    pub fn get(&self, key: &str) -> Option<RouteCacheEntry> {
        self.lock().get(key).cloned()
    }

    pub fn insert(&self, key: String, entry: RouteCacheEntry) {
        self.lock().insert(key, entry);
    }

    pub fn len(&self) -> usize {
        self.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }

    fn lock(&self) -> MutexGuard<'_, HashMap<String, RouteCacheEntry>> {
        // entries are inserted whole, so a poisoned map is still consistent
        self.routes.lock().unwrap_or_else(PoisonError::into_inner)
    }
}
