use std::fmt;
use std::hash::{Hash, Hasher};

use super::{ElementId, Tags, display_tags};

/// An OSM node: a stable identity and a WGS84 coordinate
///
/// Equality and hashing only look at `id`. Two points with the same identity
/// are the same point even if their coordinates or tags differ.
#[derive(Debug, Clone)]
pub struct Point {
    id: ElementId,
    lat: f64,
    lon: f64,
    tags: Option<Tags>,
}

impl Point {
    pub fn new(id: ElementId, lat: f64, lon: f64, tags: Option<Tags>) -> Self {
        Self { id, lat, lon, tags }
    }

    pub fn id(&self) -> ElementId {
        self.id
    }

    pub fn lat(&self) -> f64 {
        self.lat
    }

    pub fn lon(&self) -> f64 {
        self.lon
    }

    pub fn tags(&self) -> Option<&Tags> {
        self.tags.as_ref()
    }

    /// Coordinate as (lat, lon), the axis order used for every ring
    pub fn coordinate(&self) -> (f64, f64) {
        (self.lat, self.lon)
    }
}

impl PartialEq for Point {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for Point {}

impl Hash for Point {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.id.hash(state);
    }
}

impl fmt::Display for Point {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Point(id={}, lat={}, lon={}, tags={})",
            self.id,
            self.lat,
            self.lon,
            display_tags(self.tags.as_ref())
        )
    }
}
