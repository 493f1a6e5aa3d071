use geo::{Area, LineString, Polygon};

/// Meters per degree of latitude (and of longitude at the equator)
const METERS_PER_DEGREE: f64 = 111320.0;

/// Local equirectangular projection from WGS84 to meters
///
/// Only used to measure areas. Geometry handed to callers always stays in
/// (lat, lon) degrees.
///
/// - x = (lon - center_lon) * cos(center_lat) * 111320
/// - y = (lat - center_lat) * 111320
///
/// Good enough for features a few kilometers across.
#[derive(Debug, Clone)]
pub struct Projector {
    center_lat: f64,
    center_lon: f64,
    cos_lat: f64,
}

impl Projector {
    /// Create a new projector centered at `center` (lat, lon)
    pub fn new(center: (f64, f64)) -> Self {
        let (lat, lon) = center;
        Self {
            center_lat: lat,
            center_lon: lon,
            cos_lat: lat.to_radians().cos(),
        }
    }

    /// Project a lat/lon point to local meters, returned as (x, y)
    pub fn project(&self, lat: f64, lon: f64) -> (f64, f64) {
        let x = (lon - self.center_lon) * self.cos_lat * METERS_PER_DEGREE;
        let y = (lat - self.center_lat) * METERS_PER_DEGREE;
        (x, y)
    }

    fn project_ring(&self, ring: &LineString<f64>) -> LineString<f64> {
        // rings store x = lat, y = lon
        ring.coords()
            .map(|c| self.project(c.x, c.y))
            .collect::<Vec<_>>()
            .into()
    }

    /// Unsigned area of a (lat, lon) polygon in square meters
    pub fn polygon_area_m2(&self, polygon: &Polygon<f64>) -> f64 {
        let exterior = self.project_ring(polygon.exterior());
        let interiors = polygon
            .interiors()
            .iter()
            .map(|ring| self.project_ring(ring))
            .collect();
        Polygon::new(exterior, interiors).unsigned_area()
    }
}
