/// Bounding box over (lat, lon) coordinates
#[derive(Debug, Clone, PartialEq)]
pub struct Bounds {
    pub min_lat: f64,
    pub max_lat: f64,
    pub min_lon: f64,
    pub max_lon: f64,
}

impl Bounds {
    /// Create bounds from a set of (lat, lon) points
    pub fn from_points(points: &[(f64, f64)]) -> Option<Self> {
        let (&(lat, lon), rest) = points.split_first()?;

        let mut bounds = Self {
            min_lat: lat,
            max_lat: lat,
            min_lon: lon,
            max_lon: lon,
        };
        bounds.expand(rest);
        Some(bounds)
    }

    /// Expand bounds to include another set of points
    pub fn expand(&mut self, points: &[(f64, f64)]) {
        for &(lat, lon) in points {
            self.min_lat = self.min_lat.min(lat);
            self.max_lat = self.max_lat.max(lat);
            self.min_lon = self.min_lon.min(lon);
            self.max_lon = self.max_lon.max(lon);
        }
    }

    /// Grow to cover `other` as well
    pub fn union(&mut self, other: &Bounds) {
        self.expand(&[
            (other.min_lat, other.min_lon),
            (other.max_lat, other.max_lon),
        ]);
    }
}
