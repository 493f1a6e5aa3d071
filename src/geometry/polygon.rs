use geo::{LineString, Polygon};

/// Build a single-ring polygon from (lat, lon) pairs
///
/// The pairs are used as-is: x is latitude, y is longitude. The ring is
/// closed if the last pair differs from the first; nothing else is checked.
pub fn polygon_from_coords(coords: Vec<(f64, f64)>) -> Polygon<f64> {
    Polygon::new(LineString::from(coords), vec![])
}

/// Exterior ring of a polygon as (lat, lon) pairs
pub fn exterior_coords(polygon: &Polygon<f64>) -> Vec<(f64, f64)> {
    polygon.exterior().coords().map(|c| (c.x, c.y)).collect()
}
