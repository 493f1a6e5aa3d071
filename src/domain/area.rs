use geo::{BoundingRect, Centroid, MultiPolygon, Polygon};
use serde::Serialize;

use super::{ElementId, Relation, Way};
use crate::geometry::{Bounds, Projector, exterior_coords};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum AreaKind {
    Way,
    Relation,
}

#[derive(Debug, Clone, PartialEq)]
pub enum AreaGeometry {
    Polygon(Polygon<f64>),
    MultiPolygon(MultiPolygon<f64>),
}

impl AreaGeometry {
    pub fn polygons(&self) -> &[Polygon<f64>] {
        match self {
            AreaGeometry::Polygon(p) => std::slice::from_ref(p),
            AreaGeometry::MultiPolygon(mp) => &mp.0,
        }
    }
}

/// A named area built from a way or a relation
///
/// Coordinates keep the (lat, lon) axis order of the source rings.
#[derive(Debug, Clone)]
pub struct Area {
    pub id: ElementId,
    pub kind: AreaKind,
    pub name: Option<String>,
    pub geometry: AreaGeometry,
}

impl Area {
    pub fn from_way(way: &Way, polygon: Polygon<f64>) -> Self {
        Self {
            id: way.id(),
            kind: AreaKind::Way,
            name: way.name().map(str::to_string),
            geometry: AreaGeometry::Polygon(polygon),
        }
    }

    pub fn from_relation(relation: &Relation, multipolygon: MultiPolygon<f64>) -> Self {
        Self {
            id: relation.id(),
            kind: AreaKind::Relation,
            name: relation.name().map(str::to_string),
            geometry: AreaGeometry::MultiPolygon(multipolygon),
        }
    }

    /// Planar centroid as (lat, lon); `None` for empty geometry
    pub fn centroid(&self) -> Option<(f64, f64)> {
        let centroid = match &self.geometry {
            AreaGeometry::Polygon(p) => p.centroid(),
            AreaGeometry::MultiPolygon(mp) => mp.centroid(),
        }?;
        Some((centroid.x(), centroid.y()))
    }

    pub fn bounds(&self) -> Option<Bounds> {
        let rect = match &self.geometry {
            AreaGeometry::Polygon(p) => p.bounding_rect(),
            AreaGeometry::MultiPolygon(mp) => mp.bounding_rect(),
        }?;
        Bounds::from_points(&[(rect.min().x, rect.min().y), (rect.max().x, rect.max().y)])
    }

    /// Approximate surface in square meters, measured around the centroid
    ///
    /// Polygons of a multipolygon are summed; inner/outer roles are not
    /// interpreted.
    pub fn area_m2(&self) -> f64 {
        let Some(center) = self.centroid() else {
            return 0.0;
        };
        let projector = Projector::new(center);
        self.geometry
            .polygons()
            .iter()
            .map(|p| projector.polygon_area_m2(p))
            .sum()
    }

    pub fn record(&self) -> AreaRecord {
        AreaRecord {
            id: self.id,
            kind: self.kind,
            name: self.name.clone(),
            centroid: self.centroid().map(|(lat, lon)| [lat, lon]),
            area_m2: (self.area_m2() * 10.0).round() / 10.0,
            polygons: self
                .geometry
                .polygons()
                .iter()
                .map(|p| {
                    exterior_coords(p)
                        .into_iter()
                        .map(|(lat, lon)| [lat, lon])
                        .collect()
                })
                .collect(),
        }
    }
}

/// Serializable form of an [`Area`]; rings are `[lat, lon]` pairs
#[derive(Debug, Clone, Serialize)]
pub struct AreaRecord {
    pub id: ElementId,
    pub kind: AreaKind,
    pub name: Option<String>,
    pub centroid: Option<[f64; 2]>,
    pub area_m2: f64,
    pub polygons: Vec<Vec<[f64; 2]>>,
}
