use std::fmt;
use std::hash::{Hash, Hasher};
use std::sync::OnceLock;

use geo::Polygon;

use super::{ElementId, GeometryError, PointLookup, Tags, derive_name, display_tags};
use crate::geometry::polygon_from_coords;

/// An OSM way: an ordered list of node references
///
/// The polygon cache starts empty. `build_polygon` never fills it;
/// `Relation::build_multipolygon` does, on the way's behalf. Once set, the
/// cached polygon is never invalidated, even if the points it was built from
/// change afterwards.
#[derive(Debug, Clone)]
pub struct Way {
    id: ElementId,
    node_refs: Vec<ElementId>,
    tags: Option<Tags>,
    name: Option<String>,
    polygon: OnceLock<Polygon<f64>>,
}

impl Way {
    pub fn new(id: ElementId, node_refs: Vec<ElementId>, tags: Option<Tags>) -> Self {
        let name = derive_name(tags.as_ref());
        Self {
            id,
            node_refs,
            tags,
            name,
            polygon: OnceLock::new(),
        }
    }

    pub fn id(&self) -> ElementId {
        self.id
    }

    pub fn node_refs(&self) -> &[ElementId] {
        &self.node_refs
    }

    pub fn tags(&self) -> Option<&Tags> {
        self.tags.as_ref()
    }

    /// Value of the `name` tag at construction time
    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    /// First and last reference are the same node
    pub fn is_closed(&self) -> bool {
        self.node_refs.len() >= 2 && self.node_refs.first() == self.node_refs.last()
    }

    /// Build the boundary polygon by resolving every node reference in order
    ///
    /// Coordinates go in as (lat, lon), so the polygon's x axis is latitude
    /// and its y axis is longitude. Downstream consumers depend on this
    /// order; do not swap it here.
    ///
    /// Fails on the first reference missing from `points`. The ring is not
    /// validated, only closed.
    pub fn build_polygon<L>(&self, points: &L) -> Result<Polygon<f64>, GeometryError>
    where
        L: PointLookup + ?Sized,
    {
        let coords = self
            .node_refs
            .iter()
            .map(|&id| {
                points
                    .point(id)
                    .map(|p| p.coordinate())
                    .ok_or(GeometryError::MissingPoint {
                        way: self.id,
                        point: id,
                    })
            })
            .collect::<Result<Vec<_>, _>>()?;

        Ok(polygon_from_coords(coords))
    }

    /// Polygon stored by a previous multipolygon build, if any
    pub fn cached_polygon(&self) -> Option<&Polygon<f64>> {
        self.polygon.get()
    }

    /// Store `polygon` in the cache unless one is already there
    ///
    /// Returns whichever polygon ends up cached. Concurrent callers may both
    /// compute a polygon; only the first one is kept.
    pub(crate) fn store_polygon(&self, polygon: Polygon<f64>) -> &Polygon<f64> {
        self.polygon.get_or_init(|| polygon)
    }
}

impl PartialEq for Way {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for Way {}

impl Hash for Way {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.id.hash(state);
    }
}

impl fmt::Display for Way {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Way(id={}, nodes={:?}, tags={})",
            self.id,
            self.node_refs,
            display_tags(self.tags.as_ref())
        )
    }
}
