use log::{debug, info, warn};
use std::collections::HashMap;
use std::collections::hash_map::Entry;

use crate::api::OverpassResponse;
use crate::domain::{
    Area, AreaKind, ElementId, GeometryError, Point, PointLookup, Relation, Way, WayLookup,
};

/// Which areas to build and how to treat unresolved references
#[derive(Debug, Clone, Copy)]
pub struct BuildOptions {
    pub include_ways: bool,
    pub include_relations: bool,
    /// Log and skip elements with missing references instead of failing
    pub skip_unresolved: bool,
}

impl Default for BuildOptions {
    fn default() -> Self {
        Self {
            include_ways: true,
            include_relations: true,
            skip_unresolved: false,
        }
    }
}

/// Areas built from a dataset, plus the elements that could not be resolved
#[derive(Debug, Default)]
pub struct AreaBuild {
    pub areas: Vec<Area>,
    pub skipped: Vec<(AreaKind, ElementId, GeometryError)>,
}

/// All points, ways and relations of one or more Overpass responses
///
/// Elements are de-duplicated by identity: the first occurrence of an id wins
/// and later copies are only counted. Ways and relations keep input order.
#[derive(Debug, Default)]
pub struct OsmElements {
    points: HashMap<ElementId, Point>,
    ways: Vec<Way>,
    way_index: HashMap<ElementId, usize>,
    relations: Vec<Relation>,
    relation_index: HashMap<ElementId, usize>,
    duplicates: usize,
    rejected: usize,
}

impl OsmElements {
    pub fn new() -> Self {
        Self::default()
    }

    /// Collect the elements of several responses, e.g. one per queried area
    pub fn from_responses<I>(responses: I) -> Self
    where
        I: IntoIterator<Item = OverpassResponse>,
    {
        let mut elements = Self::new();
        for response in responses {
            elements.extend(response);
        }
        info!(
            "Found {} points, {} ways and {} relations ({} duplicates, {} rejected)",
            elements.points.len(),
            elements.ways.len(),
            elements.relations.len(),
            elements.duplicates,
            elements.rejected
        );
        elements
    }

    /// Add every element of `response`
    pub fn extend(&mut self, response: OverpassResponse) {
        for element in response.elements {
            let (type_, id) = (element.type_.clone(), element.id);
            let inserted = match type_.as_str() {
                "node" => element.into_point().map(|p| self.insert_point(p)),
                "way" => element.into_way().map(|w| self.insert_way(w)),
                "relation" => element.into_relation().map(|r| self.insert_relation(r)),
                other => {
                    debug!("ignoring element {} of unknown type {:?}", id, other);
                    continue;
                }
            };
            match inserted {
                Some(true) => {}
                Some(false) => self.duplicates += 1,
                None => {
                    warn!("{} {}: missing geometry fields, skipped", type_, id);
                    self.rejected += 1;
                }
            }
        }
    }

    /// Returns false if a point with the same id is already present
    pub fn insert_point(&mut self, point: Point) -> bool {
        match self.points.entry(point.id()) {
            Entry::Occupied(_) => false,
            Entry::Vacant(slot) => {
                slot.insert(point);
                true
            }
        }
    }

    pub fn insert_way(&mut self, way: Way) -> bool {
        match self.way_index.entry(way.id()) {
            Entry::Occupied(_) => false,
            Entry::Vacant(slot) => {
                slot.insert(self.ways.len());
                self.ways.push(way);
                true
            }
        }
    }

    pub fn insert_relation(&mut self, relation: Relation) -> bool {
        match self.relation_index.entry(relation.id()) {
            Entry::Occupied(_) => false,
            Entry::Vacant(slot) => {
                slot.insert(self.relations.len());
                self.relations.push(relation);
                true
            }
        }
    }

    pub fn points(&self) -> impl Iterator<Item = &Point> {
        self.points.values()
    }

    pub fn ways(&self) -> &[Way] {
        &self.ways
    }

    pub fn relations(&self) -> &[Relation] {
        &self.relations
    }

    pub fn relation(&self, id: ElementId) -> Option<&Relation> {
        self.relation_index.get(&id).map(|&i| &self.relations[i])
    }

    /// Number of elements dropped because their id was already present
    pub fn duplicates(&self) -> usize {
        self.duplicates
    }

    /// Number of elements dropped because they lacked coordinates or node refs
    pub fn rejected(&self) -> usize {
        self.rejected
    }

    /// Build the polygon of every way, then the multipolygon of every relation
    ///
    /// Way polygons go through the way cache, so relations built afterwards
    /// reuse them instead of resolving points again. Each built multipolygon
    /// is stored on its relation.
    pub fn build_areas(&self, options: &BuildOptions) -> Result<AreaBuild, GeometryError> {
        let mut build = AreaBuild::default();

        if options.include_ways {
            for way in &self.ways {
                if !way.is_closed() {
                    debug!("way {}: ring is not closed, closing it", way.id());
                }
                let polygon = match way.cached_polygon() {
                    Some(polygon) => Ok(polygon.clone()),
                    None => way
                        .build_polygon(self)
                        .map(|polygon| way.store_polygon(polygon).clone()),
                };
                match polygon {
                    Ok(polygon) => build.areas.push(Area::from_way(way, polygon)),
                    Err(err) if options.skip_unresolved => {
                        warn!("skipping way {}: {}", way.id(), err);
                        build.skipped.push((AreaKind::Way, way.id(), err));
                    }
                    Err(err) => return Err(err),
                }
            }
        }

        if options.include_relations {
            for relation in &self.relations {
                match relation.build_multipolygon(self) {
                    Ok(multipolygon) => {
                        let multipolygon = relation.store_multipolygon(multipolygon);
                        build
                            .areas
                            .push(Area::from_relation(relation, multipolygon.clone()));
                    }
                    Err(err) if options.skip_unresolved => {
                        warn!("skipping relation {}: {}", relation.id(), err);
                        build.skipped.push((AreaKind::Relation, relation.id(), err));
                    }
                    Err(err) => return Err(err),
                }
            }
        }

        info!(
            "Built {} areas ({} skipped)",
            build.areas.len(),
            build.skipped.len()
        );
        Ok(build)
    }
}

impl PointLookup for OsmElements {
    fn point(&self, id: ElementId) -> Option<&Point> {
        self.points.get(&id)
    }
}

impl WayLookup for OsmElements {
    fn way(&self, id: ElementId) -> Option<&Way> {
        self.way_index.get(&id).map(|&i| &self.ways[i])
    }
}
