use std::fmt;
use std::hash::{Hash, Hasher};
use std::sync::OnceLock;

use geo::{MultiPolygon, Polygon};
use log::debug;
use serde::{Deserialize, Serialize};

use super::{ElementId, GeometryError, PointLookup, Tags, WayLookup, derive_name, display_tags};

/// One entry of a relation's member list
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Member {
    /// Element type of the target: "node", "way" or "relation"
    #[serde(rename = "type")]
    pub type_: String,
    #[serde(rename = "ref")]
    pub ref_: ElementId,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub role: Option<String>,
}

impl Member {
    pub fn new(type_: &str, ref_: ElementId) -> Self {
        Self {
            type_: type_.to_string(),
            ref_,
            role: None,
        }
    }

    pub fn is_way(&self) -> bool {
        self.type_ == "way"
    }
}

/// An OSM relation grouping ways, nodes and other relations
///
/// Only `way` members contribute geometry. Nested relations are skipped, not
/// resolved recursively.
#[derive(Debug, Clone)]
pub struct Relation {
    id: ElementId,
    members: Vec<Member>,
    tags: Option<Tags>,
    name: Option<String>,
    multipolygon: OnceLock<MultiPolygon<f64>>,
}

impl Relation {
    pub fn new(id: ElementId, members: Vec<Member>, tags: Option<Tags>) -> Self {
        let name = derive_name(tags.as_ref());
        Self {
            id,
            members,
            tags,
            name,
            multipolygon: OnceLock::new(),
        }
    }

    pub fn id(&self) -> ElementId {
        self.id
    }

    pub fn members(&self) -> &[Member] {
        &self.members
    }

    pub fn tags(&self) -> Option<&Tags> {
        self.tags.as_ref()
    }

    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    /// Ids of the `way` members, in member order
    pub fn way_refs(&self) -> impl Iterator<Item = ElementId> + '_ {
        self.members.iter().filter(|m| m.is_way()).map(|m| m.ref_)
    }

    /// Multipolygon stored by the collaborator that built it, if any
    pub fn cached_multipolygon(&self) -> Option<&MultiPolygon<f64>> {
        self.multipolygon.get()
    }

    /// Store `multipolygon` unless one is already there
    pub(crate) fn store_multipolygon(&self, multipolygon: MultiPolygon<f64>) -> &MultiPolygon<f64> {
        self.multipolygon.get_or_init(|| multipolygon)
    }

    /// Build the multipolygon from the polygons of all `way` members
    ///
    /// Members are visited in order and anything that is not a way is
    /// skipped. Each member way whose polygon cache is empty gets its polygon
    /// built from `lookup` (the same lookup resolves both ways and points)
    /// and **stored in that way's cache**. Any relation sharing the way later
    /// reuses the stored polygon. Duplicate members give duplicate polygons.
    ///
    /// Every call resolves the members against `lookup`; the relation's own
    /// cache is neither read nor written here. Missing way or point
    /// references fail the whole build and are returned unchanged.
    pub fn build_multipolygon<L>(&self, lookup: &L) -> Result<MultiPolygon<f64>, GeometryError>
    where
        L: WayLookup + PointLookup + ?Sized,
    {
        let mut polygons: Vec<Polygon<f64>> = Vec::new();
        for way_id in self.way_refs() {
            let way = lookup.way(way_id).ok_or(GeometryError::MissingWay {
                relation: self.id,
                way: way_id,
            })?;

            let polygon = match way.cached_polygon() {
                Some(polygon) => {
                    debug!("relation {}: reusing cached polygon of way {}", self.id, way_id);
                    polygon
                }
                None => {
                    debug!("relation {}: building polygon of way {}", self.id, way_id);
                    way.store_polygon(way.build_polygon(lookup)?)
                }
            };
            polygons.push(polygon.clone());
        }

        Ok(MultiPolygon::new(polygons))
    }
}

impl PartialEq for Relation {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for Relation {}

impl Hash for Relation {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.id.hash(state);
    }
}

impl fmt::Display for Relation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let members: Vec<String> = self
            .members
            .iter()
            .map(|m| format!("{} {}", m.type_, m.ref_))
            .collect();
        write!(
            f,
            "Relation(id={}, members=[{}], tags={})",
            self.id,
            members.join(", "),
            display_tags(self.tags.as_ref())
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{Point, Way};
    use std::cell::Cell;
    use std::collections::HashMap;

    /// Points and ways in one lookup, counting every point resolution
    #[derive(Default)]
    struct CountingLookup {
        points: HashMap<ElementId, Point>,
        ways: HashMap<ElementId, Way>,
        point_hits: Cell<usize>,
        way_hits: Cell<usize>,
    }

    impl CountingLookup {
        fn add_point(&mut self, id: ElementId, lat: f64, lon: f64) {
            self.points.insert(id, Point::new(id, lat, lon, None));
        }

        fn add_way(&mut self, id: ElementId, refs: Vec<ElementId>) {
            self.ways.insert(id, Way::new(id, refs, None));
        }
    }

    impl PointLookup for CountingLookup {
        fn point(&self, id: ElementId) -> Option<&Point> {
            self.point_hits.set(self.point_hits.get() + 1);
            self.points.get(&id)
        }
    }

    impl WayLookup for CountingLookup {
        fn way(&self, id: ElementId) -> Option<&Way> {
            self.way_hits.set(self.way_hits.get() + 1);
            self.ways.get(&id)
        }
    }

    fn two_squares() -> CountingLookup {
        let mut lookup = CountingLookup::default();
        lookup.add_point(1, 0.0, 0.0);
        lookup.add_point(2, 0.0, 1.0);
        lookup.add_point(3, 1.0, 1.0);
        lookup.add_point(4, 5.0, 5.0);
        lookup.add_point(5, 5.0, 6.0);
        lookup.add_point(6, 6.0, 6.0);
        lookup.add_way(10, vec![1, 2, 3, 1]);
        lookup.add_way(11, vec![4, 5, 6, 4]);
        lookup
    }

    #[test]
    fn test_multipolygon_skips_non_way_members() {
        let lookup = two_squares();
        let relation = Relation::new(
            1,
            vec![
                Member::new("way", 10),
                Member::new("node", 5),
                Member::new("way", 11),
            ],
            None,
        );

        let multipolygon = relation.build_multipolygon(&lookup).unwrap();
        assert_eq!(multipolygon.0.len(), 2);

        let way_10 = lookup.ways[&10].build_polygon(&lookup.points).unwrap();
        let way_11 = lookup.ways[&11].build_polygon(&lookup.points).unwrap();
        assert_eq!(multipolygon.0[0], way_10);
        assert_eq!(multipolygon.0[1], way_11);
    }

    #[test]
    fn test_multipolygon_caches_member_way_polygons() {
        let lookup = two_squares();
        let relation = Relation::new(1, vec![Member::new("way", 10)], None);

        assert!(lookup.ways[&10].cached_polygon().is_none());
        relation.build_multipolygon(&lookup).unwrap();
        assert!(lookup.ways[&10].cached_polygon().is_some());
        assert!(lookup.ways[&11].cached_polygon().is_none());
    }

    #[test]
    fn test_second_build_reuses_way_cache() {
        let lookup = two_squares();
        let relation = Relation::new(
            1,
            vec![Member::new("way", 10), Member::new("way", 11)],
            None,
        );

        let first = relation.build_multipolygon(&lookup).unwrap();
        assert_eq!(lookup.point_hits.get(), 8);
        assert_eq!(lookup.way_hits.get(), 2);

        let second = relation.build_multipolygon(&lookup).unwrap();
        assert_eq!(first, second);
        // both ways are resolved again, their polygons come from the cache
        assert_eq!(lookup.way_hits.get(), 4);
        assert_eq!(lookup.point_hits.get(), 8);
    }

    #[test]
    fn test_every_build_resolves_against_given_lookup() {
        let first_lookup = two_squares();
        let relation = Relation::new(1, vec![Member::new("way", 10)], None);
        relation.build_multipolygon(&first_lookup).unwrap();

        let empty = CountingLookup::default();
        let err = relation.build_multipolygon(&empty).unwrap_err();
        assert_eq!(err, GeometryError::MissingWay { relation: 1, way: 10 });

        let mut moved = CountingLookup::default();
        moved.add_point(1, 40.0, 40.0);
        moved.add_point(2, 40.0, 41.0);
        moved.add_point(3, 41.0, 41.0);
        moved.add_way(10, vec![1, 2, 3, 1]);
        let multipolygon = relation.build_multipolygon(&moved).unwrap();
        assert_eq!(multipolygon.0[0].exterior().0[0].x, 40.0);
        assert!(relation.cached_multipolygon().is_none());
    }

    #[test]
    fn test_store_multipolygon_keeps_first_value() {
        let lookup = two_squares();
        let relation = Relation::new(1, vec![Member::new("way", 10)], None);
        let built = relation.build_multipolygon(&lookup).unwrap();

        relation.store_multipolygon(built.clone());
        let kept = relation.store_multipolygon(MultiPolygon::new(vec![]));
        assert_eq!(kept, &built);
        assert_eq!(relation.cached_multipolygon(), Some(&built));
    }

    #[test]
    fn test_other_relation_reuses_cached_way_polygon() {
        let lookup = two_squares();
        let first = Relation::new(1, vec![Member::new("way", 10)], None);
        let second = Relation::new(
            2,
            vec![Member::new("way", 10), Member::new("way", 11)],
            None,
        );

        first.build_multipolygon(&lookup).unwrap();
        let hits = lookup.point_hits.get();

        second.build_multipolygon(&lookup).unwrap();
        // only way 11 needs its four refs resolved
        assert_eq!(lookup.point_hits.get(), hits + 4);
    }

    #[test]
    fn test_precached_polygon_is_used_as_is() {
        let lookup = two_squares();
        let stale = crate::geometry::polygon_from_coords(vec![(9.0, 9.0), (9.0, 8.0), (8.0, 8.0)]);
        lookup.ways[&10].store_polygon(stale.clone());

        let relation = Relation::new(1, vec![Member::new("way", 10)], None);
        let multipolygon = relation.build_multipolygon(&lookup).unwrap();

        assert_eq!(multipolygon.0, vec![stale]);
        assert_eq!(lookup.point_hits.get(), 0);
    }

    #[test]
    fn test_empty_relation_builds_empty_multipolygon() {
        let lookup = two_squares();
        let relation = Relation::new(1, vec![], None);

        let multipolygon = relation.build_multipolygon(&lookup).unwrap();
        assert!(multipolygon.0.is_empty());
    }

    #[test]
    fn test_nested_relation_members_are_skipped() {
        let lookup = two_squares();
        let relation = Relation::new(
            1,
            vec![Member::new("relation", 99), Member::new("way", 11)],
            None,
        );

        let multipolygon = relation.build_multipolygon(&lookup).unwrap();
        assert_eq!(multipolygon.0.len(), 1);
    }

    #[test]
    fn test_duplicate_members_are_kept() {
        let lookup = two_squares();
        let relation = Relation::new(
            1,
            vec![Member::new("way", 10), Member::new("way", 10)],
            None,
        );

        let multipolygon = relation.build_multipolygon(&lookup).unwrap();
        assert_eq!(multipolygon.0.len(), 2);
        assert_eq!(multipolygon.0[0], multipolygon.0[1]);
    }

    #[test]
    fn test_missing_way() {
        let lookup = two_squares();
        let relation = Relation::new(3, vec![Member::new("way", 10), Member::new("way", 12)], None);

        let err = relation.build_multipolygon(&lookup).unwrap_err();
        assert_eq!(err, GeometryError::MissingWay { relation: 3, way: 12 });
        assert!(relation.cached_multipolygon().is_none());
    }

    #[test]
    fn test_missing_point_propagates_unchanged() {
        let mut lookup = two_squares();
        lookup.add_way(12, vec![1, 2, 77]);
        let relation = Relation::new(3, vec![Member::new("way", 12)], None);

        let err = relation.build_multipolygon(&lookup).unwrap_err();
        assert_eq!(err, GeometryError::MissingPoint { way: 12, point: 77 });
        assert!(lookup.ways[&12].cached_polygon().is_none());
    }

    #[test]
    fn test_name_identity_and_display() {
        let mut tags = Tags::new();
        tags.insert("name".to_string(), "Prater".to_string());
        let relation = Relation::new(6, vec![Member::new("way", 10)], Some(tags));

        assert_eq!(relation.name(), Some("Prater"));
        assert_eq!(relation, Relation::new(6, vec![], None));
        assert_eq!(Relation::new(6, vec![], None).name(), None);
        assert!(relation.to_string().starts_with("Relation(id=6, members=[way 10]"));
    }

    #[test]
    fn test_member_deserialize() {
        let json = r#"{"type": "way", "ref": 42, "role": "outer"}"#;
        let member: Member = serde_json::from_str(json).unwrap();
        assert!(member.is_way());
        assert_eq!(member.ref_, 42);
        assert_eq!(member.role.as_deref(), Some("outer"));

        let member: Member = serde_json::from_str(r#"{"type": "node", "ref": 1}"#).unwrap();
        assert!(!member.is_way());
        assert_eq!(member.role, None);
    }
}
