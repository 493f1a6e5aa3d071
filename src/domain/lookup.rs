use std::collections::HashMap;

use super::{ElementId, Point, Way};

/// Read-only point resolution used by `Way::build_polygon`
pub trait PointLookup {
    fn point(&self, id: ElementId) -> Option<&Point>;
}

/// Read-only way resolution used by `Relation::build_multipolygon`
pub trait WayLookup {
    fn way(&self, id: ElementId) -> Option<&Way>;
}

impl PointLookup for HashMap<ElementId, Point> {
    fn point(&self, id: ElementId) -> Option<&Point> {
        self.get(&id)
    }
}

impl WayLookup for HashMap<ElementId, Way> {
    fn way(&self, id: ElementId) -> Option<&Way> {
        self.get(&id)
    }
}
