pub mod area;
pub mod error;
pub mod lookup;
pub mod point;
pub mod relation;
pub mod way;

pub use area::{Area, AreaGeometry, AreaKind, AreaRecord};
pub use error::GeometryError;
pub use lookup::{PointLookup, WayLookup};
pub use point::Point;
pub use relation::{Member, Relation};
pub use way::Way;

use std::collections::HashMap;

/// OSM element identity, shared by nodes, ways and relations
pub type ElementId = u64;

/// Free-form OSM tags
pub type Tags = HashMap<String, String>;

/// Look up a tag value, treating absent tags the same as empty tags
pub fn tag<'a>(tags: Option<&'a Tags>, key: &str) -> Option<&'a str> {
    tags.and_then(|t| t.get(key)).map(String::as_str)
}

/// Extract the `name` tag, if any
pub(crate) fn derive_name(tags: Option<&Tags>) -> Option<String> {
    tag(tags, "name").map(str::to_string)
}

/// Render tags with sorted keys for diagnostic output
pub(crate) fn display_tags(tags: Option<&Tags>) -> String {
    match tags {
        None => "None".to_string(),
        Some(t) => {
            let mut pairs: Vec<_> = t.iter().collect();
            pairs.sort();
            let body: Vec<String> = pairs
                .into_iter()
                .map(|(k, v)| format!("{:?}: {:?}", k, v))
                .collect();
            format!("{{{}}}", body.join(", "))
        }
    }
}
