use anyhow::{Context, Result};
use log::warn;
use serde::Deserialize;
use serde_json::Value;
use std::fs;
use std::path::Path;

use crate::domain::{ElementId, Member, Point, Relation, Tags, Way};

/// Raw Overpass API response, as saved to disk by the fetcher
#[derive(Debug, Deserialize)]
pub struct OverpassResponse {
    pub elements: Vec<Element>,
}

/// A single element from Overpass (node, way or relation)
#[derive(Debug, Deserialize)]
pub struct Element {
    #[serde(rename = "type")]
    pub type_: String,
    pub id: ElementId,
    #[serde(default)]
    pub lat: Option<f64>,
    #[serde(default)]
    pub lon: Option<f64>,
    #[serde(default)]
    pub nodes: Option<Vec<ElementId>>,
    #[serde(default)]
    pub members: Option<Vec<Member>>,
    /// Kept untyped so a malformed `tags` value doesn't reject the element
    #[serde(default)]
    pub tags: Option<Value>,
}

impl Element {
    /// Tags as a string map
    ///
    /// A `tags` value that is not an object is treated as absent. Non-string
    /// values inside the object keep their JSON text.
    pub fn tags(&self) -> Option<Tags> {
        match self.tags.as_ref()? {
            Value::Object(map) => Some(
                map.iter()
                    .map(|(k, v)| {
                        let value = match v {
                            Value::String(s) => s.clone(),
                            other => other.to_string(),
                        };
                        (k.clone(), value)
                    })
                    .collect(),
            ),
            Value::Null => None,
            other => {
                warn!(
                    "{} {}: ignoring malformed tags {}",
                    self.type_, self.id, other
                );
                None
            }
        }
    }

    /// Nodes need both coordinates
    pub fn into_point(self) -> Option<Point> {
        if self.type_ != "node" {
            return None;
        }
        let tags = self.tags();
        Some(Point::new(self.id, self.lat?, self.lon?, tags))
    }

    pub fn into_way(self) -> Option<Way> {
        if self.type_ != "way" {
            return None;
        }
        let tags = self.tags();
        Some(Way::new(self.id, self.nodes?, tags))
    }

    /// Relations without a member list get an empty one
    pub fn into_relation(self) -> Option<Relation> {
        if self.type_ != "relation" {
            return None;
        }
        let tags = self.tags();
        Some(Relation::new(
            self.id,
            self.members.unwrap_or_default(),
            tags,
        ))
    }
}

/// Parse a saved Overpass JSON response
pub fn parse_response(json: &str) -> Result<OverpassResponse> {
    serde_json::from_str(json).context("Failed to parse Overpass JSON response")
}

/// Read a saved Overpass JSON response from disk
pub fn load_response(path: &Path) -> Result<OverpassResponse> {
    let contents = fs::read_to_string(path)
        .with_context(|| format!("Failed to read Overpass dump {:?}", path))?;
    parse_response(&contents).with_context(|| format!("Invalid Overpass dump {:?}", path))
}
