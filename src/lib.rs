//! osm-areas - Build polygons and multipolygons from OpenStreetMap elements

pub mod api;
pub mod config;
pub mod domain;
pub mod geometry;
pub mod osm;
