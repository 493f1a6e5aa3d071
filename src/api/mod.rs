pub mod overpass;

pub use overpass::{Element, OverpassResponse, load_response};
