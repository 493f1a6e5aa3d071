pub mod elements;

pub use elements::{AreaBuild, BuildOptions, OsmElements};
