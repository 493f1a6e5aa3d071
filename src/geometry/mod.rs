pub mod bounds;
pub mod polygon;
pub mod projection;

pub use bounds::Bounds;
pub use polygon::{exterior_coords, polygon_from_coords};
pub use projection::Projector;
