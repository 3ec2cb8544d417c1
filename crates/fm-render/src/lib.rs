pub mod curve;
pub mod geometry;
pub mod hit;

pub use geometry::{GeometryProvider, NodeBoundsTable};
