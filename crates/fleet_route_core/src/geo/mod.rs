pub(crate) mod geometry;
mod point;

pub use point::GeoPoint;
