//! Spatial indexing and query utilities.

pub mod index;
pub mod queries;

pub use queries::{geodesic_distance_km, segment_distance, BoundingBox};
