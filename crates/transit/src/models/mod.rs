//! Ride detection data models, types, and traits.

pub mod traits;
pub mod types;

// Re-exports for convenience
pub use traits::TransitDataset;
pub use types::{Result, SlicedRoute, Stop, TransitError, Trip, TripTraces, VehicleType};
