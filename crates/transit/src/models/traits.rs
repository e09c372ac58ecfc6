//! Core traits for transit data.
//!
//! The matching pipeline only talks to datasets through [`TransitDataset`], so
//! the in-memory provider can be swapped for a database-backed one, or for a
//! test double that fails on purpose.

use geo::LineString;

use crate::identifiers::LineIdentifier;
use crate::models::types::*;
use crate::spatial::BoundingBox;

// ============================================================================
// Dataset Trait
// ============================================================================

/// Read-only stops and route geometries of one vehicle type
pub trait TransitDataset: Send + Sync {
    /// Vehicle type every stop and line of this dataset belongs to
    fn vehicle_type(&self) -> VehicleType;

    /// Stops lying strictly inside the box (edges excluded)
    fn stops_in(&self, bounds: &BoundingBox) -> Result<Vec<Stop>>;

    /// Every geometry registered for a line, e.g. one per direction or variant
    ///
    /// Unknown lines yield an empty slice.
    fn route_geometries(&self, line: &LineIdentifier) -> Result<&[LineString]>;
}
