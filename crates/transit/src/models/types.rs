//! Core data types and enums for ride detection.

use geo::{LineString, Point};
use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};

use crate::identifiers::*;

// ============================================================================
// Enums
// ============================================================================

/// Kind of vehicle a trip can be matched to
///
/// Each kind owns its own stop and route datasets and consumes a different
/// trace of the trip: buses are matched on the map-snapped trace, trains on the
/// raw one since road snapping drifts away from rail corridors.
#[derive(
    Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize, Display, EnumString,
)]
#[serde(rename_all = "UPPERCASE")]
#[strum(serialize_all = "UPPERCASE")]
pub enum VehicleType {
    Bus,
    Train,
}

impl VehicleType {
    pub const ALL: [VehicleType; 2] = [VehicleType::Bus, VehicleType::Train];
}

// ============================================================================
// Data Structures
// ============================================================================

/// A known stop served by one line
///
/// A physical stop served by several lines appears once per line.
#[derive(Clone, Debug, PartialEq)]
pub struct Stop {
    pub line_id: LineIdentifier,
    pub location: Point,
}

impl Stop {
    pub fn new(line_id: impl Into<LineIdentifier>, longitude: f64, latitude: f64) -> Self {
        Self {
            line_id: line_id.into(),
            location: Point::new(longitude, latitude),
        }
    }

    pub fn longitude(&self) -> f64 {
        self.location.x()
    }

    pub fn latitude(&self) -> f64 {
        self.location.y()
    }
}

/// One GPS trace of a trip, in temporal order. Never empty.
#[derive(Clone, Debug, PartialEq)]
pub struct Trip {
    points: Vec<Point>,
}

impl Trip {
    pub fn new(points: Vec<Point>) -> Result<Self> {
        if points.is_empty() {
            return Err(TransitError::EmptyTrip);
        }
        Ok(Self { points })
    }

    pub fn points(&self) -> &[Point] {
        &self.points
    }

    #[allow(clippy::len_without_is_empty)]
    pub fn len(&self) -> usize {
        self.points.len()
    }

    /// First and last recorded positions
    pub fn endpoints(&self) -> (Point, Point) {
        // non-empty by construction
        let first = self.points[0];
        let last = self.points[self.points.len() - 1];
        (first, last)
    }
}

/// The portion of a line's geometry between two stops
#[derive(Clone, Debug, PartialEq)]
pub struct SlicedRoute {
    pub line_id: LineIdentifier,
    pub points: Vec<Point>,
}

impl SlicedRoute {
    /// Builds the route from consecutive points, dropping repeated neighbours
    pub fn new(line_id: LineIdentifier, mut points: Vec<Point>) -> Self {
        points.dedup();
        Self { line_id, points }
    }

    pub fn first(&self) -> Option<Point> {
        self.points.first().copied()
    }

    pub fn last(&self) -> Option<Point> {
        self.points.last().copied()
    }

    pub fn to_line_string(&self) -> LineString {
        self.points.iter().copied().collect()
    }
}

/// The two traces recorded for a single trip
#[derive(Clone, Debug, Default, PartialEq)]
pub struct TripTraces {
    pub raw: Vec<Point>,
    pub snapped: Vec<Point>,
}

impl TripTraces {
    /// The trace a vehicle type is matched against
    pub fn for_vehicle(&self, vehicle: VehicleType) -> &[Point] {
        match vehicle {
            VehicleType::Bus => &self.snapped,
            VehicleType::Train => &self.raw,
        }
    }
}

// ============================================================================
// Errors
// ============================================================================

#[derive(Debug, thiserror::Error)]
pub enum TransitError {
    #[error("Invalid bounds: [{from_x}, {to_x}] x [{from_y}, {to_y}]")]
    InvalidBounds {
        from_x: f64,
        to_x: f64,
        from_y: f64,
        to_y: f64,
    },

    #[error("Empty input: {0} stop list should contain at least one stop")]
    EmptyInput(&'static str),

    #[error("Trip trace contains no points")]
    EmptyTrip,

    #[error("Route geometry of line {0} has fewer than two points")]
    EmptyGeometry(LineIdentifier),

    #[error("Invalid data: {0}")]
    InvalidData(String),

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    GeoJson(#[from] geojson::Error),

    #[error(transparent)]
    Json(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, TransitError>;
