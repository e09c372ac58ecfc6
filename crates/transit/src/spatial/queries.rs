//! Spatial query utilities.
//!
//! Stop search and route slicing work in planar degrees, matching the
//! straight nearest-segment logic of the datasets. Travelled distance is
//! measured on the International 1924 ellipsoid.

use std::sync::OnceLock;

use geo::{EuclideanDistance, Line, Point};
use geographiclib_rs::{Geodesic, InverseGeodesic};
use rstar::AABB;

use crate::models::types::{Result, TransitError};

/// Semi-major axis of the International 1924 (Hayford) ellipsoid, in meters
pub const INTL_1924_SEMI_MAJOR_AXIS: f64 = 6_378_388.0;

/// Flattening of the International 1924 (Hayford) ellipsoid
pub const INTL_1924_FLATTENING: f64 = 1.0 / 297.0;

fn intl_1924() -> &'static Geodesic {
    static GEODESIC: OnceLock<Geodesic> = OnceLock::new();
    GEODESIC.get_or_init(|| Geodesic::new(INTL_1924_SEMI_MAJOR_AXIS, INTL_1924_FLATTENING))
}

/// Geodesic distance between two points in kilometers
pub fn geodesic_distance_km(p1: Point, p2: Point) -> f64 {
    let meters: f64 = intl_1924().inverse(p1.y(), p1.x(), p2.y(), p2.x());
    meters / 1000.0
}

/// Planar distance from a point to a segment, in degrees
pub fn segment_distance(point: Point, segment: &Line) -> f64 {
    point.euclidean_distance(segment)
}

/// Axis-aligned search rectangle in degrees
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct BoundingBox {
    pub from_x: f64,
    pub to_x: f64,
    pub from_y: f64,
    pub to_y: f64,
}

impl BoundingBox {
    /// Fails with [`TransitError::InvalidBounds`] unless `from < to` on both axes
    pub fn new(from_x: f64, to_x: f64, from_y: f64, to_y: f64) -> Result<Self> {
        // written negated so NaN bounds are rejected too
        if !(from_x < to_x) || !(from_y < to_y) {
            return Err(TransitError::InvalidBounds {
                from_x,
                to_x,
                from_y,
                to_y,
            });
        }
        Ok(Self {
            from_x,
            to_x,
            from_y,
            to_y,
        })
    }

    /// Square of half-width `radius` centered on `center`
    pub fn around(center: Point, radius: f64) -> Result<Self> {
        Self::new(
            center.x() - radius,
            center.x() + radius,
            center.y() - radius,
            center.y() + radius,
        )
    }

    /// True when the point lies inside the open rectangle (edges excluded)
    pub fn contains_strictly(&self, point: Point) -> bool {
        self.from_x < point.x()
            && point.x() < self.to_x
            && self.from_y < point.y()
            && point.y() < self.to_y
    }

    pub fn envelope(&self) -> AABB<[f64; 2]> {
        AABB::from_corners([self.from_x, self.from_y], [self.to_x, self.to_y])
    }
}
