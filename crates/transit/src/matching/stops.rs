//! Adaptive stop search around a trip endpoint.

use geo::Point;

use crate::config::StopSearchConfig;
use crate::models::{traits::TransitDataset, types::*};
use crate::spatial::BoundingBox;

/// Outcome of a stop search
#[derive(Clone, Debug, PartialEq)]
pub struct NearbyStops {
    pub stops: Vec<Stop>,
    /// Last box queried; every returned stop lies strictly inside it
    pub bounds: BoundingBox,
    pub radius: f64,
    pub attempts: usize,
}

/// Find stops around `point`, widening the search square until enough are found
///
/// The square starts with half-width `initial_radius` and grows by
/// `growth_factor` after each attempt returning fewer than `min_results`
/// stops. After `max_attempts` queries the last result is returned as is,
/// even when it is short or empty.
pub fn find_nearby_stops(
    point: Point,
    dataset: &dyn TransitDataset,
    config: &StopSearchConfig,
) -> Result<NearbyStops> {
    let max_attempts = config.max_attempts.max(1);
    let growth = config.growth_factor.max(1.0);

    let mut radius = config.initial_radius;
    let mut attempts = 0;

    loop {
        let bounds = BoundingBox::around(point, radius)?;
        let stops = dataset.stops_in(&bounds)?;
        attempts += 1;

        log::debug!(
            "{} stop search #{attempts} at ({}, {}) radius {radius:.6}: {} stops",
            dataset.vehicle_type(),
            point.x(),
            point.y(),
            stops.len()
        );

        if stops.len() >= config.min_results || attempts >= max_attempts {
            return Ok(NearbyStops {
                stops,
                bounds,
                radius,
                attempts,
            });
        }

        radius *= growth;
    }
}
