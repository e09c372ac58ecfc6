//! In-memory transit dataset loaded once at startup.
//!
//! Stores the stops of one vehicle type in an R-tree and the geometries of
//! its lines in a lookup map. Nothing is mutated after construction, so one
//! provider behind an `Arc` serves every request concurrently.

use std::collections::HashMap;
use std::path::Path;

use geo::LineString;
use rstar::RTree;

use crate::identifiers::LineIdentifier;
use crate::models::{traits::*, types::*};
use crate::provider::geojson_loader::{read_geojson, routes_from_geojson, stops_from_geojson};
use crate::spatial::index::StopNode;
use crate::spatial::BoundingBox;

/// Default GeoJSON property holding the line id of a route feature
pub const DEFAULT_LINE_PROPERTY: &str = "linea";

// ============================================================================
// Static Provider
// ============================================================================

/// In-memory stop and route dataset with spatial indexing
pub struct StaticTransitProvider {
    vehicle: VehicleType,
    stop_count: usize,

    // Lookup maps
    route_map: HashMap<LineIdentifier, Vec<LineString>>,

    // Spatial indices
    stop_tree: RTree<StopNode>,
}

impl StaticTransitProvider {
    /// Create a new empty provider
    pub fn new(vehicle: VehicleType) -> Self {
        Self {
            vehicle,
            stop_count: 0,
            route_map: HashMap::new(),
            stop_tree: RTree::new(),
        }
    }

    /// Build provider from raw data
    ///
    /// Geometries with fewer than two points cannot be sliced and are dropped.
    pub fn from_data(
        vehicle: VehicleType,
        stops: Vec<Stop>,
        routes: HashMap<LineIdentifier, Vec<LineString>>,
    ) -> Self {
        let stop_count = stops.len();
        let stop_tree = RTree::bulk_load(stops.into_iter().map(StopNode::new).collect());

        let route_map = routes
            .into_iter()
            .map(|(line, geometries)| {
                let usable: Vec<_> = geometries
                    .into_iter()
                    .filter(|geometry| {
                        let keep = geometry.0.len() >= 2;
                        if !keep {
                            log::warn!("{vehicle} line {line}: dropping geometry with fewer than two points");
                        }
                        keep
                    })
                    .collect();
                (line, usable)
            })
            .collect();

        Self {
            vehicle,
            stop_count,
            route_map,
            stop_tree,
        }
    }

    /// Load a dataset from a stop GeoJSON and a route GeoJSON
    ///
    /// `line_property` names the route feature property carrying the line id.
    pub fn from_geojson_files(
        vehicle: VehicleType,
        stops_path: impl AsRef<Path>,
        routes_path: impl AsRef<Path>,
        line_property: &str,
    ) -> Result<Self> {
        let stops = stops_from_geojson(&read_geojson(stops_path.as_ref())?)?;
        let routes = routes_from_geojson(&read_geojson(routes_path.as_ref())?, line_property)?;

        let provider = Self::from_data(vehicle, stops, routes);
        log::info!(
            "Loaded {} dataset: {} stops, {} lines, {} geometries",
            vehicle,
            provider.stop_count(),
            provider.line_count(),
            provider.geometry_count()
        );
        Ok(provider)
    }

    pub fn stop_count(&self) -> usize {
        self.stop_count
    }

    pub fn line_count(&self) -> usize {
        self.route_map.len()
    }

    pub fn geometry_count(&self) -> usize {
        self.route_map.values().map(Vec::len).sum()
    }
}

impl TransitDataset for StaticTransitProvider {
    fn vehicle_type(&self) -> VehicleType {
        self.vehicle
    }

    fn stops_in(&self, bounds: &BoundingBox) -> Result<Vec<Stop>> {
        Ok(self
            .stop_tree
            .locate_in_envelope_intersecting(&bounds.envelope())
            .filter(|node| bounds.contains_strictly(node.stop.location))
            .map(|node| node.stop.clone())
            .collect())
    }

    fn route_geometries(&self, line: &LineIdentifier) -> Result<&[LineString]> {
        Ok(self
            .route_map
            .get(line)
            .map(Vec::as_slice)
            .unwrap_or_default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use geo::Point;

    fn provider() -> StaticTransitProvider {
        let stops = vec![
            Stop::new("90", 9.19, 45.45),
            Stop::new("91", 9.19, 45.45),
            Stop::new("90", 9.20, 45.46),
        ];
        let mut routes = HashMap::new();
        routes.insert(
            LineIdentifier::new("90"),
            vec![
                LineString::from(vec![(9.19, 45.45), (9.20, 45.46)]),
                LineString::from(vec![(9.19, 45.45)]),
            ],
        );
        StaticTransitProvider::from_data(VehicleType::Bus, stops, routes)
    }

    #[test]
    fn test_empty_provider() {
        let provider = StaticTransitProvider::new(VehicleType::Train);
        let bounds = BoundingBox::around(Point::new(0.0, 0.0), 180.0).unwrap();

        assert_eq!(provider.vehicle_type(), VehicleType::Train);
        assert!(provider.stops_in(&bounds).unwrap().is_empty());
        assert_eq!(provider.line_count(), 0);
    }

    #[test]
    fn test_stops_in_box() {
        let provider = provider();

        let bounds = BoundingBox::around(Point::new(9.19, 45.45), 0.001).unwrap();
        let found = provider.stops_in(&bounds).unwrap();
        assert_eq!(found.len(), 2);
        assert!(found.iter().all(|s| s.location == Point::new(9.19, 45.45)));

        // a stop lying exactly on the edge is excluded
        let edge = BoundingBox::new(9.19, 9.21, 45.44, 45.47).unwrap();
        let found = provider.stops_in(&edge).unwrap();
        assert_eq!(found, vec![Stop::new("90", 9.20, 45.46)]);
    }

    #[test]
    fn test_route_geometries() {
        let provider = provider();

        // the single-point geometry was dropped at load time
        assert_eq!(provider.route_geometries(&"90".into()).unwrap().len(), 1);
        assert!(provider.route_geometries(&"404".into()).unwrap().is_empty());
        assert_eq!(provider.geometry_count(), 1);
        assert_eq!(provider.stop_count(), 3);
    }
}
