//! Vehicle detection across the bus and train networks.
//!
//! Each vehicle type runs as an isolated branch:
//!
//! 1. take the first and last point of the branch's trace
//! 2. search stops around both ends
//! 3. keep the lines serving both ends
//! 4. slice every geometry of those lines between each pair of stops
//! 5. score the slices against the trace
//!
//! A branch that fails is logged and contributes nothing; the other branch
//! still runs. Results of both branches then compete for the best score and
//! the winner's route length becomes the travelled distance.

use std::sync::Arc;

use geo::Point;

use crate::config::DetectorConfig;
use crate::matching::intersect::{intersect, stop_pairs};
use crate::matching::scorer::{select_best, BufferScorer, Candidate, MatchResult, RouteScorer};
use crate::matching::slicer::{slice_route, Slice};
use crate::matching::stops::find_nearby_stops;
use crate::models::{traits::TransitDataset, types::*};
use crate::request::{TripReport, TripRequest};
use crate::spatial::geodesic_distance_km;

/// Final outcome of a trip
#[derive(Clone, Debug, PartialEq)]
pub enum Detection {
    /// Best match, with its travelled distance filled in
    Detected(MatchResult),
    NoVehicleDetected,
}

impl Detection {
    pub fn vehicle(&self) -> Option<VehicleType> {
        match self {
            Detection::Detected(result) => Some(result.vehicle()),
            Detection::NoVehicleDetected => None,
        }
    }

    pub fn km_travelled(&self) -> f64 {
        match self {
            Detection::Detected(result) => result.distance_km.unwrap_or_default(),
            Detection::NoVehicleDetected => 0.0,
        }
    }

    pub fn winner(&self) -> Option<&MatchResult> {
        match self {
            Detection::Detected(result) => Some(result),
            Detection::NoVehicleDetected => None,
        }
    }
}

/// Length of a point sequence in kilometers, on the International 1924 ellipsoid
pub fn compute_distance(points: &[Point]) -> f64 {
    points
        .windows(2)
        .map(|pair| geodesic_distance_km(pair[0], pair[1]))
        .sum()
}

/// Detects the vehicle of a trip against one bus and one train dataset
///
/// Each dataset's [`TransitDataset::vehicle_type`] decides which trace it is
/// matched on and how its candidates are tagged.
pub struct VehicleDetector {
    bus: Arc<dyn TransitDataset>,
    train: Arc<dyn TransitDataset>,
    scorer: Arc<dyn RouteScorer>,
    config: DetectorConfig,
}

impl VehicleDetector {
    pub fn new(
        bus: Arc<dyn TransitDataset>,
        train: Arc<dyn TransitDataset>,
        config: DetectorConfig,
    ) -> Self {
        let scorer = Arc::new(BufferScorer::new(&config.scoring));
        Self {
            bus,
            train,
            scorer,
            config,
        }
    }

    /// Replace the default buffer scorer
    pub fn with_scorer(mut self, scorer: Arc<dyn RouteScorer>) -> Self {
        self.scorer = scorer;
        self
    }

    pub fn config(&self) -> &DetectorConfig {
        &self.config
    }

    /// Sliced routes of `dataset` plausibly travelled on `trip`
    pub fn candidates(&self, dataset: &dyn TransitDataset, trip: &Trip) -> Result<Vec<Candidate>> {
        let vehicle = dataset.vehicle_type();
        let (first, last) = trip.endpoints();

        let initial = find_nearby_stops(first, dataset, &self.config.search)?;
        let finishing = find_nearby_stops(last, dataset, &self.config.search)?;
        let (initial, finishing) = intersect(&initial.stops, &finishing.stops)?;
        log::debug!(
            "{vehicle}: {} initial and {} final stops on shared lines",
            initial.len(),
            finishing.len()
        );

        let mut candidates: Vec<Candidate> = Vec::new();
        for pair in stop_pairs(&initial, &finishing) {
            for geometry in dataset.route_geometries(&pair.line_id)? {
                let Slice::Matched(route) = slice_route(&pair.line_id, geometry, pair.start, pair.finish)?
                else {
                    continue;
                };
                if candidates.iter().any(|c| c.route == route) {
                    continue;
                }
                candidates.push(Candidate { route, vehicle });
            }
        }

        log::info!("{vehicle} routes found: {}", candidates.len());
        Ok(candidates)
    }

    /// Run one vehicle branch end to end, up to scoring
    pub fn run_branch(
        &self,
        dataset: &dyn TransitDataset,
        traces: &TripTraces,
    ) -> Result<Vec<MatchResult>> {
        let trip = Trip::new(traces.for_vehicle(dataset.vehicle_type()).to_vec())?;
        let candidates = self.candidates(dataset, &trip)?;
        Ok(self.scorer.score(candidates, &trip))
    }

    fn branch_results(&self, dataset: &dyn TransitDataset, traces: &TripTraces) -> Vec<MatchResult> {
        match self.run_branch(dataset, traces) {
            Ok(results) => results,
            Err(err) => {
                log::warn!("No {} route matches the trip: {err}", dataset.vehicle_type());
                Vec::new()
            }
        }
    }

    /// Detect the vehicle and distance travelled for one trip
    pub fn detect(&self, traces: &TripTraces) -> Detection {
        let (bus, train) = rayon::join(
            || self.branch_results(self.bus.as_ref(), traces),
            || self.branch_results(self.train.as_ref(), traces),
        );

        let mut results = bus;
        results.extend(train);

        let Some(mut best) = select_best(results) else {
            log::info!("No vehicle detected");
            return Detection::NoVehicleDetected;
        };

        let distance = compute_distance(&best.route().points);
        best.distance_km = Some(distance);
        log::info!(
            "Detected {} on line {}: {:.3} km",
            best.vehicle(),
            best.route().line_id,
            distance
        );
        Detection::Detected(best)
    }

    /// Detect the trip of a request and build its report
    pub fn report(&self, request: &TripRequest) -> TripReport {
        let detection = self.detect(&request.data.parse());
        TripReport::new(request, &detection)
    }
}
