//! The ride matching pipeline, leaf first.

pub mod detector;
pub mod intersect;
pub mod scorer;
pub mod slicer;
pub mod stops;

pub use detector::{compute_distance, Detection, VehicleDetector};
pub use intersect::{intersect, stop_pairs, StopPair};
pub use scorer::{select_best, BufferScorer, Candidate, MatchMetrics, MatchResult, RouteScorer};
pub use slicer::{nearest_segment, slice_route, NoMatchReason, Slice};
pub use stops::{find_nearby_stops, NearbyStops};
