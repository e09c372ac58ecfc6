//! # ridecheck-transit
//!
//! Detects which bus or train a passenger rode, and how far, from the GPS
//! traces of a single trip.
//!
//! ## Pipeline
//!
//! - **Stop search**: adaptive box search around both ends of the trip
//! - **Line intersection**: keeps the lines serving both ends
//! - **Route slicing**: cuts each line geometry between the matched stops
//! - **Scoring**: ranks the slices against the trace, buses on the
//!   map-snapped trace and trains on the raw one
//! - **Distance**: geodesic length of the winning slice
//!
//! ## Example
//!
//! ```
//! use std::collections::HashMap;
//! use std::sync::Arc;
//!
//! use ridecheck_transit::prelude::*;
//! use geo::{LineString, Point};
//!
//! let mut routes = HashMap::new();
//! routes.insert(
//!     LineIdentifier::new("90"),
//!     vec![LineString::from(vec![(9.19, 45.450), (9.19, 45.452), (9.19, 45.454), (9.19, 45.456)])],
//! );
//! let stops = vec![Stop::new("90", 9.1901, 45.451), Stop::new("90", 9.1901, 45.455)];
//!
//! let bus = StaticTransitProvider::from_data(VehicleType::Bus, stops, routes);
//! let train = StaticTransitProvider::new(VehicleType::Train);
//! let detector = VehicleDetector::new(Arc::new(bus), Arc::new(train), DetectorConfig::default());
//!
//! let trace = vec![Point::new(9.1902, 45.4509), Point::new(9.1902, 45.453), Point::new(9.1902, 45.4551)];
//! let detection = detector.detect(&TripTraces { raw: trace.clone(), snapped: trace });
//!
//! assert_eq!(detection.vehicle(), Some(VehicleType::Bus));
//! assert!(detection.km_travelled() > 0.4);
//! ```

pub mod config;
pub mod identifiers;
pub mod matching;
pub mod models;
pub mod provider;
pub mod request;
pub mod spatial;

// Re-exports for convenience
pub mod prelude {
    pub use crate::config::{DetectorConfig, ScoringConfig, StopSearchConfig};
    pub use crate::identifiers::*;
    pub use crate::matching::*;
    pub use crate::models::{traits::*, types::*};
    pub use crate::provider::{StaticTransitProvider, DEFAULT_LINE_PROPERTY};
    pub use crate::request::{TraceData, TripReport, TripRequest};
}

pub use prelude::*;
