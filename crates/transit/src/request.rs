//! Trip request decoding and the per-trip report.
//!
//! Requests carry the phone's raw GPS fixes next to the same trip snapped onto
//! the road network by a roads API. Both lists use the roads API entry shape:
//!
//! ```json
//! { "location": { "longitude": 9.19, "latitude": 45.46 }, "placeId": "..." }
//! ```
//!
//! Fields other than `location` are ignored.

use geo::Point;
use serde::{Deserialize, Serialize};

use crate::identifiers::{TicketIdentifier, UserIdentifier};
use crate::matching::detector::Detection;
use crate::models::types::*;

#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Location {
    pub longitude: f64,
    pub latitude: f64,
}

#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct LocationEntry {
    pub location: Location,
}

impl From<&LocationEntry> for Point {
    fn from(entry: &LocationEntry) -> Self {
        Point::new(entry.location.longitude, entry.location.latitude)
    }
}

/// The two traces of a trip as sent by the client
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TraceData {
    #[serde(default)]
    pub snapped_points: Vec<LocationEntry>,
    #[serde(default)]
    pub raw_data: Vec<LocationEntry>,
}

impl TraceData {
    /// Convert both traces to ordered point sequences
    ///
    /// Empty traces are passed through; the branch consuming one fails on its own.
    pub fn parse(&self) -> TripTraces {
        TripTraces {
            raw: self.raw_data.iter().map(Point::from).collect(),
            snapped: self.snapped_points.iter().map(Point::from).collect(),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct TripRequest {
    pub user_id: UserIdentifier,
    pub ticket_id: TicketIdentifier,
    pub start_time: String,
    pub end_time: String,
    pub data: TraceData,
}

impl TripRequest {
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }
}

/// Outcome of one trip, ready to be stored
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct TripReport {
    pub user_id: UserIdentifier,
    pub ticket_id: TicketIdentifier,
    pub km_travelled: Option<f64>,
    pub transportation: Option<VehicleType>,
    pub start_time: String,
    pub end_time: String,
}

impl TripReport {
    pub fn new(request: &TripRequest, detection: &Detection) -> Self {
        Self {
            user_id: request.user_id.clone(),
            ticket_id: request.ticket_id.clone(),
            km_travelled: Some(detection.km_travelled()),
            transportation: detection.vehicle(),
            start_time: request.start_time.clone(),
            end_time: request.end_time.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const REQUEST: &str = r#"{
        "user_id": "u-1",
        "ticket_id": "t-9",
        "start_time": "2021-06-01T08:00:00Z",
        "end_time": "2021-06-01T08:20:00Z",
        "data": {
            "snappedPoints": [
                { "location": { "latitude": 45.4514, "longitude": 9.1902 }, "originalIndex": 0, "placeId": "a" },
                { "location": { "latitude": 45.4596, "longitude": 9.1902 }, "placeId": "b" }
            ],
            "rawData": [
                { "location": { "latitude": 45.4595246, "longitude": 9.224007 } }
            ]
        }
    }"#;

    #[test]
    fn test_parse_request() {
        let request = TripRequest::from_json(REQUEST).unwrap();
        let traces = request.data.parse();

        assert_eq!(request.user_id.as_str(), "u-1");
        assert_eq!(
            traces.snapped,
            vec![Point::new(9.1902, 45.4514), Point::new(9.1902, 45.4596)]
        );
        assert_eq!(traces.raw, vec![Point::new(9.224007, 45.4595246)]);
    }

    #[test]
    fn test_missing_trace_is_empty() {
        let data: TraceData = serde_json::from_str(r#"{ "rawData": [] }"#).unwrap();
        assert_eq!(data.parse(), TripTraces::default());
    }

    #[test]
    fn test_malformed_request() {
        assert!(matches!(
            TripRequest::from_json(r#"{ "user_id": "u-1" }"#),
            Err(TransitError::Json(_))
        ));
    }

    #[test]
    fn test_report_without_vehicle() {
        let request = TripRequest::from_json(REQUEST).unwrap();
        let report = TripReport::new(&request, &Detection::NoVehicleDetected);

        let json = serde_json::to_value(&report).unwrap();
        assert_eq!(json["transportation"], serde_json::Value::Null);
        assert_eq!(json["km_travelled"], serde_json::json!(0.0));
        assert_eq!(json["ticket_id"], "t-9");
    }
}
