//! Scoring of candidate routes against an observed trip.

use std::cmp::Ordering;

use geo::Line;

use crate::config::ScoringConfig;
use crate::models::types::*;
use crate::spatial::segment_distance;

/// A sliced route awaiting scoring
#[derive(Clone, Debug, PartialEq)]
pub struct Candidate {
    pub route: SlicedRoute,
    pub vehicle: VehicleType,
}

/// How well a route covers a trip
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct MatchMetrics {
    /// Trip points lying within the buffer of at least one route segment
    pub user_coordinates_matched: usize,
    pub percentage_user: f64,
    /// Route segments whose buffer contains at least one trip point
    pub polygons_matched: usize,
    pub percentage_poly: f64,
}

impl MatchMetrics {
    /// Total order used to rank candidates
    ///
    /// Compares the share of the trip covered first, then the share of the
    /// route confirmed by the trip, then the raw counts.
    pub fn rank(&self, other: &Self) -> Ordering {
        self.percentage_user
            .total_cmp(&other.percentage_user)
            .then(self.percentage_poly.total_cmp(&other.percentage_poly))
            .then(self.user_coordinates_matched.cmp(&other.user_coordinates_matched))
            .then(self.polygons_matched.cmp(&other.polygons_matched))
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct MatchResult {
    pub candidate: Candidate,
    pub metrics: MatchMetrics,
    /// Travelled distance in kilometers, only set on the winner
    pub distance_km: Option<f64>,
}

impl MatchResult {
    pub fn vehicle(&self) -> VehicleType {
        self.candidate.vehicle
    }

    pub fn route(&self) -> &SlicedRoute {
        &self.candidate.route
    }
}

/// Scores candidate routes against the trace they must explain
pub trait RouteScorer: Send + Sync {
    fn score(&self, candidates: Vec<Candidate>, trip: &Trip) -> Vec<MatchResult>;
}

/// Scores by buffering every route segment and counting containments
#[derive(Clone, Debug)]
pub struct BufferScorer {
    buffer: f64,
}

impl BufferScorer {
    pub fn new(config: &ScoringConfig) -> Self {
        Self {
            buffer: config.buffer,
        }
    }

    pub fn metrics(&self, route: &SlicedRoute, trip: &Trip) -> MatchMetrics {
        let segments: Vec<Line> = route.to_line_string().lines().collect();
        let mut segment_hit = vec![false; segments.len()];
        let mut user_coordinates_matched = 0;

        for point in trip.points() {
            let mut contained = false;
            for (index, segment) in segments.iter().enumerate() {
                if segment_distance(*point, segment) <= self.buffer {
                    contained = true;
                    segment_hit[index] = true;
                }
            }
            if contained {
                user_coordinates_matched += 1;
            }
        }

        let polygons_matched = segment_hit.iter().filter(|hit| **hit).count();

        MatchMetrics {
            user_coordinates_matched,
            percentage_user: percentage(user_coordinates_matched, trip.len()),
            polygons_matched,
            percentage_poly: percentage(polygons_matched, segments.len()),
        }
    }
}

impl Default for BufferScorer {
    fn default() -> Self {
        Self::new(&ScoringConfig::default())
    }
}

impl RouteScorer for BufferScorer {
    fn score(&self, candidates: Vec<Candidate>, trip: &Trip) -> Vec<MatchResult> {
        candidates
            .into_iter()
            .map(|candidate| {
                let metrics = self.metrics(&candidate.route, trip);
                log::debug!(
                    "{} line {}: {} trip points ({:.1}%), {} segments ({:.1}%)",
                    candidate.vehicle,
                    candidate.route.line_id,
                    metrics.user_coordinates_matched,
                    metrics.percentage_user,
                    metrics.polygons_matched,
                    metrics.percentage_poly
                );
                MatchResult {
                    candidate,
                    metrics,
                    distance_km: None,
                }
            })
            .collect()
    }
}

fn percentage(count: usize, total: usize) -> f64 {
    if total == 0 {
        0.0
    } else {
        count as f64 / total as f64 * 100.0
    }
}

/// Pick the best ranked result; the earliest one wins ties
pub fn select_best(results: Vec<MatchResult>) -> Option<MatchResult> {
    results.into_iter().reduce(|best, next| {
        if next.metrics.rank(&best.metrics) == Ordering::Greater {
            next
        } else {
            best
        }
    })
}
