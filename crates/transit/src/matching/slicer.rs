//! Extraction of the stretch of a line travelled between two stops.
//!
//! A line geometry of N points is split into its N-1 segments. Each stop is
//! snapped to its nearest segment and the segments from the start stop up to
//! (excluding) the finish stop form the sliced route.

use geo::{Line, LineString, Point};

use crate::identifiers::LineIdentifier;
use crate::models::types::*;
use crate::spatial::segment_distance;

/// Why a geometry produced no slice
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum NoMatchReason {
    /// The geometry runs opposite to the direction of travel
    Reversed {
        start_index: usize,
        finish_index: usize,
    },
    /// Both stops snap to the same segment
    Degenerate { index: usize },
}

#[derive(Clone, Debug, PartialEq)]
pub enum Slice {
    Matched(SlicedRoute),
    NoMatch(NoMatchReason),
}

impl Slice {
    pub fn into_route(self) -> Option<SlicedRoute> {
        match self {
            Slice::Matched(route) => Some(route),
            Slice::NoMatch(_) => None,
        }
    }
}

/// Index of the segment closest to `point`; the first one wins ties
pub fn nearest_segment(segments: &[Line], point: Point) -> Option<usize> {
    let mut best: Option<(usize, f64)> = None;

    for (index, segment) in segments.iter().enumerate() {
        let distance = segment_distance(point, segment);
        match best {
            Some((_, best_distance)) if distance >= best_distance => {}
            _ => best = Some((index, distance)),
        }
    }

    best.map(|(index, _)| index)
}

/// Slice `geometry` between the segments nearest to `start` and `finish`
///
/// Geometries authored against the direction of travel, and stops sharing a
/// segment, yield [`Slice::NoMatch`]. A geometry with fewer than two points
/// fails with [`TransitError::EmptyGeometry`].
pub fn slice_route(
    line_id: &LineIdentifier,
    geometry: &LineString,
    start: Point,
    finish: Point,
) -> Result<Slice> {
    let segments: Vec<Line> = geometry.lines().collect();

    let (Some(start_index), Some(finish_index)) = (
        nearest_segment(&segments, start),
        nearest_segment(&segments, finish),
    ) else {
        return Err(TransitError::EmptyGeometry(line_id.clone()));
    };

    log::debug!(
        "line {line_id}: start segment {start_index}, finish segment {finish_index} of {}",
        segments.len()
    );

    if finish_index < start_index {
        // TODO: decide whether reversed geometries should be sliced backwards instead of dropped
        return Ok(Slice::NoMatch(NoMatchReason::Reversed {
            start_index,
            finish_index,
        }));
    }
    if start_index == finish_index {
        return Ok(Slice::NoMatch(NoMatchReason::Degenerate { index: start_index }));
    }

    let points = segments[start_index..finish_index]
        .iter()
        .flat_map(|segment| [segment.start_point(), segment.end_point()])
        .collect();

    Ok(Slice::Matched(SlicedRoute::new(line_id.clone(), points)))
}
