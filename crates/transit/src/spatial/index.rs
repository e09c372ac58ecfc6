//! R-tree nodes for spatial indexing.
//!
//! Stops are bulk loaded once per dataset. Box queries go through the tree's
//! envelope search (inclusive on the edges), so callers that need an open
//! interval filter the candidates again with [`BoundingBox::contains_strictly`].
//!
//! [`BoundingBox::contains_strictly`]: crate::spatial::BoundingBox::contains_strictly

use rstar::{PointDistance, RTreeObject, AABB};

use crate::models::types::Stop;

// ============================================================================
// Stop Spatial Node
// ============================================================================

#[derive(Clone, Debug)]
pub struct StopNode {
    pub stop: Stop,
    point: [f64; 2],
}

impl StopNode {
    pub fn new(stop: Stop) -> Self {
        let point = [stop.longitude(), stop.latitude()];
        Self { stop, point }
    }
}

impl RTreeObject for StopNode {
    type Envelope = AABB<[f64; 2]>;

    fn envelope(&self) -> Self::Envelope {
        AABB::from_point(self.point)
    }
}

impl PointDistance for StopNode {
    fn distance_2(&self, point: &[f64; 2]) -> f64 {
        let dx = self.point[0] - point[0];
        let dy = self.point[1] - point[1];
        dx * dx + dy * dy
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstar::RTree;

    #[test]
    fn test_envelope_query_is_inclusive() {
        let tree = RTree::bulk_load(vec![
            StopNode::new(Stop::new("1", 0.0, 0.0)),
            StopNode::new(Stop::new("1", 1.0, 1.0)),
            StopNode::new(Stop::new("2", 5.0, 5.0)),
        ]);

        let found: Vec<_> = tree
            .locate_in_envelope_intersecting(&AABB::from_corners([0.0, 0.0], [1.0, 1.0]))
            .collect();
        assert_eq!(found.len(), 2);
    }

    #[test]
    fn test_nearest_stop() {
        let tree = RTree::bulk_load(vec![
            StopNode::new(Stop::new("1", 0.0, 0.0)),
            StopNode::new(Stop::new("2", 5.0, 5.0)),
        ]);

        let nearest = tree.nearest_neighbor(&[4.0, 4.5]).unwrap();
        assert_eq!(nearest.stop.line_id.as_str(), "2");
    }
}
