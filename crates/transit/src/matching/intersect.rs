//! Lines serving both ends of a trip.

use std::collections::HashSet;

use geo::Point;

use crate::identifiers::LineIdentifier;
use crate::models::types::*;

/// A line with one stop near each end of the trip
#[derive(Clone, Debug, PartialEq)]
pub struct StopPair {
    pub line_id: LineIdentifier,
    pub start: Point,
    pub finish: Point,
}

fn stop_key(stop: &Stop) -> (LineIdentifier, u64, u64) {
    (
        stop.line_id.clone(),
        stop.longitude().to_bits(),
        stop.latitude().to_bits(),
    )
}

fn retain_lines(stops: &[Stop], lines: &HashSet<&LineIdentifier>) -> Vec<Stop> {
    let mut seen = HashSet::new();
    stops
        .iter()
        .filter(|stop| lines.contains(&stop.line_id))
        .filter(|stop| seen.insert(stop_key(stop)))
        .cloned()
        .collect()
}

/// Keep only the stops of lines present on both sides
///
/// Each side is deduplicated on (line, longitude, latitude), first occurrence
/// kept. Fails with [`TransitError::EmptyInput`] when either side is empty.
pub fn intersect(initial: &[Stop], finishing: &[Stop]) -> Result<(Vec<Stop>, Vec<Stop>)> {
    if initial.is_empty() {
        return Err(TransitError::EmptyInput("initial"));
    }
    if finishing.is_empty() {
        return Err(TransitError::EmptyInput("final"));
    }

    let initial_lines: HashSet<_> = initial.iter().map(|s| &s.line_id).collect();
    let common: HashSet<_> = finishing
        .iter()
        .map(|s| &s.line_id)
        .filter(|line| initial_lines.contains(line))
        .collect();

    Ok((retain_lines(initial, &common), retain_lines(finishing, &common)))
}

/// Every (initial, final) stop combination sharing a line
pub fn stop_pairs(initial: &[Stop], finishing: &[Stop]) -> Vec<StopPair> {
    initial
        .iter()
        .flat_map(|start| {
            finishing
                .iter()
                .filter(move |finish| finish.line_id == start.line_id)
                .map(move |finish| StopPair {
                    line_id: start.line_id.clone(),
                    start: start.location,
                    finish: finish.location,
                })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_keeps_common_lines_only() {
        let initial = vec![
            Stop::new("90", 9.19, 45.45),
            Stop::new("73", 9.19, 45.45),
            Stop::new("90", 9.191, 45.451),
        ];
        let finishing = vec![Stop::new("90", 9.20, 45.46), Stop::new("54", 9.20, 45.46)];

        let (i, f) = intersect(&initial, &finishing).unwrap();

        assert_eq!(
            i,
            vec![Stop::new("90", 9.19, 45.45), Stop::new("90", 9.191, 45.451)]
        );
        assert_eq!(f, vec![Stop::new("90", 9.20, 45.46)]);
    }

    #[test]
    fn test_deduplicates_in_first_seen_order() {
        let stops = vec![
            Stop::new("2", 1.0, 1.0),
            Stop::new("1", 0.0, 0.0),
            Stop::new("2", 1.0, 1.0),
            Stop::new("1", 0.0, 0.0),
        ];

        let (i, f) = intersect(&stops, &stops).unwrap();

        assert_eq!(i, vec![Stop::new("2", 1.0, 1.0), Stop::new("1", 0.0, 0.0)]);
        assert_eq!(i, f);
    }

    #[test]
    fn test_no_common_line() {
        let (i, f) = intersect(&[Stop::new("1", 0.0, 0.0)], &[Stop::new("2", 0.0, 0.0)]).unwrap();
        assert!(i.is_empty());
        assert!(f.is_empty());
    }

    #[test]
    fn test_empty_input() {
        let stops = vec![Stop::new("1", 0.0, 0.0)];

        assert!(matches!(
            intersect(&[], &stops),
            Err(TransitError::EmptyInput("initial"))
        ));
        assert!(matches!(
            intersect(&stops, &[]),
            Err(TransitError::EmptyInput("final"))
        ));
    }

    #[test]
    fn test_stop_pairs_per_line() {
        let initial = vec![Stop::new("90", 0.0, 0.0), Stop::new("91", 0.0, 0.0)];
        let finishing = vec![
            Stop::new("90", 1.0, 1.0),
            Stop::new("90", 1.1, 1.1),
            Stop::new("91", 2.0, 2.0),
        ];

        let pairs = stop_pairs(&initial, &finishing);

        assert_eq!(pairs.len(), 3);
        assert_eq!(pairs[1].finish, Point::new(1.1, 1.1));
        assert_eq!(pairs[2].line_id.as_str(), "91");
    }

    fn stops_strategy() -> impl Strategy<Value = Vec<Stop>> {
        prop::collection::vec((0u8..5, 0u8..4, 0u8..4), 1..20).prop_map(|raw| {
            raw.into_iter()
                .map(|(line, x, y)| Stop::new(line.to_string(), x as f64, y as f64))
                .collect()
        })
    }

    proptest! {
        #[test]
        fn prop_output_lines_served_on_both_sides(
            initial in stops_strategy(),
            finishing in stops_strategy(),
        ) {
            let (i, f) = intersect(&initial, &finishing).unwrap();

            for stop in i.iter().chain(f.iter()) {
                prop_assert!(initial.iter().any(|s| s.line_id == stop.line_id));
                prop_assert!(finishing.iter().any(|s| s.line_id == stop.line_id));
            }

            for side in [&i, &f] {
                let keys: HashSet<_> = side.iter().map(stop_key).collect();
                prop_assert_eq!(keys.len(), side.len());
            }
        }

        #[test]
        fn prop_self_intersection_keeps_everything(stops in stops_strategy()) {
            let (i, f) = intersect(&stops, &stops).unwrap();
            let distinct: HashSet<_> = stops.iter().map(stop_key).collect();

            prop_assert_eq!(i.len(), distinct.len());
            prop_assert_eq!(i, f);
        }
    }
}
