//! Decoding of the static stop and route GeoJSON datasets.
//!
//! Stop files are Overpass exports: one `node/...` feature per physical stop,
//! with the lines serving it listed under `properties["@relations"]`, each
//! relation carrying its line reference in `reltags.ref`. Route files hold one
//! line geometry per feature, keyed by a line id property.

use std::collections::HashMap;
use std::path::Path;

use geo::{Coord, LineString};
use geojson::{feature::Id, Feature, GeoJson, Value};

use crate::identifiers::LineIdentifier;
use crate::models::types::*;

pub fn read_geojson(path: &Path) -> Result<GeoJson> {
    let content = std::fs::read_to_string(path)?;
    Ok(content.parse::<GeoJson>()?)
}

fn features(geojson: &GeoJson) -> Result<&[Feature]> {
    match geojson {
        GeoJson::FeatureCollection(collection) => Ok(&collection.features),
        GeoJson::Feature(feature) => Ok(std::slice::from_ref(feature)),
        GeoJson::Geometry(_) => Err(TransitError::InvalidData(
            "expected a Feature or FeatureCollection, found a bare Geometry".into(),
        )),
    }
}

fn is_node(feature: &Feature) -> bool {
    match &feature.id {
        Some(Id::String(id)) => id.contains("node"),
        _ => false,
    }
}

fn coord(position: &[f64]) -> Result<Coord> {
    match position {
        [x, y, ..] => Ok(Coord { x: *x, y: *y }),
        _ => Err(TransitError::InvalidData(format!(
            "position needs at least two values, got {}",
            position.len()
        ))),
    }
}

fn line_string(positions: &[Vec<f64>]) -> Result<LineString> {
    positions
        .iter()
        .map(|p| coord(p))
        .collect::<Result<Vec<_>>>()
        .map(LineString::new)
}

/// Extract one [`Stop`] per (node, line reference) pair
pub fn stops_from_geojson(geojson: &GeoJson) -> Result<Vec<Stop>> {
    let mut stops = Vec::new();

    for feature in features(geojson)?.iter().filter(|f| is_node(f)) {
        let location = match feature.geometry.as_ref().map(|g| &g.value) {
            Some(Value::Point(position)) => coord(position)?,
            _ => {
                log::warn!("skipping stop node {:?} without a point geometry", feature.id);
                continue;
            }
        };

        let Some(relations) = feature.property("@relations").and_then(|r| r.as_array()) else {
            continue;
        };

        for relation in relations {
            let line = relation
                .get("reltags")
                .and_then(|tags| tags.get("ref"))
                .and_then(LineIdentifier::from_json);
            if let Some(line_id) = line {
                stops.push(Stop {
                    line_id,
                    location: location.into(),
                });
            }
        }
    }

    Ok(stops)
}

/// Group route geometries by the line id found under `line_property`
///
/// Multi-part geometries register each part as its own geometry.
pub fn routes_from_geojson(
    geojson: &GeoJson,
    line_property: &str,
) -> Result<HashMap<LineIdentifier, Vec<LineString>>> {
    let mut routes: HashMap<LineIdentifier, Vec<LineString>> = HashMap::new();

    for feature in features(geojson)? {
        let Some(line_id) = feature.property(line_property).and_then(LineIdentifier::from_json)
        else {
            log::warn!("skipping route feature {:?} without '{}'", feature.id, line_property);
            continue;
        };

        let geometries = match feature.geometry.as_ref().map(|g| &g.value) {
            Some(Value::LineString(positions)) => vec![line_string(positions)?],
            Some(Value::MultiLineString(parts)) => parts
                .iter()
                .map(|part| line_string(part))
                .collect::<Result<Vec<_>>>()?,
            _ => {
                log::warn!("skipping line {line_id}: geometry is not a LineString");
                continue;
            }
        };

        routes.entry(line_id).or_default().extend(geometries);
    }

    Ok(routes)
}

#[cfg(test)]
mod tests {
    use super::*;
    use geo::Point;

    const STOPS: &str = r#"{
        "type": "FeatureCollection",
        "features": [
            {
                "type": "Feature",
                "id": "node/101",
                "geometry": { "type": "Point", "coordinates": [9.19, 45.45] },
                "properties": {
                    "@id": "node/101",
                    "@relations": [
                        { "role": "stop", "rel": 1, "reltags": { "ref": "90", "route": "bus" } },
                        { "role": "stop", "rel": 2, "reltags": { "ref": 91 } },
                        { "role": "stop", "rel": 3, "reltags": { "route": "bus" } }
                    ]
                }
            },
            {
                "type": "Feature",
                "id": "node/102",
                "geometry": { "type": "Point", "coordinates": [9.20, 45.46] },
                "properties": { "name": "no relations" }
            },
            {
                "type": "Feature",
                "id": "way/5",
                "geometry": { "type": "Point", "coordinates": [9.21, 45.47] },
                "properties": { "@relations": [ { "reltags": { "ref": "90" } } ] }
            }
        ]
    }"#;

    const ROUTES: &str = r#"{
        "type": "FeatureCollection",
        "features": [
            {
                "type": "Feature",
                "geometry": { "type": "LineString", "coordinates": [[9.19, 45.45], [9.20, 45.46]] },
                "properties": { "linea": 90 }
            },
            {
                "type": "Feature",
                "geometry": {
                    "type": "MultiLineString",
                    "coordinates": [[[9.20, 45.46], [9.19, 45.45]], [[9.30, 45.50], [9.31, 45.51]]]
                },
                "properties": { "linea": "90" }
            },
            {
                "type": "Feature",
                "geometry": { "type": "Point", "coordinates": [9.19, 45.45] },
                "properties": { "linea": 73 }
            },
            {
                "type": "Feature",
                "geometry": { "type": "LineString", "coordinates": [[9.19, 45.45], [9.20, 45.46]] },
                "properties": { "name": "unnamed" }
            }
        ]
    }"#;

    #[test]
    fn test_stops_from_relations() {
        let stops = stops_from_geojson(&STOPS.parse().unwrap()).unwrap();

        assert_eq!(
            stops,
            vec![
                Stop::new("90", 9.19, 45.45),
                Stop::new("91", 9.19, 45.45),
            ]
        );
        assert_eq!(stops[0].location, Point::new(9.19, 45.45));
    }

    #[test]
    fn test_routes_grouped_by_line() {
        let routes = routes_from_geojson(&ROUTES.parse().unwrap(), "linea").unwrap();

        assert_eq!(routes.len(), 1);
        let line_90 = &routes[&LineIdentifier::new("90")];
        assert_eq!(line_90.len(), 3);
        assert_eq!(line_90[1].0[0], Coord { x: 9.20, y: 45.46 });
    }

    #[test]
    fn test_custom_line_property() {
        let routes = routes_from_geojson(&ROUTES.parse().unwrap(), "ref").unwrap();
        assert!(routes.is_empty());
    }

    #[test]
    fn test_bare_geometry_rejected() {
        let geometry: GeoJson = r#"{ "type": "Point", "coordinates": [1.0, 2.0] }"#
            .parse()
            .unwrap();

        assert!(matches!(
            stops_from_geojson(&geometry),
            Err(TransitError::InvalidData(_))
        ));
    }
}
