//! GeoJSON point files

use super::PointReadOptions;
use crate::error::{Error, Result};
use crate::points::{PointSet, SamplePoint};
use geojson::{Feature, GeoJson, Value};

/// Parse a GeoJSON `FeatureCollection` (or single `Feature`) of points.
///
/// The sample value is read from the `z_field` property. Non-point
/// geometries are rejected.
pub(crate) fn parse_geojson(
    content: &str,
    source_id: &str,
    options: &PointReadOptions,
) -> Result<PointSet> {
    let geojson: GeoJson = content
        .parse()
        .map_err(|e| Error::parse(source_id, format!("invalid GeoJSON: {}", e)))?;

    let features = match geojson {
        GeoJson::FeatureCollection(fc) => fc.features,
        GeoJson::Feature(f) => vec![f],
        GeoJson::Geometry(_) => {
            return Err(Error::parse(
                source_id,
                "bare geometry has no attributes; expected Feature or FeatureCollection",
            ))
        }
    };

    if features.is_empty() {
        return Err(Error::parse(source_id, "no features found"));
    }

    let points = features
        .iter()
        .enumerate()
        .map(|(i, f)| feature_to_point(f, i, source_id, &options.z_field))
        .collect::<Result<Vec<_>>>()?;

    PointSet::new(points).map_err(|e| Error::parse(source_id, e.to_string()))
}

fn feature_to_point(
    feature: &Feature,
    index: usize,
    source_id: &str,
    z_field: &str,
) -> Result<SamplePoint> {
    let (x, y) = match feature.geometry.as_ref().map(|g| &g.value) {
        Some(Value::Point(coords)) if coords.len() >= 2 => (coords[0], coords[1]),
        Some(Value::Point(_)) => {
            return Err(Error::parse(
                source_id,
                format!("feature {}: point has fewer than two coordinates", index),
            ))
        }
        Some(other) => {
            return Err(Error::parse(
                source_id,
                format!("feature {}: unsupported geometry type {}", index, geometry_name(other)),
            ))
        }
        None => {
            return Err(Error::parse(
                source_id,
                format!("feature {}: missing geometry", index),
            ))
        }
    };

    let z = feature
        .property(z_field)
        .ok_or_else(|| {
            Error::parse(
                source_id,
                format!("feature {}: property '{}' not found", index, z_field),
            )
        })?
        .as_f64()
        .ok_or_else(|| {
            Error::parse(
                source_id,
                format!("feature {}: property '{}' is not a number", index, z_field),
            )
        })?;

    Ok(SamplePoint::new(x, y, z))
}

fn geometry_name(value: &Value) -> &'static str {
    match value {
        Value::Point(_) => "Point",
        Value::MultiPoint(_) => "MultiPoint",
        Value::LineString(_) => "LineString",
        Value::MultiLineString(_) => "MultiLineString",
        Value::Polygon(_) => "Polygon",
        Value::MultiPolygon(_) => "MultiPolygon",
        Value::GeometryCollection(_) => "GeometryCollection",
    }
}
