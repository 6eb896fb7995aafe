//! GeoJSON stand-in for the vector reader and writer.
//!
//! Source attributes follow the OSM shapefile layout (`osm_id`, `code`, `fclass`,
//! `name`, `type`).

use crate::builder::PolygonRecord;
use crate::catalog::Field;
use crate::error::{Result, SnapolyError};
use crate::layer::{Layer, LayerProcessor};
use geojson::feature::Id;
use geojson::{Feature, FeatureCollection, GeoJson, Geometry, Value};
use std::str::FromStr;

/// Reads every Polygon and MultiPolygon feature into a layer. Other geometries are skipped.
pub fn read_layer(name: &str, geojson: &GeoJson) -> Result<Layer> {
    let mut layer = Layer::new(name);
    let mut skipped = 0;

    let features: Vec<&Feature> = match geojson {
        GeoJson::FeatureCollection(fc) => fc.features.iter().collect(),
        GeoJson::Feature(feature) => vec![feature],
        GeoJson::Geometry(geometry) => {
            add_geometry(&mut layer, "0", geometry)?;
            return Ok(layer);
        }
    };

    for (index, feature) in features.into_iter().enumerate() {
        let Some(geometry) = &feature.geometry else {
            skipped += 1;
            continue;
        };
        let feature_id = feature_id(feature, index);
        if !add_geometry(&mut layer, &feature_id, geometry)? {
            skipped += 1;
            continue;
        }
        let field = feature
            .properties
            .as_ref()
            .map(Field::from_properties)
            .unwrap_or_default();
        layer.catalog.insert(feature_id, field);
    }

    if skipped > 0 {
        log::warn!("layer '{}': skipped {} non-polygonal features", name, skipped);
    }
    Ok(layer)
}

fn feature_id(feature: &Feature, index: usize) -> String {
    if let Some(value) = feature.property("osm_id") {
        match value {
            serde_json::Value::String(s) => return s.clone(),
            serde_json::Value::Number(n) => return n.to_string(),
            _ => {}
        }
    }
    match &feature.id {
        Some(Id::String(s)) => s.clone(),
        Some(Id::Number(n)) => n.to_string(),
        None => index.to_string(),
    }
}

/// Returns false if the geometry is not polygonal.
fn add_geometry(layer: &mut Layer, feature_id: &str, geometry: &Geometry) -> Result<bool> {
    match &geometry.value {
        Value::Polygon(_) | Value::MultiPolygon(_) => {}
        _ => return Ok(false),
    }
    let geom: geo_types::Geometry<f64> = geometry.clone().try_into()?;
    match geom {
        geo_types::Geometry::Polygon(poly) => layer.add_polygon(feature_id, poly),
        geo_types::Geometry::MultiPolygon(mpoly) => {
            for poly in mpoly {
                layer.add_polygon(feature_id, poly);
            }
        }
        other => {
            return Err(SnapolyError::InvalidGeometry(format!(
                "feature '{}' converted to unexpected {:?}",
                feature_id, other
            )))
        }
    }
    Ok(true)
}

pub fn to_feature(record: &PolygonRecord) -> Feature {
    let geometry = Geometry::new(Value::from(&record.polygon));
    Feature {
        bbox: None,
        geometry: Some(geometry),
        id: None,
        properties: Some(record.field.to_properties(&record.feature_id)),
        foreign_members: None,
    }
}

pub fn to_feature_collection(records: &[PolygonRecord]) -> FeatureCollection {
    FeatureCollection {
        bbox: None,
        features: records.iter().map(to_feature).collect(),
        foreign_members: None,
    }
}

/// Parses a GeoJSON polygon layer, rebuilds its polygons from their boundary segments
/// and returns them as a GeoJSON feature collection in the source frame.
pub fn reconstruct_geojson(input: &str) -> Result<String> {
    let geojson = GeoJson::from_str(input)?;
    let layer = read_layer("layer", &geojson)?;
    let output = LayerProcessor::new().with_restore_offset(true).process(layer)?;
    Ok(to_feature_collection(&output.records).to_string())
}
