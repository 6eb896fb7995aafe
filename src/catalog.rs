use serde_json::{Map, Value};
use std::collections::HashMap;

const NULL: &str = "NULL";

/// Attribute bundle of one source feature, laid out after the OSM shapefile exports
/// (`gis_osm_*_free_1.shp`).
#[derive(Clone, Debug, PartialEq)]
pub struct Field {
    pub code: i64,
    pub fclass: String,
    pub name: String,
    pub kind: String,
}

impl Default for Field {
    fn default() -> Self {
        Self {
            code: 0,
            fclass: NULL.to_string(),
            name: NULL.to_string(),
            kind: NULL.to_string(),
        }
    }
}

impl Field {
    /// Reads `code`, `fclass`, `name` and `type`. Missing or null values keep their defaults.
    pub fn from_properties(props: &Map<String, Value>) -> Self {
        let mut field = Field::default();
        if let Some(code) = props.get("code").and_then(parse_code) {
            field.code = code;
        }
        if let Some(s) = props.get("fclass").and_then(text) {
            field.fclass = s;
        }
        if let Some(s) = props.get("name").and_then(text) {
            field.name = s;
        }
        if let Some(s) = props.get("type").and_then(text) {
            field.kind = s;
        }
        field
    }

    pub fn to_properties(&self, feature_id: &str) -> Map<String, Value> {
        let mut props = Map::new();
        props.insert("osm_id".to_string(), Value::from(feature_id));
        props.insert("code".to_string(), Value::from(self.code));
        props.insert("fclass".to_string(), Value::from(self.fclass.as_str()));
        props.insert("name".to_string(), Value::from(self.name.as_str()));
        props.insert("type".to_string(), Value::from(self.kind.as_str()));
        props
    }
}

fn parse_code(v: &Value) -> Option<i64> {
    match v {
        Value::Number(n) => n.as_i64().or_else(|| n.as_f64().map(|f| f as i64)),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}

fn text(v: &Value) -> Option<String> {
    match v {
        Value::Null => None,
        Value::String(s) => Some(s.clone()),
        other => Some(other.to_string()),
    }
}

/// Feature identifier to attribute lookup for one input dataset.
#[derive(Clone, Debug, Default)]
pub struct FeatureCatalog {
    fields: HashMap<String, Field>,
}

impl FeatureCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a feature; a repeated id replaces the earlier record.
    pub fn insert(&mut self, feature_id: impl Into<String>, field: Field) {
        let feature_id = feature_id.into();
        if self.fields.insert(feature_id.clone(), field).is_some() {
            log::warn!("feature '{}' registered twice, keeping the latest attributes", feature_id);
        }
    }

    pub fn get(&self, feature_id: &str) -> Option<&Field> {
        self.fields.get(feature_id)
    }

    pub fn get_or_default(&self, feature_id: &str) -> Field {
        self.fields.get(feature_id).cloned().unwrap_or_default()
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}
