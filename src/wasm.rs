use crate::io::reconstruct_geojson;
use wasm_bindgen::prelude::*;

#[wasm_bindgen]
pub fn init_panic_hook() {
    console_error_panic_hook::set_once();
}

/// Rebuilds the polygons of a GeoJSON polygon layer from their boundary segments.
#[wasm_bindgen]
pub fn reconstruct(geojson_str: &str) -> Result<String, JsValue> {
    reconstruct_geojson(geojson_str)
        .map_err(|e| JsValue::from_str(&format!("Reconstruction failed: {}", e)))
}
