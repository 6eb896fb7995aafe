use thiserror::Error;

#[derive(Error, Debug)]
pub enum SnapolyError {
    /// A vertex with degree other than two, a zero-length segment, or a ring that does not close.
    #[error("Malformed topology: {0}")]
    MalformedTopology(String),

    #[error("Ambiguous containment: {0}")]
    AmbiguousContainment(String),

    #[error("Coordinate used before the layer minimum was sealed: {0}")]
    UnnormalizedCoordinateUse(String),

    #[error("Layer offset already assigned: {0}")]
    OffsetReassigned(String),

    #[error("Unsupported ring nesting: {0}")]
    UnsupportedNesting(String),

    #[error("Invalid geometry: {0}")]
    InvalidGeometry(String),

    #[error("GeoJSON error: {0}")]
    GeoJson(#[from] geojson::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, SnapolyError>;
