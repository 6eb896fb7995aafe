use geo::Line;
use geo_types::{Coord, LineString, Polygon};

/// A boundary segment forced into the triangulation, tagged with the feature it came from.
///
/// Endpoint order carries no meaning for ring assembly.
#[derive(Clone, Debug, PartialEq)]
pub struct Constraint {
    pub line: Line<f64>,
    pub feature_id: String,
}

impl Constraint {
    pub fn new(start: Coord<f64>, end: Coord<f64>, feature_id: impl Into<String>) -> Self {
        Self {
            line: Line::new(start, end),
            feature_id: feature_id.into(),
        }
    }

    /// Emits one constraint per segment of every ring of `poly`.
    pub fn from_polygon(feature_id: &str, poly: &Polygon<f64>) -> Vec<Constraint> {
        let mut out = Vec::new();
        push_ring(feature_id, poly.exterior(), &mut out);
        for hole in poly.interiors() {
            push_ring(feature_id, hole, &mut out);
        }
        out
    }

    /// True if both constraints join the same pair of endpoints, in either order.
    pub fn same_segment(&self, other: &Constraint) -> bool {
        (self.line.start == other.line.start && self.line.end == other.line.end)
            || (self.line.start == other.line.end && self.line.end == other.line.start)
    }
}

fn push_ring(feature_id: &str, ring: &LineString<f64>, out: &mut Vec<Constraint>) {
    for line in ring.lines() {
        // Polygon::new closes rings, but repeated vertices still yield empty segments.
        if line.start == line.end {
            continue;
        }
        out.push(Constraint {
            line,
            feature_id: feature_id.to_string(),
        });
    }
}
