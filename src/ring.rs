use crate::error::{Result, SnapolyError};
use crate::graph::NodeKey;
use geo::algorithm::winding_order::Winding;
use geo::Area;
use geo::BoundingRect;
use geo_types::{Coord, LineString, Polygon, Rect};
use std::collections::{HashMap, HashSet};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Orientation {
    CounterClockwise,
    Clockwise,
    /// Zero signed area.
    Collinear,
}

/// A simple closed curve: first and last coordinates equal, no other repeats.
#[derive(Clone, Debug, PartialEq)]
pub struct Ring {
    line: LineString<f64>,
}

impl Ring {
    /// Validates closure and simplicity of the vertex sequence.
    pub fn new(line: LineString<f64>) -> Result<Self> {
        if !line.is_closed() || line.0.len() < 4 {
            return Err(SnapolyError::MalformedTopology(format!(
                "ring with {} coordinates is not a closed curve of at least 3 vertices",
                line.0.len()
            )));
        }
        let open = &line.0[..line.0.len() - 1];
        let mut seen = HashSet::with_capacity(open.len());
        for c in open {
            if !seen.insert(NodeKey::from(*c)) {
                return Err(SnapolyError::MalformedTopology(format!(
                    "ring revisits vertex ({}, {})",
                    c.x, c.y
                )));
            }
        }
        Ok(Self { line })
    }

    pub fn coords(&self) -> &[Coord<f64>] {
        &self.line.0
    }

    /// Number of distinct vertices (the closing duplicate is not counted).
    pub fn vertex_count(&self) -> usize {
        self.line.0.len() - 1
    }

    pub fn line_string(&self) -> &LineString<f64> {
        &self.line
    }

    pub fn into_line_string(self) -> LineString<f64> {
        self.line
    }

    pub fn signed_area(&self) -> f64 {
        // LineString::signed_area() is always zero; area is defined on the polygon.
        Polygon::new(self.line.clone(), vec![]).signed_area()
    }

    pub fn orientation(&self) -> Orientation {
        let area = self.signed_area();
        if area > 0.0 {
            Orientation::CounterClockwise
        } else if area < 0.0 {
            Orientation::Clockwise
        } else {
            Orientation::Collinear
        }
    }

    pub fn bounding_rect(&self) -> Rect<f64> {
        // Rings always hold at least four coordinates.
        self.line
            .bounding_rect()
            .unwrap_or_else(|| Rect::new(self.line.0[0], self.line.0[0]))
    }

    pub fn make_ccw(&mut self) {
        self.line.make_ccw_winding();
    }

    pub fn make_cw(&mut self) {
        self.line.make_cw_winding();
    }

    /// The same curve starting `k` vertices later, optionally traversed backwards.
    pub fn rotated(&self, k: usize, reversed: bool) -> Ring {
        let n = self.vertex_count();
        let open = &self.line.0[..n];
        let mut coords: Vec<Coord<f64>> = (0..n)
            .map(|i| {
                if reversed {
                    open[(k + n - i) % n]
                } else {
                    open[(k + i) % n]
                }
            })
            .collect();
        coords.push(coords[0]);
        Ring {
            line: LineString::new(coords),
        }
    }

    pub fn same_shape(&self, other: &Ring) -> bool {
        same_shape(&self.line, &other.line)
    }

    /// Vertex count and lowest vertex. Equal for every rotation and reflection of a ring.
    pub fn shape_key(&self) -> (usize, NodeKey) {
        let lowest = self.line.0[..self.vertex_count()]
            .iter()
            .map(|c| Coord { x: c.x + 0.0, y: c.y + 0.0 })
            .min_by(|a, b| a.x.total_cmp(&b.x).then(a.y.total_cmp(&b.y)))
            .unwrap_or(self.line.0[0]);
        (self.vertex_count(), NodeKey::from(lowest))
    }
}

/// Whether two closed coordinate sequences trace the same curve, regardless of the
/// starting vertex and traversal direction.
///
/// Sequences that are not closed, or differ in vertex count, never match.
/// Coordinates are compared exactly.
pub fn same_shape(a: &LineString<f64>, b: &LineString<f64>) -> bool {
    if a.0.is_empty() || b.0.is_empty() || !a.is_closed() || !b.is_closed() {
        return false;
    }
    if a.0.len() != b.0.len() {
        return false;
    }
    let n = a.0.len() - 1;
    if n == 0 {
        return a.0[0] == b.0[0];
    }
    let a = &a.0[..n];
    let b = &b.0[..n];

    (0..n).any(|k| {
        let forward = (0..n).all(|i| a[i] == b[(k + i) % n]);
        forward || (0..n).all(|i| a[i] == b[(k + n - i) % n])
    })
}

/// Drops every ring that traces the same curve as an earlier one.
///
/// Rings are bucketed by [`Ring::shape_key`]; only rings in the same bucket are compared.
pub fn dedup_rings<T, F>(items: Vec<T>, ring_of: F) -> Vec<T>
where
    F: Fn(&T) -> &Ring,
{
    let mut kept: Vec<T> = Vec::with_capacity(items.len());
    let mut buckets: HashMap<(usize, NodeKey), Vec<usize>> = HashMap::with_capacity(items.len());
    for item in items {
        let ring = ring_of(&item);
        let bucket = buckets.entry(ring.shape_key()).or_default();
        if bucket.iter().any(|&k| ring_of(&kept[k]).same_shape(ring)) {
            log::debug!("dropping duplicate ring with {} vertices", ring.vertex_count());
            continue;
        }
        bucket.push(kept.len());
        kept.push(item);
    }
    kept
}
