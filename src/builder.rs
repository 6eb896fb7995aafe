use crate::catalog::{FeatureCatalog, Field};
use crate::error::{Result, SnapolyError};
use crate::graph::AssembledRing;
use crate::normalize::LayerOffset;
use crate::ring::{dedup_rings, Ring};
use geo::coordinate_position::{CoordPos, CoordinatePosition};
use geo::Intersects;
use geo_types::{LineString, Polygon};
use rstar::{Envelope, RTree, RTreeObject, AABB};

// Wrapper for a ring's bounding box to be indexable by rstar
struct IndexedRing {
    envelope: AABB<[f64; 2]>,
    index: usize,
}

impl RTreeObject for IndexedRing {
    type Envelope = AABB<[f64; 2]>;

    fn envelope(&self) -> Self::Envelope {
        self.envelope
    }
}

fn ring_envelope(ring: &Ring) -> AABB<[f64; 2]> {
    let bbox = ring.bounding_rect();
    AABB::from_corners([bbox.min().x, bbox.min().y], [bbox.max().x, bbox.max().y])
}

/// How rings nested deeper than one hole are treated.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum NestingRule {
    /// Even nesting depth is an outer boundary, odd depth a hole of its immediate enclosure.
    /// An island inside a hole starts a new polygon.
    #[default]
    EvenOdd,
    /// Only outer boundaries and their direct holes are accepted.
    SingleLevel,
}

/// Role of a ring after containment classification.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RingRole {
    Outer,
    /// Hole of the outer ring at this index.
    Hole { outer: usize },
}

/// One output polygon: outer boundary (counter-clockwise), holes (clockwise) and attributes.
#[derive(Clone, Debug, PartialEq)]
pub struct PolygonRecord {
    pub polygon: Polygon<f64>,
    pub feature_id: String,
    pub field: Field,
}

impl PolygonRecord {
    pub fn exterior(&self) -> &LineString<f64> {
        self.polygon.exterior()
    }

    pub fn holes(&self) -> &[LineString<f64>] {
        self.polygon.interiors()
    }

    /// Moves the record back into the source coordinate frame.
    pub fn denormalize(&mut self, offset: &LayerOffset) {
        offset.denormalize_polygon(&mut self.polygon);
    }
}

pub struct PolygonBuilder<'a> {
    catalog: Option<&'a FeatureCatalog>,
    // Configuration
    pub nesting: NestingRule,
    pub dedup_rings: bool,
}

impl Default for PolygonBuilder<'_> {
    fn default() -> Self {
        Self::new()
    }
}

impl<'a> PolygonBuilder<'a> {
    pub fn new() -> Self {
        Self {
            catalog: None,
            nesting: NestingRule::EvenOdd,
            dedup_rings: true,
        }
    }

    pub fn with_catalog(mut self, catalog: &'a FeatureCatalog) -> Self {
        self.catalog = Some(catalog);
        self
    }

    pub fn with_nesting(mut self, nesting: NestingRule) -> Self {
        self.nesting = nesting;
        self
    }

    /// Assigns every ring a role. Outer rings are never nested at odd depth, every
    /// nested ring has exactly one immediate enclosure and holes of the same outer ring
    /// do not overlap.
    pub fn classify(&self, rings: &[Ring]) -> Result<Vec<RingRole>> {
        self.classify_features(rings, None)
    }

    fn classify_features(&self, rings: &[Ring], feature_ids: Option<&[&str]>) -> Result<Vec<RingRole>> {
        let describe = |i: usize| match feature_ids.and_then(|ids| ids.get(i)) {
            Some(id) => format!("ring {} of feature '{}' ({} vertices)", i, id, rings[i].vertex_count()),
            None => format!("ring {} ({} vertices)", i, rings[i].vertex_count()),
        };

        let shapes: Vec<Polygon<f64>> = rings
            .iter()
            .map(|r| Polygon::new(r.line_string().clone(), vec![]))
            .collect();
        let envelopes: Vec<AABB<[f64; 2]>> = rings.iter().map(ring_envelope).collect();
        let tree = RTree::bulk_load(
            envelopes
                .iter()
                .enumerate()
                .map(|(index, envelope)| IndexedRing { envelope: *envelope, index })
                .collect(),
        );

        // Depth needs the full container list of every ring, so this stays one sequential pass.
        let containers: Vec<Vec<usize>> = (0..rings.len())
            .map(|i| {
                let mut found: Vec<usize> = tree
                    .locate_in_envelope_intersecting(&envelopes[i])
                    .filter(|cand| cand.index != i && cand.envelope.contains_envelope(&envelopes[i]))
                    .filter(|cand| {
                        ring_within(&rings[i], &shapes[cand.index]) && !rings[cand.index].same_shape(&rings[i])
                    })
                    .map(|cand| cand.index)
                    .collect();
                found.sort_unstable();
                found
            })
            .collect();

        for (i, outer) in containers.iter().enumerate() {
            if let Some(&j) = outer.iter().find(|&&j| containers[j].contains(&i)) {
                return Err(SnapolyError::AmbiguousContainment(format!(
                    "{} and {} contain each other",
                    describe(i),
                    describe(j)
                )));
            }
        }

        let depth: Vec<usize> = containers.iter().map(Vec::len).collect();
        let mut parent: Vec<Option<usize>> = vec![None; rings.len()];
        for (i, outer) in containers.iter().enumerate() {
            if depth[i] == 0 {
                continue;
            }
            if depth[i] > 1 && self.nesting == NestingRule::SingleLevel {
                return Err(SnapolyError::UnsupportedNesting(format!(
                    "{} is nested {} levels deep",
                    describe(i),
                    depth[i]
                )));
            }
            let immediate: Vec<usize> = outer.iter().copied().filter(|&j| depth[j] + 1 == depth[i]).collect();
            if immediate.len() != 1 {
                return Err(SnapolyError::AmbiguousContainment(format!(
                    "{} at depth {} has {} immediate enclosures among {:?}",
                    describe(i),
                    depth[i],
                    immediate.len(),
                    outer
                )));
            }
            parent[i] = Some(immediate[0]);
        }

        let roles: Vec<RingRole> = (0..rings.len())
            .map(|i| match (depth[i] % 2, parent[i]) {
                (1, Some(outer)) => RingRole::Hole { outer },
                _ => RingRole::Outer,
            })
            .collect();

        // Sibling holes: only pairs with touching envelopes can overlap
        for (i, role) in roles.iter().enumerate() {
            let RingRole::Hole { outer } = *role else {
                continue;
            };
            let sibling = tree
                .locate_in_envelope_intersecting(&envelopes[i])
                .map(|cand| cand.index)
                .filter(|&j| j > i && roles[j] == RingRole::Hole { outer })
                .find(|&j| rings_overlap(&rings[i], &shapes[i], &rings[j], &shapes[j]));
            if let Some(j) = sibling {
                return Err(SnapolyError::AmbiguousContainment(format!(
                    "holes {} and {} of {} overlap",
                    describe(i),
                    describe(j),
                    describe(outer)
                )));
            }
        }

        Ok(roles)
    }

    /// Turns assembled rings into polygon records, ordered by their outer ring.
    pub fn build(&self, rings: Vec<AssembledRing>) -> Result<Vec<PolygonRecord>> {
        let rings = if self.dedup_rings {
            dedup_rings(rings, |r| &r.ring)
        } else {
            rings
        };

        let mut kept = Vec::with_capacity(rings.len());
        for assembled in rings {
            let area = assembled.ring.signed_area();
            if area == 0.0 {
                log::warn!(
                    "skipping zero-area ring of feature '{}' with {} vertices",
                    assembled.feature_id,
                    assembled.ring.vertex_count()
                );
                continue;
            }
            kept.push(assembled);
        }

        let plain: Vec<Ring> = kept.iter().map(|a| a.ring.clone()).collect();
        let feature_ids: Vec<&str> = kept.iter().map(|a| a.feature_id.as_str()).collect();
        let roles = self.classify_features(&plain, Some(feature_ids.as_slice()))?;

        let mut holes: Vec<Vec<LineString<f64>>> = vec![Vec::new(); kept.len()];
        for (i, role) in roles.iter().enumerate() {
            if let RingRole::Hole { outer } = *role {
                let mut hole = plain[i].clone();
                hole.make_cw();
                holes[outer].push(hole.into_line_string());
            }
        }

        let mut records = Vec::new();
        for (i, assembled) in kept.into_iter().enumerate() {
            if roles[i] != RingRole::Outer {
                continue;
            }
            let mut exterior = assembled.ring;
            exterior.make_ccw();
            let field = self
                .catalog
                .map(|c| c.get_or_default(&assembled.feature_id))
                .unwrap_or_default();
            records.push(PolygonRecord {
                polygon: Polygon::new(exterior.into_line_string(), std::mem::take(&mut holes[i])),
                feature_id: assembled.feature_id,
                field,
            });
        }

        log::debug!(
            "built {} polygons from {} rings",
            records.len(),
            plain.len()
        );
        Ok(records)
    }
}

/// Every vertex of `inner` lies inside or on the boundary of `outer`.
fn ring_within(inner: &Ring, outer: &Polygon<f64>) -> bool {
    let coords = inner.coords();
    coords[..coords.len() - 1]
        .iter()
        .all(|c| outer.coordinate_position(c) != CoordPos::Outside)
}

/// Boundaries cross or touch, or a vertex of one lies strictly inside the other.
fn rings_overlap(a: &Ring, a_shape: &Polygon<f64>, b: &Ring, b_shape: &Polygon<f64>) -> bool {
    let strictly_inside = |ring: &Ring, shape: &Polygon<f64>| {
        ring.coords()
            .iter()
            .any(|c| shape.coordinate_position(c) == CoordPos::Inside)
    };
    a.line_string().intersects(b.line_string()) || strictly_inside(a, b_shape) || strictly_inside(b, a_shape)
}
