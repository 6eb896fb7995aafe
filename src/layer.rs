use crate::builder::{NestingRule, PolygonBuilder, PolygonRecord};
use crate::catalog::FeatureCatalog;
use crate::constraint::Constraint;
use crate::error::Result;
use crate::graph::assemble_rings;
use crate::normalize::{CoordinateNormalizer, LayerOffset, LayerOffsets};
use crate::utils::parallel;
use geo_types::Polygon;

/// A source polygon and the feature it belongs to.
#[derive(Clone, Debug, PartialEq)]
pub struct SourcePolygon {
    pub feature_id: String,
    pub polygon: Polygon<f64>,
}

/// One layer of an input dataset.
#[derive(Clone, Debug, Default)]
pub struct Layer {
    pub name: String,
    pub polygons: Vec<SourcePolygon>,
    pub catalog: FeatureCatalog,
}

impl Layer {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    pub fn add_polygon(&mut self, feature_id: impl Into<String>, polygon: Polygon<f64>) {
        self.polygons.push(SourcePolygon {
            feature_id: feature_id.into(),
            polygon,
        });
    }
}

/// Produces the boundary constraints for a layer's normalized polygons.
///
/// This is where the snap-rounding and constrained triangulation stage plugs in.
pub trait ConstraintSource: Sync {
    fn constraints(&self, polygons: &[SourcePolygon]) -> Result<Vec<Constraint>>;
}

/// Uses each ring segment of each polygon as-is. Suitable for input that is already
/// noded and free of shared vertices between rings.
#[derive(Clone, Copy, Debug, Default)]
pub struct BoundarySegments;

impl ConstraintSource for BoundarySegments {
    fn constraints(&self, polygons: &[SourcePolygon]) -> Result<Vec<Constraint>> {
        Ok(polygons
            .iter()
            .flat_map(|p| Constraint::from_polygon(&p.feature_id, &p.polygon))
            .collect())
    }
}

impl<F> ConstraintSource for F
where
    F: Fn(&[SourcePolygon]) -> Result<Vec<Constraint>> + Sync,
{
    fn constraints(&self, polygons: &[SourcePolygon]) -> Result<Vec<Constraint>> {
        self(polygons)
    }
}

#[derive(Clone, Debug)]
pub struct LayerOutput {
    pub name: String,
    pub offset: LayerOffset,
    pub records: Vec<PolygonRecord>,
}

pub struct LayerProcessor<S = BoundarySegments> {
    source: S,
    pub nesting: NestingRule,
    /// Shift records back into the source frame before returning them.
    pub restore_offset: bool,
}

impl LayerProcessor<BoundarySegments> {
    pub fn new() -> Self {
        Self::with_source(BoundarySegments)
    }
}

impl Default for LayerProcessor<BoundarySegments> {
    fn default() -> Self {
        Self::new()
    }
}

impl<S: ConstraintSource> LayerProcessor<S> {
    pub fn with_source(source: S) -> Self {
        Self {
            source,
            nesting: NestingRule::EvenOdd,
            restore_offset: false,
        }
    }

    pub fn with_nesting(mut self, nesting: NestingRule) -> Self {
        self.nesting = nesting;
        self
    }

    pub fn with_restore_offset(mut self, restore: bool) -> Self {
        self.restore_offset = restore;
        self
    }

    /// Runs the full reconstruction for one layer. Any error aborts the layer.
    pub fn process(&self, layer: Layer) -> Result<LayerOutput> {
        let Layer {
            name,
            mut polygons,
            catalog,
        } = layer;

        // 1. Scan the whole layer before shifting anything
        let mut normalizer = CoordinateNormalizer::new();
        for p in &polygons {
            normalizer.observe_polygon(&p.polygon)?;
        }
        let offset = normalizer.seal();

        // 2. Shift
        for p in &mut polygons {
            offset.normalize_polygon(&mut p.polygon);
        }

        // 3. Constraints (external stage)
        let constraints = self.source.constraints(&polygons)?;
        log::debug!(
            "layer '{}': {} polygons, {} constraints",
            name,
            polygons.len(),
            constraints.len()
        );
        drop(polygons);

        // 4. Rings and polygons
        let rings = assemble_rings(constraints)?;
        let builder = PolygonBuilder::new()
            .with_catalog(&catalog)
            .with_nesting(self.nesting);
        let mut records = builder.build(rings)?;

        if self.restore_offset {
            for r in &mut records {
                r.denormalize(&offset);
            }
        }

        Ok(LayerOutput {
            name,
            offset,
            records,
        })
    }

    /// Processes independent layers, in parallel when enabled. Results keep the input
    /// order; a failed layer does not affect the others. Repeated layer names fail.
    pub fn process_all(&self, layers: Vec<Layer>) -> Vec<Result<LayerOutput>> {
        let results = parallel::map_owned(layers, |layer| self.process(layer));

        let mut offsets = LayerOffsets::new();
        results
            .into_iter()
            .map(|res| {
                let out = res?;
                offsets.assign(&out.name, out.offset)?;
                Ok(out)
            })
            .collect()
    }
}

#[cfg(test)]
#[path = "layer_tests.rs"]
mod tests;
