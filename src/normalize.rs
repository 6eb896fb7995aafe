use crate::error::{Result, SnapolyError};
use geo::{CoordsIter, MapCoordsInPlace};
use geo_types::{Coord, Polygon};
use std::collections::HashMap;

/// The `(min_x, min_y)` shift applied to every coordinate of one layer.
///
/// Produced once by [`CoordinateNormalizer::seal`] and never mutated afterwards.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct LayerOffset {
    pub min_x: f64,
    pub min_y: f64,
}

impl LayerOffset {
    pub const ZERO: LayerOffset = LayerOffset { min_x: 0.0, min_y: 0.0 };

    pub fn normalize(&self, c: Coord<f64>) -> Coord<f64> {
        Coord {
            x: c.x - self.min_x,
            y: c.y - self.min_y,
        }
    }

    /// Shifts a normalized coordinate back into the source frame.
    pub fn denormalize(&self, c: Coord<f64>) -> Coord<f64> {
        Coord {
            x: c.x + self.min_x,
            y: c.y + self.min_y,
        }
    }

    pub fn normalize_polygon(&self, poly: &mut Polygon<f64>) {
        let offset = *self;
        poly.map_coords_in_place(move |c| offset.normalize(c));
    }

    pub fn denormalize_polygon(&self, poly: &mut Polygon<f64>) {
        let offset = *self;
        poly.map_coords_in_place(move |c| offset.denormalize(c));
    }
}

/// Scan-then-shift tracker of a layer's minimum coordinate.
///
/// Every coordinate of the layer must pass through [`observe`](Self::observe)
/// before [`seal`](Self::seal); only a sealed normalizer shifts coordinates.
#[derive(Debug)]
pub struct CoordinateNormalizer {
    min_x: f64,
    min_y: f64,
    observed: usize,
    sealed: Option<LayerOffset>,
}

impl Default for CoordinateNormalizer {
    fn default() -> Self {
        Self::new()
    }
}

impl CoordinateNormalizer {
    pub fn new() -> Self {
        Self {
            min_x: f64::INFINITY,
            min_y: f64::INFINITY,
            observed: 0,
            sealed: None,
        }
    }

    pub fn observe(&mut self, c: Coord<f64>) -> Result<()> {
        if self.sealed.is_some() {
            return Err(SnapolyError::UnnormalizedCoordinateUse(format!(
                "observed ({}, {}) after the layer offset was sealed",
                c.x, c.y
            )));
        }
        self.min_x = self.min_x.min(c.x);
        self.min_y = self.min_y.min(c.y);
        self.observed += 1;
        Ok(())
    }

    pub fn observe_polygon(&mut self, poly: &Polygon<f64>) -> Result<()> {
        for c in poly.coords_iter() {
            self.observe(c)?;
        }
        Ok(())
    }

    pub fn observed(&self) -> usize {
        self.observed
    }

    /// Ends the observation phase. An empty layer seals to [`LayerOffset::ZERO`].
    /// Sealing twice returns the same offset.
    pub fn seal(&mut self) -> LayerOffset {
        if let Some(offset) = self.sealed {
            return offset;
        }
        let offset = if self.observed == 0 {
            LayerOffset::ZERO
        } else {
            LayerOffset {
                min_x: self.min_x,
                min_y: self.min_y,
            }
        };
        log::debug!(
            "sealed layer offset ({}, {}) after {} coordinates",
            offset.min_x,
            offset.min_y,
            self.observed
        );
        self.sealed = Some(offset);
        offset
    }

    pub fn offset(&self) -> Option<LayerOffset> {
        self.sealed
    }

    pub fn normalize(&self, c: Coord<f64>) -> Result<Coord<f64>> {
        match self.sealed {
            Some(offset) => Ok(offset.normalize(c)),
            None => Err(SnapolyError::UnnormalizedCoordinateUse(format!(
                "normalize ({}, {}) called while {} coordinates observed and offset unsealed",
                c.x, c.y, self.observed
            ))),
        }
    }
}

/// Offsets of every layer of one dataset. Each layer is assigned exactly once.
#[derive(Debug, Default)]
pub struct LayerOffsets {
    offsets: HashMap<String, LayerOffset>,
}

impl LayerOffsets {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn assign(&mut self, layer: &str, offset: LayerOffset) -> Result<()> {
        if let Some(existing) = self.offsets.get(layer) {
            return Err(SnapolyError::OffsetReassigned(format!(
                "layer '{}' already shifted by ({}, {})",
                layer, existing.min_x, existing.min_y
            )));
        }
        self.offsets.insert(layer.to_string(), offset);
        Ok(())
    }

    pub fn get(&self, layer: &str) -> Option<LayerOffset> {
        self.offsets.get(layer).copied()
    }

    pub fn len(&self) -> usize {
        self.offsets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.offsets.is_empty()
    }
}
