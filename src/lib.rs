//! Reassembles polygons with holes from the boundary constraints of a constrained
//! Delaunay triangulation.
//!
//! The pipeline is: [`CoordinateNormalizer`] over the source layer, an external
//! snap-rounding/triangulation stage producing [`Constraint`]s, [`assemble_rings`],
//! then [`PolygonBuilder`] classifying outer boundaries and holes.

pub mod builder;
pub mod catalog;
pub mod constraint;
pub mod error;
pub mod graph;
pub mod io;
pub mod layer;
pub mod normalize;
pub mod ring;
pub mod utils;

#[cfg(target_arch = "wasm32")]
pub mod wasm;


pub use builder::{NestingRule, PolygonBuilder, PolygonRecord, RingRole};
pub use catalog::{FeatureCatalog, Field};
pub use constraint::Constraint;
pub use error::{Result, SnapolyError};
pub use graph::{assemble_rings, AssembledRing};
pub use layer::{BoundarySegments, ConstraintSource, Layer, LayerOutput, LayerProcessor, SourcePolygon};
pub use normalize::{CoordinateNormalizer, LayerOffset, LayerOffsets};
pub use ring::{same_shape, Ring};
