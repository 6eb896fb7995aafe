pub mod ring_graph;

#[cfg(test)]
mod tests;

pub use ring_graph::{assemble_rings, AssembledRing, NodeKey, RingGraph};
