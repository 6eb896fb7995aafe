use crate::constraint::Constraint;
use crate::error::{Result, SnapolyError};
use crate::ring::Ring;
use geo_types::{Coord, LineString};
use smallvec::SmallVec;
use std::collections::HashMap;

// Type aliases for indices to ensure we don't mix them up
pub type NodeId = usize;
pub type EdgeId = usize;

#[derive(Clone, Debug)]
pub struct Node {
    pub coordinate: Coord<f64>,
    /// Incident segments. A well-formed ring decomposition has exactly two.
    pub incident: SmallVec<[EdgeId; 2]>,
}

impl Node {
    pub fn degree(&self) -> usize {
        self.incident.len()
    }
}

#[derive(Clone, Debug)]
pub struct Edge {
    pub nodes: [NodeId; 2],
    pub feature_id: String,
    /// Traversal state: has this segment been walked into a ring?
    pub is_visited: bool,
}

impl Edge {
    fn opposite(&self, node: NodeId) -> NodeId {
        if self.nodes[0] == node {
            self.nodes[1]
        } else {
            self.nodes[0]
        }
    }
}

/// Wrapper for Coord to be Hashable (since f64 is not Hash).
///
/// Keys on the exact bit pattern; `-0.0` and `0.0` share a key.
#[derive(PartialEq, Eq, Hash, Clone, Copy, Debug)]
pub struct NodeKey(u64, u64);

impl From<Coord<f64>> for NodeKey {
    fn from(c: Coord<f64>) -> Self {
        NodeKey((c.x + 0.0).to_bits(), (c.y + 0.0).to_bits())
    }
}

/// A ring walked out of the graph, with the feature it most likely belongs to.
#[derive(Clone, Debug)]
pub struct AssembledRing {
    pub ring: Ring,
    pub feature_id: String,
}

/// Undirected vertex/segment graph over a constraint list.
#[derive(Default)]
pub struct RingGraph {
    /// All vertices. Index is `NodeId`.
    pub nodes: Vec<Node>,
    /// All segments. Index is `EdgeId`.
    pub edges: Vec<Edge>,
    pub node_map: HashMap<NodeKey, NodeId>,
}

impl RingGraph {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_constraints(constraints: Vec<Constraint>) -> Result<Self> {
        let mut graph = Self::new();
        graph.nodes.reserve(constraints.len());
        graph.edges.reserve(constraints.len());
        for c in constraints {
            graph.add_constraint(c)?;
        }
        Ok(graph)
    }

    pub fn add_node(&mut self, coord: Coord<f64>) -> NodeId {
        let key = NodeKey::from(coord);
        if let Some(&id) = self.node_map.get(&key) {
            return id;
        }

        let id = self.nodes.len();
        self.nodes.push(Node {
            coordinate: coord,
            incident: SmallVec::new(),
        });
        self.node_map.insert(key, id);
        id
    }

    pub fn add_constraint(&mut self, constraint: Constraint) -> Result<()> {
        let Constraint { line, feature_id } = constraint;
        if NodeKey::from(line.start) == NodeKey::from(line.end) {
            return Err(SnapolyError::MalformedTopology(format!(
                "zero-length segment at ({}, {}) in feature '{}'",
                line.start.x, line.start.y, feature_id
            )));
        }

        let u = self.add_node(line.start);
        let v = self.add_node(line.end);
        let edge_idx = self.edges.len();
        self.edges.push(Edge {
            nodes: [u, v],
            feature_id,
            is_visited: false,
        });
        self.nodes[u].incident.push(edge_idx);
        self.nodes[v].incident.push(edge_idx);
        Ok(())
    }

    pub fn node_at(&self, coord: Coord<f64>) -> Option<&Node> {
        self.node_map.get(&NodeKey::from(coord)).map(|&id| &self.nodes[id])
    }

    /// Fails on the first vertex (in insertion order) whose degree is not two.
    pub fn check_degrees(&self) -> Result<()> {
        for node in &self.nodes {
            let degree = node.degree();
            if degree == 2 {
                continue;
            }
            let kind = if degree < 2 { "dangling endpoint" } else { "branching vertex" };
            return Err(SnapolyError::MalformedTopology(format!(
                "{} at ({}, {}) with {} incident segments",
                kind, node.coordinate.x, node.coordinate.y, degree
            )));
        }
        Ok(())
    }

    /// Walks every segment into exactly one closed ring.
    pub fn get_rings(&mut self) -> Result<Vec<AssembledRing>> {
        self.check_degrees()?;

        for edge in &mut self.edges {
            edge.is_visited = false;
        }

        let mut rings = Vec::new();
        for start_edge in 0..self.edges.len() {
            if self.edges[start_edge].is_visited {
                continue;
            }

            let start_node = self.edges[start_edge].nodes[0];
            let mut coords = vec![self.nodes[start_node].coordinate];
            let mut ring_edges = Vec::new();
            let mut curr_edge = start_edge;
            let mut curr_node = start_node;

            loop {
                self.edges[curr_edge].is_visited = true;
                ring_edges.push(curr_edge);
                let next_node = self.edges[curr_edge].opposite(curr_node);
                coords.push(self.nodes[next_node].coordinate);

                if next_node == start_node {
                    break; // Ring closed
                }

                let incident = &self.nodes[next_node].incident;
                let next_edge = if incident[0] == curr_edge { incident[1] } else { incident[0] };
                if self.edges[next_edge].is_visited {
                    let c = self.nodes[next_node].coordinate;
                    return Err(SnapolyError::MalformedTopology(format!(
                        "walk from ({}, {}) re-entered a visited segment at ({}, {})",
                        coords[0].x, coords[0].y, c.x, c.y
                    )));
                }
                curr_node = next_node;
                curr_edge = next_edge;
            }

            let ring = Ring::new(LineString::new(coords))?;
            let feature_id = self.majority_feature_id(&ring_edges);
            rings.push(AssembledRing { ring, feature_id });
        }

        log::debug!(
            "assembled {} rings from {} segments over {} vertices",
            rings.len(),
            self.edges.len(),
            self.nodes.len()
        );
        Ok(rings)
    }

    /// Most frequent feature id among the given segments; ties go to the smallest id.
    fn majority_feature_id(&self, ring_edges: &[EdgeId]) -> String {
        let mut counts: HashMap<&str, usize> = HashMap::new();
        for &e in ring_edges {
            *counts.entry(self.edges[e].feature_id.as_str()).or_insert(0) += 1;
        }
        if counts.len() > 1 {
            log::warn!(
                "ring of {} segments carries {} distinct feature ids",
                ring_edges.len(),
                counts.len()
            );
        }
        counts
            .into_iter()
            .max_by(|a, b| a.1.cmp(&b.1).then_with(|| b.0.cmp(a.0)))
            .map(|(id, _)| id.to_string())
            .unwrap_or_default()
    }
}

/// Reconstructs the closed rings implied by an unordered constraint list.
///
/// Every vertex must be shared by exactly two segments; anything else is reported
/// as [`SnapolyError::MalformedTopology`] and no rings are returned.
pub fn assemble_rings(constraints: Vec<Constraint>) -> Result<Vec<AssembledRing>> {
    if constraints.is_empty() {
        return Ok(Vec::new());
    }
    RingGraph::from_constraints(constraints)?.get_rings()
}
