//! Undirected weighted graph used by every other module.
//!
//! Nodes are dense integers `0..num_nodes`; assignment vectors index by node
//! id, so every structural transform re-issues a dense range. Graphs are
//! values: transforms build new graphs instead of mutating shared ones.

use std::hash::{Hash, Hasher};

use rustc_hash::FxHasher;
use serde::{Deserialize, Serialize};

use crate::error::{LandscapeError, Result};

/// Node identifier (also the qubit index of the node).
pub type NodeId = usize;

/// A single undirected edge with its weight.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Edge {
    pub u: NodeId,
    pub v: NodeId,
    /// Omitted weights read as 1.
    #[serde(default = "unit_weight")]
    pub weight: f64,
}

fn unit_weight() -> f64 {
    1.0
}

impl Edge {
    /// `true` if this edge joins `a` and `b` in either orientation.
    #[inline]
    pub fn joins(&self, a: NodeId, b: NodeId) -> bool {
        (self.u == a && self.v == b) || (self.u == b && self.v == a)
    }

    /// `true` if `node` is one of the endpoints.
    #[inline]
    pub fn touches(&self, node: NodeId) -> bool {
        self.u == node || self.v == node
    }

    /// The endpoint opposite to `node`. Caller must ensure `touches(node)`.
    #[inline]
    pub fn other(&self, node: NodeId) -> NodeId {
        if self.u == node {
            self.v
        } else {
            self.u
        }
    }
}

/// Simple undirected weighted graph with optional per-node labels.
///
/// Labels hold warm-start values when a graph is compared under a
/// label-preserving isomorphism.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "GraphData")]
pub struct Graph {
    num_nodes: usize,
    edges: Vec<Edge>,
    labels: Option<Vec<f64>>,
}

/// Unchecked wire form; deserialized graphs go through [`Graph::add_edge`].
#[derive(Deserialize)]
struct GraphData {
    num_nodes: usize,
    edges: Vec<Edge>,
    #[serde(default)]
    labels: Option<Vec<f64>>,
}

impl TryFrom<GraphData> for Graph {
    type Error = LandscapeError;

    fn try_from(data: GraphData) -> Result<Self> {
        let mut graph = Graph::new(data.num_nodes);
        for e in data.edges {
            graph.add_edge(e.u, e.v, e.weight)?;
        }
        match data.labels {
            Some(labels) => graph.with_labels(labels),
            None => Ok(graph),
        }
    }
}

impl Graph {
    /// Create an edgeless graph with the given number of nodes.
    pub fn new(num_nodes: usize) -> Self {
        Self {
            num_nodes,
            edges: Vec::new(),
            labels: None,
        }
    }

    /// Graph on `num_nodes` nodes with unit-weight edges.
    pub fn unweighted(num_nodes: usize, edges: &[(NodeId, NodeId)]) -> Result<Self> {
        let mut graph = Self::new(num_nodes);
        for &(u, v) in edges {
            graph.add_edge(u, v, 1.0)?;
        }
        Ok(graph)
    }

    /// Graph on `num_nodes` nodes with explicit edge weights.
    pub fn weighted(num_nodes: usize, edges: &[(NodeId, NodeId, f64)]) -> Result<Self> {
        let mut graph = Self::new(num_nodes);
        for &(u, v, w) in edges {
            graph.add_edge(u, v, w)?;
        }
        Ok(graph)
    }

    /// Unit-weight graph whose node count is one more than the largest endpoint.
    pub fn from_edges(edges: &[(NodeId, NodeId)]) -> Result<Self> {
        let num_nodes = edges
            .iter()
            .map(|&(u, v)| u.max(v) + 1)
            .max()
            .unwrap_or(0);
        Self::unweighted(num_nodes, edges)
    }

    /// Add an undirected edge. Re-adding an existing edge is a no-op.
    pub fn add_edge(&mut self, u: NodeId, v: NodeId, weight: f64) -> Result<()> {
        self.check_node(u)?;
        self.check_node(v)?;
        if u == v {
            return Err(LandscapeError::SelfLoop { node: u });
        }
        if !self.has_edge(u, v) {
            self.edges.push(Edge { u, v, weight });
        }
        Ok(())
    }

    /// Attach per-node labels, replacing any existing ones.
    pub fn with_labels(mut self, labels: Vec<f64>) -> Result<Self> {
        if labels.len() != self.num_nodes {
            return Err(LandscapeError::InvalidAssignmentLength {
                expected: self.num_nodes,
                actual: labels.len(),
            });
        }
        self.labels = Some(labels);
        Ok(self)
    }

    /// Same edge structure, no labels.
    pub fn structure(&self) -> Self {
        Self {
            num_nodes: self.num_nodes,
            edges: self.edges.clone(),
            labels: None,
        }
    }

    // -------------------------------------------------------------------
    // Accessors
    // -------------------------------------------------------------------

    pub fn num_nodes(&self) -> usize {
        self.num_nodes
    }

    pub fn num_edges(&self) -> usize {
        self.edges.len()
    }

    pub fn edges(&self) -> &[Edge] {
        &self.edges
    }

    pub fn labels(&self) -> Option<&[f64]> {
        self.labels.as_deref()
    }

    pub fn label(&self, node: NodeId) -> Option<f64> {
        self.labels.as_ref().and_then(|l| l.get(node).copied())
    }

    /// Node labels read back as a warm-start vector.
    pub fn warm_start(&self) -> Option<Vec<f64>> {
        self.labels.clone()
    }

    /// Sum of all edge weights (upper bound of any cut value).
    pub fn total_weight(&self) -> f64 {
        self.edges.iter().map(|e| e.weight).sum()
    }

    pub fn has_edge(&self, u: NodeId, v: NodeId) -> bool {
        self.edges.iter().any(|e| e.joins(u, v))
    }

    /// Weight of edge `(u, v)` in either orientation.
    pub fn edge_weight(&self, u: NodeId, v: NodeId) -> Option<f64> {
        self.edges.iter().find(|e| e.joins(u, v)).map(|e| e.weight)
    }

    pub fn degree(&self, node: NodeId) -> usize {
        self.edges.iter().filter(|e| e.touches(node)).count()
    }

    /// Neighbours of `node` in edge insertion order.
    pub fn neighbors(&self, node: NodeId) -> impl Iterator<Item = NodeId> + '_ {
        self.edges
            .iter()
            .filter(move |e| e.touches(node))
            .map(move |e| e.other(node))
    }

    /// Degree of every node, indexed by node id.
    pub fn degrees(&self) -> Vec<usize> {
        let mut degrees = vec![0; self.num_nodes];
        for e in &self.edges {
            degrees[e.u] += 1;
            degrees[e.v] += 1;
        }
        degrees
    }

    /// Deterministic identity hash over node count, edges and weights.
    ///
    /// Labels are not part of the fingerprint: cut values do not depend on them.
    pub fn fingerprint(&self) -> u64 {
        let mut hasher = FxHasher::default();
        self.num_nodes.hash(&mut hasher);
        for e in &self.edges {
            e.u.hash(&mut hasher);
            e.v.hash(&mut hasher);
            e.weight.to_bits().hash(&mut hasher);
        }
        hasher.finish()
    }

    pub(crate) fn check_node(&self, node: NodeId) -> Result<()> {
        if node >= self.num_nodes {
            return Err(LandscapeError::InvalidNode {
                node,
                num_nodes: self.num_nodes,
            });
        }
        Ok(())
    }

    pub(crate) fn from_parts(num_nodes: usize, edges: Vec<Edge>, labels: Option<Vec<f64>>) -> Self {
        Self {
            num_nodes,
            edges,
            labels,
        }
    }
}

// ---------------------------------------------------------------------------
// Graph construction helpers
// ---------------------------------------------------------------------------

/// Triangle `K3`, maximum cut 2.
pub fn triangle_graph() -> Graph {
    Graph::from_parts(
        3,
        vec![
            Edge { u: 0, v: 1, weight: 1.0 },
            Edge { u: 1, v: 2, weight: 1.0 },
            Edge { u: 0, v: 2, weight: 1.0 },
        ],
        None,
    )
}

/// Cycle on `n` nodes (`n >= 3`), unit weights.
pub fn cycle_graph(n: usize) -> Result<Graph> {
    if n < 3 {
        return Err(LandscapeError::InvalidGraph(format!(
            "a cycle needs at least 3 nodes, got {n}"
        )));
    }
    let edges: Vec<(NodeId, NodeId)> = (0..n).map(|i| (i, (i + 1) % n)).collect();
    Graph::unweighted(n, &edges)
}

/// Complete graph `K_n`, unit weights.
pub fn complete_graph(n: usize) -> Graph {
    let mut edges = Vec::with_capacity(n * n.saturating_sub(1) / 2);
    for u in 0..n {
        for v in (u + 1)..n {
            edges.push(Edge { u, v, weight: 1.0 });
        }
    }
    Graph::from_parts(n, edges, None)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_add_edge_is_unordered_and_deduplicated() {
        let mut g = Graph::new(3);
        g.add_edge(0, 1, 1.0).unwrap();
        g.add_edge(1, 0, 5.0).unwrap();
        assert_eq!(g.num_edges(), 1);
        assert!(g.has_edge(1, 0));
        assert_eq!(g.edge_weight(1, 0), Some(1.0));
    }

    #[test]
    fn test_add_edge_rejects_bad_endpoints() {
        let mut g = Graph::new(2);
        assert_eq!(
            g.add_edge(0, 2, 1.0),
            Err(LandscapeError::InvalidNode { node: 2, num_nodes: 2 })
        );
        assert_eq!(g.add_edge(1, 1, 1.0), Err(LandscapeError::SelfLoop { node: 1 }));
    }

    #[test]
    fn test_from_edges_infers_node_count() {
        let g = Graph::from_edges(&[(0, 4), (2, 3)]).unwrap();
        assert_eq!(g.num_nodes(), 5);
        assert_eq!(g.degree(1), 0);
        assert_eq!(g.degrees(), vec![1, 0, 1, 1, 1]);
    }

    #[test]
    fn test_neighbors_follow_insertion_order() {
        let g = Graph::unweighted(4, &[(0, 3), (1, 0), (0, 2)]).unwrap();
        let n: Vec<_> = g.neighbors(0).collect();
        assert_eq!(n, vec![3, 1, 2]);
    }

    #[test]
    fn test_fingerprint_ignores_labels_but_not_weights() {
        let g = triangle_graph();
        let labeled = g.clone().with_labels(vec![0.0, 0.5, 1.0]).unwrap();
        assert_eq!(g.fingerprint(), labeled.fingerprint());

        let heavy = Graph::weighted(3, &[(0, 1, 2.0), (1, 2, 1.0), (0, 2, 1.0)]).unwrap();
        assert_ne!(g.fingerprint(), heavy.fingerprint());
    }

    #[test]
    fn test_with_labels_checks_length() {
        let err = triangle_graph().with_labels(vec![0.0]).unwrap_err();
        assert_eq!(
            err,
            LandscapeError::InvalidAssignmentLength { expected: 3, actual: 1 }
        );
    }

    #[test]
    fn test_cycle_graph() {
        let c4 = cycle_graph(4).unwrap();
        assert_eq!(c4.num_edges(), 4);
        assert!(c4.degrees().iter().all(|&d| d == 2));
        assert!(cycle_graph(2).is_err());
    }

    #[test]
    fn test_deserialize_validates_edges() {
        let g: Graph = serde_json::from_str(
            r#"{"num_nodes": 2, "edges": [{"u": 0, "v": 1, "weight": 1.5}]}"#,
        )
        .unwrap();
        assert_eq!(g.edge_weight(1, 0), Some(1.5));
        assert_eq!(g.labels(), None);

        let bad = serde_json::from_str::<Graph>(
            r#"{"num_nodes": 2, "edges": [{"u": 0, "v": 2, "weight": 1.0}]}"#,
        );
        assert!(bad.is_err());

        let unweighted: Graph =
            serde_json::from_str(r#"{"num_nodes": 2, "edges": [{"u": 0, "v": 1}]}"#).unwrap();
        assert_eq!(unweighted.edge_weight(0, 1), Some(1.0));
    }

    #[test]
    fn test_warm_start_reads_labels() {
        let g = triangle_graph();
        assert_eq!(g.warm_start(), None);
        let labeled = g.with_labels(vec![1.0, 0.5, 0.0]).unwrap();
        assert_eq!(labeled.warm_start(), Some(vec![1.0, 0.5, 0.0]));
        assert_eq!(labeled.structure().warm_start(), None);
    }
}
