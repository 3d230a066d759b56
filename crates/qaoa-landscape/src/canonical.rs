//! Structural canonicalization and isomorphism-based clustering.
//!
//! Local subgraphs around edges (and warm-started graphs) are deduplicated
//! with a VF2 isomorphism test. Every candidate first goes through a cheap
//! [`StructuralKey`] comparison, so the exponential test only runs between
//! graphs that already agree on size, degree sequence and label multiset.

use petgraph::algo::is_isomorphic_matching;
use petgraph::graph::{NodeIndex, UnGraph};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::config::CanonicalConfig;
use crate::error::{LandscapeError, Result};
use crate::graph::{Edge, Graph, NodeId};

// ---------------------------------------------------------------------------
// Isomorphism
// ---------------------------------------------------------------------------

fn to_petgraph(graph: &Graph) -> UnGraph<f64, ()> {
    let mut g = UnGraph::with_capacity(graph.num_nodes(), graph.num_edges());
    let nodes: Vec<NodeIndex> = (0..graph.num_nodes())
        .map(|v| g.add_node(graph.label(v).unwrap_or(0.0)))
        .collect();
    for e in graph.edges() {
        g.add_edge(nodes[e.u], nodes[e.v], ());
    }
    g
}

/// Structural isomorphism, ignoring labels and edge weights.
pub fn is_isomorphic(a: &Graph, b: &Graph) -> bool {
    if a.num_nodes() != b.num_nodes() || a.num_edges() != b.num_edges() {
        return false;
    }
    is_isomorphic_matching(&to_petgraph(a), &to_petgraph(b), |_, _| true, |_, _| true)
}

/// Isomorphism that maps every node onto a node with an equal label.
///
/// Unlabeled nodes compare as label `0.0`. Edge weights are ignored.
pub fn is_isomorphic_labeled(a: &Graph, b: &Graph) -> bool {
    if a.num_nodes() != b.num_nodes() || a.num_edges() != b.num_edges() {
        return false;
    }
    is_isomorphic_matching(
        &to_petgraph(a),
        &to_petgraph(b),
        |x: &f64, y: &f64| x == y,
        |_, _| true,
    )
}

/// Isomorphism invariants used as a pre-filter.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct StructuralKey {
    num_nodes: usize,
    num_edges: usize,
    degrees: Vec<usize>,
    labels: Vec<u64>,
}

impl StructuralKey {
    pub fn of(graph: &Graph) -> Self {
        let mut degrees = graph.degrees();
        degrees.sort_unstable();
        let mut labels: Vec<u64> = graph
            .labels()
            .map(|l| {
                // -0.0 and 0.0 label the same node class
                l.iter()
                    .map(|&v| if v == 0.0 { 0.0f64 } else { v }.to_bits())
                    .collect()
            })
            .unwrap_or_default();
        labels.sort_unstable();
        Self {
            num_nodes: graph.num_nodes(),
            num_edges: graph.num_edges(),
            degrees,
            labels,
        }
    }
}

// ---------------------------------------------------------------------------
// Node splitting
// ---------------------------------------------------------------------------

fn split_unchecked(graph: &Graph, node: NodeId) -> Graph {
    let n = graph.num_nodes();
    let incident: Vec<Edge> = graph
        .edges()
        .iter()
        .filter(|e| e.touches(node))
        .copied()
        .collect();

    // survivors keep their relative order, copies go to the end
    let remap = |v: NodeId| if v < node { v } else { v - 1 };
    let first_copy = n - 1;

    let mut edges: Vec<Edge> = graph
        .edges()
        .iter()
        .filter(|e| !e.touches(node))
        .map(|e| Edge {
            u: remap(e.u),
            v: remap(e.v),
            weight: e.weight,
        })
        .collect();
    for (i, e) in incident.iter().enumerate() {
        edges.push(Edge {
            u: first_copy + i,
            v: remap(e.other(node)),
            weight: e.weight,
        });
    }

    let labels = graph.labels().map(|l| {
        let mut out: Vec<f64> = l
            .iter()
            .enumerate()
            .filter(|&(v, _)| v != node)
            .map(|(_, &x)| x)
            .collect();
        out.extend(std::iter::repeat(l[node]).take(incident.len()));
        out
    });

    Graph::from_parts(n - 1 + incident.len(), edges, labels)
}

/// Replace `node` by one copy per incident edge.
///
/// Each copy inherits the node's label and exactly one of its edges. Nodes
/// are renumbered densely: the remaining original nodes in their old order,
/// followed by the copies.
pub fn split_node(graph: &Graph, node: NodeId) -> Result<Graph> {
    graph.check_node(node)?;
    Ok(split_unchecked(graph, node))
}

/// Split degree-2 nodes until none is left.
///
/// Degrees are re-read after every split. A split never changes the degree
/// of any other node and its copies have degree 1, so this terminates after
/// one split per original degree-2 node.
pub fn split_degree2_nodes(graph: &Graph) -> Graph {
    let mut current = graph.clone();
    while let Some(node) = current.degrees().iter().position(|&d| d == 2) {
        current = split_unchecked(&current, node);
    }
    current
}

// ---------------------------------------------------------------------------
// Edge-local subgraphs
// ---------------------------------------------------------------------------

/// Neighbourhood of one edge, renumbered so the edge is `(0, 1)`.
#[derive(Debug, Clone, PartialEq)]
pub struct LocalSubgraph {
    pub graph: Graph,
    /// `nodes[local]` is the node id in the source graph.
    pub nodes: Vec<NodeId>,
}

/// Nodes `{u, v} ∪ N(u) ∪ N(v)` with every edge incident to `u` or `v`.
///
/// Local ids follow first appearance: `u`, `v`, then the neighbours of `u`,
/// then those of `v`. Labels and weights of the source graph are carried.
pub fn local_subgraph(graph: &Graph, edge: (NodeId, NodeId)) -> Result<LocalSubgraph> {
    let (u, v) = edge;
    if !graph.has_edge(u, v) {
        return Err(LandscapeError::EdgeNotFound { u, v });
    }

    let mut nodes = vec![u, v];
    for w in graph.neighbors(u).chain(graph.neighbors(v)) {
        if !nodes.contains(&w) {
            nodes.push(w);
        }
    }
    let local = |x: NodeId| nodes.iter().position(|&y| y == x);

    let mut sub = Graph::new(nodes.len());
    if let Some(w) = graph.edge_weight(u, v) {
        sub.add_edge(0, 1, w)?;
    }
    for center in [u, v] {
        for e in graph.edges().iter().filter(|e| e.touches(center)) {
            if let (Some(a), Some(b)) = (local(e.u), local(e.v)) {
                sub.add_edge(a, b, e.weight)?;
            }
        }
    }

    let graph = match graph.labels() {
        Some(labels) => sub.with_labels(nodes.iter().map(|&x| labels[x]).collect())?,
        None => sub,
    };
    Ok(LocalSubgraph { graph, nodes })
}

// ---------------------------------------------------------------------------
// Clustering
// ---------------------------------------------------------------------------

/// One isomorphism class of edge-local subgraphs.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SubgraphCluster {
    /// Canonical representative (the first subgraph seen in this class).
    pub subgraph: Graph,
    /// The centre edge in the representative's numbering, always `(0, 1)`.
    pub edge: (NodeId, NodeId),
    /// Number of edges whose neighbourhood fell into this class.
    pub count: usize,
}

/// Incrementally built list of subgraph clusters.
///
/// A catalog can absorb several graphs, so occurrence counts accumulate over
/// a whole batch. Insertion takes `&mut self`, which makes the
/// check-then-insert step atomic.
#[derive(Debug, Clone, Default)]
pub struct SubgraphCatalog {
    config: CanonicalConfig,
    clusters: Vec<SubgraphCluster>,
    keys: Vec<StructuralKey>,
}

impl SubgraphCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_config(config: CanonicalConfig) -> Self {
        Self {
            config,
            ..Self::default()
        }
    }

    /// Cluster the unlabeled neighbourhood of every edge of `graph`.
    pub fn add_graph(&mut self, graph: &Graph) -> Result<()> {
        let graph = self.prepare(graph.structure());
        for e in graph.edges() {
            let local = self.local(&graph, (e.u, e.v))?;
            self.insert(local, None);
        }
        Ok(())
    }

    /// Cluster every edge neighbourhood labeled with `assignment`.
    ///
    /// A neighbourhood also matches a cluster when its complemented labeling
    /// (`1 - x`) does, since a cut and its complement are the same solution.
    pub fn add_weighted(&mut self, graph: &Graph, assignment: &[f64]) -> Result<()> {
        let labeled = self.prepare(graph.structure().with_labels(assignment.to_vec())?);
        for e in labeled.edges() {
            let local = self.local(&labeled, (e.u, e.v))?;
            let complement = complement_labels(&local)?;
            self.insert(local, Some(complement));
        }
        Ok(())
    }

    pub fn clusters(&self) -> &[SubgraphCluster] {
        &self.clusters
    }

    pub fn into_clusters(self) -> Vec<SubgraphCluster> {
        self.clusters
    }

    pub fn len(&self) -> usize {
        self.clusters.len()
    }

    pub fn is_empty(&self) -> bool {
        self.clusters.is_empty()
    }

    /// Sum of all occurrence counts (edges absorbed so far).
    pub fn total_count(&self) -> usize {
        self.clusters.iter().map(|c| c.count).sum()
    }

    fn prepare(&self, graph: Graph) -> Graph {
        if self.config.split_degree2 {
            split_degree2_nodes(&graph)
        } else {
            graph
        }
    }

    fn local(&self, graph: &Graph, edge: (NodeId, NodeId)) -> Result<Graph> {
        let local = local_subgraph(graph, edge)?.graph;
        if local.num_nodes() > self.config.max_local_nodes {
            return Err(LandscapeError::SubgraphTooLarge {
                num_nodes: local.num_nodes(),
                maximum: self.config.max_local_nodes,
            });
        }
        Ok(local)
    }

    fn insert(&mut self, candidate: Graph, complement: Option<Graph>) -> usize {
        let key = StructuralKey::of(&candidate);
        let complement_key = complement.as_ref().map(StructuralKey::of);

        for (idx, (cluster, existing)) in self.clusters.iter_mut().zip(&self.keys).enumerate() {
            let direct = *existing == key && is_isomorphic_labeled(&candidate, &cluster.subgraph);
            let flipped = !direct
                && match (&complement, &complement_key) {
                    (Some(c), Some(k)) => existing == k && is_isomorphic_labeled(c, &cluster.subgraph),
                    _ => false,
                };
            if direct || flipped {
                cluster.count += 1;
                return idx;
            }
        }

        debug!(
            cluster = self.clusters.len(),
            nodes = candidate.num_nodes(),
            edges = candidate.num_edges(),
            "new subgraph cluster"
        );
        self.clusters.push(SubgraphCluster {
            subgraph: candidate,
            edge: (0, 1),
            count: 1,
        });
        self.keys.push(key);
        self.clusters.len() - 1
    }
}

fn complement_labels(graph: &Graph) -> Result<Graph> {
    let flipped = graph
        .labels()
        .map(|l| l.iter().map(|&x| (x - 1.0).abs()).collect())
        .unwrap_or_else(|| vec![0.0; graph.num_nodes()]);
    graph.structure().with_labels(flipped)
}

/// Isomorphism classes of the unlabeled edge neighbourhoods of `graph`.
pub fn cluster_subgraphs(graph: &Graph) -> Result<Vec<SubgraphCluster>> {
    let mut catalog = SubgraphCatalog::new();
    catalog.add_graph(graph)?;
    Ok(catalog.into_clusters())
}

/// Isomorphism classes of edge neighbourhoods labeled with `assignment`,
/// treating an assignment and its complement as equivalent.
pub fn cluster_weighted_subgraphs(graph: &Graph, assignment: &[f64]) -> Result<Vec<SubgraphCluster>> {
    let mut catalog = SubgraphCatalog::new();
    catalog.add_weighted(graph, assignment)?;
    Ok(catalog.into_clusters())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::{cycle_graph, triangle_graph};

    #[test]
    fn test_split_node_renumbers_and_copies_label() {
        // path 0 - 1 - 2, split the middle
        let g = Graph::unweighted(3, &[(0, 1), (1, 2)])
            .unwrap()
            .with_labels(vec![0.0, 0.5, 1.0])
            .unwrap();
        let s = split_node(&g, 1).unwrap();
        assert_eq!(s.num_nodes(), 4);
        assert_eq!(s.num_edges(), 2);
        // old 0 -> 0, old 2 -> 1, copies 2 and 3
        assert!(s.has_edge(2, 0));
        assert!(s.has_edge(3, 1));
        assert_eq!(s.labels().unwrap(), &[0.0, 1.0, 0.5, 0.5]);
    }

    #[test]
    fn test_split_node_out_of_range() {
        let g = triangle_graph();
        assert!(matches!(
            split_node(&g, 7),
            Err(LandscapeError::InvalidNode { node: 7, .. })
        ));
    }

    #[test]
    fn test_split_degree2_nodes_cycle_falls_apart() {
        let c4 = cycle_graph(4).unwrap();
        let s = split_degree2_nodes(&c4);
        assert!(s.degrees().iter().all(|&d| d != 2));
        assert_eq!(s.num_edges(), 4);
        // four isolated edges
        assert_eq!(s.num_nodes(), 8);
        assert!(s.degrees().iter().all(|&d| d == 1));
    }

    #[test]
    fn test_split_degree2_keeps_other_degrees() {
        // star centre 0 with three leaves, leaf 3 extended by a tail 3 - 4
        let g = Graph::unweighted(5, &[(0, 1), (0, 2), (0, 3), (3, 4)]).unwrap();
        let s = split_degree2_nodes(&g);
        let mut degrees = s.degrees();
        degrees.sort_unstable();
        assert_eq!(degrees, vec![1, 1, 1, 1, 1, 3]);
    }

    #[test]
    fn test_local_subgraph_orders_edge_first() {
        let g = Graph::unweighted(5, &[(2, 0), (2, 3), (3, 4), (3, 1)]).unwrap();
        let local = local_subgraph(&g, (2, 3)).unwrap();
        assert_eq!(local.nodes, vec![2, 3, 0, 4, 1]);
        assert!(local.graph.has_edge(0, 1));
        assert_eq!(local.graph.num_edges(), 4);
    }

    #[test]
    fn test_local_subgraph_missing_edge() {
        let g = Graph::unweighted(3, &[(0, 1)]).unwrap();
        assert_eq!(
            local_subgraph(&g, (1, 2)),
            Err(LandscapeError::EdgeNotFound { u: 1, v: 2 })
        );
    }

    #[test]
    fn test_labeled_isomorphism_respects_labels() {
        let a = Graph::unweighted(2, &[(0, 1)]).unwrap();
        let la = a.clone().with_labels(vec![0.0, 1.0]).unwrap();
        let lb = a.clone().with_labels(vec![1.0, 0.0]).unwrap();
        let lc = a.clone().with_labels(vec![1.0, 1.0]).unwrap();
        assert!(is_isomorphic_labeled(&la, &lb));
        assert!(!is_isomorphic_labeled(&la, &lc));
        assert!(is_isomorphic(&la, &lc));
    }

    #[test]
    fn test_cluster_triangle_single_class() {
        let clusters = cluster_subgraphs(&triangle_graph()).unwrap();
        assert_eq!(clusters.len(), 1);
        assert_eq!(clusters[0].count, 3);
        assert_eq!(clusters[0].edge, (0, 1));
    }

    #[test]
    fn test_catalog_cap() {
        let mut catalog = SubgraphCatalog::with_config(CanonicalConfig {
            max_local_nodes: 2,
            split_degree2: false,
        });
        assert!(matches!(
            catalog.add_graph(&triangle_graph()),
            Err(LandscapeError::SubgraphTooLarge { num_nodes: 3, maximum: 2 })
        ));
    }
}
