//! MaxCut cost evaluation.

use rustc_hash::FxHashMap;

use crate::assignment::Assignment;
use crate::error::Result;
use crate::graph::{Graph, NodeId};

/// Total weight of edges whose endpoints lie on different sides.
///
/// Each edge is counted once; the value is unchanged under
/// [`Assignment::complement`].
pub fn cut_value(graph: &Graph, assignment: &Assignment) -> Result<f64> {
    assignment.check_len(graph.num_nodes())?;
    let bits = assignment.as_slice();
    Ok(graph
        .edges()
        .iter()
        .filter(|e| bits[e.u] != bits[e.v])
        .map(|e| e.weight)
        .sum())
}

/// Weight of `edge` if it belongs to the graph and is cut, otherwise 0.
///
/// An edge that is not in the graph contributes 0 rather than failing, so a
/// single-edge landscape of a foreign edge is flat.
pub fn edge_cut_value(graph: &Graph, assignment: &Assignment, edge: (NodeId, NodeId)) -> Result<f64> {
    assignment.check_len(graph.num_nodes())?;
    let (u, v) = edge;
    match (assignment.get(u), assignment.get(v), graph.edge_weight(u, v)) {
        (Some(a), Some(b), Some(w)) if a != b => Ok(w),
        _ => Ok(0.0),
    }
}

/// Memo of cut values for one graph at a time.
///
/// The cache remembers the fingerprint of the graph it was filled for and
/// drops every entry when asked about a different graph.
#[derive(Debug, Default)]
pub struct CutCache {
    graph: Option<u64>,
    values: FxHashMap<Assignment, f64>,
    hits: u64,
    misses: u64,
}

impl CutCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Cached [`cut_value`], recomputed on miss.
    pub fn cut_value(&mut self, graph: &Graph, assignment: &Assignment) -> Result<f64> {
        self.bind(graph);
        if let Some(&v) = self.values.get(assignment) {
            self.hits += 1;
            return Ok(v);
        }
        let v = cut_value(graph, assignment)?;
        self.misses += 1;
        self.values.insert(assignment.clone(), v);
        Ok(v)
    }

    /// Drop all entries.
    pub fn invalidate(&mut self) {
        self.graph = None;
        self.values.clear();
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// `(hits, misses)` since construction.
    pub fn stats(&self) -> (u64, u64) {
        (self.hits, self.misses)
    }

    fn bind(&mut self, graph: &Graph) {
        let fp = graph.fingerprint();
        if self.graph != Some(fp) {
            self.values.clear();
            self.graph = Some(fp);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::LandscapeError;
    use crate::graph::{cycle_graph, triangle_graph};

    #[test]
    fn test_cut_value_triangle_bitstring() {
        let g = triangle_graph();
        let x = Assignment::from_bitstring("011").unwrap();
        assert_eq!(cut_value(&g, &x).unwrap(), 2.0);
    }

    #[test]
    fn test_cut_value_weighted() {
        let g = Graph::weighted(3, &[(0, 1, 2.0), (1, 2, 3.0)]).unwrap();
        let x = Assignment::new(vec![true, false, true]);
        assert_eq!(cut_value(&g, &x).unwrap(), 5.0);
    }

    #[test]
    fn test_cut_value_length_mismatch() {
        let g = triangle_graph();
        let err = cut_value(&g, &Assignment::zeros(2)).unwrap_err();
        assert_eq!(
            err,
            LandscapeError::InvalidAssignmentLength { expected: 3, actual: 2 }
        );
    }

    #[test]
    fn test_edge_cut_value() {
        let g = Graph::weighted(3, &[(0, 1, 2.5), (1, 2, 1.0)]).unwrap();
        let x = Assignment::new(vec![true, false, false]);
        assert_eq!(edge_cut_value(&g, &x, (0, 1)).unwrap(), 2.5);
        assert_eq!(edge_cut_value(&g, &x, (1, 0)).unwrap(), 2.5);
        assert_eq!(edge_cut_value(&g, &x, (1, 2)).unwrap(), 0.0);
        // (0, 2) is cut but not an edge
        assert_eq!(edge_cut_value(&g, &x, (0, 2)).unwrap(), 0.0);
    }

    #[test]
    fn test_cache_invalidates_on_graph_change() {
        let mut cache = CutCache::new();
        let c4 = cycle_graph(4).unwrap();
        let x = Assignment::new(vec![true, false, true, false]);
        assert_eq!(cache.cut_value(&c4, &x).unwrap(), 4.0);
        assert_eq!(cache.cut_value(&c4, &x).unwrap(), 4.0);
        assert_eq!(cache.stats(), (1, 1));

        let path = Graph::unweighted(4, &[(0, 1), (1, 2)]).unwrap();
        assert_eq!(cache.cut_value(&path, &x).unwrap(), 2.0);
        assert_eq!(cache.len(), 1);
    }
}
