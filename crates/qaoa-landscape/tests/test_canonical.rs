//! Subgraph clustering and warm-start deduplication across whole graphs.

use qaoa_landscape::canonical::{is_isomorphic, local_subgraph, split_node};
use qaoa_landscape::config::CanonicalConfig;
use qaoa_landscape::graph::{complete_graph, cycle_graph};
use qaoa_landscape::prelude::*;
use qaoa_landscape::warm_start::{decode, encode, signature};

// ===========================================================================
// Subgraph clustering
// ===========================================================================

#[test]
fn test_four_cycle_is_one_class() {
    let clusters = cluster_subgraphs(&cycle_graph(4).unwrap()).unwrap();
    assert_eq!(clusters.len(), 1);
    assert_eq!(clusters[0].count, 4);
    // u, v and one outer neighbour each, joined by three edges
    assert_eq!(clusters[0].subgraph.num_nodes(), 4);
    assert_eq!(clusters[0].subgraph.num_edges(), 3);
    assert!(clusters[0].subgraph.has_edge(0, 1));
}

#[test]
fn test_counts_sum_to_edge_count() {
    let g = Graph::unweighted(6, &[(0, 1), (1, 2), (2, 0), (2, 3), (3, 4), (4, 5)]).unwrap();
    let clusters = cluster_subgraphs(&g).unwrap();
    assert_eq!(clusters.iter().map(|c| c.count).sum::<usize>(), g.num_edges());
    for (i, a) in clusters.iter().enumerate() {
        for b in &clusters[i + 1..] {
            assert!(!is_isomorphic(&a.subgraph, &b.subgraph));
        }
    }
}

#[test]
fn test_catalog_accumulates_over_graphs() {
    let mut catalog = SubgraphCatalog::new();
    catalog.add_graph(&cycle_graph(5).unwrap()).unwrap();
    catalog.add_graph(&cycle_graph(7).unwrap()).unwrap();
    assert_eq!(catalog.len(), 1);
    assert_eq!(catalog.total_count(), 12);

    catalog.add_graph(&complete_graph(4)).unwrap();
    assert_eq!(catalog.len(), 2);
    assert_eq!(catalog.total_count(), 18);
}

#[test]
fn test_weighted_clusters_merge_complements() {
    // two disjoint edges, one labeled (0, 0) and the other (1, 1)
    let g = Graph::unweighted(4, &[(0, 1), (2, 3)]).unwrap();
    let clusters = cluster_weighted_subgraphs(&g, &[0.0, 0.0, 1.0, 1.0]).unwrap();
    assert_eq!(clusters.len(), 1);
    assert_eq!(clusters[0].count, 2);

    // a cut edge is a different class
    let clusters = cluster_weighted_subgraphs(&g, &[0.0, 1.0, 1.0, 1.0]).unwrap();
    assert_eq!(clusters.len(), 2);
}

#[test]
fn test_weighted_clusters_reject_bad_length() {
    let g = cycle_graph(4).unwrap();
    assert!(matches!(
        cluster_weighted_subgraphs(&g, &[0.0, 1.0]),
        Err(LandscapeError::InvalidAssignmentLength { expected: 4, actual: 2 })
    ));
}

#[test]
fn test_split_before_clustering() {
    let mut catalog = SubgraphCatalog::with_config(CanonicalConfig {
        split_degree2: true,
        ..CanonicalConfig::default()
    });
    catalog.add_graph(&cycle_graph(6).unwrap()).unwrap();
    // the cycle falls apart into isolated edges
    assert_eq!(catalog.len(), 1);
    assert_eq!(catalog.clusters()[0].subgraph.num_nodes(), 2);
    assert_eq!(catalog.total_count(), 6);
}

#[test]
fn test_split_then_local_subgraph() {
    let g = Graph::unweighted(4, &[(0, 1), (1, 2), (1, 3), (3, 0)]).unwrap();
    // node 0 has degree 2
    let s = split_node(&g, 0).unwrap();
    assert_eq!(s.num_nodes(), 5);
    assert_eq!(s.num_edges(), 4);
    let local = local_subgraph(&s, (0, 1)).unwrap();
    assert_eq!(local.nodes[..2], [0, 1]);
}

// ===========================================================================
// Warm starts
// ===========================================================================

#[test]
fn test_enumerate_distinct_binary_warm_starts_on_cycle() {
    // up to rotation and reflection C4 has 6 two-colourings
    let g = cycle_graph(4).unwrap();
    let mut index = WarmStartIndex::new();
    for n in 0..16u64 {
        let ws = encode(n, 4, 2).unwrap();
        assert_eq!(decode(&ws, 2).unwrap(), n);
        index.insert_if_new(&g, &ws).unwrap();
    }
    assert_eq!(index.len(), 6);
}

#[test]
fn test_ternary_warm_starts_bucketed_by_signature() {
    let g = Graph::unweighted(3, &[(0, 1), (1, 2)]).unwrap();
    let mut index = WarmStartIndex::new();
    for n in 0..27u64 {
        index.insert_if_new(&g, &encode(n, 3, 3).unwrap()).unwrap();
    }
    // a path has one non-trivial automorphism (reversal): (27 + 9) / 2
    assert_eq!(index.len(), 18);

    let key = BucketKey::of(&[0.0, 0.5, 1.0]);
    let bucket = index.bucket(&key).unwrap();
    for ws in bucket {
        assert_eq!(<(usize, usize, usize)>::from(signature(ws).unwrap()), (1, 1, 1));
    }
}
