//! Property-based tests for cut values, codecs and landscape metrics.

use ndarray::Array2;
use qaoa_landscape::prelude::*;
use qaoa_landscape::warm_start::{decode, encode};

#[cfg(test)]
mod property_tests {
    use super::*;
    use proptest::prelude::*;

    /// Random simple graph on 2..=5 nodes with integer weights 1..=3.
    fn arb_graph() -> impl Strategy<Value = Graph> {
        (2usize..=5).prop_flat_map(|n| {
            prop::collection::vec((0..n, 0..n, 1u8..=3), 0..10).prop_map(move |raw| {
                let mut g = Graph::new(n);
                for (u, v, w) in raw {
                    if u != v {
                        g.add_edge(u, v, f64::from(w)).unwrap();
                    }
                }
                g
            })
        })
    }

    fn arb_grid() -> impl Strategy<Value = Array2<f64>> {
        (1usize..6, 1usize..6).prop_flat_map(|(r, c)| {
            prop::collection::vec(-10.0f64..10.0, r * c)
                .prop_map(move |v| Array2::from_shape_vec((r, c), v).unwrap())
        })
    }

    proptest! {
        #[test]
        fn prop_cut_is_complement_symmetric(g in arb_graph(), seed in any::<u32>()) {
            let n = g.num_nodes();
            let x = Assignment::from_basis_index(seed as usize % (1 << n), n);
            let a = cut_value(&g, &x).unwrap();
            let b = cut_value(&g, &x.complement()).unwrap();
            prop_assert_eq!(a, b);
            prop_assert!(a >= 0.0 && a <= g.total_weight());
        }

        #[test]
        fn prop_edge_cuts_sum_to_cut(g in arb_graph(), seed in any::<u32>()) {
            let n = g.num_nodes();
            let x = Assignment::from_basis_index(seed as usize % (1 << n), n);
            let by_edge: f64 = g
                .edges()
                .iter()
                .map(|e| edge_cut_value(&g, &x, (e.u, e.v)).unwrap())
                .sum();
            prop_assert!((by_edge - cut_value(&g, &x).unwrap()).abs() < 1e-12);
        }

        #[test]
        fn prop_bitstring_roundtrip(bits in prop::collection::vec(any::<bool>(), 0..16)) {
            let x = Assignment::new(bits);
            let s = x.to_bitstring();
            prop_assert_eq!(Assignment::from_bitstring(&s).unwrap(), x.clone());
            prop_assert_eq!(Assignment::from_basis_index(x.to_basis_index(), x.len()), x);
        }

        #[test]
        fn prop_binary_codec_roundtrip(n in 0u64..(1 << 12), extra in 0usize..4) {
            let length = 12 + extra;
            let ws = encode(n, length, 2).unwrap();
            prop_assert_eq!(ws.len(), length);
            prop_assert_eq!(decode(&ws, 2).unwrap(), n);
        }

        #[test]
        fn prop_brute_force_is_optimal(g in arb_graph(), seed in any::<u32>()) {
            let n = g.num_nodes();
            let x = Assignment::from_basis_index(seed as usize % (1 << n), n);
            let (_, best) = brute_force_maxcut(&g).unwrap();
            prop_assert!(cut_value(&g, &x).unwrap() <= best);
        }

        #[test]
        fn prop_landscape_within_bounds(g in arb_graph(), samples in 1usize..4) {
            let grid = sample_grid(&g, &StatevectorOracle, None, GridSpec::with_samples(samples))
                .unwrap();
            prop_assert_eq!(grid.shape(), (samples, samples));
            let top = g.total_weight() + 1e-9;
            prop_assert!(grid.values().iter().all(|&v| v >= -1e-9 && v <= top));
        }

        #[test]
        fn prop_self_comparison(grid in arb_grid(), a in 0.0f64..=1.0) {
            let max = grid.iter().copied().fold(f64::NEG_INFINITY, f64::max);
            let min = grid.iter().copied().fold(f64::INFINITY, f64::min);
            prop_assume!(max > min);

            prop_assert!(param_transferable(&grid, &grid, a, a).unwrap());
            prop_assert!(average_difference(&grid, &grid).unwrap().abs() < 1e-12);
            prop_assert!((transferability_coeff(&grid, &grid).unwrap() - 1.0).abs() < 1e-5 / (max - min) + 1e-12);
        }

        #[test]
        fn prop_maxima_found_with_zero_tolerance(grid in arb_grid()) {
            let (rows, cols) = grid.dim();
            let params = maximizing_parameters(&grid, rows as f64, cols as f64, false, 0.0).unwrap();
            prop_assert!(!params.is_empty());
            let max = grid.iter().copied().fold(f64::NEG_INFINITY, f64::max);
            for (gamma, beta) in params {
                // unit cells: coordinates are the indices
                prop_assert_eq!(grid[[gamma as usize, beta as usize]], max);
            }
        }
    }
}
