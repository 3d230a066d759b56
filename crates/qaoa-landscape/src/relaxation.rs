//! MaxCut relaxations used as warm-start sources.
//!
//! The semidefinite relaxation
//!
//! ```text
//! maximize  sum_{(i,j) in E} w_ij / 2 * (1 - X_ij)
//! subject to  X psd,  X_ii = 1
//! ```
//!
//! is solved in factored form `X = V V^T` with unit rows (low-rank
//! Burer-Monteiro parameterization, block-coordinate "mixing" updates).
//! Goemans-Williamson rounding then cuts the rows of `V` with a random
//! hyperplane.

use nalgebra::{DMatrix, DVector, SymmetricEigen};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use rand_distr::StandardNormal;
use tracing::{debug, info};

use crate::assignment::Assignment;
use crate::config::RelaxationConfig;
use crate::cut::cut_value;
use crate::error::{LandscapeError, Result};
use crate::graph::Graph;

/// Largest graph accepted by [`brute_force_maxcut`].
pub const BRUTE_FORCE_MAX_NODES: usize = 30;

/// Produces a relaxed MaxCut solution for a graph.
pub trait RelaxationSolver {
    fn solve(&self, graph: &Graph) -> Result<Relaxation>;
}

/// Solution of the relaxation as one unit vector per node (the rows).
#[derive(Debug, Clone, PartialEq)]
pub struct Relaxation {
    vectors: DMatrix<f64>,
    iterations: usize,
    converged: bool,
}

impl Relaxation {
    /// Factor a Gram matrix `X = Y Y^T` through its eigendecomposition.
    ///
    /// Negative eigenvalues (numerical noise of an external solver) are
    /// clipped to zero.
    pub fn from_gram(gram: DMatrix<f64>) -> Result<Self> {
        if gram.nrows() != gram.ncols() {
            return Err(LandscapeError::Solver(format!(
                "Gram matrix must be square, got {}x{}",
                gram.nrows(),
                gram.ncols()
            )));
        }
        if gram.nrows() == 0 {
            return Err(LandscapeError::Solver("empty Gram matrix".into()));
        }
        let eigen = SymmetricEigen::new(gram);
        let roots = eigen.eigenvalues.map(|l| l.max(0.0).sqrt());
        let vectors = &eigen.eigenvectors * DMatrix::from_diagonal(&roots);
        Ok(Self {
            vectors,
            iterations: 0,
            converged: true,
        })
    }

    pub fn num_nodes(&self) -> usize {
        self.vectors.nrows()
    }

    pub fn rank(&self) -> usize {
        self.vectors.ncols()
    }

    pub fn vectors(&self) -> &DMatrix<f64> {
        &self.vectors
    }

    pub fn iterations(&self) -> usize {
        self.iterations
    }

    pub fn converged(&self) -> bool {
        self.converged
    }

    /// `X = V V^T`.
    pub fn gram(&self) -> DMatrix<f64> {
        &self.vectors * self.vectors.transpose()
    }

    /// Relaxed objective `sum w / 2 * (1 - X_uv)`, an upper bound on the max cut.
    pub fn objective(&self, graph: &Graph) -> Result<f64> {
        self.check_graph(graph)?;
        Ok(graph
            .edges()
            .iter()
            .map(|e| 0.5 * e.weight * (1.0 - self.vectors.row(e.u).dot(&self.vectors.row(e.v))))
            .sum())
    }

    /// Random-hyperplane rounding: node `i` goes to side 1 when `v_i . u > 0`.
    pub fn round(&self, seed: u64) -> Assignment {
        let mut rng = StdRng::seed_from_u64(seed);
        let normal = DVector::from_fn(self.rank(), |_, _| rng.sample::<f64, _>(StandardNormal));
        let side = &self.vectors * normal;
        Assignment::new(side.iter().map(|&s| s > 0.0).collect())
    }

    /// Best of `rounds` hyperplane roundings seeded `seed, seed + 1, ...`.
    pub fn best_rounding(&self, graph: &Graph, rounds: usize, seed: u64) -> Result<(Assignment, f64)> {
        self.check_graph(graph)?;
        let mut best = (Assignment::zeros(self.num_nodes()), f64::NEG_INFINITY);
        for r in 0..rounds.max(1) {
            let candidate = self.round(seed.wrapping_add(r as u64));
            let value = cut_value(graph, &candidate)?;
            if value > best.1 {
                best = (candidate, value);
            }
        }
        Ok(best)
    }

    /// Real-valued warm start in `[0, 1]^n`.
    ///
    /// Projects the node vectors onto the leading eigenvector of `X` and maps
    /// `[-1, 1]` to `[0, 1]`. The sign is fixed so that node 0 leans to 0.
    pub fn relaxed_assignment(&self) -> Vec<f64> {
        let eigen = SymmetricEigen::new(self.gram());
        let Some((lead, &lambda)) = eigen
            .eigenvalues
            .iter()
            .enumerate()
            .max_by(|a, b| a.1.total_cmp(b.1))
        else {
            return Vec::new();
        };
        let column = eigen.eigenvectors.column(lead);
        let scale = lambda.max(0.0).sqrt();
        let flip = if column[0] > 0.0 { -1.0 } else { 1.0 };
        column
            .iter()
            .map(|&q| ((1.0 + flip * scale * q) / 2.0).clamp(0.0, 1.0))
            .collect()
    }

    fn check_graph(&self, graph: &Graph) -> Result<()> {
        if graph.num_nodes() != self.num_nodes() {
            return Err(LandscapeError::InvalidAssignmentLength {
                expected: graph.num_nodes(),
                actual: self.num_nodes(),
            });
        }
        Ok(())
    }
}

/// Coordinate-ascent solver for the factored MaxCut SDP.
#[derive(Debug, Clone, Default)]
pub struct MixingMethodSolver {
    config: RelaxationConfig,
}

impl MixingMethodSolver {
    pub fn new(config: RelaxationConfig) -> Self {
        Self { config }
    }

    fn rank_for(&self, n: usize) -> usize {
        self.config
            .rank
            .unwrap_or_else(|| (2.0 * n as f64).sqrt().ceil() as usize + 1)
            .clamp(1, n.max(1))
    }
}

fn normalize_row(row: &mut [f64]) -> bool {
    let norm = row.iter().map(|x| x * x).sum::<f64>().sqrt();
    if norm <= f64::EPSILON {
        return false;
    }
    row.iter_mut().for_each(|x| *x /= norm);
    true
}

impl RelaxationSolver for MixingMethodSolver {
    fn solve(&self, graph: &Graph) -> Result<Relaxation> {
        self.config.validate()?;
        let n = graph.num_nodes();
        if n == 0 {
            return Err(LandscapeError::InvalidGraph("cannot relax an empty graph".into()));
        }
        let k = self.rank_for(n);

        let mut adjacency: Vec<Vec<(usize, f64)>> = vec![Vec::new(); n];
        for e in graph.edges() {
            adjacency[e.u].push((e.v, e.weight));
            adjacency[e.v].push((e.u, e.weight));
        }

        let mut rng = StdRng::seed_from_u64(self.config.seed);
        let mut v: Vec<Vec<f64>> = (0..n)
            .map(|_| {
                let mut row: Vec<f64> = (0..k).map(|_| rng.sample(StandardNormal)).collect();
                if !normalize_row(&mut row) {
                    row = vec![0.0; k];
                    row[0] = 1.0;
                }
                row
            })
            .collect();

        let objective = |v: &[Vec<f64>]| -> f64 {
            graph
                .edges()
                .iter()
                .map(|e| {
                    let dot: f64 = v[e.u].iter().zip(&v[e.v]).map(|(a, b)| a * b).sum();
                    0.5 * e.weight * (1.0 - dot)
                })
                .sum()
        };

        let mut previous = objective(&v);
        let mut iterations = 0;
        let mut converged = false;
        while iterations < self.config.max_iterations {
            iterations += 1;
            for i in 0..n {
                let mut g = vec![0.0; k];
                for &(j, w) in &adjacency[i] {
                    for (gd, vd) in g.iter_mut().zip(&v[j]) {
                        *gd += w * vd;
                    }
                }
                // v_i = -g / |g| maximizes the terms touching node i
                g.iter_mut().for_each(|x| *x = -*x);
                if normalize_row(&mut g) {
                    v[i] = g;
                }
            }
            let current = objective(&v);
            debug!(iteration = iterations, objective = current, "mixing sweep");
            if (current - previous).abs() < self.config.tolerance {
                converged = true;
                break;
            }
            previous = current;
        }

        info!(nodes = n, rank = k, iterations, converged, objective = previous, "SDP relaxation solved");
        let vectors = DMatrix::from_fn(n, k, |r, c| v[r][c]);
        Ok(Relaxation {
            vectors,
            iterations,
            converged,
        })
    }
}

/// Solve the relaxation and round it once with `seed`.
pub fn goemans_williamson<S>(graph: &Graph, solver: &S, seed: u64) -> Result<Assignment>
where
    S: RelaxationSolver + ?Sized,
{
    Ok(solver.solve(graph)?.round(seed))
}

/// Exact maximum cut by enumeration of `2^(n-1)` assignments.
///
/// The last node is fixed to side 0; every other cut is the complement of one
/// enumerated here. Ties keep the first assignment found.
pub fn brute_force_maxcut(graph: &Graph) -> Result<(Assignment, f64)> {
    let n = graph.num_nodes();
    if n > BRUTE_FORCE_MAX_NODES {
        return Err(LandscapeError::GraphTooLarge {
            num_nodes: n,
            maximum: BRUTE_FORCE_MAX_NODES,
        });
    }
    if n == 0 {
        return Ok((Assignment::zeros(0), 0.0));
    }

    let mut best = (Assignment::zeros(n), 0.0);
    for k in 1..(1usize << (n - 1)) {
        let candidate = Assignment::from_basis_index(k, n);
        let value = cut_value(graph, &candidate)?;
        if value > best.1 {
            best = (candidate, value);
        }
    }
    Ok(best)
}
