//! Reference energy oracles backed by a depth-1 QAOA state-vector simulation.
//!
//! The prepared state is
//!
//! ```text
//! |psi(gamma, beta)> = prod_q Rx_q(2 beta) * exp(-i gamma C) * |+>^n
//! ```
//!
//! where `C` is the diagonal cut operator of the graph. With integer edge
//! weights the landscape is `2 pi` periodic in `gamma` and `pi` periodic in
//! `beta`, which is where the default sampling window comes from.

use std::hash::{Hash, Hasher};

use num_complex::Complex64;
use rand::distributions::{Distribution as _, WeightedIndex};
use rand::rngs::StdRng;
use rand::SeedableRng;
use rustc_hash::{FxHashMap, FxHasher};

use crate::assignment::Assignment;
use crate::error::{LandscapeError, Result};
use crate::graph::Graph;
use crate::oracle::{Distribution, EnergyOracle};

/// Largest register the dense simulator accepts.
pub const MAX_QUBITS: usize = 24;

/// Dense state vector of a depth-1 QAOA circuit.
pub struct QaoaState {
    amplitudes: Vec<Complex64>,
    num_qubits: usize,
}

impl QaoaState {
    /// Equal superposition `|+>^n` over the graph's nodes.
    pub fn uniform(num_qubits: usize) -> Result<Self> {
        if num_qubits == 0 {
            return Err(LandscapeError::InvalidGraph(
                "cannot simulate a graph with 0 nodes".into(),
            ));
        }
        if num_qubits > MAX_QUBITS {
            return Err(LandscapeError::QubitLimitExceeded {
                requested: num_qubits,
                maximum: MAX_QUBITS,
            });
        }
        let n = 1usize << num_qubits;
        let amp = Complex64::new(1.0 / (n as f64).sqrt(), 0.0);
        Ok(Self {
            amplitudes: vec![amp; n],
            num_qubits,
        })
    }

    /// Run the full circuit for `(gamma, beta)` on `graph`.
    pub fn prepare(graph: &Graph, gamma: f64, beta: f64) -> Result<Self> {
        let mut state = Self::uniform(graph.num_nodes())?;
        state.apply_phase_separator(graph, gamma);
        state.apply_mixer(beta);
        Ok(state)
    }

    /// `exp(-i gamma C)`, diagonal in the computational basis.
    pub fn apply_phase_separator(&mut self, graph: &Graph, gamma: f64) {
        for (k, amp) in self.amplitudes.iter_mut().enumerate() {
            let cut: f64 = graph
                .edges()
                .iter()
                .filter(|e| ((k >> e.u) ^ (k >> e.v)) & 1 == 1)
                .map(|e| e.weight)
                .sum();
            *amp *= Complex64::from_polar(1.0, -gamma * cut);
        }
    }

    /// `Rx(2 beta)` on every qubit.
    pub fn apply_mixer(&mut self, beta: f64) {
        let c = Complex64::new(beta.cos(), 0.0);
        let s = Complex64::new(0.0, -beta.sin());
        let matrix = [[c, s], [s, c]];
        for q in 0..self.num_qubits {
            self.apply_single_qubit_gate(q, &matrix);
        }
    }

    fn apply_single_qubit_gate(&mut self, qubit: usize, matrix: &[[Complex64; 2]; 2]) {
        let step = 1usize << qubit;
        let n = self.amplitudes.len();

        let mut block_start = 0;
        while block_start < n {
            for i in block_start..block_start + step {
                let j = i + step;
                let a = self.amplitudes[i]; // qubit = 0
                let b = self.amplitudes[j]; // qubit = 1
                self.amplitudes[i] = matrix[0][0] * a + matrix[0][1] * b;
                self.amplitudes[j] = matrix[1][0] * a + matrix[1][1] * b;
            }
            block_start += step << 1;
        }
    }

    pub fn num_qubits(&self) -> usize {
        self.num_qubits
    }

    /// |amplitude|^2 for each basis state.
    pub fn probabilities(&self) -> Vec<f64> {
        self.amplitudes.iter().map(|a| a.norm_sqr()).collect()
    }

    /// Exact distribution keyed by node assignment, zero-probability states omitted.
    pub fn distribution(&self) -> FxHashMap<Assignment, f64> {
        self.probabilities()
            .into_iter()
            .enumerate()
            .filter(|&(_, p)| p > 0.0)
            .map(|(k, p)| (Assignment::from_basis_index(k, self.num_qubits), p))
            .collect()
    }
}

// ---------------------------------------------------------------------------
// Oracles
// ---------------------------------------------------------------------------

/// Exact oracle: returns the full output distribution of the circuit.
#[derive(Debug, Clone, Copy, Default)]
pub struct StatevectorOracle;

impl EnergyOracle for StatevectorOracle {
    fn distribution(&self, graph: &Graph, gamma: f64, beta: f64) -> Result<Distribution> {
        let state = QaoaState::prepare(graph, gamma, beta)?;
        Ok(Distribution::Exact(state.distribution()))
    }
}

/// Sampling oracle: measures the circuit `shots` times.
///
/// Every call draws from an RNG seeded with `seed` mixed with the exact
/// `(gamma, beta)` pair, so repeated calls at the same point agree and
/// different grid cells get independent noise.
#[derive(Debug, Clone, Copy)]
pub struct ShotOracle {
    pub shots: u64,
    pub seed: u64,
}

impl ShotOracle {
    pub fn new(shots: u64, seed: u64) -> Self {
        Self { shots, seed }
    }

    fn point_seed(&self, gamma: f64, beta: f64) -> u64 {
        let mut hasher = FxHasher::default();
        self.seed.hash(&mut hasher);
        gamma.to_bits().hash(&mut hasher);
        beta.to_bits().hash(&mut hasher);
        hasher.finish()
    }
}

impl EnergyOracle for ShotOracle {
    fn distribution(&self, graph: &Graph, gamma: f64, beta: f64) -> Result<Distribution> {
        if self.shots == 0 {
            return Err(LandscapeError::InvalidConfig(
                "shot oracle needs at least one shot".into(),
            ));
        }
        let state = QaoaState::prepare(graph, gamma, beta)?;
        let probs = state.probabilities();
        let sampler = WeightedIndex::new(&probs)
            .map_err(|e| LandscapeError::InvalidGraph(format!("degenerate state: {e}")))?;
        let mut rng = StdRng::seed_from_u64(self.point_seed(gamma, beta));

        let mut by_index: FxHashMap<usize, u64> = FxHashMap::default();
        for _ in 0..self.shots {
            *by_index.entry(sampler.sample(&mut rng)).or_insert(0) += 1;
        }
        let n = state.num_qubits();
        let counts = by_index
            .into_iter()
            .map(|(k, c)| (Assignment::from_basis_index(k, n), c))
            .collect();
        Ok(Distribution::Sampled {
            counts,
            shots: self.shots,
        })
    }
}
