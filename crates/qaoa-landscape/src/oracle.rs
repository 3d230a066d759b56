//! Energy oracle contract.
//!
//! An oracle turns `(graph, gamma, beta)` into a distribution over node
//! assignments. The landscape sampler only consumes that distribution; how it
//! is produced (state-vector simulation, sampling, real hardware) is up to the
//! implementation.

use rustc_hash::FxHashMap;

use crate::assignment::Assignment;
use crate::error::Result;
use crate::graph::Graph;

/// Output of one oracle call.
#[derive(Debug, Clone, PartialEq)]
pub enum Distribution {
    /// Exact probabilities; expectation values are used as-is.
    Exact(FxHashMap<Assignment, f64>),
    /// Measurement histogram over `shots` trials; expectation values are
    /// divided by `shots`.
    Sampled {
        counts: FxHashMap<Assignment, u64>,
        shots: u64,
    },
}

impl Distribution {
    /// Number of distinct assignments with non-zero weight.
    pub fn support(&self) -> usize {
        match self {
            Distribution::Exact(p) => p.len(),
            Distribution::Sampled { counts, .. } => counts.len(),
        }
    }

    /// Weighted sum of `f(x)` over the distribution, normalized for sampled
    /// distributions.
    pub fn expectation<F>(&self, mut f: F) -> Result<f64>
    where
        F: FnMut(&Assignment) -> Result<f64>,
    {
        match self {
            Distribution::Exact(probs) => {
                let mut total = 0.0;
                for (x, &p) in probs {
                    total += p * f(x)?;
                }
                Ok(total)
            }
            Distribution::Sampled { counts, shots } => {
                let mut total = 0.0;
                let mut seen = 0u64;
                for (x, &c) in counts {
                    total += c as f64 * f(x)?;
                    seen += c;
                }
                if seen != *shots {
                    tracing::warn!(seen, shots, "sampled counts do not sum to shot count");
                }
                if *shots == 0 {
                    return Ok(0.0);
                }
                Ok(total / *shots as f64)
            }
        }
    }
}

/// Source of assignment distributions for a parameterized heuristic.
///
/// Implementations must return assignments whose length equals
/// `graph.num_nodes()` and must be deterministic for a fixed seed when they
/// sample. Landscape sampling with more than one worker additionally requires
/// `Sync`.
pub trait EnergyOracle {
    fn distribution(&self, graph: &Graph, gamma: f64, beta: f64) -> Result<Distribution>;
}

impl<T: EnergyOracle + ?Sized> EnergyOracle for &T {
    fn distribution(&self, graph: &Graph, gamma: f64, beta: f64) -> Result<Distribution> {
        (**self).distribution(graph, gamma, beta)
    }
}

/// Adapter turning a closure into an oracle.
pub struct FnOracle<F>(pub F);

impl<F> EnergyOracle for FnOracle<F>
where
    F: Fn(&Graph, f64, f64) -> Result<Distribution>,
{
    fn distribution(&self, graph: &Graph, gamma: f64, beta: f64) -> Result<Distribution> {
        (self.0)(graph, gamma, beta)
    }
}
