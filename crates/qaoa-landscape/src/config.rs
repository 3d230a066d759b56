//! Configuration for sampling, comparison, clustering and relaxation.
//!
//! Every section has a `Default` and deserializes with missing fields filled
//! from it, so a config file only needs the values it changes.

use std::f64::consts::PI;

use serde::{Deserialize, Serialize};

use crate::error::{LandscapeError, Result};
use crate::graph::Graph;
use crate::oracle::{Distribution, EnergyOracle};
use crate::simulator::{ShotOracle, StatevectorOracle};

/// Sampling window and resolution of an energy grid.
///
/// Cell `[i, j]` is evaluated at `gamma = i * gamma_max / samples` and
/// `beta = j * beta_max / samples`; the upper bounds themselves are excluded.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GridSpec {
    pub gamma_max: f64,
    pub beta_max: f64,
    pub samples: usize,
}

impl Default for GridSpec {
    fn default() -> Self {
        Self {
            gamma_max: 2.0 * PI,
            beta_max: PI,
            samples: 100,
        }
    }
}

impl GridSpec {
    pub fn new(gamma_max: f64, beta_max: f64, samples: usize) -> Self {
        Self {
            gamma_max,
            beta_max,
            samples,
        }
    }

    /// Default window at the given resolution.
    pub fn with_samples(samples: usize) -> Self {
        Self {
            samples,
            ..Self::default()
        }
    }

    pub fn validate(&self) -> Result<()> {
        if self.samples == 0 {
            return Err(LandscapeError::InvalidGridSpec(
                "samples must be positive".into(),
            ));
        }
        for (name, value) in [("gamma_max", self.gamma_max), ("beta_max", self.beta_max)] {
            if !value.is_finite() || value <= 0.0 {
                return Err(LandscapeError::InvalidGridSpec(format!(
                    "{name} must be a positive finite number, got {value}"
                )));
            }
        }
        Ok(())
    }

    #[inline]
    pub fn gamma_step(&self) -> f64 {
        self.gamma_max / self.samples as f64
    }

    #[inline]
    pub fn beta_step(&self) -> f64 {
        self.beta_max / self.samples as f64
    }

    /// Parameters of cell `[i, j]` (left edge of the cell).
    #[inline]
    pub fn point(&self, i: usize, j: usize) -> (f64, f64) {
        (i as f64 * self.gamma_step(), j as f64 * self.beta_step())
    }
}

/// Worker pool settings for grid sampling.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SamplerConfig {
    /// Number of worker threads; 0 or 1 samples sequentially.
    pub workers: usize,
}

impl Default for SamplerConfig {
    fn default() -> Self {
        Self { workers: 1 }
    }
}

/// Which reference oracle to use.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct OracleConfig {
    /// `None` for the exact state-vector oracle, `Some(n)` to sample `n` shots.
    pub shots: Option<u64>,
    pub seed: u64,
}

impl Default for OracleConfig {
    fn default() -> Self {
        Self {
            shots: None,
            seed: 42,
        }
    }
}

impl OracleConfig {
    pub fn validate(&self) -> Result<()> {
        if self.shots == Some(0) {
            return Err(LandscapeError::InvalidConfig(
                "oracle.shots must be positive when set".into(),
            ));
        }
        Ok(())
    }

    pub fn build(&self) -> ReferenceOracle {
        match self.shots {
            None => ReferenceOracle::Exact(StatevectorOracle),
            Some(shots) => ReferenceOracle::Shots(ShotOracle::new(shots, self.seed)),
        }
    }
}

/// One of the bundled oracles, selected at runtime.
#[derive(Debug, Clone, Copy)]
pub enum ReferenceOracle {
    Exact(StatevectorOracle),
    Shots(ShotOracle),
}

impl EnergyOracle for ReferenceOracle {
    fn distribution(&self, graph: &Graph, gamma: f64, beta: f64) -> Result<Distribution> {
        match self {
            ReferenceOracle::Exact(o) => o.distribution(graph, gamma, beta),
            ReferenceOracle::Shots(o) => o.distribution(graph, gamma, beta),
        }
    }
}

/// Thresholds for [`crate::analysis::param_transferable`].
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TransferThresholds {
    /// Fraction of the donor range a cell must reach to count as "good".
    pub a: f64,
    /// Fraction of the acceptor range a donor-good cell must reach.
    pub b: f64,
    /// Minimum share of donor-good cells that must also be acceptor-good.
    pub min_overlap: f64,
}

impl Default for TransferThresholds {
    fn default() -> Self {
        Self {
            a: 0.8,
            b: 0.7,
            min_overlap: 0.8,
        }
    }
}

impl TransferThresholds {
    pub fn validate(&self) -> Result<()> {
        for (name, value) in [("a", self.a), ("b", self.b), ("min_overlap", self.min_overlap)] {
            if !(0.0..=1.0).contains(&value) {
                return Err(LandscapeError::InvalidConfig(format!(
                    "transfer.{name} must lie in [0, 1], got {value}"
                )));
            }
        }
        Ok(())
    }
}

/// Limits for subgraph canonicalization.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CanonicalConfig {
    /// Largest edge-local subgraph handed to the isomorphism test.
    pub max_local_nodes: usize,
    /// Split degree-2 nodes before clustering.
    pub split_degree2: bool,
}

impl Default for CanonicalConfig {
    fn default() -> Self {
        Self {
            max_local_nodes: 32,
            split_degree2: false,
        }
    }
}

/// Settings of the low-rank SDP relaxation.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RelaxationConfig {
    /// Vector dimension; `None` picks `ceil(sqrt(2n)) + 1`.
    pub rank: Option<usize>,
    pub max_iterations: usize,
    /// Stop once one sweep improves the objective by less than this.
    pub tolerance: f64,
    pub seed: u64,
}

impl Default for RelaxationConfig {
    fn default() -> Self {
        Self {
            rank: None,
            max_iterations: 500,
            tolerance: 1e-9,
            seed: 42,
        }
    }
}

impl RelaxationConfig {
    pub fn validate(&self) -> Result<()> {
        if self.rank == Some(0) {
            return Err(LandscapeError::InvalidConfig(
                "relaxation.rank must be positive when set".into(),
            ));
        }
        if self.max_iterations == 0 {
            return Err(LandscapeError::InvalidConfig(
                "relaxation.max_iterations must be positive".into(),
            ));
        }
        if !self.tolerance.is_finite() || self.tolerance < 0.0 {
            return Err(LandscapeError::InvalidConfig(format!(
                "relaxation.tolerance must be non-negative, got {}",
                self.tolerance
            )));
        }
        Ok(())
    }
}

/// Top-level configuration.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LandscapeConfig {
    pub grid: GridSpec,
    pub sampler: SamplerConfig,
    pub oracle: OracleConfig,
    pub transfer: TransferThresholds,
    pub canonical: CanonicalConfig,
    pub relaxation: RelaxationConfig,
}

impl LandscapeConfig {
    /// Check every section.
    pub fn validate(&self) -> Result<()> {
        self.grid
            .validate()
            .map_err(|e| LandscapeError::InvalidConfig(e.to_string()))?;
        self.oracle.validate()?;
        self.transfer.validate()?;
        self.relaxation.validate()?;
        if self.canonical.max_local_nodes < 2 {
            return Err(LandscapeError::InvalidConfig(
                "canonical.max_local_nodes must be at least 2".into(),
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_are_valid() {
        LandscapeConfig::default().validate().unwrap();
    }

    #[test]
    fn test_grid_points_are_left_edges() {
        let spec = GridSpec::new(2.0, 1.0, 4);
        assert_eq!(spec.point(0, 0), (0.0, 0.0));
        assert_eq!(spec.point(3, 2), (1.5, 0.5));
    }

    #[test]
    fn test_grid_spec_rejects_bad_bounds() {
        assert!(GridSpec::new(1.0, 1.0, 0).validate().is_err());
        assert!(GridSpec::new(-1.0, 1.0, 3).validate().is_err());
        assert!(GridSpec::new(1.0, f64::NAN, 3).validate().is_err());
        assert!(GridSpec::new(0.5, 3.0, 3).validate().is_ok());
    }

    #[test]
    fn test_thresholds_range() {
        let t = TransferThresholds {
            a: 1.2,
            ..TransferThresholds::default()
        };
        assert!(matches!(t.validate(), Err(LandscapeError::InvalidConfig(_))));
    }
}
