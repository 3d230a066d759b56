//! Energy landscape sampling over the `(gamma, beta)` plane.
//!
//! Every grid cell is an independent oracle call, so [`LandscapeSampler`]
//! can spread cells over a bounded rayon pool. Cancellation is abort-all:
//! a cancelled run yields [`LandscapeError::Cancelled`] and never a partially
//! filled grid.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Instant;

use ndarray::Array2;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::analysis;
use crate::config::GridSpec;
use crate::cut::{edge_cut_value, CutCache};
use crate::error::{LandscapeError, Result};
use crate::graph::{Graph, NodeId};
use crate::oracle::EnergyOracle;

// ---------------------------------------------------------------------------
// Single-point evaluation
// ---------------------------------------------------------------------------

/// Expected cut value (or expected cut of a single `edge`) at `(gamma, beta)`.
pub fn evaluate<O>(
    graph: &Graph,
    oracle: &O,
    gamma: f64,
    beta: f64,
    edge: Option<(NodeId, NodeId)>,
) -> Result<f64>
where
    O: EnergyOracle + ?Sized,
{
    let mut cache = CutCache::new();
    evaluate_cached(graph, oracle, gamma, beta, edge, &mut cache)
}

fn evaluate_cached<O>(
    graph: &Graph,
    oracle: &O,
    gamma: f64,
    beta: f64,
    edge: Option<(NodeId, NodeId)>,
    cache: &mut CutCache,
) -> Result<f64>
where
    O: EnergyOracle + ?Sized,
{
    let distribution = oracle.distribution(graph, gamma, beta)?;
    distribution.expectation(|x| match edge {
        Some(e) => edge_cut_value(graph, x, e),
        None => cache.cut_value(graph, x),
    })
}

// ---------------------------------------------------------------------------
// Energy grid
// ---------------------------------------------------------------------------

/// Sampled landscape: `values[[i, j]]` is the energy at cell `(i, j)` of the
/// `gamma_max x beta_max` window.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EnergyGrid {
    values: Array2<f64>,
    gamma_max: f64,
    beta_max: f64,
}

impl EnergyGrid {
    /// Wrap an existing array, e.g. one loaded by the caller.
    pub fn from_array(values: Array2<f64>, gamma_max: f64, beta_max: f64) -> Result<Self> {
        if values.is_empty() {
            return Err(LandscapeError::EmptyGrid);
        }
        Ok(Self {
            values,
            gamma_max,
            beta_max,
        })
    }

    pub fn values(&self) -> &Array2<f64> {
        &self.values
    }

    pub fn into_values(self) -> Array2<f64> {
        self.values
    }

    pub fn shape(&self) -> (usize, usize) {
        self.values.dim()
    }

    pub fn gamma_max(&self) -> f64 {
        self.gamma_max
    }

    pub fn beta_max(&self) -> f64 {
        self.beta_max
    }

    pub fn max(&self) -> f64 {
        self.values.iter().copied().fold(f64::NEG_INFINITY, f64::max)
    }

    pub fn min(&self) -> f64 {
        self.values.iter().copied().fold(f64::INFINITY, f64::min)
    }

    /// See [`analysis::maximizing_parameters`]; uses this grid's window.
    pub fn maximizing_parameters(&self, centered: bool, atol: f64) -> Result<Vec<(f64, f64)>> {
        analysis::maximizing_parameters(&self.values, self.gamma_max, self.beta_max, centered, atol)
    }
}

// ---------------------------------------------------------------------------
// Sampler
// ---------------------------------------------------------------------------

/// Shared flag that aborts an in-flight grid computation.
#[derive(Debug, Clone, Default)]
pub struct CancelToken(Arc<AtomicBool>);

impl CancelToken {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.0.store(true, Ordering::SeqCst);
    }

    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::SeqCst)
    }
}

type ProgressFn<'a> = Box<dyn Fn(usize) + Send + Sync + 'a>;

/// Evaluates an oracle on every cell of a [`GridSpec`].
///
/// ```rust,no_run
/// use qaoa_landscape::{GridSpec, LandscapeSampler, StatevectorOracle};
/// use qaoa_landscape::graph::triangle_graph;
///
/// let graph = triangle_graph();
/// let grid = LandscapeSampler::new(&graph, &StatevectorOracle, GridSpec::with_samples(32))
///     .workers(4)
///     .run()
///     .unwrap();
/// assert_eq!(grid.shape(), (32, 32));
/// ```
pub struct LandscapeSampler<'a, O: ?Sized> {
    graph: &'a Graph,
    oracle: &'a O,
    spec: GridSpec,
    edge: Option<(NodeId, NodeId)>,
    workers: usize,
    cancel: Option<CancelToken>,
    progress: Option<ProgressFn<'a>>,
}

impl<'a, O> LandscapeSampler<'a, O>
where
    O: EnergyOracle + ?Sized,
{
    pub fn new(graph: &'a Graph, oracle: &'a O, spec: GridSpec) -> Self {
        Self {
            graph,
            oracle,
            spec,
            edge: None,
            workers: 1,
            cancel: None,
            progress: None,
        }
    }

    /// Restrict the energy to the expected cut of one edge.
    pub fn edge(mut self, edge: Option<(NodeId, NodeId)>) -> Self {
        self.edge = edge;
        self
    }

    /// Size of the worker pool; 0 and 1 both mean sequential.
    pub fn workers(mut self, workers: usize) -> Self {
        self.workers = workers;
        self
    }

    pub fn cancel_token(mut self, token: CancelToken) -> Self {
        self.cancel = Some(token);
        self
    }

    /// Called with the number of finished cells after each cell.
    pub fn on_progress<F>(mut self, f: F) -> Self
    where
        F: Fn(usize) + Send + Sync + 'a,
    {
        self.progress = Some(Box::new(f));
        self
    }

    pub fn total_cells(&self) -> usize {
        self.spec.samples * self.spec.samples
    }

    /// Sample every cell on the calling thread.
    pub fn run_sequential(&self) -> Result<EnergyGrid> {
        self.spec.validate()?;
        let n = self.spec.samples;
        let start = Instant::now();
        info!(
            nodes = self.graph.num_nodes(),
            edges = self.graph.num_edges(),
            samples = n,
            "sampling energy landscape"
        );

        let mut cache = CutCache::new();
        let mut values = Array2::<f64>::zeros((n, n));
        for i in 0..n {
            for j in 0..n {
                self.check_cancelled()?;
                let (gamma, beta) = self.spec.point(i, j);
                values[[i, j]] =
                    evaluate_cached(self.graph, self.oracle, gamma, beta, self.edge, &mut cache)?;
                if let Some(progress) = &self.progress {
                    progress(i * n + j + 1);
                }
            }
            debug!(row = i, of = n, "landscape row done");
        }

        info!(elapsed_ms = start.elapsed().as_millis() as u64, "landscape complete");
        EnergyGrid::from_array(values, self.spec.gamma_max, self.spec.beta_max)
    }

    fn check_cancelled(&self) -> Result<()> {
        match &self.cancel {
            Some(token) if token.is_cancelled() => Err(LandscapeError::Cancelled),
            _ => Ok(()),
        }
    }
}

impl<'a, O> LandscapeSampler<'a, O>
where
    O: EnergyOracle + Sync + ?Sized,
{
    /// Sample the grid, in parallel when more than one worker is configured.
    pub fn run(&self) -> Result<EnergyGrid> {
        if self.workers <= 1 {
            return self.run_sequential();
        }
        self.run_parallel()
    }

    #[cfg(feature = "parallel")]
    fn run_parallel(&self) -> Result<EnergyGrid> {
        use rayon::prelude::*;
        use std::sync::atomic::AtomicUsize;

        self.spec.validate()?;
        let n = self.spec.samples;
        let start = Instant::now();
        info!(
            nodes = self.graph.num_nodes(),
            edges = self.graph.num_edges(),
            samples = n,
            workers = self.workers,
            "sampling energy landscape in parallel"
        );

        let pool = rayon::ThreadPoolBuilder::new()
            .num_threads(self.workers)
            .build()
            .map_err(|e| LandscapeError::InvalidConfig(format!("worker pool: {e}")))?;
        let done = AtomicUsize::new(0);

        let cells: Vec<f64> = pool.install(|| {
            (0..n * n)
                .into_par_iter()
                .map_init(CutCache::new, |cache, k| {
                    self.check_cancelled()?;
                    let (gamma, beta) = self.spec.point(k / n, k % n);
                    let energy =
                        evaluate_cached(self.graph, self.oracle, gamma, beta, self.edge, cache)?;
                    let finished = done.fetch_add(1, Ordering::Relaxed) + 1;
                    if let Some(progress) = &self.progress {
                        progress(finished);
                    }
                    Ok(energy)
                })
                .collect::<Result<Vec<f64>>>()
        })?;

        let values = Array2::from_shape_vec((n, n), cells)
            .map_err(|e| LandscapeError::InvalidGridSpec(e.to_string()))?;
        info!(elapsed_ms = start.elapsed().as_millis() as u64, "landscape complete");
        EnergyGrid::from_array(values, self.spec.gamma_max, self.spec.beta_max)
    }

    #[cfg(not(feature = "parallel"))]
    fn run_parallel(&self) -> Result<EnergyGrid> {
        tracing::warn!(
            workers = self.workers,
            "built without the `parallel` feature, sampling sequentially"
        );
        self.run_sequential()
    }
}

/// Sample `spec.samples^2` cells sequentially; one oracle call per cell.
pub fn sample_grid<O>(
    graph: &Graph,
    oracle: &O,
    edge: Option<(NodeId, NodeId)>,
    spec: GridSpec,
) -> Result<EnergyGrid>
where
    O: EnergyOracle + ?Sized,
{
    LandscapeSampler::new(graph, oracle, spec)
        .edge(edge)
        .run_sequential()
}
