use std::path::PathBuf;

use anyhow::Context;
use clap::Args;
use serde::{Deserialize, Serialize};

use qaoa_landscape::analysis::MAXIMUM_ATOL;
use qaoa_landscape::{EnergyGrid, Graph, GridSpec, LandscapeConfig, LandscapeSampler, NodeId};

use crate::graph_input::{parse_pair, GraphArgs};
use crate::output::{cell_bar, write_json};

#[derive(Args, Debug)]
pub struct LandscapeArgs {
    #[command(flatten)]
    pub input: GraphArgs,

    /// Grid resolution per axis
    #[arg(short, long)]
    pub samples: Option<usize>,

    /// Upper end of the gamma window (excluded)
    #[arg(long)]
    pub gamma_max: Option<f64>,

    /// Upper end of the beta window (excluded)
    #[arg(long)]
    pub beta_max: Option<f64>,

    /// Worker threads; 1 samples on the main thread
    #[arg(short, long)]
    pub workers: Option<usize>,

    /// Measure this many shots per cell instead of exact probabilities
    #[arg(long)]
    pub shots: Option<u64>,

    /// Seed of the shot sampler
    #[arg(long)]
    pub seed: Option<u64>,

    /// Only the expected cut of this edge, e.g. "0-1"
    #[arg(long)]
    pub edge: Option<String>,

    /// Report maximizing parameters at cell centres
    #[arg(long)]
    pub centered: bool,

    /// Output file (prints to stdout if not specified)
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Hide the progress bar
    #[arg(long)]
    pub quiet: bool,
}

/// A sampled landscape together with what it was sampled from.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LandscapeReport {
    pub graph: Graph,
    pub edge: Option<(NodeId, NodeId)>,
    pub spec: GridSpec,
    pub max: f64,
    pub min: f64,
    pub maximizing_parameters: Vec<(f64, f64)>,
    pub grid: EnergyGrid,
}

impl LandscapeReport {
    pub fn load(path: &std::path::Path) -> anyhow::Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read landscape {}", path.display()))?;
        serde_json::from_str(&content)
            .with_context(|| format!("failed to parse landscape {}", path.display()))
    }
}

fn merged(args: &LandscapeArgs, config: &LandscapeConfig) -> LandscapeConfig {
    let mut config = config.clone();
    if let Some(samples) = args.samples {
        config.grid.samples = samples;
    }
    if let Some(gamma_max) = args.gamma_max {
        config.grid.gamma_max = gamma_max;
    }
    if let Some(beta_max) = args.beta_max {
        config.grid.beta_max = beta_max;
    }
    if let Some(workers) = args.workers {
        config.sampler.workers = workers;
    }
    if args.shots.is_some() {
        config.oracle.shots = args.shots;
    }
    if let Some(seed) = args.seed {
        config.oracle.seed = seed;
    }
    config
}

pub fn run(args: LandscapeArgs, config: &LandscapeConfig) -> anyhow::Result<()> {
    let config = merged(&args, config);
    config.validate().context("invalid landscape options")?;

    let graph = args.input.load()?;
    let edge = args.edge.as_deref().map(parse_pair).transpose()?;
    let oracle = config.oracle.build();
    tracing::info!(
        nodes = graph.num_nodes(),
        edges = graph.num_edges(),
        samples = config.grid.samples,
        workers = config.sampler.workers,
        shots = ?config.oracle.shots,
        "sampling landscape"
    );

    let mut sampler = LandscapeSampler::new(&graph, &oracle, config.grid)
        .edge(edge)
        .workers(config.sampler.workers);
    let bar = if args.quiet {
        None
    } else {
        let pb = cell_bar(sampler.total_cells() as u64, "cells")?;
        let handle = pb.clone();
        sampler = sampler.on_progress(move |done| handle.set_position(done as u64));
        Some(pb)
    };

    let grid = sampler.run()?;
    drop(sampler);
    if let Some(pb) = bar {
        pb.finish_and_clear();
    }

    let report = LandscapeReport {
        edge,
        spec: config.grid,
        max: grid.max(),
        min: grid.min(),
        maximizing_parameters: grid.maximizing_parameters(args.centered, MAXIMUM_ATOL)?,
        graph,
        grid,
    };
    tracing::info!(max = report.max, optima = report.maximizing_parameters.len(), "landscape done");
    write_json(&report, args.output.as_deref())
}
