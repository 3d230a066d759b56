use std::path::PathBuf;

use clap::{Args, ValueEnum};
use serde::Serialize;

use qaoa_landscape::relaxation::{brute_force_maxcut, MixingMethodSolver, RelaxationSolver};
use qaoa_landscape::LandscapeConfig;

use crate::graph_input::GraphArgs;
use crate::output::write_json;

#[derive(Args, Debug)]
pub struct MaxcutArgs {
    #[command(flatten)]
    pub input: GraphArgs,

    /// Solution method
    #[arg(short, long, value_enum, default_value = "exact")]
    pub method: Method,

    /// Hyperplane roundings tried by the gw method
    #[arg(short, long, default_value = "16")]
    pub rounds: usize,

    /// Seed of the relaxation and the roundings
    #[arg(long)]
    pub seed: Option<u64>,

    /// Vector dimension of the relaxation
    #[arg(long)]
    pub rank: Option<usize>,

    /// Output file (prints to stdout if not specified)
    #[arg(short, long)]
    pub output: Option<PathBuf>,
}

#[derive(ValueEnum, Clone, Copy, Debug, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Method {
    /// Enumerate every cut
    Exact,
    /// SDP relaxation with random-hyperplane rounding
    Gw,
    /// Real-valued warm start from the SDP relaxation
    Relaxed,
}

#[derive(Debug, Default, Serialize)]
struct MaxcutReport {
    #[serde(skip_serializing_if = "Option::is_none")]
    bitstring: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    cut_value: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    upper_bound: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    warm_start: Option<Vec<f64>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    iterations: Option<usize>,
}

pub fn run(args: MaxcutArgs, config: &LandscapeConfig) -> anyhow::Result<()> {
    let graph = args.input.load()?;
    let mut relaxation_config = config.relaxation;
    if let Some(seed) = args.seed {
        relaxation_config.seed = seed;
    }
    if args.rank.is_some() {
        relaxation_config.rank = args.rank;
    }

    let report = match args.method {
        Method::Exact => {
            let (cut, value) = brute_force_maxcut(&graph)?;
            MaxcutReport {
                bitstring: Some(cut.to_bitstring()),
                cut_value: Some(value),
                ..MaxcutReport::default()
            }
        }
        Method::Gw | Method::Relaxed => {
            let relaxation = MixingMethodSolver::new(relaxation_config).solve(&graph)?;
            if !relaxation.converged() {
                tracing::warn!(iterations = relaxation.iterations(), "relaxation did not converge");
            }
            let mut report = MaxcutReport {
                upper_bound: Some(relaxation.objective(&graph)?),
                iterations: Some(relaxation.iterations()),
                ..MaxcutReport::default()
            };
            if let Method::Gw = args.method {
                let (cut, value) =
                    relaxation.best_rounding(&graph, args.rounds, relaxation_config.seed)?;
                report.bitstring = Some(cut.to_bitstring());
                report.cut_value = Some(value);
            } else {
                report.warm_start = Some(relaxation.relaxed_assignment());
            }
            report
        }
    };

    tracing::info!(method = ?args.method, value = ?report.cut_value, "max cut done");
    write_json(&report, args.output.as_deref())
}
