use std::path::PathBuf;

use anyhow::{bail, Context};
use clap::Args;
use serde::Serialize;

use qaoa_landscape::warm_start::{encode, WarmStartIndex};

use crate::graph_input::GraphArgs;
use crate::output::{cell_bar, write_json};

#[derive(Args, Debug)]
pub struct WarmStartsArgs {
    #[command(flatten)]
    pub input: GraphArgs,

    /// Digits per node: 2 gives {0, 1}, 3 gives {0, 0.5, 1}
    #[arg(short, long, default_value = "2")]
    pub base: u32,

    /// Refuse to enumerate more than this many vectors
    #[arg(long, default_value = "1048576")]
    pub limit: u64,

    /// Output file (prints to stdout if not specified)
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Hide the progress bar
    #[arg(long)]
    pub quiet: bool,
}

#[derive(Debug, Serialize)]
struct DistinctWarmStart {
    index: u64,
    warm_start: Vec<f64>,
}

pub fn run(args: WarmStartsArgs) -> anyhow::Result<()> {
    let graph = args.input.load()?;
    let n = graph.num_nodes();
    let total = u32::try_from(n)
        .ok()
        .and_then(|n| u64::from(args.base).checked_pow(n))
        .context("too many warm starts to enumerate")?;
    if total > args.limit {
        bail!("{total} warm starts exceed --limit {}", args.limit);
    }

    let bar = if args.quiet { None } else { Some(cell_bar(total, "warm starts")?) };
    let mut index = WarmStartIndex::new();
    let mut distinct = Vec::new();
    for k in 0..total {
        let ws = encode(k, n, args.base)?;
        if index.insert_if_new(&graph, &ws)? {
            distinct.push(DistinctWarmStart {
                index: k,
                warm_start: ws,
            });
        }
        if let Some(pb) = &bar {
            pb.inc(1);
        }
    }
    if let Some(pb) = bar {
        pb.finish_and_clear();
    }

    tracing::info!(enumerated = total, distinct = distinct.len(), "warm starts deduplicated");
    write_json(&distinct, args.output.as_deref())
}
