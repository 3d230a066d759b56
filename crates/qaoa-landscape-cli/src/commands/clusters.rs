use std::path::PathBuf;

use clap::Args;
use serde::Serialize;

use qaoa_landscape::{LandscapeConfig, SubgraphCatalog, SubgraphCluster};

use crate::graph_input::{parse_vector, GraphArgs};
use crate::output::write_json;

#[derive(Args, Debug)]
pub struct ClustersArgs {
    #[command(flatten)]
    pub input: GraphArgs,

    /// Label nodes with this assignment, e.g. "0,1,0.5,1"
    #[arg(long)]
    pub warm_start: Option<String>,

    /// Split degree-2 nodes before clustering
    #[arg(long)]
    pub split: bool,

    /// Largest edge neighbourhood to compare
    #[arg(long)]
    pub max_local_nodes: Option<usize>,

    /// Output file (prints to stdout if not specified)
    #[arg(short, long)]
    pub output: Option<PathBuf>,
}

#[derive(Debug, Serialize)]
struct ClustersReport<'a> {
    classes: usize,
    edges: usize,
    clusters: &'a [SubgraphCluster],
}

pub fn run(args: ClustersArgs, config: &LandscapeConfig) -> anyhow::Result<()> {
    let mut canonical = config.canonical;
    canonical.split_degree2 |= args.split;
    if let Some(max) = args.max_local_nodes {
        canonical.max_local_nodes = max;
    }

    let graph = args.input.load()?;
    let mut catalog = SubgraphCatalog::with_config(canonical);
    match args.warm_start.as_deref() {
        Some(spec) => catalog.add_weighted(&graph, &parse_vector(spec)?)?,
        None => catalog.add_graph(&graph)?,
    }

    tracing::info!(classes = catalog.len(), edges = catalog.total_count(), "clustered");
    let report = ClustersReport {
        classes: catalog.len(),
        edges: catalog.total_count(),
        clusters: catalog.clusters(),
    };
    write_json(&report, args.output.as_deref())
}
