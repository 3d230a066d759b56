//! Graph arguments shared by the subcommands.

use std::path::PathBuf;

use anyhow::{bail, Context};
use clap::Args;
use qaoa_landscape::{Graph, NodeId};

/// Where the input graph comes from.
#[derive(Args, Debug, Clone)]
pub struct GraphArgs {
    /// Inline edge list, e.g. "0-1,1-2:2.5" (weight defaults to 1)
    #[arg(short, long, conflicts_with = "graph")]
    pub edges: Option<String>,

    /// Graph as JSON (`{"num_nodes": .., "edges": [{"u":..,"v":..,"weight":..}]}`)
    #[arg(short, long)]
    pub graph: Option<PathBuf>,

    /// Node count for --edges; defaults to the largest node id plus one
    #[arg(short, long)]
    pub nodes: Option<usize>,
}

impl GraphArgs {
    pub fn load(&self) -> anyhow::Result<Graph> {
        match (&self.edges, &self.graph) {
            (Some(spec), _) => {
                let edges = parse_edges(spec)?;
                let needed = edges.iter().map(|&(u, v, _)| u.max(v) + 1).max().unwrap_or(0);
                let n = self.nodes.unwrap_or(needed);
                if n < needed {
                    bail!("--nodes {n} is too small for edge list touching node {}", needed - 1);
                }
                Ok(Graph::weighted(n, &edges)?)
            }
            (None, Some(path)) => {
                let content = std::fs::read_to_string(path)
                    .with_context(|| format!("failed to read graph {}", path.display()))?;
                let graph: Graph = serde_json::from_str(&content)
                    .with_context(|| format!("failed to parse graph {}", path.display()))?;
                Ok(graph)
            }
            (None, None) => bail!("either --edges or --graph is required"),
        }
    }
}

/// Parse `"u-v[:w],..."`.
pub fn parse_edges(spec: &str) -> anyhow::Result<Vec<(NodeId, NodeId, f64)>> {
    spec.split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(|item| {
            let (pair, weight) = match item.split_once(':') {
                Some((pair, w)) => (
                    pair,
                    w.trim()
                        .parse::<f64>()
                        .with_context(|| format!("bad weight in edge '{item}'"))?,
                ),
                None => (item, 1.0),
            };
            let (u, v) = parse_pair(pair).with_context(|| format!("bad edge '{item}'"))?;
            Ok((u, v, weight))
        })
        .collect()
}

/// Parse a single `"u-v"` pair.
pub fn parse_pair(pair: &str) -> anyhow::Result<(NodeId, NodeId)> {
    let Some((u, v)) = pair.split_once('-') else {
        bail!("expected 'u-v', got '{pair}'");
    };
    Ok((u.trim().parse()?, v.trim().parse()?))
}

/// Parse a comma separated warm start such as `"0,0.5,1"`.
pub fn parse_vector(spec: &str) -> anyhow::Result<Vec<f64>> {
    spec.split(',')
        .map(|s| {
            s.trim()
                .parse::<f64>()
                .with_context(|| format!("bad value '{s}'"))
        })
        .collect()
}
