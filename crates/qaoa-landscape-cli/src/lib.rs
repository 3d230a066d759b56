//! QAOA Landscape CLI
//!
//! Command-line front end for sampling depth-1 QAOA MaxCut landscapes and
//! judging how well parameters transfer between graphs.
//!
//! # Usage
//!
//! ```bash
//! # Sample a 4-cycle on a 64x64 grid with 8 workers
//! qaoa-landscape landscape --edges "0-1,1-2,2-3,3-0" --samples 64 --workers 8 -o c4.json
//!
//! # Compare two sampled landscapes
//! qaoa-landscape compare --donor c4.json --acceptor p4.json
//!
//! # Cluster edge neighbourhoods of a graph file
//! qaoa-landscape clusters --graph graph.json --split
//!
//! # Exact and relaxed max cuts
//! qaoa-landscape maxcut --edges "0-1,1-2,2-0" --method relaxed
//! ```

use std::path::PathBuf;

use clap::{Parser, Subcommand};

pub mod commands;
pub mod config;
pub mod graph_input;
pub mod output;

/// QAOA Landscape Command Line Interface
#[derive(Parser, Debug)]
#[command(name = "qaoa-landscape")]
#[command(author, version, about = "QAOA MaxCut landscapes and parameter transferability")]
#[command(propagate_version = true)]
pub struct Cli {
    /// JSON configuration file; flags override its values
    #[arg(short, long, global = true, env = "QAOA_LANDSCAPE_CONFIG")]
    pub config: Option<PathBuf>,

    /// Command to execute
    #[command(subcommand)]
    pub command: Commands,
}

/// Top-level commands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Sample the energy landscape of a graph
    Landscape(commands::landscape::LandscapeArgs),

    /// Compare a donor landscape with an acceptor landscape
    Compare(commands::compare::CompareArgs),

    /// Cluster edge neighbourhoods into isomorphism classes
    Clusters(commands::clusters::ClustersArgs),

    /// Enumerate warm starts that are distinct up to graph symmetry
    WarmStarts(commands::warm_starts::WarmStartsArgs),

    /// Exact, rounded or relaxed max cut of a graph
    Maxcut(commands::maxcut::MaxcutArgs),

    /// Display version information
    Version,
}
