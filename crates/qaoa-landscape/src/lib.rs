//! # qaoa-landscape -- QAOA Parameter Transferability for MaxCut
//!
//! Tools for studying how well depth-1 QAOA parameters transfer between
//! MaxCut instances:
//!
//! - **Cut evaluation**: [`cut_value`], [`edge_cut_value`] and an explicit
//!   [`CutCache`] keyed by graph fingerprint.
//!
//! - **Landscape sampling**: [`LandscapeSampler`] evaluates the expected cut
//!   of an [`EnergyOracle`] on a `(gamma, beta)` grid, sequentially or on a
//!   bounded rayon pool. [`StatevectorOracle`] and [`ShotOracle`] are bundled
//!   reference oracles.
//!
//! - **Landscape comparison**: [`analysis`] locates optimal parameters and
//!   scores how well one landscape's optimum serves another.
//!
//! - **Warm starts**: [`warm_start`] encodes integers as warm-start vectors
//!   and deduplicates `(graph, warm start)` pairs by label-preserving
//!   isomorphism behind a signature pre-filter.
//!
//! - **Canonicalization**: [`canonical`] splits degree-2 nodes and clusters
//!   edge-local subgraphs into isomorphism classes.
//!
//! - **Relaxations**: [`relaxation`] solves the MaxCut SDP in low-rank form
//!   and rounds it Goemans-Williamson style; [`brute_force_maxcut`] is the
//!   exact baseline for small graphs.
//!
//! # Quick Start
//!
//! ```rust,no_run
//! use qaoa_landscape::prelude::*;
//!
//! let donor = Graph::unweighted(4, &[(0, 1), (1, 2), (2, 3), (3, 0)]).unwrap();
//! let acceptor = Graph::unweighted(4, &[(0, 1), (1, 2), (2, 3)]).unwrap();
//! let spec = GridSpec::with_samples(32);
//!
//! let e1 = sample_grid(&donor, &StatevectorOracle, None, spec).unwrap();
//! let e2 = sample_grid(&acceptor, &StatevectorOracle, None, spec).unwrap();
//!
//! let coeff = transferability_coeff(e1.values(), e2.values()).unwrap();
//! println!("transferability: {coeff:.3}");
//! ```

pub mod analysis;
pub mod assignment;
pub mod canonical;
pub mod config;
pub mod cut;
pub mod error;
pub mod graph;
pub mod landscape;
pub mod oracle;
pub mod relaxation;
pub mod simulator;
pub mod warm_start;

pub use analysis::{
    average_difference, maximizing_parameters, param_transferable, transfer_fraction,
    transferability_coeff,
};
pub use assignment::Assignment;
pub use canonical::{
    cluster_subgraphs, cluster_weighted_subgraphs, local_subgraph, split_degree2_nodes,
    SubgraphCatalog, SubgraphCluster,
};
pub use config::{GridSpec, LandscapeConfig, TransferThresholds};
pub use cut::{cut_value, edge_cut_value, CutCache};
pub use error::{LandscapeError, Result};
pub use graph::{Edge, Graph, NodeId};
pub use landscape::{evaluate, sample_grid, CancelToken, EnergyGrid, LandscapeSampler};
pub use oracle::{Distribution, EnergyOracle};
pub use relaxation::{brute_force_maxcut, goemans_williamson, MixingMethodSolver, RelaxationSolver};
pub use simulator::{ShotOracle, StatevectorOracle};
pub use warm_start::{WarmStartIndex, WarmStartSignature};

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Re-exports of the most commonly used items.
pub mod prelude {
    pub use crate::analysis::*;
    pub use crate::assignment::Assignment;
    pub use crate::canonical::{cluster_subgraphs, cluster_weighted_subgraphs, SubgraphCatalog};
    pub use crate::config::*;
    pub use crate::cut::{cut_value, edge_cut_value, CutCache};
    pub use crate::error::{LandscapeError, Result};
    pub use crate::graph::{Graph, NodeId};
    pub use crate::landscape::*;
    pub use crate::oracle::{Distribution, EnergyOracle};
    pub use crate::relaxation::{
        brute_force_maxcut, goemans_williamson, MixingMethodSolver, RelaxationSolver,
    };
    pub use crate::simulator::{ShotOracle, StatevectorOracle};
    pub use crate::warm_start::{BucketKey, WarmStartIndex};
}
