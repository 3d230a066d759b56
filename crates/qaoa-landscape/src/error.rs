//! Error types for landscape sampling, comparison and deduplication

use thiserror::Error;

/// Errors reported by the landscape toolkit.
///
/// None of these are retried: every operation is a pure computation, so a
/// failure always points at the inputs.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum LandscapeError {
    #[error("energy grids must have the same shape, got {left:?} and {right:?}")]
    ShapeMismatch {
        left: (usize, usize),
        right: (usize, usize),
    },

    #[error("cannot min-max normalize {grid} grid: constant value {value}")]
    DegenerateRange { grid: &'static str, value: f64 },

    #[error("no grid cell reaches threshold {threshold}")]
    EmptyThresholdSet { threshold: f64 },

    #[error("energy grid has no cells")]
    EmptyGrid,

    #[error("assignment has length {actual}, graph has {expected} nodes")]
    InvalidAssignmentLength { expected: usize, actual: usize },

    #[error("warm-start value {value} at index {index} is not one of 0, 0.5, 1")]
    UnsupportedSignatureValue { index: usize, value: f64 },

    #[error("invalid character {found:?} in bitstring, expected '0' or '1'")]
    InvalidBitstring { found: char },

    #[error("node index {node} out of range for {num_nodes}-node graph")]
    InvalidNode { node: usize, num_nodes: usize },

    #[error("self-loop on node {node} is not allowed")]
    SelfLoop { node: usize },

    #[error("edge ({u}, {v}) is not part of the graph")]
    EdgeNotFound { u: usize, v: usize },

    #[error("invalid graph: {0}")]
    InvalidGraph(String),

    #[error("base must be at least 2, got {0}")]
    InvalidBase(u32),

    #[error("invalid grid specification: {0}")]
    InvalidGridSpec(String),

    #[error("qubit limit exceeded: requested {requested}, maximum {maximum}")]
    QubitLimitExceeded { requested: usize, maximum: usize },

    #[error("graph with {num_nodes} nodes exceeds the exhaustive search limit of {maximum}")]
    GraphTooLarge { num_nodes: usize, maximum: usize },

    #[error("local subgraph has {num_nodes} nodes, cap is {maximum}")]
    SubgraphTooLarge { num_nodes: usize, maximum: usize },

    #[error("landscape sampling was cancelled")]
    Cancelled,

    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("relaxation solver error: {0}")]
    Solver(String),
}

/// Convenience alias used throughout the crate
pub type Result<T> = std::result::Result<T, LandscapeError>;
