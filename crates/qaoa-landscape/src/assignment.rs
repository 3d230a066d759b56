//! Binary node assignments and the bitstring convention.
//!
//! Measurement results are conventionally printed with qubit 0 as the least
//! significant (rightmost) character, so character 0 of a bitstring belongs
//! to node `n - 1`. [`Assignment::from_bitstring`] and
//! [`Assignment::to_bitstring`] are the only places that reverse; everything
//! else works on node-indexed vectors.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::{LandscapeError, Result};
use crate::graph::NodeId;

/// Node-indexed binary partition: `bits[v]` is the side of node `v`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Assignment {
    bits: Vec<bool>,
}

impl Assignment {
    pub fn new(bits: Vec<bool>) -> Self {
        Self { bits }
    }

    /// All nodes on side 0.
    pub fn zeros(len: usize) -> Self {
        Self {
            bits: vec![false; len],
        }
    }

    /// Parse a measurement bitstring (rightmost character = node 0).
    pub fn from_bitstring(s: &str) -> Result<Self> {
        let bits = s
            .chars()
            .rev()
            .map(|c| match c {
                '0' => Ok(false),
                '1' => Ok(true),
                found => Err(LandscapeError::InvalidBitstring { found }),
            })
            .collect::<Result<Vec<_>>>()?;
        Ok(Self { bits })
    }

    /// Render as a measurement bitstring (rightmost character = node 0).
    pub fn to_bitstring(&self) -> String {
        self.bits
            .iter()
            .rev()
            .map(|&b| if b { '1' } else { '0' })
            .collect()
    }

    /// Basis-state index `k` of an `n`-qubit register: node `q` gets bit `q` of `k`.
    ///
    /// Nodes past the width of `usize` are always 0.
    pub fn from_basis_index(index: usize, num_nodes: usize) -> Self {
        Self {
            bits: (0..num_nodes)
                .map(|q| {
                    u32::try_from(q)
                        .ok()
                        .and_then(|q| index.checked_shr(q))
                        .is_some_and(|k| k & 1 == 1)
                })
                .collect(),
        }
    }

    /// Inverse of [`Assignment::from_basis_index`].
    ///
    /// # Panics
    ///
    /// Panics if a node at position `usize::BITS` or above is 1, since the
    /// index would not fit in a `usize`.
    pub fn to_basis_index(&self) -> usize {
        self.bits
            .iter()
            .enumerate()
            .filter(|&(_, &b)| b)
            .fold(0usize, |acc, (q, _)| {
                assert!(
                    q < usize::BITS as usize,
                    "node {q} does not fit in a basis index"
                );
                acc | (1usize << q)
            })
    }

    /// Build from a `{0, 1}` valued vector; any non-zero entry counts as 1.
    pub fn from_values(values: &[f64]) -> Self {
        Self {
            bits: values.iter().map(|&v| v != 0.0).collect(),
        }
    }

    /// `0.0` / `1.0` per node, e.g. to use a cut as a warm start.
    pub fn to_values(&self) -> Vec<f64> {
        self.bits.iter().map(|&b| if b { 1.0 } else { 0.0 }).collect()
    }

    /// The same partition with both sides swapped.
    pub fn complement(&self) -> Self {
        Self {
            bits: self.bits.iter().map(|b| !b).collect(),
        }
    }

    pub fn len(&self) -> usize {
        self.bits.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bits.is_empty()
    }

    pub fn get(&self, node: NodeId) -> Option<bool> {
        self.bits.get(node).copied()
    }

    pub fn as_slice(&self) -> &[bool] {
        &self.bits
    }

    pub(crate) fn check_len(&self, expected: usize) -> Result<()> {
        if self.bits.len() != expected {
            return Err(LandscapeError::InvalidAssignmentLength {
                expected,
                actual: self.bits.len(),
            });
        }
        Ok(())
    }
}

impl From<Vec<bool>> for Assignment {
    fn from(bits: Vec<bool>) -> Self {
        Self::new(bits)
    }
}

impl fmt::Display for Assignment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_bitstring())
    }
}
