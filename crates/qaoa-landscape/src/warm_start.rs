//! Warm-start vectors: integer codec, coarse signature and deduplication.
//!
//! A warm start is a node-indexed vector with entries in `[0, 1]`. Ternary
//! warm starts (entries `0`, `0.5`, `1`) are bucketed by how many of each
//! value they contain; only graphs in the same bucket are compared with the
//! label-preserving isomorphism test.

use rustc_hash::FxHashMap;
use tracing::trace;

use crate::canonical::is_isomorphic_labeled;
use crate::error::{LandscapeError, Result};
use crate::graph::Graph;

fn check_base(base: u32) -> Result<()> {
    if base < 2 {
        return Err(LandscapeError::InvalidBase(base));
    }
    Ok(())
}

/// Warm start whose digits are `n` written in `base`, least significant digit
/// on node 0, padded or truncated to `length` and scaled by `1 / (base - 1)`.
///
/// ```
/// use qaoa_landscape::warm_start::encode;
/// assert_eq!(encode(5, 3, 2).unwrap(), vec![1.0, 0.0, 1.0]);
/// assert_eq!(encode(5, 3, 3).unwrap(), vec![1.0, 0.5, 0.0]);
/// ```
pub fn encode(n: u64, length: usize, base: u32) -> Result<Vec<f64>> {
    check_base(base)?;
    let base = u64::from(base);
    let scale = (base - 1) as f64;
    let mut rest = n;
    Ok((0..length)
        .map(|_| {
            let digit = rest % base;
            rest /= base;
            digit as f64 / scale
        })
        .collect())
}

/// Inverse of [`encode`]: `round(sum (base - 1) * v[i] * base^i)`, clamped at 0.
///
/// Exact only for lattice vectors whose entries are all `k / (base - 1)`.
/// For arbitrary relaxed vectors the result is an approximation and should
/// not be used as an identity.
pub fn decode(vector: &[f64], base: u32) -> Result<u64> {
    check_base(base)?;
    let b = f64::from(base);
    let scale = b - 1.0;
    let mut power = 1.0;
    let mut total = 0.0;
    for &v in vector {
        total += scale * v * power;
        power *= b;
    }
    Ok(total.round().max(0.0) as u64)
}

/// Counts of `0`, `0.5` and `1` entries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct WarmStartSignature {
    pub zeros: usize,
    pub halves: usize,
    pub ones: usize,
}

impl From<WarmStartSignature> for (usize, usize, usize) {
    fn from(s: WarmStartSignature) -> Self {
        (s.zeros, s.halves, s.ones)
    }
}

/// Signature of a ternary warm start; any other value is an error.
pub fn signature(vector: &[f64]) -> Result<WarmStartSignature> {
    let mut sig = WarmStartSignature {
        zeros: 0,
        halves: 0,
        ones: 0,
    };
    for (index, &value) in vector.iter().enumerate() {
        if value == 0.0 {
            sig.zeros += 1;
        } else if value == 0.5 {
            sig.halves += 1;
        } else if value == 1.0 {
            sig.ones += 1;
        } else {
            return Err(LandscapeError::UnsupportedSignatureValue { index, value });
        }
    }
    Ok(sig)
}

/// Bucket a warm start lands in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BucketKey {
    Ternary(WarmStartSignature),
    /// Non-ternary vectors share one bucket and are compared exhaustively.
    Other,
}

impl BucketKey {
    pub fn of(vector: &[f64]) -> Self {
        signature(vector).map_or(BucketKey::Other, BucketKey::Ternary)
    }
}

/// Warm starts seen so far for one graph structure, bucketed by signature.
#[derive(Debug, Clone, Default)]
pub struct WarmStartIndex {
    buckets: FxHashMap<BucketKey, Vec<Vec<f64>>>,
}

impl WarmStartIndex {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record `vector` without checking for duplicates.
    pub fn insert(&mut self, vector: Vec<f64>) {
        self.buckets
            .entry(BucketKey::of(&vector))
            .or_default()
            .push(vector);
    }

    /// `true` if `graph` labeled with `candidate` is label-isomorphic to
    /// `graph` labeled with some recorded warm start of the same bucket.
    ///
    /// Nothing is recorded; an absent bucket is simply "not a duplicate".
    pub fn is_duplicate(&self, graph: &Graph, candidate: &[f64]) -> Result<bool> {
        let Some(bucket) = self.buckets.get(&BucketKey::of(candidate)) else {
            return Ok(false);
        };
        let structure = graph.structure();
        let labeled = structure.clone().with_labels(candidate.to_vec())?;

        for (i, seen) in bucket.iter().enumerate() {
            if seen.len() != candidate.len() {
                continue;
            }
            let other = structure.clone().with_labels(seen.clone())?;
            if is_isomorphic_labeled(&labeled, &other) {
                trace!(compared = i + 1, bucket = bucket.len(), "warm start duplicate");
                return Ok(true);
            }
        }
        Ok(false)
    }

    /// Record `candidate` unless it is a duplicate; returns whether it was new.
    pub fn insert_if_new(&mut self, graph: &Graph, candidate: &[f64]) -> Result<bool> {
        if self.is_duplicate(graph, candidate)? {
            return Ok(false);
        }
        self.insert(candidate.to_vec());
        Ok(true)
    }

    /// Total number of recorded warm starts.
    pub fn len(&self) -> usize {
        self.buckets.values().map(Vec::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.buckets.is_empty()
    }

    pub fn bucket(&self, key: &BucketKey) -> Option<&[Vec<f64>]> {
        self.buckets.get(key).map(Vec::as_slice)
    }
}

/// Free-function form of [`WarmStartIndex::is_duplicate`].
pub fn is_duplicate(graph: &Graph, candidate: &[f64], index: &WarmStartIndex) -> Result<bool> {
    index.is_duplicate(graph, candidate)
}
