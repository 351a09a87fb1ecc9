//! Typed failures for the commitment primitives.

use thiserror::Error;

/// Failures from size arithmetic, leaf hashing, and identifier decoding.
#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum HashError {
    /// The input (or its padded class) exceeds the maximum supported piece.
    #[error("piece of {len} bytes exceeds the maximum supported size")]
    TooLarge {
        /// Raw input length in bytes.
        len: u64,
    },

    /// The value is not a power of two ≥ 128.
    #[error("{0} is not a valid padded piece size (power of two ≥ 128 required)")]
    InvalidPaddedSize(u64),

    /// The value is not of the form 127·2^n.
    #[error("{0} is not a valid unpadded piece size (127·2^n required)")]
    InvalidUnpaddedSize(u64),

    /// An identifier could not be decoded from its byte or string form.
    #[error("malformed piece cid: {0}")]
    MalformedCid(&'static str),
}

/// Rejections from the tree-root combination.
#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum TreeError {
    /// Fewer than two leaves; single leaves are the caller's short-circuit.
    #[error("piece tree needs at least two leaves, got {0}")]
    TooFewLeaves(usize),

    /// Leaf count is not a power of two.
    #[error("piece tree leaf count {0} is not a power of two")]
    UnbalancedTree(usize),

    /// A leaf size does not match the first leaf's size.
    #[error("leaf {index} has padded size {size}, expected {expected}")]
    MismatchedLeafSize {
        /// Position of the offending leaf.
        index: usize,
        /// Its declared padded size.
        size: u64,
        /// The size shared by the preceding leaves.
        expected: u64,
    },

    /// The shared leaf size is not a valid padded class.
    #[error("piece leaf size rejected: {0}")]
    LeafSize(#[from] HashError),

    /// The combined size exceeds the scheme's sector limit.
    #[error("combined piece size {total} exceeds the {max}-byte sector limit")]
    SectorOverflow {
        /// Total padded size of all leaves (saturating).
        total: u64,
        /// The scheme's sector size.
        max: u64,
    },
}
