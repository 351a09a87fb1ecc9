//! Engine error taxonomy.
//!
//! Leaf failures are captured per segment and only surfaced at finalization,
//! at the first failed index in position order. Nothing here retries.

use commp_hash::{HashError, TreeError};
use thiserror::Error;

/// Failure finalizing a piece commitment.
#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum CommitError {
    /// The hash primitive or encoder failed for one segment.
    #[error("computing commitment for segment {index}: {source}")]
    Leaf {
        /// Position of the failed segment.
        index: usize,
        /// The underlying primitive failure.
        source: HashError,
    },

    /// A segment's worker exited without delivering a result.
    #[error("segment {index} worker terminated before delivering a result")]
    LeafLost {
        /// Position of the orphaned segment.
        index: usize,
    },

    /// The root combination rejected the padded leaf list.
    #[error("generating piece tree root: {0}")]
    Merkle(#[from] TreeError),
}
