//! The final result record.

use commp_hash::{PaddedPieceSize, PieceCid};
use serde::Serialize;

/// Outcome of committing one byte stream.
#[derive(Clone, Copy, Debug, Serialize, PartialEq, Eq)]
pub struct PieceCommitment {
    /// Exact number of raw bytes written, never rounded.
    pub payload_size: u64,
    /// Padded size of the resulting piece: either a sub-segment class or a
    /// multiple of the segment's padded size.
    pub piece_size: PaddedPieceSize,
    /// Root commitment identifier.
    pub piece_cid: PieceCid,
}
