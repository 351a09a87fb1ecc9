//! Leaf hashing over a single piece of raw bytes.
//!
//! The raw payload is zero-extended to the unpadded capacity of its size
//! class, expanded quad-by-quad (127 raw bytes + 1 reserved zero byte per
//! 128 padded bytes), and the resulting 32-byte nodes are folded pairwise
//! with SHA-256 down to a single root digest. Internal node outputs have
//! their two most significant bits cleared (trunc254 convention), which is
//! what keeps segment-wise trees composable with one-shot hashing.

use crate::error::HashError;
use crate::size::{PaddedPieceSize, MAX_PIECE_PADDED};
use sha2::{Digest, Sha256};

/// Raw bytes per quad.
pub(crate) const QUAD_RAW: usize = 127;
/// Padded bytes per quad.
pub(crate) const QUAD_PADDED: usize = 128;
/// Bytes per tree node.
pub(crate) const NODE_SIZE: usize = 32;

/// A 32-byte tree node or root digest.
pub type NodeDigest = [u8; 32];

/// Smallest valid padded size class holding `raw_len` payload bytes.
///
/// Empty input still occupies the minimum 128-byte class.
pub fn padded_size_class(raw_len: u64) -> Result<PaddedPieceSize, HashError> {
    if raw_len > MAX_PIECE_PADDED.unpadded().0 {
        return Err(HashError::TooLarge { len: raw_len });
    }
    let quads = raw_len.div_ceil(QUAD_RAW as u64).max(1);
    Ok(PaddedPieceSize((quads * QUAD_PADDED as u64).next_power_of_two()))
}

/// Fold two child nodes into their parent.
pub(crate) fn combine_nodes(left: &NodeDigest, right: &NodeDigest) -> NodeDigest {
    let mut h = Sha256::new();
    h.update(left);
    h.update(right);
    let mut out = [0u8; NODE_SIZE];
    out.copy_from_slice(&h.finalize());
    out[NODE_SIZE - 1] &= 0b0011_1111;
    out
}

/// Hash one piece of raw bytes into `(root digest, padded size class)`.
///
/// Deterministic for identical input bytes; fails only when the input would
/// not fit the largest supported piece.
pub fn leaf_commitment(data: &[u8]) -> Result<(NodeDigest, PaddedPieceSize), HashError> {
    let class = padded_size_class(data.len() as u64)?;

    // Quad expansion with implicit zero-extension: the buffer starts zeroed,
    // so short trailing quads and the reserved byte need no special casing.
    let mut padded = vec![0u8; class.0 as usize];
    for (q, chunk) in data.chunks(QUAD_RAW).enumerate() {
        padded[q * QUAD_PADDED..q * QUAD_PADDED + chunk.len()].copy_from_slice(chunk);
    }

    let mut nodes: Vec<NodeDigest> = padded
        .chunks_exact(NODE_SIZE)
        .map(|c| {
            let mut n = [0u8; NODE_SIZE];
            n.copy_from_slice(c);
            n
        })
        .collect();

    // class ≥ 128 ⇒ at least 4 nodes, and counts stay powers of two.
    while nodes.len() > 1 {
        let next: Vec<NodeDigest> = nodes
            .chunks_exact(2)
            .map(|pair| combine_nodes(&pair[0], &pair[1]))
            .collect();
        nodes = next;
    }
    Ok((nodes[0], class))
}
