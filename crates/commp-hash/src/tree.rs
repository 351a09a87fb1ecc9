//! Tree-root combination over ordered leaf commitments, plus the
//! all-zero-segment table.

use crate::cid::PieceCid;
use crate::commit::{combine_nodes, NodeDigest, NODE_SIZE};
use crate::error::TreeError;
use crate::size::{PaddedPieceSize, UnpaddedPieceSize, MAX_PIECE_PADDED};
use serde::{Deserialize, Serialize};
use std::sync::OnceLock;

/// One leaf fed into the tree combination: its padded size and identifier.
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct PieceInfo {
    /// Padded size of the leaf.
    pub size: PaddedPieceSize,
    /// The leaf's commitment identifier.
    pub cid: PieceCid,
}

/// Fixed scheme parameter for the tree combination.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum PieceTreeScheme {
    /// Stacked-DRG layout with a 32 GiB sector cap.
    #[default]
    Drg32GiB,
}

impl PieceTreeScheme {
    /// Sector size this scheme supports.
    #[inline]
    #[must_use]
    pub const fn sector_size(self) -> PaddedPieceSize {
        match self {
            Self::Drg32GiB => MAX_PIECE_PADDED,
        }
    }
}

/// Combine an ordered, power-of-two-count list of equal-size leaves into the
/// root commitment.
///
/// Rejects lists shorter than two (the single-leaf short-circuit belongs to
/// the caller), unbalanced counts, mixed or invalid leaf sizes, and totals
/// beyond the scheme's sector size.
pub fn piece_tree_root(
    scheme: PieceTreeScheme,
    pieces: &[PieceInfo],
) -> Result<PieceCid, TreeError> {
    if pieces.len() < 2 {
        return Err(TreeError::TooFewLeaves(pieces.len()));
    }
    if !pieces.len().is_power_of_two() {
        return Err(TreeError::UnbalancedTree(pieces.len()));
    }

    let expected = pieces[0].size;
    expected.validate()?;
    for (index, piece) in pieces.iter().enumerate() {
        if piece.size != expected {
            return Err(TreeError::MismatchedLeafSize {
                index,
                size: piece.size.0,
                expected: expected.0,
            });
        }
    }

    let max = scheme.sector_size().0;
    let total = u128::from(expected.0) * pieces.len() as u128;
    if total > u128::from(max) {
        return Err(TreeError::SectorOverflow {
            total: u64::try_from(total).unwrap_or(u64::MAX),
            max,
        });
    }

    let mut nodes: Vec<NodeDigest> = pieces.iter().map(|p| *p.cid.digest()).collect();
    while nodes.len() > 1 {
        let next: Vec<NodeDigest> = nodes
            .chunks_exact(2)
            .map(|pair| combine_nodes(&pair[0], &pair[1]))
            .collect();
        nodes = next;
    }
    Ok(PieceCid::from_digest(nodes[0]))
}

/// Zero-subtree digests by height: `layer[h]` is the root of a perfect tree
/// of `2^h` all-zero nodes, covering classes up to the 32 GiB sector.
fn zero_layers() -> &'static [NodeDigest] {
    static LAYERS: OnceLock<Vec<NodeDigest>> = OnceLock::new();
    LAYERS.get_or_init(|| {
        let max_height = (MAX_PIECE_PADDED.0 / NODE_SIZE as u64).trailing_zeros() as usize;
        let mut layers = Vec::with_capacity(max_height + 1);
        let mut node = [0u8; NODE_SIZE];
        layers.push(node);
        for _ in 0..max_height {
            node = combine_nodes(&node, &node);
            layers.push(node);
        }
        layers
    })
}

/// Commitment identifier for an all-zero piece of the given unpadded size.
///
/// Table lookup after the first use; fails only for invalid sizes.
pub fn zero_piece_commitment(size: UnpaddedPieceSize) -> Result<PieceCid, TreeError> {
    size.validate().map_err(TreeError::LeafSize)?;
    let padded = size.padded();
    let height = (padded.0 / NODE_SIZE as u64).trailing_zeros() as usize;
    zero_layers()
        .get(height)
        .copied()
        .map(PieceCid::from_digest)
        .ok_or(TreeError::SectorOverflow {
            total: padded.0,
            max: MAX_PIECE_PADDED.0,
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::commit::leaf_commitment;
    use crate::error::HashError;

    fn leaf(data: &[u8]) -> PieceInfo {
        let (digest, size) = leaf_commitment(data).unwrap();
        PieceInfo {
            size,
            cid: PieceCid::from_digest(digest),
        }
    }

    #[test]
    fn combination_matches_one_shot_hash() {
        // Two class-256 leaves (254 raw bytes each) vs. hashing the 508-byte
        // concatenation directly as a class-512 piece.
        let a = vec![0x11u8; 254];
        let b = vec![0x22u8; 254];
        let combined = piece_tree_root(PieceTreeScheme::Drg32GiB, &[leaf(&a), leaf(&b)]).unwrap();

        let mut concat = a;
        concat.extend_from_slice(&b);
        let (digest, size) = leaf_commitment(&concat).unwrap();
        assert_eq!(size, PaddedPieceSize(512));
        assert_eq!(combined, PieceCid::from_digest(digest));
    }

    #[test]
    fn four_way_combination_associates() {
        let quarters: Vec<Vec<u8>> = (0u8..4).map(|i| vec![i + 1; 254]).collect();
        let leaves: Vec<PieceInfo> = quarters.iter().map(|q| leaf(q)).collect();
        let root = piece_tree_root(PieceTreeScheme::Drg32GiB, &leaves).unwrap();

        let concat: Vec<u8> = quarters.concat();
        let (digest, _) = leaf_commitment(&concat).unwrap();
        assert_eq!(root, PieceCid::from_digest(digest));
    }

    #[test]
    fn rejects_bad_leaf_lists() {
        let l = leaf(&[9u8; 100]);
        assert_eq!(
            piece_tree_root(PieceTreeScheme::Drg32GiB, &[l]),
            Err(TreeError::TooFewLeaves(1))
        );
        assert_eq!(
            piece_tree_root(PieceTreeScheme::Drg32GiB, &[l, l, l]),
            Err(TreeError::UnbalancedTree(3))
        );

        let bigger = leaf(&[9u8; 200]);
        assert!(matches!(
            piece_tree_root(PieceTreeScheme::Drg32GiB, &[l, bigger]),
            Err(TreeError::MismatchedLeafSize { index: 1, .. })
        ));

        let invalid = PieceInfo {
            size: PaddedPieceSize(100),
            cid: l.cid,
        };
        assert_eq!(
            piece_tree_root(PieceTreeScheme::Drg32GiB, &[invalid, invalid]),
            Err(TreeError::LeafSize(HashError::InvalidPaddedSize(100)))
        );
    }

    #[test]
    fn rejects_sector_overflow() {
        let half = PieceInfo {
            size: MAX_PIECE_PADDED,
            cid: PieceCid::from_digest([0u8; 32]),
        };
        assert_eq!(
            piece_tree_root(PieceTreeScheme::Drg32GiB, &[half, half]),
            Err(TreeError::SectorOverflow {
                total: MAX_PIECE_PADDED.0 * 2,
                max: MAX_PIECE_PADDED.0,
            })
        );
    }

    #[test]
    fn zero_table_matches_direct_hashing() {
        // Smallest class: an empty payload and an explicit run of 127 zeros
        // both hash to the zero commitment.
        let zero128 = zero_piece_commitment(UnpaddedPieceSize(127)).unwrap();
        let (empty, _) = leaf_commitment(&[]).unwrap();
        let (explicit, _) = leaf_commitment(&[0u8; 127]).unwrap();
        assert_eq!(zero128, PieceCid::from_digest(empty));
        assert_eq!(zero128, PieceCid::from_digest(explicit));

        // A larger class checked against direct hashing.
        let zero512 = zero_piece_commitment(UnpaddedPieceSize(127 * 4)).unwrap();
        let (direct, size) = leaf_commitment(&vec![0u8; 127 * 4]).unwrap();
        assert_eq!(size, PaddedPieceSize(512));
        assert_eq!(zero512, PieceCid::from_digest(direct));
    }

    #[test]
    fn zero_table_rejects_invalid_sizes() {
        assert!(zero_piece_commitment(UnpaddedPieceSize(128)).is_err());
        assert!(zero_piece_commitment(UnpaddedPieceSize(0)).is_err());
    }
}
