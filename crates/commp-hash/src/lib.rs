// crates/commp-hash/src/lib.rs

//! Piece-commitment primitives.
//!
//! Everything the streaming engine treats as an external collaborator lives
//! here:
//! - typed padded/unpadded piece sizes with the fixed 127/128 ratio,
//! - the leaf-hash over a single segment (quad expansion + SHA-256 node fold),
//! - the canonical [`PieceCid`] identifier encoding,
//! - the all-zero-segment commitment table, and
//! - the power-of-two tree-root combination.
//!
//! The scheme is deterministic and self-consistent: combining the commitments
//! of two adjacent equal-size pieces equals the commitment of their
//! concatenation, so segment-wise aggregation and one-shot hashing agree.

#![forbid(unsafe_code)]
#![deny(rust_2018_idioms)]
#![deny(missing_docs)]
#![warn(clippy::all, clippy::pedantic, clippy::nursery)]
#![allow(
    clippy::missing_errors_doc,
    clippy::module_name_repetitions,
    clippy::doc_markdown
)]

/// Canonical piece-commitment identifier and its wire/display encodings.
pub mod cid;
/// Leaf hashing: quad padding, size classes, and the SHA-256 node fold.
pub mod commit;
/// Error taxonomy for primitive failures.
pub mod error;
/// Padded/unpadded size newtypes and their conversions.
pub mod size;
/// Tree-root combination and the zero-leaf table.
pub mod tree;

pub use cid::PieceCid;
pub use commit::{leaf_commitment, padded_size_class, NodeDigest};
pub use error::{HashError, TreeError};
pub use size::{PaddedPieceSize, UnpaddedPieceSize, MAX_PIECE_PADDED};
pub use tree::{piece_tree_root, zero_piece_commitment, PieceInfo, PieceTreeScheme};
