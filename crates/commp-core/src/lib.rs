// crates/commp-core/src/lib.rs

//! commp-core — streaming piece-commitment engine.
//!
//! This crate turns an arbitrarily large byte stream into a single piece
//! commitment without holding the stream in memory:
//! - bytes accumulate into fixed-size segments ([`committer::SEGMENT_UNPADDED`]),
//! - each full segment is hashed on its own thread, bounded by a checkout
//!   pool of private buffers (backpressure, no races with the scratch
//!   buffer), and
//! - finalization drains per-segment results strictly in position order,
//!   zero-pads the leaf list to a power of two, and folds it into the root.
//!
//! The result is a pure function of the stream's contents and length:
//! chunking of `write` calls and the concurrency limit never change it.
//!
//! ```no_run
//! use commp_core::PieceCommitter;
//! use std::io::Write;
//!
//! let mut committer = PieceCommitter::new();
//! committer.write_all(b"some payload")?;
//! let commitment = committer.finalize()?;
//! println!("{}", commitment.piece_cid);
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

#![forbid(unsafe_code)]
#![deny(rust_2018_idioms)]
#![deny(missing_docs)]
#![warn(clippy::all, clippy::pedantic, clippy::nursery)]
#![allow(
    clippy::missing_errors_doc,
    clippy::module_name_repetitions,
    clippy::doc_markdown
)]

/// Segment accumulation, leaf dispatch, and tree aggregation.
pub mod committer;
/// Engine error taxonomy.
pub mod error;
/// Checkout/return pool of private segment buffers.
mod pool;
/// The final result record.
pub mod types;

pub use committer::{PieceCommitter, SEGMENT_PADDED, SEGMENT_UNPADDED};
pub use error::CommitError;
pub use types::PieceCommitment;

// Re-export the primitive types that appear in this crate's public API.
pub use commp_hash::{HashError, PaddedPieceSize, PieceCid, TreeError, UnpaddedPieceSize};
