//! Streaming piece committer.
//!
//! [`PieceCommitter`] accumulates written bytes into fixed-size segments,
//! hashes each full segment on its own worker thread (bounded by the buffer
//! pool), and folds the ordered leaf commitments into a single root at
//! finalization.
//!
//! Ordering discipline: segments are dispatched in write order and their
//! results are consumed in that same order, whatever the completion order of
//! the workers. Together with the zero-fill padding rules this makes the
//! final commitment a pure function of the stream's contents and length.

use crate::error::CommitError;
use crate::pool::BufferPool;
use crate::types::PieceCommitment;
use commp_hash::{
    leaf_commitment, piece_tree_root, zero_piece_commitment, HashError, PaddedPieceSize, PieceCid,
    PieceInfo, PieceTreeScheme, UnpaddedPieceSize,
};
use std::io;
use std::num::NonZeroUsize;
use std::sync::mpsc::{sync_channel, Receiver};
use std::thread;

/// Padded size of one segment: the scheme's 8 MiB work unit.
pub const SEGMENT_PADDED: PaddedPieceSize = PaddedPieceSize(8 << 20);

/// Raw payload bytes per segment (`SEGMENT_PADDED` minus its 1/128 overhead).
pub const SEGMENT_UNPADDED: UnpaddedPieceSize = SEGMENT_PADDED.unpadded();

const SEG_LEN: usize = SEGMENT_UNPADDED.0 as usize;

/// One segment's completed commitment.
struct LeafCommitment {
    cid: PieceCid,
    padded: PaddedPieceSize,
}

fn commit_leaf(bytes: &[u8]) -> Result<LeafCommitment, HashError> {
    let (digest, padded) = leaf_commitment(bytes)?;
    Ok(LeafCommitment {
        cid: PieceCid::from_digest(digest),
        padded,
    })
}

/// Streaming piece-commitment calculator.
///
/// Feed bytes through [`std::io::Write`] in chunks of any size, then call
/// [`finalize`](Self::finalize) exactly once. A fresh instance is required
/// for every stream.
pub struct PieceCommitter {
    /// Total raw bytes written so far.
    total: u64,
    /// In-progress segment; the next byte lands at `total % SEG_LEN`.
    scratch: Vec<u8>,
    /// Per-segment completion slots, in dispatch order.
    leaves: Vec<Receiver<Result<LeafCommitment, HashError>>>,
    pool: BufferPool,
}

impl Default for PieceCommitter {
    fn default() -> Self {
        Self::new()
    }
}

impl PieceCommitter {
    /// Committer with the default concurrency limit: available CPU
    /// parallelism, or 1 if that cannot be determined.
    #[must_use]
    pub fn new() -> Self {
        Self::with_concurrency(thread::available_parallelism().unwrap_or(NonZeroUsize::MIN))
    }

    /// Committer with an explicit limit on concurrent segment hashers.
    ///
    /// The pool of `limit` private segment buffers is allocated here, up
    /// front, so the first `write` pays no hidden setup cost.
    #[must_use]
    pub fn with_concurrency(limit: NonZeroUsize) -> Self {
        Self {
            total: 0,
            scratch: vec![0u8; SEG_LEN],
            leaves: Vec::new(),
            pool: BufferPool::new(limit, SEG_LEN),
        }
    }

    /// Total raw bytes written so far.
    #[inline]
    #[must_use]
    pub const fn bytes_written(&self) -> u64 {
        self.total
    }

    /// Hand the filled scratch buffer to a worker thread.
    ///
    /// Blocks while all private buffers are checked out; this is the only
    /// suspension point on the write path.
    fn dispatch_segment(&mut self) {
        let mut private = self.pool.acquire();
        private.copy_from_slice(&self.scratch);

        let (tx, rx) = sync_channel(1);
        thread::spawn(move || {
            let outcome = commit_leaf(&private);
            // The committer may already be gone; the buffer still returns to
            // the pool when `private` drops.
            let _ = tx.send(outcome);
        });
        self.leaves.push(rx);
    }

    /// Consume all pending state and produce the final commitment.
    ///
    /// Results are drained strictly in segment order; the first failed
    /// segment aborts finalization and later slots are not inspected.
    pub fn finalize(mut self) -> Result<PieceCommitment, CommitError> {
        let payload_size = self.total;
        let last_len = (self.total % SEGMENT_UNPADDED.0) as usize;

        let mut leaves = Vec::with_capacity(self.leaves.len() + 1);
        for (index, slot) in self.leaves.drain(..).enumerate() {
            match slot.recv() {
                Ok(Ok(leaf)) => leaves.push(leaf.cid),
                Ok(Err(source)) => return Err(CommitError::Leaf { index, source }),
                Err(_) => return Err(CommitError::LeafLost { index }),
            }
        }

        // Trailing segment: a partial fill, or the empty-input case (zero
        // bytes written, zero leaves) which deliberately takes the same
        // sub-segment collapse path instead of any leaf-count arithmetic.
        if last_len != 0 || leaves.is_empty() {
            let index = leaves.len();
            let bytes: &[u8] = if leaves.is_empty() {
                // No full leaves to stay uniform with; hash the bytes as-is.
                &self.scratch[..last_len]
            } else {
                // Zero-fill so every tree leaf is a uniform segment.
                self.scratch[last_len..].fill(0);
                &self.scratch
            };
            let leaf = commit_leaf(bytes).map_err(|source| CommitError::Leaf { index, source })?;

            if leaf.padded < SEGMENT_PADDED {
                // The whole input fits below one segment: its leaf is the
                // piece, at the primitive's reported sub-segment class.
                return Ok(PieceCommitment {
                    payload_size,
                    piece_size: leaf.padded,
                    piece_cid: leaf.cid,
                });
            }
            leaves.push(leaf.cid);
        }

        // Pad the leaf list to a power of two with zero-segment fillers.
        let target = leaves.len().next_power_of_two();
        if target > leaves.len() {
            let filler = zero_piece_commitment(SEGMENT_UNPADDED)?;
            leaves.resize(target, filler);
        }

        let piece_size = PaddedPieceSize(leaves.len() as u64 * SEGMENT_PADDED.0);
        if leaves.len() == 1 {
            return Ok(PieceCommitment {
                payload_size,
                piece_size,
                piece_cid: leaves[0],
            });
        }

        let pieces: Vec<PieceInfo> = leaves
            .into_iter()
            .map(|cid| PieceInfo {
                size: SEGMENT_PADDED,
                cid,
            })
            .collect();
        let piece_cid = piece_tree_root(PieceTreeScheme::default(), &pieces)?;

        Ok(PieceCommitment {
            payload_size,
            piece_size,
            piece_cid,
        })
    }
}

impl io::Write for PieceCommitter {
    /// Accept the whole chunk, dispatching a segment on every exact fill.
    /// Never fails; blocks only while waiting for a free private buffer.
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        let mut rest = buf;
        while !rest.is_empty() {
            let buffered = (self.total % SEGMENT_UNPADDED.0) as usize;
            let take = rest.len().min(SEG_LEN - buffered);

            self.scratch[buffered..buffered + take].copy_from_slice(&rest[..take]);
            rest = &rest[take..];
            self.total += take as u64;

            if self.total % SEGMENT_UNPADDED.0 == 0 {
                self.dispatch_segment();
            }
        }
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn write_accepts_whole_chunks() {
        let mut c = PieceCommitter::with_concurrency(NonZeroUsize::MIN);
        assert_eq!(c.write(b"abc").unwrap(), 3);
        assert_eq!(c.write(&[]).unwrap(), 0);
        assert_eq!(c.write(b"defg").unwrap(), 4);
        assert_eq!(c.bytes_written(), 7);
    }

    #[test]
    fn empty_stream_is_the_minimal_zero_piece() {
        let c = PieceCommitter::new();
        let out = c.finalize().unwrap();
        assert_eq!(out.payload_size, 0);
        assert_eq!(out.piece_size, PaddedPieceSize(128));
        assert_eq!(
            out.piece_cid,
            zero_piece_commitment(UnpaddedPieceSize(127)).unwrap()
        );
    }

    #[test]
    fn sub_segment_input_matches_primitive_directly() {
        let data = b"tiny payload, well under one segment";
        let mut c = PieceCommitter::new();
        c.write_all(data).unwrap();
        let out = c.finalize().unwrap();

        let (digest, padded) = leaf_commitment(data).unwrap();
        assert_eq!(out.payload_size, data.len() as u64);
        assert_eq!(out.piece_size, padded);
        assert_eq!(out.piece_cid, PieceCid::from_digest(digest));
    }
}
