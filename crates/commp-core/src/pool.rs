//! Checkout/return pool of private segment buffers.
//!
//! A fixed set of equally sized buffers circulates through an mpsc channel,
//! acting as a counting semaphore: `acquire` blocks while all buffers are
//! checked out, which is the engine's only source of backpressure. The
//! checked-out buffer travels into the worker thread and returns to the pool
//! on every exit path via its drop guard.

use std::num::NonZeroUsize;
use std::ops::{Deref, DerefMut};
use std::sync::mpsc::{channel, Receiver, Sender};

pub(crate) struct BufferPool {
    slots: Receiver<Vec<u8>>,
    ret: Sender<Vec<u8>>,
}

impl BufferPool {
    /// Allocate `capacity` buffers of `buf_len` bytes up front.
    pub(crate) fn new(capacity: NonZeroUsize, buf_len: usize) -> Self {
        let (ret, slots) = channel();
        for _ in 0..capacity.get() {
            // Receiver is held by `slots`, so send cannot fail here.
            let _ = ret.send(vec![0u8; buf_len]);
        }
        Self { slots, ret }
    }

    /// Block until a private buffer is free and check it out.
    pub(crate) fn acquire(&self) -> PoolBuffer {
        // The pool keeps one Sender alive for its whole lifetime, so the
        // channel cannot be observed closed from here.
        let buf = self
            .slots
            .recv()
            .expect("buffer pool return channel closed");
        PoolBuffer {
            buf: Some(buf),
            ret: self.ret.clone(),
        }
    }
}

/// An exclusively owned segment buffer, returned to its pool on drop.
pub(crate) struct PoolBuffer {
    buf: Option<Vec<u8>>,
    ret: Sender<Vec<u8>>,
}

impl Deref for PoolBuffer {
    type Target = [u8];

    fn deref(&self) -> &[u8] {
        self.buf.as_deref().unwrap_or(&[])
    }
}

impl DerefMut for PoolBuffer {
    fn deref_mut(&mut self) -> &mut [u8] {
        self.buf.as_deref_mut().unwrap_or(&mut [])
    }
}

impl Drop for PoolBuffer {
    fn drop(&mut self) {
        if let Some(buf) = self.buf.take() {
            // If the pool itself is gone the buffer is simply freed.
            let _ = self.ret.send(buf);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn buffers_recirculate() {
        let pool = BufferPool::new(NonZeroUsize::new(1).unwrap(), 8);
        {
            let mut b = pool.acquire();
            b[0] = 42;
        }
        // Would deadlock here if the guard failed to return the buffer.
        let b = pool.acquire();
        assert_eq!(b.len(), 8);
        assert_eq!(b[0], 42);
    }

    #[test]
    fn capacity_buffers_available_without_blocking() {
        let pool = BufferPool::new(NonZeroUsize::new(3).unwrap(), 4);
        let a = pool.acquire();
        let b = pool.acquire();
        let c = pool.acquire();
        assert_eq!((a.len(), b.len(), c.len()), (4, 4, 4));
    }

    #[test]
    fn guard_returns_across_threads() {
        let pool = BufferPool::new(NonZeroUsize::new(1).unwrap(), 4);
        let buf = pool.acquire();
        let handle = std::thread::spawn(move || drop(buf));
        handle.join().unwrap();
        let _again = pool.acquire();
    }
}
