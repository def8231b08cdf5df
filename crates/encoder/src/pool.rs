//! Pixel Buffer Pool -- bounded allocator for encoder-compatible buffers.
//!
//! The pool lazily allocates up to its capacity; released buffers are
//! reused rather than freed. `acquire` never blocks: when every buffer is
//! in flight it returns `None` and the caller drops the frame, which is
//! the intended backpressure behavior under encoder stall.
//!
//! The pool's lifetime is bound to the encoder input it serves -- the
//! encoding session creates them together and releases them together
//! after finalization.

use std::sync::Arc;

use parking_lot::Mutex;

use vt_common::{PixelBuffer, Resolution};

/// Statistics about the current state of the pool.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PoolStats {
    /// Number of buffers currently lent out.
    pub in_use: usize,
    /// Number of buffers immediately acquirable (free + never allocated).
    pub available: usize,
    /// Hard maximum number of buffers the pool will maintain.
    pub capacity: usize,
}

struct PoolState {
    free: Vec<PixelBuffer>,
    allocated: usize,
}

struct PoolInner {
    resolution: Resolution,
    capacity: usize,
    state: Mutex<PoolState>,
}

/// Manages a bounded pool of [`PixelBuffer`]s of one fixed resolution.
pub struct PixelBufferPool {
    inner: Arc<PoolInner>,
}

impl PixelBufferPool {
    /// Create a new pool. Buffers are allocated on first acquire, not up
    /// front.
    ///
    /// # Panics
    ///
    /// Panics if `capacity` is zero.
    pub fn new(resolution: Resolution, capacity: usize) -> Self {
        assert!(capacity > 0, "pool capacity must be > 0");
        Self {
            inner: Arc::new(PoolInner {
                resolution,
                capacity,
                state: Mutex::new(PoolState {
                    free: Vec::new(),
                    allocated: 0,
                }),
            }),
        }
    }

    /// Acquire a buffer, or `None` when all buffers are in flight.
    pub fn acquire(&self) -> Option<PooledBuffer> {
        let mut state = self.inner.state.lock();
        let buffer = if let Some(existing) = state.free.pop() {
            existing
        } else if state.allocated < self.inner.capacity {
            state.allocated += 1;
            let stride = self.inner.resolution.width as usize * 4;
            PixelBuffer::new(self.inner.resolution, stride)
        } else {
            return None;
        };
        drop(state);

        Some(PooledBuffer {
            buffer: Some(buffer),
            pool: Arc::clone(&self.inner),
        })
    }

    /// Resolution of every buffer this pool hands out.
    pub fn resolution(&self) -> Resolution {
        self.inner.resolution
    }

    /// Return current pool statistics.
    pub fn stats(&self) -> PoolStats {
        let state = self.inner.state.lock();
        let in_use = state.allocated - state.free.len();
        PoolStats {
            in_use,
            available: self.inner.capacity - in_use,
            capacity: self.inner.capacity,
        }
    }
}

impl std::fmt::Debug for PixelBufferPool {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let stats = self.stats();
        f.debug_struct("PixelBufferPool")
            .field("resolution", &self.inner.resolution)
            .field("in_use", &stats.in_use)
            .field("capacity", &stats.capacity)
            .finish()
    }
}

/// A buffer on loan from a [`PixelBufferPool`]; returns on drop.
pub struct PooledBuffer {
    buffer: Option<PixelBuffer>,
    pool: Arc<PoolInner>,
}

impl std::ops::Deref for PooledBuffer {
    type Target = PixelBuffer;
    fn deref(&self) -> &PixelBuffer {
        self.buffer.as_ref().expect("buffer present until drop")
    }
}

impl std::ops::DerefMut for PooledBuffer {
    fn deref_mut(&mut self) -> &mut PixelBuffer {
        self.buffer.as_mut().expect("buffer present until drop")
    }
}

impl Drop for PooledBuffer {
    fn drop(&mut self) {
        if let Some(buffer) = self.buffer.take() {
            self.pool.state.lock().free.push(buffer);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // ── Construction ─────────────────────────────────────────────

    #[test]
    fn new_pool_is_empty() {
        let pool = PixelBufferPool::new(Resolution::new(64, 64), 4);
        let stats = pool.stats();
        assert_eq!(stats.in_use, 0);
        assert_eq!(stats.available, 4);
        assert_eq!(stats.capacity, 4);
    }

    #[test]
    #[should_panic(expected = "pool capacity must be > 0")]
    fn zero_capacity_panics() {
        let _ = PixelBufferPool::new(Resolution::new(64, 64), 0);
    }

    // ── Acquire / release ────────────────────────────────────────

    #[test]
    fn acquire_hands_out_correctly_sized_buffers() {
        let res = Resolution::new(32, 16);
        let pool = PixelBufferPool::new(res, 2);
        let buf = pool.acquire().unwrap();
        assert_eq!(buf.resolution(), res);
        assert_eq!(buf.stride(), 32 * 4);
    }

    #[test]
    fn exhausted_pool_returns_none() {
        let pool = PixelBufferPool::new(Resolution::new(8, 8), 2);
        let _a = pool.acquire().unwrap();
        let _b = pool.acquire().unwrap();
        assert!(pool.acquire().is_none());
    }

    #[test]
    fn dropped_buffers_become_acquirable_again() {
        let pool = PixelBufferPool::new(Resolution::new(8, 8), 1);
        let a = pool.acquire().unwrap();
        assert!(pool.acquire().is_none());

        drop(a);
        assert!(pool.acquire().is_some());
    }

    #[test]
    fn stats_track_in_flight_buffers() {
        let pool = PixelBufferPool::new(Resolution::new(8, 8), 3);
        let a = pool.acquire().unwrap();
        let b = pool.acquire().unwrap();
        assert_eq!(
            pool.stats(),
            PoolStats {
                in_use: 2,
                available: 1,
                capacity: 3,
            }
        );

        drop(a);
        drop(b);
        assert_eq!(pool.stats().in_use, 0);
        assert_eq!(pool.stats().available, 3);
    }

    #[test]
    fn released_buffers_are_reused_not_reallocated() {
        let pool = PixelBufferPool::new(Resolution::new(8, 8), 1);
        {
            let mut buf = pool.acquire().unwrap();
            buf.lock().fill([5, 5, 5, 5]);
        }
        // The recycled buffer keeps its previous contents; callers clear
        // before drawing.
        let buf = pool.acquire().unwrap();
        assert_eq!(&buf.bytes()[..4], &[5, 5, 5, 5]);
    }
}
