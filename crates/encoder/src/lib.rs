//! `vt-encoder` -- Video encoding session management.
//!
//! Owns everything between a raw surface snapshot and the opaque platform
//! sink: the pooled pixel-buffer allocator, encoder admission control,
//! presentation-time bookkeeping, and the write/finish state machine.
//!
//! # Architecture
//!
//! - [`session`] -- `EncodingSession`: a handle over one serial encode
//!   worker per recording run
//! - [`pool`] -- `PixelBufferPool`: bounded allocator whose buffers return
//!   on drop
//! - [`align`] -- the macroblock alignment policy applied to oversized
//!   source images
//!
//! # Write Pipeline
//!
//! ```text
//! RawImage (from the rasterizer)
//!   --> serial worker queue
//!     --> lazy sink setup (needs output path + non-zero size)
//!       --> admission check (sink ready?)
//!         --> acquire PixelBuffer from pool
//!           --> clear black, draw clamped source
//!             --> submit at frame_counter / fps
//! ```
//!
//! Every step that cannot proceed drops the frame and moves on; drops are
//! logged, never surfaced as errors.

pub mod align;
pub mod pool;
pub mod session;

pub use align::{block_aligned, draw_extent, MACROBLOCK};
pub use pool::{PixelBufferPool, PoolStats, PooledBuffer};
pub use session::{EncodingSession, FinishOutcome, SessionStats};
