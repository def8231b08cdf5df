//! `vt-common` -- Shared types, traits, and errors for the ViewTape engine.
//!
//! This crate is the foundation that the other engine crates depend on.
//! It defines the core abstractions:
//!
//! - **Types**: `Resolution`, `MediaTime` (newtypes for safety)
//! - **Images**: `RawImage`, `PixelFormat` (surface snapshots)
//! - **Buffers**: `PixelBuffer`, `LockedPixels` (encoder-compatible memory)
//! - **Boundary traits**: `RasterSource`, `VideoSink`, `VideoSinkFactory`
//! - **Errors**: `RecordError`, `SinkError` (thiserror-based)
//! - **Config**: `RecorderConfig`, `EncoderSetup`

pub mod buffer;
pub mod config;
pub mod error;
pub mod image;
pub mod traits;
pub mod types;

// Re-export commonly used items at crate root
pub use buffer::{LockedPixels, PixelBuffer};
pub use config::{EncoderSetup, RecorderConfig, DEFAULT_POOL_CAPACITY};
pub use error::{RecordError, RecordResult, SinkError};
pub use image::{PixelFormat, RawImage};
pub use traits::{RasterSource, VideoSink, VideoSinkFactory};
pub use types::{MediaTime, Resolution};
