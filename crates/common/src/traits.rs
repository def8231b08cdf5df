//! Boundary traits between the engine and the host platform.
//!
//! The recorder programs against these traits, not against a concrete UI
//! layer or media framework. The host supplies a [`RasterSource`] (the
//! surface being recorded) and a [`VideoSinkFactory`] (the capability to
//! open a single-video-track container at a path).

use crate::buffer::PixelBuffer;
use crate::config::EncoderSetup;
use crate::error::SinkError;
use crate::image::RawImage;
use crate::types::{MediaTime, Resolution};

/// A live visual surface that can be rasterized into a snapshot.
pub trait RasterSource: Send + Sync {
    /// Current bounds of the surface. Sampled once at recording start to
    /// derive the encoder's output size.
    fn bounds(&self) -> Resolution;

    /// Rasterize the surface into a raw image at this instant.
    ///
    /// Returns `None` when the surface is no longer available (torn down
    /// mid-recording); the caller treats that tick as a no-op.
    fn rasterize(&self) -> Option<RawImage>;
}

/// An open, admission-controlled single-video-track output -- the opaque
/// platform encoder/muxer capability.
///
/// All calls are made from one serial worker; implementations never see
/// concurrent access.
pub trait VideoSink: Send {
    /// Whether the sink can accept another frame right now. `false` is the
    /// backpressure signal: the caller drops the frame rather than queue it.
    fn is_ready_for_frame(&self) -> bool;

    /// Submit one frame at the given presentation time. Timestamps arrive
    /// strictly increasing.
    fn submit(&mut self, frame: &PixelBuffer, pts: MediaTime) -> Result<(), SinkError>;

    /// Mark the input as finished; no further submissions will follow.
    fn mark_finished(&mut self);

    /// Flush buffered state and close the container so the output file
    /// becomes valid. Consumes the sink; returning `Ok` confirms
    /// finalization.
    fn finalize(self: Box<Self>) -> Result<(), SinkError>;
}

/// Capability to create a [`VideoSink`] for a given output path, pixel
/// dimensions, and frame rate.
pub trait VideoSinkFactory: Send + Sync {
    fn create(&self, setup: &EncoderSetup) -> Result<Box<dyn VideoSink>, SinkError>;
}
