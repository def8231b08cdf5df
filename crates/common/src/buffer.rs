//! Encoder-compatible pixel memory.
//!
//! A `PixelBuffer` holds one frame's worth of pixels in the layout the
//! sink expects. Direct memory access goes through [`PixelBuffer::lock`],
//! which returns an RAII guard; the buffer is locked only while the guard
//! lives and is unlocked on every exit path, including early returns from
//! a failed draw.

use crate::types::Resolution;

/// A pooled, encoder-compatible memory buffer holding one frame's pixels.
///
/// Rows may carry padding: `stride >= width * 4`.
#[derive(Debug)]
pub struct PixelBuffer {
    resolution: Resolution,
    stride: usize,
    data: Vec<u8>,
    locked: bool,
}

impl PixelBuffer {
    pub fn new(resolution: Resolution, stride: usize) -> Self {
        assert!(
            stride >= resolution.width as usize * 4,
            "stride must cover one row of pixels"
        );
        let data = vec![0u8; stride * resolution.height as usize];
        Self {
            resolution,
            stride,
            data,
            locked: false,
        }
    }

    /// The buffer's declared pixel dimensions. Draws must never exceed them.
    pub fn resolution(&self) -> Resolution {
        self.resolution
    }

    pub fn stride(&self) -> usize {
        self.stride
    }

    pub fn is_locked(&self) -> bool {
        self.locked
    }

    /// Lock the buffer for direct memory access.
    pub fn lock(&mut self) -> LockedPixels<'_> {
        self.locked = true;
        LockedPixels { buffer: self }
    }

    /// Read-only view of the full backing store (rows include padding).
    pub fn bytes(&self) -> &[u8] {
        &self.data
    }
}

/// RAII lock over a [`PixelBuffer`]'s memory. Unlocks on drop.
#[derive(Debug)]
pub struct LockedPixels<'a> {
    buffer: &'a mut PixelBuffer,
}

impl LockedPixels<'_> {
    /// Fill every pixel with a single value. `[0, 0, 0, 255]` clears to
    /// opaque black.
    pub fn fill(&mut self, pixel: [u8; 4]) {
        let width = self.buffer.resolution.width as usize;
        let stride = self.buffer.stride;
        for row in self.buffer.data.chunks_exact_mut(stride) {
            for px in row[..width * 4].chunks_exact_mut(4) {
                px.copy_from_slice(&pixel);
            }
        }
    }

    /// Mutable access to the pixel portion of one row (padding excluded).
    ///
    /// # Panics
    ///
    /// Panics if `y` is out of bounds.
    pub fn row_mut(&mut self, y: u32) -> &mut [u8] {
        assert!(y < self.buffer.resolution.height, "row out of bounds");
        let width = self.buffer.resolution.width as usize;
        let start = y as usize * self.buffer.stride;
        &mut self.buffer.data[start..start + width * 4]
    }
}

impl Drop for LockedPixels<'_> {
    fn drop(&mut self) {
        self.buffer.locked = false;
    }
}
