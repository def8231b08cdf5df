//! Raw surface snapshots -- output of the rasterizer, input to the encoder.

use crate::types::Resolution;

/// Pixel memory layout of a raw image, 4 bytes per pixel.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum PixelFormat {
    Rgba8,
    Bgra8,
}

impl PixelFormat {
    pub const fn bytes_per_pixel(self) -> usize {
        4
    }
}

/// An in-memory bitmap snapshot of a surface at one instant.
///
/// Once handed to the encoding session the image is read-only; nothing
/// mutates it after handoff.
#[derive(Clone, Debug)]
pub struct RawImage {
    resolution: Resolution,
    format: PixelFormat,
    data: Vec<u8>,
}

impl RawImage {
    /// Wrap tightly-packed pixel data (no row padding).
    ///
    /// # Panics
    ///
    /// Panics if `data.len()` does not match `resolution`.
    pub fn new(resolution: Resolution, format: PixelFormat, data: Vec<u8>) -> Self {
        assert_eq!(
            data.len(),
            resolution.rgba_byte_size(),
            "RawImage data length must match resolution"
        );
        Self {
            resolution,
            format,
            data,
        }
    }

    /// A single-color image, useful for sources that render flat fills.
    pub fn solid(resolution: Resolution, format: PixelFormat, pixel: [u8; 4]) -> Self {
        let mut data = vec![0u8; resolution.rgba_byte_size()];
        for chunk in data.chunks_exact_mut(4) {
            chunk.copy_from_slice(&pixel);
        }
        Self {
            resolution,
            format,
            data,
        }
    }

    pub fn resolution(&self) -> Resolution {
        self.resolution
    }

    pub fn format(&self) -> PixelFormat {
        self.format
    }

    /// Row stride in bytes (rows are tightly packed).
    pub fn stride(&self) -> usize {
        self.resolution.width as usize * self.format.bytes_per_pixel()
    }

    /// One row of pixel data.
    ///
    /// # Panics
    ///
    /// Panics if `y` is out of bounds.
    pub fn row(&self, y: u32) -> &[u8] {
        let stride = self.stride();
        let start = y as usize * stride;
        &self.data[start..start + stride]
    }

    pub fn data(&self) -> &[u8] {
        &self.data
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn solid_image_fills_every_pixel() {
        let img = RawImage::solid(Resolution::new(4, 2), PixelFormat::Rgba8, [1, 2, 3, 255]);
        assert_eq!(img.data().len(), 4 * 2 * 4);
        for chunk in img.data().chunks_exact(4) {
            assert_eq!(chunk, [1, 2, 3, 255]);
        }
    }

    #[test]
    fn row_access() {
        let res = Resolution::new(2, 2);
        let data = vec![
            10, 10, 10, 10, 20, 20, 20, 20, // row 0
            30, 30, 30, 30, 40, 40, 40, 40, // row 1
        ];
        let img = RawImage::new(res, PixelFormat::Bgra8, data);
        assert_eq!(img.row(0), &[10, 10, 10, 10, 20, 20, 20, 20]);
        assert_eq!(img.row(1), &[30, 30, 30, 30, 40, 40, 40, 40]);
    }

    #[test]
    #[should_panic(expected = "RawImage data length must match resolution")]
    fn mismatched_length_panics() {
        let _ = RawImage::new(Resolution::new(2, 2), PixelFormat::Rgba8, vec![0u8; 3]);
    }
}
