//! Core types with newtype pattern for type safety.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Pixel dimensions of a surface, image, or buffer.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Resolution {
    pub width: u32,
    pub height: u32,
}

impl Resolution {
    pub const ZERO: Self = Self {
        width: 0,
        height: 0,
    };

    pub fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }

    /// A zero-area resolution is the defined invalid state in which no
    /// encoder is ever created.
    pub fn is_zero(self) -> bool {
        self.width == 0 || self.height == 0
    }

    pub fn pixel_count(self) -> u64 {
        self.width as u64 * self.height as u64
    }

    /// Byte size for 4-bytes-per-pixel (RGBA/BGRA) pixel data.
    pub fn rgba_byte_size(self) -> usize {
        self.width as usize * self.height as usize * 4
    }
}

impl fmt::Display for Resolution {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}x{}", self.width, self.height)
    }
}

/// A presentation timestamp in an encoder's declared timebase.
///
/// `value / timescale` seconds. A frame counter paired with the session
/// frame rate as the timescale expresses `n / fps` exactly, without
/// floating-point drift across long recordings.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct MediaTime {
    /// Numerator: elapsed ticks in the timebase.
    pub value: i64,
    /// Ticks per second.
    pub timescale: u32,
}

impl MediaTime {
    pub const ZERO: Self = Self {
        value: 0,
        timescale: 1,
    };

    /// # Panics
    ///
    /// Panics if `timescale` is zero.
    pub fn new(value: i64, timescale: u32) -> Self {
        assert!(timescale > 0, "MediaTime timescale must be > 0");
        Self { value, timescale }
    }

    pub fn as_secs(self) -> f64 {
        self.value as f64 / self.timescale as f64
    }
}

impl PartialOrd for MediaTime {
    fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for MediaTime {
    fn cmp(&self, other: &Self) -> std::cmp::Ordering {
        // Cross-multiply to compare without division.
        let lhs = self.value as i128 * other.timescale as i128;
        let rhs = other.value as i128 * self.timescale as i128;
        lhs.cmp(&rhs)
    }
}

impl fmt::Display for MediaTime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.value, self.timescale)
    }
}
