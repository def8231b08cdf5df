//! Configuration structs for the recorder and encoder setup.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use crate::types::Resolution;

/// Default number of pixel buffers the encoding session's pool maintains.
pub const DEFAULT_POOL_CAPACITY: usize = 4;

/// User-facing recorder configuration.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct RecorderConfig {
    /// Target output file. A recording started without one never opens a
    /// file and terminates as cancelled.
    pub output_path: Option<PathBuf>,
    /// Target capture rate. Mutable while recording; the tick interval is
    /// re-derived, the encoder timebase is not.
    pub frames_per_second: u32,
    /// Pixel buffers the encoding session's pool may allocate. Bounds how
    /// many frames can be in flight toward the sink at once.
    pub pool_capacity: usize,
}

impl Default for RecorderConfig {
    fn default() -> Self {
        Self {
            output_path: None,
            frames_per_second: 30,
            pool_capacity: DEFAULT_POOL_CAPACITY,
        }
    }
}

/// Parameters handed to a [`crate::traits::VideoSinkFactory`] when the
/// encoding session lazily opens its sink.
#[derive(Clone, Debug)]
pub struct EncoderSetup {
    pub output_path: PathBuf,
    pub resolution: Resolution,
    pub frames_per_second: u32,
    /// Pixel buffers the pool may allocate (ring depth).
    pub pool_capacity: usize,
}

impl EncoderSetup {
    pub fn new(output_path: PathBuf, resolution: Resolution, frames_per_second: u32) -> Self {
        Self {
            output_path,
            resolution,
            frames_per_second,
            pool_capacity: DEFAULT_POOL_CAPACITY,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_has_no_output() {
        let config = RecorderConfig::default();
        assert!(config.output_path.is_none());
        assert_eq!(config.frames_per_second, 30);
        assert_eq!(config.pool_capacity, DEFAULT_POOL_CAPACITY);
    }

    #[test]
    fn setup_uses_default_pool_capacity() {
        let setup = EncoderSetup::new("out.mp4".into(), Resolution::new(640, 480), 30);
        assert_eq!(setup.pool_capacity, DEFAULT_POOL_CAPACITY);
    }
}
