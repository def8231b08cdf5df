//! Progress reporting.
//!
//! The recorded surface cannot report meaningful completion on its own, so
//! the fraction handed to progress callbacks is a policy choice. The default
//! reproduces the constant placeholder; callers that know their own notion
//! of progress supply a function of elapsed recording time.

use std::fmt;
use std::sync::Arc;
use std::time::Duration;

/// One tick's progress report.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Progress {
    /// Policy-derived completion fraction. The default policy always
    /// reports `0.0`.
    pub fraction: f64,
    /// Frames rasterized and enqueued for encoding so far this run.
    pub frames_produced: u64,
    /// Wall-clock time since the run started.
    pub elapsed: Duration,
}

/// What completion fraction each tick's progress report carries.
#[derive(Clone, Default)]
pub enum ProgressPolicy {
    /// Always report `0.0`.
    #[default]
    Placeholder,
    /// Report the result of a caller-supplied function of elapsed time.
    Custom(Arc<dyn Fn(Duration) -> f64 + Send + Sync>),
}

impl ProgressPolicy {
    /// Wrap a caller-supplied progress function.
    pub fn custom(f: impl Fn(Duration) -> f64 + Send + Sync + 'static) -> Self {
        Self::Custom(Arc::new(f))
    }

    pub fn fraction(&self, elapsed: Duration) -> f64 {
        match self {
            Self::Placeholder => 0.0,
            Self::Custom(f) => f(elapsed),
        }
    }
}

impl fmt::Debug for ProgressPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Placeholder => f.write_str("ProgressPolicy::Placeholder"),
            Self::Custom(_) => f.write_str("ProgressPolicy::Custom"),
        }
    }
}
