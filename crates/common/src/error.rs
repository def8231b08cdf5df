//! Central error types for the engine (thiserror-based).

use thiserror::Error;

/// Terminal and session-level recording errors.
///
/// Per-frame problems (rasterization failure, pool exhaustion, a sink that
/// is not ready) are policy-level drops and never surface here.
#[derive(Error, Debug)]
pub enum RecordError {
    /// Finalization completed but no output file exists -- typically stop
    /// was called before any frame was admitted.
    #[error("recording cancelled: no output file was produced")]
    Cancelled,

    /// No output path was ever configured on the session.
    #[error("no output path configured")]
    NoOutputFile,

    /// `start` was called while a recording is already active.
    #[error("a recording is already in progress")]
    AlreadyRecording,

    /// A worker thread or timer could not be set up.
    #[error("recorder initialization failed: {0}")]
    InitFailed(String),

    #[error("sink error: {0}")]
    Sink(#[from] SinkError),
}

/// Errors reported by the opaque platform sink.
#[derive(Error, Debug)]
pub enum SinkError {
    #[error("sink creation failed: {0}")]
    CreateFailed(String),

    #[error("frame submission failed at frame {frame}: {reason}")]
    SubmitFailed { frame: u64, reason: String },

    #[error("finalization failed: {0}")]
    FinalizeFailed(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Convenience Result type for recorder operations.
pub type RecordResult<T> = Result<T, RecordError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cancelled_display() {
        let err = RecordError::Cancelled;
        assert!(err.to_string().contains("no output file"));
    }

    #[test]
    fn submit_failed_display() {
        let err = SinkError::SubmitFailed {
            frame: 42,
            reason: "encoder stalled".to_string(),
        };
        let msg = err.to_string();
        assert!(msg.contains("42"));
        assert!(msg.contains("encoder stalled"));
    }

    #[test]
    fn record_error_from_sink() {
        let io = std::io::Error::new(std::io::ErrorKind::NotFound, "missing dir");
        let err = RecordError::from(SinkError::from(io));
        assert!(err.to_string().contains("missing dir"));
    }
}
