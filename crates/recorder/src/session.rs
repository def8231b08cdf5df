//! User-facing recording session.
//!
//! `RecordingSession` owns the lifecycle: `start` wires a fresh
//! [`EncodingSession`] to a [`FrameScheduler`], `stop` cancels the timer
//! and drives finalization. Each start/stop cycle delivers exactly one
//! terminal result callback; a session can be started again afterwards
//! with a completely fresh encoder.

use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::Arc;
use std::time::SystemTime;

use parking_lot::Mutex;
use tracing::{info, warn};

use vt_common::{RasterSource, RecordError, RecordResult, RecorderConfig, VideoSinkFactory};
use vt_encoder::{EncodingSession, SessionStats};

use crate::executor::CallbackExecutor;
use crate::progress::{Progress, ProgressPolicy};
use crate::scheduler::{FrameScheduler, SchedulerParams};

/// Invoked once per tick with that tick's [`Progress`] report.
pub type ProgressFn = Box<dyn FnMut(Progress) + Send>;

/// Invoked exactly once per start/stop cycle with the terminal result.
pub type ResultFn = Box<dyn FnOnce(RecordResult<RecordingOutput>) + Send>;

/// The successful terminal state of a recording run.
#[derive(Debug)]
pub struct RecordingOutput {
    /// Location of the finalized video file.
    pub output_path: PathBuf,
    pub stats: SessionStats,
}

/// Callbacks observed by the caller for one recording run.
#[derive(Default)]
pub struct RecordingCallbacks {
    pub on_progress: Option<ProgressFn>,
    pub on_result: Option<ResultFn>,
}

impl RecordingCallbacks {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn on_progress(mut self, f: impl FnMut(Progress) + Send + 'static) -> Self {
        self.on_progress = Some(Box::new(f));
        self
    }

    pub fn on_result(
        mut self,
        f: impl FnOnce(RecordResult<RecordingOutput>) + Send + 'static,
    ) -> Self {
        self.on_result = Some(Box::new(f));
        self
    }
}

struct ActiveRecording {
    scheduler: FrameScheduler,
    encoding: EncodingSession,
    fps_live: Arc<AtomicU32>,
    on_result: Option<ResultFn>,
}

/// Records one rectangular surface into a single video file.
///
/// At most one timer and one encoding session are active at a time; a
/// re-entrant `start` is rejected with
/// [`RecordError::AlreadyRecording`].
pub struct RecordingSession {
    factory: Arc<dyn VideoSinkFactory>,
    output_path: Option<PathBuf>,
    frames_per_second: u32,
    pool_capacity: usize,
    progress_policy: ProgressPolicy,
    executor: CallbackExecutor,
    active: Option<ActiveRecording>,
    started_at: Option<SystemTime>,
}

impl RecordingSession {
    pub fn new(factory: Arc<dyn VideoSinkFactory>, config: RecorderConfig) -> RecordResult<Self> {
        Ok(Self {
            factory,
            output_path: config.output_path,
            frames_per_second: config.frames_per_second,
            pool_capacity: config.pool_capacity,
            progress_policy: ProgressPolicy::default(),
            executor: CallbackExecutor::new()?,
            active: None,
            started_at: None,
        })
    }

    pub fn output_path(&self) -> Option<&Path> {
        self.output_path.as_deref()
    }

    /// Set the target output file. Takes effect on the next `start`.
    pub fn set_output_path(&mut self, path: Option<PathBuf>) {
        self.output_path = path;
    }

    pub fn frames_per_second(&self) -> u32 {
        self.frames_per_second
    }

    /// Set the target frame rate. While a recording is active this
    /// re-derives the tick interval on the fly; the active encoder's
    /// timebase keeps the rate it was set up with.
    pub fn set_frames_per_second(&mut self, frames_per_second: u32) {
        self.frames_per_second = frames_per_second;
        if let Some(active) = &self.active {
            active.fps_live.store(frames_per_second, Ordering::Relaxed);
        }
    }

    pub fn set_progress_policy(&mut self, policy: ProgressPolicy) {
        self.progress_policy = policy;
    }

    pub fn is_recording(&self) -> bool {
        self.active.is_some()
    }

    /// Wall-clock instant the current (or most recent) run started.
    pub fn started_at(&self) -> Option<SystemTime> {
        self.started_at
    }

    /// Begin recording the given surface.
    ///
    /// The session holds the surface weakly; if it goes away mid-recording,
    /// ticks become no-ops without failing the run. The encoder output size
    /// is derived once, here, from the surface's current bounds.
    pub fn start(
        &mut self,
        surface: &Arc<dyn RasterSource>,
        callbacks: RecordingCallbacks,
    ) -> RecordResult<()> {
        if self.active.is_some() {
            return Err(RecordError::AlreadyRecording);
        }
        if self.frames_per_second == 0 {
            return Err(RecordError::InitFailed(
                "frames_per_second must be > 0".to_string(),
            ));
        }
        if self.output_path.is_none() {
            warn!(
                error = %RecordError::NoOutputFile,
                "recording will produce no file"
            );
        }

        self.started_at = Some(SystemTime::now());
        let resolution = surface.bounds();

        let encoding = EncodingSession::new(
            Arc::clone(&self.factory),
            self.output_path.clone(),
            resolution,
            self.frames_per_second,
            self.pool_capacity,
        )?;

        let fps_live = Arc::new(AtomicU32::new(self.frames_per_second));
        let on_progress = callbacks.on_progress.map(|f| Arc::new(Mutex::new(f)));

        let scheduler = FrameScheduler::start(SchedulerParams {
            surface: Arc::downgrade(surface),
            encoding: encoding.clone(),
            fps_live: Arc::clone(&fps_live),
            executor: self.executor.clone(),
            on_progress,
            policy: self.progress_policy.clone(),
        })?;

        info!(
            resolution = %resolution,
            fps = self.frames_per_second,
            output = ?self.output_path,
            "recording started"
        );

        self.active = Some(ActiveRecording {
            scheduler,
            encoding,
            fps_live,
            on_result: callbacks.on_result,
        });
        Ok(())
    }

    /// Stop recording. Idempotent; callable from any state.
    ///
    /// Cancels the timer (no further ticks fire after this returns), then
    /// enqueues finalization behind all pending frame writes. The terminal
    /// callback fires exactly once, from the callback executor, after
    /// finalization completes: `Ok` with the output location, or
    /// [`RecordError::Cancelled`] when no file was ever opened.
    pub fn stop(&mut self) {
        let Some(mut active) = self.active.take() else {
            return;
        };

        active.scheduler.cancel();

        let on_result = active.on_result.take();
        let executor = self.executor.clone();
        active.encoding.finish(move |outcome| {
            let result = match outcome.output_path {
                Some(output_path) => Ok(RecordingOutput {
                    output_path,
                    stats: outcome.stats,
                }),
                None => Err(RecordError::Cancelled),
            };
            if let Some(on_result) = on_result {
                executor.submit(move || on_result(result));
            }
        });

        info!("recording stopped; finalizing in the background");
    }
}

impl Drop for RecordingSession {
    fn drop(&mut self) {
        self.stop();
    }
}
