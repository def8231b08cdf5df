//! Encoding session -- one serial worker per recording run.
//!
//! `EncodingSession` is a cheap cloneable handle over a dedicated worker
//! thread. Every sink interaction -- lazy setup, admission control, buffer
//! acquisition, drawing, timestamp assignment, finalization -- happens on
//! that worker, in queue order, so none of it ever interleaves across
//! concurrent callers.
//!
//! `write_frame` and `finish` only enqueue and return. `finish` runs after
//! all previously queued writes have drained, finalizes the sink, and
//! delivers exactly one [`FinishOutcome`].
//!
//! # State machine
//!
//! ```text
//! Idle --(first write with path + non-zero size)--> Active
//! Idle --(sink creation fails)-----------------> Failed
//! Idle | Active | Failed --(finish)--> Finalizing --> Finished
//! ```
//!
//! Nothing leaves `Finished`; a new recording run constructs a new session.

use std::path::PathBuf;
use std::sync::Arc;
use std::thread;
use std::time::SystemTime;

use crossbeam::channel::{self, Receiver, Sender};
use tracing::{debug, error, info, warn};

use vt_common::{
    EncoderSetup, MediaTime, PixelBuffer, RawImage, RecordError, RecordResult, Resolution,
    VideoSink, VideoSinkFactory,
};

use crate::align::draw_extent;
use crate::pool::PixelBufferPool;

// ---------------------------------------------------------------------------
// Session statistics
// ---------------------------------------------------------------------------

/// Counters for one encoding session's run.
#[derive(Clone, Debug, Default)]
pub struct SessionStats {
    /// Frames successfully submitted to the sink.
    pub frames_submitted: u64,
    /// Frames dropped before the sink existed (no path, zero size, or
    /// failed setup).
    pub dropped_before_setup: u64,
    /// Frames dropped because the sink reported not ready (backpressure).
    pub dropped_not_ready: u64,
    /// Frames dropped because every pool buffer was in flight.
    pub dropped_pool_exhausted: u64,
    /// Frames the sink rejected at submission.
    pub submit_failures: u64,
    /// Wall-clock stamps for the run (metadata only, never used for pacing).
    pub started_at: Option<SystemTime>,
    pub finished_at: Option<SystemTime>,
}

impl SessionStats {
    /// Total write attempts: submissions plus every category of drop.
    pub fn frames_attempted(&self) -> u64 {
        self.frames_submitted
            + self.dropped_before_setup
            + self.dropped_not_ready
            + self.dropped_pool_exhausted
            + self.submit_failures
    }
}

/// Terminal result of a session, delivered exactly once by `finish`.
#[derive(Debug)]
pub struct FinishOutcome {
    /// The output file location, or `None` when finalization completed
    /// without ever opening a file (no frame was admitted, or setup
    /// failed).
    pub output_path: Option<PathBuf>,
    pub stats: SessionStats,
}

// ---------------------------------------------------------------------------
// EncodingSession handle
// ---------------------------------------------------------------------------

type FinishFn = Box<dyn FnOnce(FinishOutcome) + Send>;

enum Command {
    Write(RawImage),
    Finish(FinishFn),
}

/// Handle to one recording run's encode worker.
///
/// Clones share the same worker. Dropping every handle without calling
/// [`finish`](Self::finish) lets queued writes drain and the worker exit
/// without finalizing; no output file is guaranteed in that case.
#[derive(Clone)]
pub struct EncodingSession {
    tx: Sender<Command>,
}

impl EncodingSession {
    /// Spawn the serial worker for one recording run.
    ///
    /// The sink itself is not created here: setup is deferred to the first
    /// write attempt for which `output_path` and a non-zero `resolution`
    /// are both known.
    pub fn new(
        factory: Arc<dyn VideoSinkFactory>,
        output_path: Option<PathBuf>,
        resolution: Resolution,
        frames_per_second: u32,
        pool_capacity: usize,
    ) -> RecordResult<Self> {
        if frames_per_second == 0 {
            return Err(RecordError::InitFailed(
                "frames_per_second must be > 0".to_string(),
            ));
        }

        let (tx, rx) = channel::unbounded::<Command>();
        let worker = SessionWorker {
            factory,
            output_path,
            resolution,
            frames_per_second,
            pool_capacity,
            state: SinkState::Idle,
            stats: SessionStats::default(),
        };

        thread::Builder::new()
            .name("vt-encode".to_string())
            .spawn(move || worker.run(rx))
            .map_err(|e| RecordError::InitFailed(format!("failed to spawn encode worker: {e}")))?;

        Ok(Self { tx })
    }

    /// Enqueue one frame for asynchronous writing. Never blocks beyond the
    /// channel send.
    pub fn write_frame(&self, image: RawImage) {
        if self.tx.send(Command::Write(image)).is_err() {
            debug!("frame dropped: encode worker has exited");
        }
    }

    /// Enqueue finalization behind all previously queued writes.
    ///
    /// `on_complete` fires exactly once, from the worker thread, after the
    /// sink confirms finalization (or immediately after the queue drains
    /// when no sink was ever created).
    pub fn finish(&self, on_complete: impl FnOnce(FinishOutcome) + Send + 'static) {
        if self
            .tx
            .send(Command::Finish(Box::new(on_complete)))
            .is_err()
        {
            warn!("finish requested after encode worker exited; no outcome will be delivered");
        }
    }
}

// ---------------------------------------------------------------------------
// Serial worker
// ---------------------------------------------------------------------------

enum SinkState {
    Idle,
    Active {
        sink: Box<dyn VideoSink>,
        pool: PixelBufferPool,
    },
    Failed,
    Finalizing,
    Finished,
}

struct SessionWorker {
    factory: Arc<dyn VideoSinkFactory>,
    output_path: Option<PathBuf>,
    resolution: Resolution,
    frames_per_second: u32,
    pool_capacity: usize,
    state: SinkState,
    stats: SessionStats,
}

impl SessionWorker {
    fn run(mut self, rx: Receiver<Command>) {
        self.stats.started_at = Some(SystemTime::now());

        while let Ok(command) = rx.recv() {
            match command {
                Command::Write(image) => self.write(image),
                Command::Finish(on_complete) => {
                    self.finish(on_complete);
                    break;
                }
            }
        }
    }

    fn write(&mut self, image: RawImage) {
        if matches!(self.state, SinkState::Idle) {
            self.try_setup();
        }

        match &mut self.state {
            SinkState::Active { sink, pool } => {
                if !sink.is_ready_for_frame() {
                    self.stats.dropped_not_ready += 1;
                    debug!(
                        frame = self.stats.frames_submitted,
                        "frame dropped: sink not ready"
                    );
                    return;
                }

                let Some(mut buffer) = pool.acquire() else {
                    self.stats.dropped_pool_exhausted += 1;
                    debug!("frame dropped: pixel buffer pool exhausted");
                    return;
                };

                render_into(&image, &mut buffer);

                let pts = MediaTime::new(
                    self.stats.frames_submitted as i64,
                    self.frames_per_second,
                );
                match sink.submit(&buffer, pts) {
                    Ok(()) => self.stats.frames_submitted += 1,
                    Err(e) => {
                        self.stats.submit_failures += 1;
                        warn!(error = %e, pts = %pts, "frame submission failed");
                    }
                }
            }
            SinkState::Idle | SinkState::Failed => {
                self.stats.dropped_before_setup += 1;
                debug!("frame dropped: no active sink");
            }
            SinkState::Finalizing | SinkState::Finished => {
                debug!("frame dropped: session already finishing");
            }
        }
    }

    /// Create the sink and its pool together, once, if output path and a
    /// non-zero target size are both known. Failure freezes the session
    /// for the rest of the run.
    fn try_setup(&mut self) {
        let Some(path) = self.output_path.clone() else {
            return;
        };
        if self.resolution.is_zero() {
            return;
        }

        let setup = EncoderSetup {
            output_path: path.clone(),
            resolution: self.resolution,
            frames_per_second: self.frames_per_second,
            pool_capacity: self.pool_capacity,
        };

        match self.factory.create(&setup) {
            Ok(sink) => {
                let pool = PixelBufferPool::new(self.resolution, self.pool_capacity);
                info!(
                    output = %path.display(),
                    resolution = %self.resolution,
                    fps = self.frames_per_second,
                    "encoder sink opened"
                );
                self.state = SinkState::Active { sink, pool };
            }
            Err(e) => {
                error!(
                    error = %e,
                    output = %path.display(),
                    "sink creation failed; frames will be dropped for this run"
                );
                self.state = SinkState::Failed;
            }
        }
    }

    fn finish(&mut self, on_complete: FinishFn) {
        let output_path = match std::mem::replace(&mut self.state, SinkState::Finalizing) {
            SinkState::Active { mut sink, pool } => {
                sink.mark_finished();
                let path = match sink.finalize() {
                    Ok(()) => self.output_path.clone(),
                    Err(e) => {
                        error!(error = %e, "finalization failed; output file is not valid");
                        None
                    }
                };
                // The pool is released only after the sink confirms
                // finalization.
                drop(pool);
                path
            }
            SinkState::Idle | SinkState::Failed => None,
            SinkState::Finalizing | SinkState::Finished => None,
        };
        self.state = SinkState::Finished;

        self.stats.finished_at = Some(SystemTime::now());
        info!(
            frames = self.stats.frames_submitted,
            dropped_not_ready = self.stats.dropped_not_ready,
            dropped_pool = self.stats.dropped_pool_exhausted,
            output = ?output_path,
            "encoding session finished"
        );

        on_complete(FinishOutcome {
            output_path,
            stats: self.stats.clone(),
        });
    }
}

/// Draw a raw image into a pixel buffer: clear to black, then copy the
/// source clamped via the alignment policy so it never exceeds the
/// buffer's declared dimensions.
fn render_into(image: &RawImage, buffer: &mut PixelBuffer) {
    let src = image.resolution();
    let dst = buffer.resolution();
    let width = draw_extent(src.width, dst.width).min(dst.width) as usize;
    let height = draw_extent(src.height, dst.height).min(dst.height);

    let mut pixels = buffer.lock();
    pixels.fill([0, 0, 0, 255]);
    for y in 0..height {
        let row = &image.row(y)[..width * 4];
        pixels.row_mut(y)[..width * 4].copy_from_slice(row);
    }
}
