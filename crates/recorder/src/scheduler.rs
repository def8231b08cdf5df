//! Frame production timer.
//!
//! One repeating timer thread per recording run. Each tick reports a
//! progress value, rasterizes the surface, and enqueues the snapshot on
//! the encode worker -- nothing on the tick path blocks beyond a channel
//! send. A surface that has gone away makes the tick a silent no-op; the
//! next tick simply resumes.

use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::{Arc, Weak};
use std::thread::{self, JoinHandle};
use std::time::{Duration, Instant};

use crossbeam::channel::{self, Receiver, RecvTimeoutError, Sender};
use parking_lot::Mutex;
use tracing::{debug, info};

use vt_common::{RasterSource, RecordError, RecordResult};
use vt_encoder::EncodingSession;

use crate::executor::CallbackExecutor;
use crate::progress::{Progress, ProgressPolicy};

/// Ticks between cadence log lines.
const CADENCE_LOG_EVERY: u64 = 60;

/// Tick period for a target frame rate: `1000 / fps` milliseconds,
/// truncated.
///
/// The truncation is a known accuracy gap kept for compatibility: rates
/// that do not divide 1000 run slightly fast (60 fps yields a 16 ms period,
/// an actual cadence of 62.5 fps).
pub fn tick_interval(frames_per_second: u32) -> Duration {
    Duration::from_millis(1000 / frames_per_second.max(1) as u64)
}

pub(crate) type SharedProgressFn = Arc<Mutex<Box<dyn FnMut(Progress) + Send>>>;

pub(crate) struct SchedulerParams {
    pub surface: Weak<dyn RasterSource>,
    pub encoding: EncodingSession,
    /// Live frame rate; re-read every tick so rate changes re-derive the
    /// interval mid-run.
    pub fps_live: Arc<AtomicU32>,
    pub executor: CallbackExecutor,
    pub on_progress: Option<SharedProgressFn>,
    pub policy: ProgressPolicy,
}

/// Owns the repeating timer thread for one recording run.
///
/// Cancellation joins the thread: no tick fires after [`cancel`]
/// (`FrameScheduler::cancel`) returns, though a tick already in flight
/// completes first.
pub(crate) struct FrameScheduler {
    stop_tx: Option<Sender<()>>,
    thread: Option<JoinHandle<()>>,
}

impl FrameScheduler {
    pub fn start(params: SchedulerParams) -> RecordResult<Self> {
        let (stop_tx, stop_rx) = channel::bounded::<()>(1);
        let thread = thread::Builder::new()
            .name("vt-frame-timer".to_string())
            .spawn(move || run_timer(params, stop_rx))
            .map_err(|e| RecordError::InitFailed(format!("failed to spawn frame timer: {e}")))?;

        Ok(Self {
            stop_tx: Some(stop_tx),
            thread: Some(thread),
        })
    }

    pub fn cancel(&mut self) {
        drop(self.stop_tx.take());
        if let Some(thread) = self.thread.take() {
            let _ = thread.join();
        }
    }
}

impl Drop for FrameScheduler {
    fn drop(&mut self) {
        self.cancel();
    }
}

fn run_timer(params: SchedulerParams, stop_rx: Receiver<()>) {
    let SchedulerParams {
        surface,
        encoding,
        fps_live,
        executor,
        on_progress,
        policy,
    } = params;

    let started = Instant::now();
    let mut ticks: u64 = 0;
    let mut produced: u64 = 0;

    loop {
        let interval = tick_interval(fps_live.load(Ordering::Relaxed));
        match stop_rx.recv_timeout(interval) {
            Ok(()) | Err(RecvTimeoutError::Disconnected) => break,
            Err(RecvTimeoutError::Timeout) => {}
        }
        ticks += 1;

        if let Some(on_progress) = &on_progress {
            let elapsed = started.elapsed();
            let progress = Progress {
                fraction: policy.fraction(elapsed),
                frames_produced: produced,
                elapsed,
            };
            let on_progress = Arc::clone(on_progress);
            executor.submit(move || {
                let mut callback = on_progress.lock();
                (*callback)(progress);
            });
        }

        let Some(surface) = surface.upgrade() else {
            continue;
        };
        let Some(image) = surface.rasterize() else {
            continue;
        };
        encoding.write_frame(image);
        produced += 1;

        if produced % CADENCE_LOG_EVERY == 0 {
            info!(
                frames = produced,
                elapsed_secs = started.elapsed().as_secs_f64(),
                "capture cadence"
            );
        }
    }

    debug!(ticks, produced, "frame timer stopped");
}
