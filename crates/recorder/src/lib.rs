//! `vt-recorder` -- Timer-driven surface capture.
//!
//! Ties a repeating frame timer to an encoding session and exposes the
//! user-facing recording lifecycle.
//!
//! # Architecture
//!
//! ```text
//! RecordingSession::start()
//!   |
//!   +-- EncodingSession (vt-encoder, one serial encode worker)
//!   +-- FrameScheduler (frame timer thread)
//!   |     |
//!   |     +-- each tick:
//!   |     |     1. report progress (policy value, via callback executor)
//!   |     |     2. rasterize the surface (dead surface -> no-op tick)
//!   |     |     3. enqueue the image on the encode worker
//!   |
//!   +-- CallbackExecutor (delivers progress + terminal result)
//!
//! RecordingSession::stop()
//!   +-- cancel timer (joins; no tick fires after return)
//!   +-- enqueue finish behind all pending writes
//!         +-- exactly one terminal callback: Ok(output) | Err(Cancelled)
//! ```
//!
//! - [`session`] -- `RecordingSession`: the user-facing handle
//! - [`scheduler`] -- `FrameScheduler` and the tick-interval derivation
//! - [`progress`] -- `Progress` reports and the policy behind their fraction
//! - [`executor`] -- `CallbackExecutor`: the serial callback-delivery context
//!
//! # Usage
//!
//! ```ignore
//! use vt_common::RecorderConfig;
//! use vt_recorder::{RecordingCallbacks, RecordingSession};
//!
//! let mut session = RecordingSession::new(
//!     platform_sink_factory,
//!     RecorderConfig {
//!         output_path: Some("capture.mp4".into()),
//!         frames_per_second: 30,
//!         ..RecorderConfig::default()
//!     },
//! )?;
//!
//! session.start(
//!     &surface,
//!     RecordingCallbacks::new().on_result(|result| match result {
//!         Ok(output) => println!("wrote {}", output.output_path.display()),
//!         Err(e) => eprintln!("recording ended without a file: {e}"),
//!     }),
//! )?;
//!
//! // ... later ...
//! session.stop();
//! ```

pub mod executor;
pub mod progress;
pub mod scheduler;
pub mod session;

pub use executor::CallbackExecutor;
pub use progress::{Progress, ProgressPolicy};
pub use scheduler::tick_interval;
pub use session::{
    ProgressFn, RecordingCallbacks, RecordingOutput, RecordingSession, ResultFn,
};
