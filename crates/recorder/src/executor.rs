//! Serial executor for caller-facing callbacks.
//!
//! Progress and terminal-result callbacks are never invoked from the timer
//! thread or the encode worker; they are enqueued here and run in order on
//! one dedicated thread. The executor is the explicit delivery context the
//! caller observes results on.

use std::thread;

use crossbeam::channel::{self, Sender};

use vt_common::{RecordError, RecordResult};

type Job = Box<dyn FnOnce() + Send>;

/// A single-threaded FIFO executor. Clones share the same thread.
#[derive(Clone)]
pub struct CallbackExecutor {
    tx: Sender<Job>,
}

impl CallbackExecutor {
    pub fn new() -> RecordResult<Self> {
        let (tx, rx) = channel::unbounded::<Job>();
        thread::Builder::new()
            .name("vt-callbacks".to_string())
            .spawn(move || {
                while let Ok(job) = rx.recv() {
                    job();
                }
            })
            .map_err(|e| {
                RecordError::InitFailed(format!("failed to spawn callback thread: {e}"))
            })?;
        Ok(Self { tx })
    }

    /// Enqueue a job; jobs run in submission order.
    pub fn submit(&self, job: impl FnOnce() + Send + 'static) {
        // A send failure means the executor thread is gone, which only
        // happens during teardown; the job is dropped.
        let _ = self.tx.send(Box::new(job));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use std::sync::Arc;
    use std::time::Duration;

    use parking_lot::Mutex;

    #[test]
    fn jobs_run_in_submission_order() {
        let executor = CallbackExecutor::new().unwrap();
        let seen = Arc::new(Mutex::new(Vec::new()));

        for i in 0..10 {
            let seen = Arc::clone(&seen);
            executor.submit(move || seen.lock().push(i));
        }

        let (tx, rx) = channel::bounded(1);
        executor.submit(move || {
            let _ = tx.send(());
        });
        rx.recv_timeout(Duration::from_secs(5)).unwrap();

        assert_eq!(*seen.lock(), (0..10).collect::<Vec<_>>());
    }

    #[test]
    fn jobs_run_off_the_caller_thread() {
        let executor = CallbackExecutor::new().unwrap();
        let (tx, rx) = channel::bounded(1);
        let caller = thread::current().id();
        executor.submit(move || {
            let _ = tx.send(thread::current().id());
        });
        let worker = rx.recv_timeout(Duration::from_secs(5)).unwrap();
        assert_ne!(caller, worker);
    }
}
