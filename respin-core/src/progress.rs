//! Progress notifications and cooperative cancellation
//!
//! Long rewrites report `started`, a monotonic percentage and `completed`
//! through an optional [`ProgressListener`]. A listener that panics is logged
//! and ignored so observers can never abort a rewrite.

use std::panic::{catch_unwind, AssertUnwindSafe};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

/// Observer for long-running rewrite calls
pub trait ProgressListener: Send + Sync {
    /// Called once before any work starts
    fn started(&self) {}

    /// Called with a percentage in `0.0..=100.0`, never decreasing within a call
    fn progress(&self, _percent: f32) {}

    /// Called once after the work finished
    fn completed(&self) {}
}

impl<F> ProgressListener for F
where
    F: Fn(f32) + Send + Sync,
{
    fn progress(&self, percent: f32) {
        self(percent)
    }
}

/// Shared cancellation flag checked between units of work
#[derive(Debug, Clone, Default)]
pub struct CancellationToken(Arc<AtomicBool>);

impl CancellationToken {
    pub fn new() -> Self {
        Self::default()
    }

    /// Request cancellation of every call holding a clone of this token
    pub fn cancel(&self) {
        self.0.store(true, Ordering::Relaxed);
    }

    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::Relaxed)
    }
}

/// Per-call wrapper enforcing monotonic, panic-isolated notifications
pub(crate) struct ProgressTracker<'a> {
    listener: Option<&'a dyn ProgressListener>,
    last: f32,
}

impl<'a> ProgressTracker<'a> {
    pub(crate) fn new(listener: Option<&'a dyn ProgressListener>) -> Self {
        Self {
            listener,
            last: 0.0,
        }
    }

    pub(crate) fn start(&mut self) {
        self.last = 0.0;
        self.notify(|l| l.started());
        self.notify(|l| l.progress(0.0));
    }

    /// Report progress; values below the last report are dropped
    pub(crate) fn report(&mut self, percent: f32) {
        let percent = percent.clamp(0.0, 100.0);
        if percent <= self.last {
            return;
        }
        self.last = percent;
        self.notify(|l| l.progress(percent));
    }

    /// Report `done` out of `total` units
    pub(crate) fn report_fraction(&mut self, done: usize, total: usize) {
        if total > 0 {
            self.report(done as f32 / total as f32 * 100.0);
        }
    }

    pub(crate) fn finish(&mut self) {
        self.last = 100.0;
        self.notify(|l| l.progress(100.0));
        self.notify(|l| l.completed());
    }

    fn notify(&self, call: impl FnOnce(&dyn ProgressListener)) {
        if let Some(listener) = self.listener {
            if catch_unwind(AssertUnwindSafe(|| call(listener))).is_err() {
                log::warn!("progress listener panicked; notification dropped");
            }
        }
    }
}
