//! Cooperative cancellation
//!
//! A [`StopSignal`] combines a cancellation flag with an optional deadline.
//! It is checked by value at well-defined points (the top of each page
//! iteration) and can also be awaited so in-flight requests can race it.

use crate::error::Error;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::Notify;
use tokio::task::JoinHandle;
use tokio::time::Instant;
use tracing::info;

/// Why a stop was requested
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StopReason {
    /// `cancel()` was called (Ctrl-C, caller request)
    Cancelled,
    /// The deadline passed
    DeadlineExceeded,
}

#[derive(Debug)]
struct Inner {
    cancelled: AtomicBool,
    notify: Notify,
    started: Instant,
    deadline: Option<Instant>,
}

/// Cloneable stop signal shared between a run and whoever may stop it
#[derive(Debug, Clone)]
pub struct StopSignal {
    inner: Arc<Inner>,
}

impl StopSignal {
    /// Create a signal with no deadline
    pub fn new() -> Self {
        Self::build(None)
    }

    /// Create a signal that expires `timeout` from now
    pub fn with_timeout(timeout: Duration) -> Self {
        Self::with_deadline(Instant::now() + timeout)
    }

    /// Create a signal that expires at `deadline`
    pub fn with_deadline(deadline: Instant) -> Self {
        Self::build(Some(deadline))
    }

    fn build(deadline: Option<Instant>) -> Self {
        Self {
            inner: Arc::new(Inner {
                cancelled: AtomicBool::new(false),
                notify: Notify::new(),
                started: Instant::now(),
                deadline,
            }),
        }
    }

    /// Request a stop. Idempotent.
    pub fn cancel(&self) {
        self.inner.cancelled.store(true, Ordering::SeqCst);
        self.inner.notify.notify_waiters();
    }

    /// The configured deadline, if any
    pub fn deadline(&self) -> Option<Instant> {
        self.inner.deadline
    }

    /// Poll the signal. Cancellation wins over an expired deadline.
    pub fn check(&self) -> Option<StopReason> {
        if self.inner.cancelled.load(Ordering::SeqCst) {
            return Some(StopReason::Cancelled);
        }
        match self.inner.deadline {
            Some(deadline) if Instant::now() >= deadline => Some(StopReason::DeadlineExceeded),
            _ => None,
        }
    }

    /// Poll the signal and classify a triggered stop as an error
    pub fn error(&self) -> Option<Error> {
        self.check().map(|reason| self.classify(reason))
    }

    /// Turn a stop reason into the user-facing error
    pub fn classify(&self, reason: StopReason) -> Error {
        match reason {
            StopReason::Cancelled => Error::Cancelled,
            StopReason::DeadlineExceeded => Error::DeadlineExceeded {
                elapsed_ms: self.inner.started.elapsed().as_millis() as u64,
            },
        }
    }

    /// Resolve once the signal triggers
    pub async fn stopped(&self) -> StopReason {
        let notified = self.inner.notify.notified();
        tokio::pin!(notified);
        notified.as_mut().enable();

        if let Some(reason) = self.check() {
            return reason;
        }

        match self.inner.deadline {
            Some(deadline) => {
                tokio::select! {
                    () = &mut notified => StopReason::Cancelled,
                    () = tokio::time::sleep_until(deadline) => StopReason::DeadlineExceeded,
                }
            }
            None => {
                notified.await;
                StopReason::Cancelled
            }
        }
    }

    /// Cancel this signal when the process receives Ctrl-C
    pub fn cancel_on_ctrl_c(&self) -> JoinHandle<()> {
        let signal = self.clone();
        tokio::spawn(async move {
            if tokio::signal::ctrl_c().await.is_ok() {
                info!("Ctrl+C received, stopping after the current page");
                signal.cancel();
            }
        })
    }
}

impl Default for StopSignal {
    fn default() -> Self {
        Self::new()
    }
}
