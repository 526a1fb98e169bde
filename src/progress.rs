//! Progress reporting
//!
//! A [`ProgressSink`] receives advisory progress and error notifications
//! keyed by pipeline stage. Sinks are passed explicitly into a run; they
//! never influence control flow and must not block or fail.

use crate::error::Error;
use std::io::Write;
use std::sync::Mutex;
use tracing::{info, warn};

/// Pipeline stage a notification belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    /// Page requests
    Fetch,
    /// Raw record classification
    Classify,
}

impl Stage {
    /// Lowercase stage name
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Fetch => "fetch",
            Self::Classify => "classify",
        }
    }
}

impl std::fmt::Display for Stage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Receiver of advisory progress notifications
pub trait ProgressSink: Send + Sync {
    /// A human-readable progress message
    fn notify(&self, stage: Stage, message: &str);

    /// A non-fatal error
    fn notify_error(&self, stage: Stage, error: &Error);
}

/// Discards everything
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopProgress;

impl ProgressSink for NoopProgress {
    fn notify(&self, _stage: Stage, _message: &str) {}

    fn notify_error(&self, _stage: Stage, _error: &Error) {}
}

/// Forwards notifications to `tracing`
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingProgress;

impl ProgressSink for TracingProgress {
    fn notify(&self, stage: Stage, message: &str) {
        info!(stage = stage.as_str(), "{message}");
    }

    fn notify_error(&self, stage: Stage, error: &Error) {
        warn!(stage = stage.as_str(), kind = %error.kind(), "{error}");
    }
}

/// Writes one line per notification to an explicit stream (usually stderr)
pub struct WriterProgress<W: Write + Send> {
    writer: Mutex<W>,
}

impl<W: Write + Send> WriterProgress<W> {
    /// Wrap a writer
    pub fn new(writer: W) -> Self {
        Self {
            writer: Mutex::new(writer),
        }
    }

    /// Recover the writer
    pub fn into_inner(self) -> W {
        self.writer
            .into_inner()
            .unwrap_or_else(std::sync::PoisonError::into_inner)
    }

    fn write_line(&self, line: std::fmt::Arguments<'_>) {
        // Progress output is best effort; a closed stream must not fail the run.
        if let Ok(mut writer) = self.writer.lock() {
            let _ = writeln!(writer, "{line}");
            let _ = writer.flush();
        }
    }
}

impl<W: Write + Send> ProgressSink for WriterProgress<W> {
    fn notify(&self, _stage: Stage, message: &str) {
        self.write_line(format_args!("{message}"));
    }

    fn notify_error(&self, stage: Stage, error: &Error) {
        self.write_line(format_args!("error during {stage}: {error}"));
    }
}

impl<W: Write + Send> std::fmt::Debug for WriterProgress<W> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("WriterProgress").finish_non_exhaustive()
    }
}

/// A notification captured by [`RecordingProgress`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProgressEvent {
    /// `notify` call
    Message {
        /// Stage
        stage: Stage,
        /// Message text
        message: String,
    },
    /// `notify_error` call, with the error rendered
    Error {
        /// Stage
        stage: Stage,
        /// Rendered error
        error: String,
    },
}

/// Collects notifications in memory
#[derive(Debug, Default)]
pub struct RecordingProgress {
    events: Mutex<Vec<ProgressEvent>>,
}

impl RecordingProgress {
    /// Create an empty recorder
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot of the events so far
    pub fn events(&self) -> Vec<ProgressEvent> {
        self.events
            .lock()
            .map(|events| events.clone())
            .unwrap_or_default()
    }

    /// Messages only, in order
    pub fn messages(&self) -> Vec<String> {
        self.events()
            .into_iter()
            .filter_map(|event| match event {
                ProgressEvent::Message { message, .. } => Some(message),
                ProgressEvent::Error { .. } => None,
            })
            .collect()
    }

    /// Rendered errors only, in order
    pub fn errors(&self) -> Vec<String> {
        self.events()
            .into_iter()
            .filter_map(|event| match event {
                ProgressEvent::Error { error, .. } => Some(error),
                ProgressEvent::Message { .. } => None,
            })
            .collect()
    }

    fn push(&self, event: ProgressEvent) {
        if let Ok(mut events) = self.events.lock() {
            events.push(event);
        }
    }
}

impl ProgressSink for RecordingProgress {
    fn notify(&self, stage: Stage, message: &str) {
        self.push(ProgressEvent::Message {
            stage,
            message: message.to_string(),
        });
    }

    fn notify_error(&self, stage: Stage, error: &Error) {
        self.push(ProgressEvent::Error {
            stage,
            error: error.to_string(),
        });
    }
}
