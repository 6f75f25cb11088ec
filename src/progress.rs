//! Progress and status reporting.
//!
//! Long running operations push two kinds of events to a [`ProgressSink`]:
//! `progress(current, total)` and `message(level, text)`. The sink is purely
//! observational; nothing in the analytics or bulk logic reads it back.
//!
//! Within one call a [`ProgressTracker`] fixes `total` and keeps `current`
//! monotonically non-decreasing, so stage boundaries and per-record updates can be
//! emitted without each stage having to know what the previous one reported.

use log::{debug, error, info, warn};
use serde::Serialize;
use std::sync::Mutex;
use tokio::sync::mpsc;

/// Severity of a status message, as understood by MCP clients.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum MessageLevel {
    Debug,
    Info,
    Warning,
    Error,
}

impl MessageLevel {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Debug => "debug",
            Self::Info => "info",
            Self::Warning => "warning",
            Self::Error => "error",
        }
    }
}

/// A single event emitted by an operation.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum ProgressEvent {
    Progress { current: u64, total: u64 },
    Message { level: MessageLevel, text: String },
}

/// Destination for progress and status events.
pub trait ProgressSink: Send + Sync {
    /// Report that `current` of `total` units are done.
    fn progress(&self, current: u64, total: u64);

    /// Report an informational, warning or error message.
    fn message(&self, level: MessageLevel, text: &str);

    fn debug(&self, text: &str) {
        self.message(MessageLevel::Debug, text);
    }

    fn info(&self, text: &str) {
        self.message(MessageLevel::Info, text);
    }

    fn warning(&self, text: &str) {
        self.message(MessageLevel::Warning, text);
    }

    fn error(&self, text: &str) {
        self.message(MessageLevel::Error, text);
    }
}

/// Discards every event.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopSink;

impl ProgressSink for NoopSink {
    fn progress(&self, _current: u64, _total: u64) {}

    fn message(&self, _level: MessageLevel, _text: &str) {}
}

/// Forwards messages to the `log` facade; progress goes to `debug`.
#[derive(Debug, Clone, Copy, Default)]
pub struct LogSink;

impl ProgressSink for LogSink {
    fn progress(&self, current: u64, total: u64) {
        debug!("progress {}/{}", current, total);
    }

    fn message(&self, level: MessageLevel, text: &str) {
        match level {
            MessageLevel::Debug => debug!("{}", text),
            MessageLevel::Info => info!("{}", text),
            MessageLevel::Warning => warn!("{}", text),
            MessageLevel::Error => error!("{}", text),
        }
    }
}

/// Keeps every event in order. Used by tests and to attach events to tool results.
#[derive(Debug, Default)]
pub struct RecordingSink {
    events: Mutex<Vec<ProgressEvent>>,
}

impl RecordingSink {
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot of all events so far.
    pub fn events(&self) -> Vec<ProgressEvent> {
        self.lock().clone()
    }

    /// Only the progress values, in order.
    pub fn progress_values(&self) -> Vec<(u64, u64)> {
        self.lock()
            .iter()
            .filter_map(|event| match event {
                ProgressEvent::Progress { current, total } => Some((*current, *total)),
                ProgressEvent::Message { .. } => None,
            })
            .collect()
    }

    /// Message texts at `level`, in order.
    pub fn messages(&self, level: MessageLevel) -> Vec<String> {
        self.lock()
            .iter()
            .filter_map(|event| match event {
                ProgressEvent::Message { level: l, text } if *l == level => Some(text.clone()),
                _ => None,
            })
            .collect()
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, Vec<ProgressEvent>> {
        // A panic while pushing cannot leave the Vec half-updated.
        self.events.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

impl ProgressSink for RecordingSink {
    fn progress(&self, current: u64, total: u64) {
        self.lock().push(ProgressEvent::Progress { current, total });
    }

    fn message(&self, level: MessageLevel, text: &str) {
        self.lock().push(ProgressEvent::Message {
            level,
            text: text.to_string(),
        });
    }
}

/// Streams events over an unbounded channel, e.g. to a transport writer task.
///
/// Events sent after the receiver is dropped are silently discarded.
#[derive(Debug, Clone)]
pub struct ChannelSink {
    sender: mpsc::UnboundedSender<ProgressEvent>,
}

impl ChannelSink {
    pub fn new(sender: mpsc::UnboundedSender<ProgressEvent>) -> Self {
        Self { sender }
    }

    /// Create a sink together with its receiving end.
    pub fn channel() -> (Self, mpsc::UnboundedReceiver<ProgressEvent>) {
        let (sender, receiver) = mpsc::unbounded_channel();
        (Self { sender }, receiver)
    }
}

impl ProgressSink for ChannelSink {
    fn progress(&self, current: u64, total: u64) {
        let _ = self.sender.send(ProgressEvent::Progress { current, total });
    }

    fn message(&self, level: MessageLevel, text: &str) {
        let _ = self.sender.send(ProgressEvent::Message {
            level,
            text: text.to_string(),
        });
    }
}

/// Sends every event to two sinks.
pub struct TeeSink<'a> {
    first: &'a dyn ProgressSink,
    second: &'a dyn ProgressSink,
}

impl<'a> TeeSink<'a> {
    pub fn new(first: &'a dyn ProgressSink, second: &'a dyn ProgressSink) -> Self {
        Self { first, second }
    }
}

impl ProgressSink for TeeSink<'_> {
    fn progress(&self, current: u64, total: u64) {
        self.first.progress(current, total);
        self.second.progress(current, total);
    }

    fn message(&self, level: MessageLevel, text: &str) {
        self.first.message(level, text);
        self.second.message(level, text);
    }
}

/// Per-call progress accounting over a fixed total.
///
/// `current` never moves backwards and never exceeds `total`; a request to report
/// a smaller value re-emits the current position instead.
pub struct ProgressTracker<'a> {
    sink: &'a dyn ProgressSink,
    total: u64,
    current: u64,
}

impl<'a> ProgressTracker<'a> {
    pub fn new(sink: &'a dyn ProgressSink, total: u64) -> Self {
        Self {
            sink,
            total,
            current: 0,
        }
    }

    /// Tracker for percentage based reporting.
    pub fn percent(sink: &'a dyn ProgressSink) -> Self {
        Self::new(sink, 100)
    }

    /// Report `current`, clamped to `[last reported, total]`.
    pub fn advance_to(&mut self, current: u64) {
        self.current = current.clamp(self.current, self.total);
        self.sink.progress(self.current, self.total);
    }

    /// Report the position of item `index` (0-based) of `len` inside the span
    /// `[start, start + span)`, using integer arithmetic.
    pub fn advance_within(&mut self, start: u64, span: u64, index: usize, len: usize) {
        if len == 0 {
            return;
        }
        let offset = (index as u64).saturating_mul(span) / len as u64;
        self.advance_to(start + offset);
    }

    pub fn current(&self) -> u64 {
        self.current
    }

    pub fn total(&self) -> u64 {
        self.total
    }

    /// The sink, for status messages.
    pub fn sink(&self) -> &'a dyn ProgressSink {
        self.sink
    }
}
