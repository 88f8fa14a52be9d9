//! Status/log sink shared by the ingestion channels.
//!
//! Every status line is both sent to the presentation layer over an unbounded
//! Tokio channel and mirrored to `tracing` at the matching level.
//!
//! # Why an unbounded channel?
//!
//! The producers are plain OS threads (the serial and video loops) that must
//! never block on a slow consumer, and no message may be dropped.  An
//! unbounded `mpsc` sender satisfies both: `send` is synchronous, never waits,
//! and keeps FIFO order per sender.

use tokio::sync::mpsc;
use tracing::{error, info, warn};

/// Severity of a [`StatusMessage`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Severity {
    Info,
    Warn,
    Error,
}

/// One human-readable status line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatusMessage {
    pub severity: Severity,
    pub text: String,
}

/// Cloneable producer handle.
#[derive(Debug, Clone)]
pub struct StatusSink {
    tx: mpsc::UnboundedSender<StatusMessage>,
}

/// Consumer side of the status channel.
pub type StatusReceiver = mpsc::UnboundedReceiver<StatusMessage>;

impl StatusSink {
    /// Creates a connected sink/receiver pair.
    pub fn channel() -> (Self, StatusReceiver) {
        let (tx, rx) = mpsc::unbounded_channel();
        (Self { tx }, rx)
    }

    /// Publishes `text` with the given severity.
    ///
    /// Once the receiver is dropped, messages still reach `tracing` but are
    /// otherwise discarded.
    pub fn publish(&self, severity: Severity, text: impl Into<String>) {
        let text = text.into();
        match severity {
            Severity::Info => info!(target: "gazelink::status", "{text}"),
            Severity::Warn => warn!(target: "gazelink::status", "{text}"),
            Severity::Error => error!(target: "gazelink::status", "{text}"),
        }
        let _ = self.tx.send(StatusMessage { severity, text });
    }

    pub fn info(&self, text: impl Into<String>) {
        self.publish(Severity::Info, text);
    }

    pub fn warn(&self, text: impl Into<String>) {
        self.publish(Severity::Warn, text);
    }

    pub fn error(&self, text: impl Into<String>) {
        self.publish(Severity::Error, text);
    }
}

/// Drains everything currently queued on `rx` without waiting.
pub fn drain(rx: &mut StatusReceiver) -> Vec<StatusMessage> {
    let mut messages = Vec::new();
    while let Ok(message) = rx.try_recv() {
        messages.push(message);
    }
    messages
}

// ── Tests ─────────────────────────────────────────────────────────────────────
