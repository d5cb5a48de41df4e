//! Progress events and sinks.
//!
//! The orchestrator pushes [`ProgressEvent`]s into a [`ProgressSink`] as the
//! export advances. Sinks are append-only and consume events immediately;
//! nothing is persisted. Three implementations cover the transports:
//! [`NullSink`] (silent), [`LogSink`] (tracing), and [`ChannelSink`] (live
//! streaming, with cancel-on-disconnect).

use crate::pipeline::rate_limit::RateLimitSnapshot;
use crate::shutdown::CancelToken;
use serde::{Deserialize, Serialize};
use tokio::sync::mpsc::UnboundedSender;
use tracing::info;

/// One progress event. Closed sum type: each kind carries exactly the
/// payload that makes sense for it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum ProgressEvent {
    /// The export began
    Start {
        /// Human-readable status line
        message: String,
    },
    /// One page was fetched and filtered
    Progress {
        /// Human-readable status line
        message: String,
        /// 1-based page number
        page: usize,
        /// Posts fetched so far across all pages
        fetched: usize,
        /// Posts matched so far
        matched: usize,
    },
    /// The loop is deliberately sleeping before the next page
    Waiting {
        /// Human-readable status line
        message: String,
        /// Sleep length in milliseconds
        wait_ms: u64,
        /// Rate-limit state that motivated the wait
        rate_limit: RateLimitSnapshot,
    },
    /// Pagination finished; the matched set is final
    Filtering {
        /// Human-readable status line
        message: String,
        /// Final matched count
        matched: usize,
    },
    /// CSV text is being generated
    Generating {
        /// Human-readable status line
        message: String,
    },
    /// The export finished with a CSV payload
    Complete {
        /// Human-readable status line
        message: String,
        /// Suggested download filename
        filename: String,
        /// Full CSV text, BOM included
        csv: String,
        /// Data row count (header excluded)
        count: usize,
    },
    /// The export terminated without a CSV
    Error {
        /// Human-readable message
        message: String,
        /// Upstream's own error text, when available
        details: Option<String>,
    },
}

impl ProgressEvent {
    /// The human-readable message carried by any event kind.
    pub fn message(&self) -> &str {
        match self {
            Self::Start { message }
            | Self::Progress { message, .. }
            | Self::Waiting { message, .. }
            | Self::Filtering { message, .. }
            | Self::Generating { message }
            | Self::Complete { message, .. }
            | Self::Error { message, .. } => message,
        }
    }
}

/// Append-only event sink fed by the orchestrator.
pub trait ProgressSink: Send + Sync {
    /// Consume one event.
    fn emit(&self, event: ProgressEvent);
}

/// Discards every event. For callers that only want the final outcome.
#[derive(Debug, Default, Clone, Copy)]
pub struct NullSink;

impl ProgressSink for NullSink {
    fn emit(&self, _event: ProgressEvent) {}
}

/// Logs every event through `tracing`.
#[derive(Debug, Default, Clone, Copy)]
pub struct LogSink;

impl ProgressSink for LogSink {
    fn emit(&self, event: ProgressEvent) {
        match &event {
            ProgressEvent::Complete { filename, count, .. } => {
                info!(filename = %filename, rows = count, "{}", event.message());
            }
            ProgressEvent::Error { details, .. } => {
                info!(details = ?details, "{}", event.message());
            }
            _ => info!("{}", event.message()),
        }
    }
}

/// Forwards events into an unbounded channel feeding a live transport.
///
/// When the receiving side is gone (the streaming client disconnected) the
/// send fails and the attached [`CancelToken`] is tripped, so the export
/// aborts at its next suspension point instead of running to completion for
/// nobody.
pub struct ChannelSink {
    tx: UnboundedSender<ProgressEvent>,
    cancel: CancelToken,
}

impl ChannelSink {
    /// Create a sink feeding `tx`, cancelling `cancel` on disconnect.
    pub fn new(tx: UnboundedSender<ProgressEvent>, cancel: CancelToken) -> Self {
        Self { tx, cancel }
    }
}

impl ProgressSink for ChannelSink {
    fn emit(&self, event: ProgressEvent) {
        if self.tx.send(event).is_err() {
            self.cancel.cancel();
        }
    }
}
