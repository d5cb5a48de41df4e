//! Fetch-filter orchestration.
//!
//! Drives the export end to end:
//!
//! 1. **Page loop**: fetch one page via [`crate::fetcher::PageFetcher`]
//! 2. **Filter**: keep posts inside the requested [`window::DateWindow`]
//! 3. **Track**: fold rate-limit headers into [`rate_limit::RateLimitTracker`]
//! 4. **Early stop**: consult [`early_stop::EarlyStop`] about whether more
//!    pages can still contain in-window posts
//! 5. **Throttle**: sleep per the tracker's wait policy before the next page
//! 6. **Report**: push [`progress::ProgressEvent`]s into the caller's sink
//!
//! All per-export state (tracker, streak, accumulated rows) lives in one
//! owned loop context, so concurrent exports never share anything.

pub mod config;
pub mod early_stop;
pub mod orchestrator;
pub mod progress;
pub mod rate_limit;
pub mod window;

pub use orchestrator::{ExportOutcome, Exporter};
pub use progress::{ChannelSink, LogSink, NullSink, ProgressEvent, ProgressSink};
pub use rate_limit::{RateLimitSnapshot, RateLimitTracker};
pub use window::DateWindow;

use crate::fetcher::FetcherError;

/// Export errors
#[derive(Debug, thiserror::Error)]
pub enum ExportError {
    /// Upstream failure after the fetcher's own retry policy
    #[error(transparent)]
    Fetch(#[from] FetcherError),

    /// The export was cancelled mid-flight
    #[error("export cancelled")]
    Cancelled,

    /// CSV encoding failed
    #[error("output error: {0}")]
    Output(String),
}
