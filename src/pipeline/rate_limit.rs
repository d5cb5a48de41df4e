//! Rate-limit budget tracking and courtesy throttling.
//!
//! The Product Hunt API reports a complexity budget through response
//! headers. The tracker folds those headers into per-export state and maps
//! the remaining budget to a wait inserted between successful pages. This is
//! a voluntary slowdown, not quota enforcement: it never blocks a request
//! from being sent.

use crate::fetcher::RateLimitHeaders;
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Wait when the remaining budget is critical and no reset time is known.
const EXHAUSTED_WAIT: Duration = Duration::from_millis(900_000);
/// Wait when at most 10% of the budget remains.
const LOW_WAIT: Duration = Duration::from_millis(5_000);
/// Wait when at most 20% of the budget remains.
const ELEVATED_WAIT: Duration = Duration::from_millis(2_000);
/// Courtesy pause between pages when the budget is healthy.
const COURTESY_WAIT: Duration = Duration::from_millis(150);

/// Per-export rate-limit state, owned by the orchestrator.
///
/// Header values are trusted as-is; a corrupt header degrades backoff
/// quality but never fails the pipeline.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RateLimitTracker {
    limit: u32,
    remaining: u32,
    reset_seconds: u64,
}

impl RateLimitTracker {
    /// Create a tracker with no observed budget yet.
    pub fn new() -> Self {
        Self::default()
    }

    /// Fold one response's headers into the state. Fields absent from the
    /// headers keep their previous value.
    pub fn update(&mut self, headers: &RateLimitHeaders) {
        if let Some(limit) = headers.limit {
            self.limit = limit;
        }
        if let Some(remaining) = headers.remaining {
            self.remaining = remaining;
        }
        if let Some(reset) = headers.reset_seconds {
            self.reset_seconds = reset;
        }
    }

    /// Remaining budget as a percentage of the limit. A zero limit reads as
    /// 0% so an unobserved or corrupt budget errs toward waiting.
    pub fn remaining_percent(&self) -> f64 {
        if self.limit == 0 {
            return 0.0;
        }
        (self.remaining as f64 / self.limit as f64) * 100.0
    }

    /// Wait to insert between successful pages.
    ///
    /// | remaining % | wait |
    /// |---|---|
    /// | ≤ 5  | `reset_seconds` if known, else 900s |
    /// | ≤ 10 | 5s |
    /// | ≤ 20 | 2s |
    /// | > 20 | 150ms |
    pub fn wait_policy(&self) -> Duration {
        let percent = self.remaining_percent();
        if percent <= 5.0 {
            if self.reset_seconds > 0 {
                // Saturate: a hostile reset header must not overflow.
                Duration::from_millis(self.reset_seconds.saturating_mul(1000))
            } else {
                EXHAUSTED_WAIT
            }
        } else if percent <= 10.0 {
            LOW_WAIT
        } else if percent <= 20.0 {
            ELEVATED_WAIT
        } else {
            COURTESY_WAIT
        }
    }

    /// Whether the next wait is a deliberate throttle rather than the
    /// baseline courtesy pause.
    pub fn is_throttling(&self) -> bool {
        self.wait_policy() > COURTESY_WAIT
    }

    /// Reset seconds to hand the fetcher as a 429 fallback, when known.
    pub fn reset_hint(&self) -> Option<u64> {
        (self.reset_seconds > 0).then_some(self.reset_seconds)
    }

    /// Immutable copy for progress events.
    pub fn snapshot(&self) -> RateLimitSnapshot {
        RateLimitSnapshot {
            limit: self.limit,
            remaining: self.remaining,
            reset_seconds: self.reset_seconds,
        }
    }
}

/// Serializable rate-limit state attached to `waiting` progress events.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RateLimitSnapshot {
    /// Quota size
    pub limit: u32,
    /// Requests remaining
    pub remaining: u32,
    /// Seconds until the window resets
    pub reset_seconds: u64,
}
