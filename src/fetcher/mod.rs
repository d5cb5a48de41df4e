//! Page fetching from the Product Hunt GraphQL API.

use crate::Post;
use async_trait::async_trait;
use std::time::Duration;

pub mod graphql;
pub mod query;

pub use graphql::GraphQlClient;

/// Fetcher errors
#[derive(Debug, thiserror::Error)]
pub enum FetcherError {
    /// Non-success status or GraphQL-level error payload
    #[error("upstream error: {0}")]
    Upstream(String),

    /// HTTP 429 with the retry budget exhausted
    #[error("rate limited by upstream after {0} retries")]
    Throttled(u32),

    /// Transport-level failure (DNS, connect, timeout)
    #[error("network error: {0}")]
    Network(String),

    /// Response body did not match the expected shape
    #[error("parse error: {0}")]
    Parse(String),
}

/// Result type for fetcher operations
pub type FetcherResult<T> = Result<T, FetcherError>;

/// How long a 429 retry is allowed to sleep.
///
/// Latency-bounded callers (the buffered HTTP endpoint) cap the wait so a
/// hostile `retry-after` cannot stall the response; streaming and CLI
/// callers wait the full advertised duration.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RetryWait {
    /// Sleep exactly as long as the upstream asks
    Uncapped,
    /// Sleep at most this long per retry
    Capped(Duration),
}

impl RetryWait {
    /// Clamp a computed wait to this policy.
    pub fn clamp(&self, wait: Duration) -> Duration {
        match self {
            RetryWait::Uncapped => wait,
            RetryWait::Capped(max) => wait.min(*max),
        }
    }
}

/// Rate-limit fields observed on one response.
///
/// Absent or corrupt headers surface as `None`; the tracker keeps its
/// previous value for any field that is `None`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RateLimitHeaders {
    /// Quota size for the current window
    pub limit: Option<u32>,
    /// Requests remaining in the current window
    pub remaining: Option<u32>,
    /// Seconds until the window resets
    pub reset_seconds: Option<u64>,
}

/// One page of the posts feed plus its pagination and rate-limit state.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PostPage {
    /// Posts in upstream order (assumed newest-first)
    pub posts: Vec<Post>,
    /// Whether upstream reports another page
    pub has_next: bool,
    /// Cursor for the next page, when one exists
    pub next_cursor: Option<String>,
    /// Rate-limit headers observed on this response
    pub rate_limit: RateLimitHeaders,
}

/// A source of paginated post pages.
///
/// `reset_hint` carries the orchestrator's last known rate-limit reset
/// seconds so a 429 without a `retry-after` header still backs off sensibly.
#[async_trait]
pub trait PageFetcher: Send + Sync {
    /// Fetch one page, starting from `cursor` (absent on the first call).
    async fn fetch_page(
        &self,
        cursor: Option<&str>,
        reset_hint: Option<u64>,
    ) -> FetcherResult<PostPage>;
}
