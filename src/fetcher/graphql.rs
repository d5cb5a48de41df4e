//! GraphQL HTTP client for the Product Hunt posts feed.
//!
//! Wraps `reqwest` with:
//! - bearer-token authorization
//! - rate-limit header parsing
//! - bounded retry on HTTP 429 honoring `retry-after`
//! - normalization of GraphQL-level errors into typed failures

use async_trait::async_trait;
use reqwest::header::HeaderMap;
use reqwest::Client;
use tracing::{debug, warn};

use crate::fetcher::query::{GraphQlRequest, GraphQlResponse};
use crate::fetcher::{
    FetcherError, FetcherResult, PageFetcher, PostPage, RateLimitHeaders, RetryWait,
};
use std::time::Duration;

/// Retry ceiling for HTTP 429 responses. Other failures are not retried.
pub const MAX_RETRIES: u32 = 3;

/// Fallback wait when a 429 carries no `retry-after` and no reset hint.
pub const DEFAULT_RETRY_WAIT: Duration = Duration::from_secs(60);

const HEADER_RATE_LIMIT: &str = "x-rate-limit-limit";
const HEADER_RATE_REMAINING: &str = "x-rate-limit-remaining";
const HEADER_RATE_RESET: &str = "x-rate-limit-reset";
const HEADER_RETRY_AFTER: &str = "retry-after";

/// HTTP client for the posts feed.
pub struct GraphQlClient {
    client: Client,
    api_url: String,
    token: String,
    retry_wait: RetryWait,
}

impl GraphQlClient {
    /// Create a new client.
    ///
    /// # Arguments
    /// * `api_url` - GraphQL endpoint (overridable for tests)
    /// * `token` - Product Hunt developer token
    pub fn new(api_url: impl Into<String>, token: impl Into<String>) -> Self {
        Self {
            client: Client::new(),
            api_url: api_url.into(),
            token: token.into(),
            retry_wait: RetryWait::Uncapped,
        }
    }

    /// Set the 429 retry wait policy.
    pub fn with_retry_wait(mut self, retry_wait: RetryWait) -> Self {
        self.retry_wait = retry_wait;
        self
    }

    /// The configured endpoint URL.
    pub fn api_url(&self) -> &str {
        &self.api_url
    }

    async fn request_page(
        &self,
        cursor: Option<&str>,
        reset_hint: Option<u64>,
    ) -> FetcherResult<PostPage> {
        for attempt in 0..=MAX_RETRIES {
            let body = GraphQlRequest::posts_page(cursor);
            let response = self
                .client
                .post(&self.api_url)
                .bearer_auth(&self.token)
                .json(&body)
                .send()
                .await
                .map_err(|e| FetcherError::Network(e.to_string()))?;

            let status = response.status();

            if status.as_u16() == 429 {
                if attempt < MAX_RETRIES {
                    let wait = throttle_wait(response.headers(), reset_hint);
                    let wait = self.retry_wait.clamp(wait);
                    warn!(
                        attempt = attempt + 1,
                        wait_secs = wait.as_secs(),
                        "throttled by upstream, backing off"
                    );
                    tokio::time::sleep(wait).await;
                    continue;
                }
                return Err(FetcherError::Throttled(MAX_RETRIES));
            }

            if !status.is_success() {
                let text = status
                    .canonical_reason()
                    .unwrap_or("unknown status")
                    .to_string();
                return Err(FetcherError::Upstream(format!("{} {}", status.as_u16(), text)));
            }

            let rate_limit = parse_rate_limit_headers(response.headers());
            debug!(?rate_limit, "page fetched");

            let envelope: GraphQlResponse = response
                .json()
                .await
                .map_err(|e| FetcherError::Parse(e.to_string()))?;

            if !envelope.errors.is_empty() {
                let joined = envelope
                    .errors
                    .iter()
                    .map(|e| e.message.as_str())
                    .collect::<Vec<_>>()
                    .join("; ");
                return Err(FetcherError::Upstream(joined));
            }

            let data = envelope
                .data
                .ok_or_else(|| FetcherError::Parse("response carried no data".to_string()))?;

            let connection = data.posts;
            return Ok(PostPage {
                posts: connection.edges.into_iter().map(|edge| edge.node).collect(),
                has_next: connection.page_info.has_next_page,
                next_cursor: connection.page_info.end_cursor,
                rate_limit,
            });
        }

        // The loop always returns; MAX_RETRIES + 1 iterations cover every path.
        Err(FetcherError::Throttled(MAX_RETRIES))
    }
}

#[async_trait]
impl PageFetcher for GraphQlClient {
    async fn fetch_page(
        &self,
        cursor: Option<&str>,
        reset_hint: Option<u64>,
    ) -> FetcherResult<PostPage> {
        self.request_page(cursor, reset_hint).await
    }
}

/// Wait before retrying a 429: `retry-after` header, else the tracker's
/// reset seconds, else 60s.
fn throttle_wait(headers: &HeaderMap, reset_hint: Option<u64>) -> Duration {
    if let Some(secs) = header_u64(headers, HEADER_RETRY_AFTER) {
        return Duration::from_secs(secs);
    }
    match reset_hint {
        Some(secs) if secs > 0 => Duration::from_secs(secs),
        _ => DEFAULT_RETRY_WAIT,
    }
}

/// Extract the rate-limit triplet from response headers.
fn parse_rate_limit_headers(headers: &HeaderMap) -> RateLimitHeaders {
    RateLimitHeaders {
        limit: header_u64(headers, HEADER_RATE_LIMIT).map(|v| v as u32),
        remaining: header_u64(headers, HEADER_RATE_REMAINING).map(|v| v as u32),
        reset_seconds: header_u64(headers, HEADER_RATE_RESET),
    }
}

fn header_u64(headers: &HeaderMap, name: &str) -> Option<u64> {
    let raw = headers.get(name)?.to_str().ok()?;
    match raw.trim().parse::<u64>() {
        Ok(value) => Some(value),
        Err(e) => {
            warn!("unparsable {name} header '{raw}': {e}");
            None
        }
    }
}
