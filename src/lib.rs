//! # Product Hunt Exporter Library
//!
//! A library for exporting Product Hunt launches for a single calendar day
//! to CSV, built around a rate-limit aware, cursor-paginated fetch pipeline.
//!
//! ## Features
//!
//! - **Cursor Pagination**: Walks the Product Hunt GraphQL v2 posts feed page
//!   by page until the requested day is covered
//! - **Adaptive Backoff**: Courtesy throttling derived from the API's
//!   rate-limit response headers, plus bounded retries on HTTP 429
//! - **Streaming Filter**: Posts are filtered against the date window per
//!   page, bounding peak memory to one page plus the matched set
//! - **Early Stop**: Stops paginating once consecutive pages fall entirely
//!   before the requested day (the feed is assumed newest-first)
//! - **Live Progress**: Pluggable progress sinks, including a server-sent
//!   events transport for long-running requests
//!
//! ## Quick Start
//!
//! ```no_run
//! use product_hunt_exporter::fetcher::{GraphQlClient, RetryWait};
//! use product_hunt_exporter::pipeline::{Exporter, ExportOutcome, LogSink};
//! use chrono::NaiveDate;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let client = GraphQlClient::new("https://api.producthunt.com/v2/api/graphql", "token")
//!     .with_retry_wait(RetryWait::Uncapped);
//! let sink = LogSink;
//! let date = NaiveDate::from_ymd_opt(2024, 3, 15).unwrap();
//!
//! let exporter = Exporter::new(&client, &sink);
//! match exporter.run(date).await? {
//!     ExportOutcome::Csv { filename, csv, rows } => {
//!         println!("{filename}: {rows} rows, {} bytes", csv.len());
//!     }
//!     ExportOutcome::Empty => println!("no posts for that date"),
//! }
//! # Ok(())
//! # }
//! ```
//!
//! ## Architecture
//!
//! - [`fetcher`] - GraphQL page fetching with retry and header parsing
//! - [`pipeline`] - Fetch-filter orchestration, rate-limit tracking, early
//!   stop, progress events
//! - [`output`] - CSV encoding and row mapping
//! - [`server`] - HTTP endpoints (buffered download and SSE streaming)
//! - [`cli`] - Command implementations
//! - [`config`] - Environment configuration
//! - [`shutdown`] - Cooperative cancellation

#![warn(missing_docs)]
#![warn(clippy::all)]

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// CLI command implementations
pub mod cli;

/// Environment configuration
pub mod config;

/// GraphQL page fetching
pub mod fetcher;

/// CSV output encoding
pub mod output;

/// Fetch-filter orchestration
pub mod pipeline;

/// HTTP service endpoints
pub mod server;

/// Cooperative cancellation shared across modules
pub mod shutdown;

// Re-export commonly used types
pub use config::Config;
pub use shutdown::CancelToken;

/// A person attached to a post, either as a maker or as the hunter.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Contributor {
    /// Display name
    #[serde(default)]
    pub name: String,
    /// Product Hunt username
    #[serde(default)]
    pub username: String,
}

impl Contributor {
    /// Format as `Name (@username)` for CSV cells.
    pub fn display(&self) -> String {
        if self.username.is_empty() {
            self.name.clone()
        } else {
            format!("{} (@{})", self.name, self.username)
        }
    }
}

/// One Product Hunt launch as returned by the posts feed.
///
/// Timestamps are kept as the raw RFC3339 strings the API returns; a missing
/// or unparsable timestamp degrades to "absent" instead of failing the page.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Post {
    /// Opaque post id
    pub id: String,
    /// Launch name
    pub name: String,
    /// One-line tagline
    #[serde(default)]
    pub tagline: String,
    /// Product Hunt listing URL
    #[serde(default)]
    pub url: String,
    /// Longer description, if the maker provided one
    #[serde(default)]
    pub description: Option<String>,
    /// External product website
    #[serde(default)]
    pub website: Option<String>,
    /// Upvote count at fetch time
    #[serde(default)]
    pub votes_count: u32,
    /// Creation timestamp (RFC3339), if present
    #[serde(default)]
    pub created_at: Option<String>,
    /// Featured timestamp (RFC3339), if present; drives the date filter
    #[serde(default)]
    pub featured_at: Option<String>,
    /// Makers in upstream order
    #[serde(default)]
    pub makers: Vec<Contributor>,
    /// The hunter who posted the launch
    #[serde(default)]
    pub user: Option<Contributor>,
}

impl Post {
    /// Parse the featured timestamp into UTC.
    ///
    /// Returns `None` when the field is absent or does not parse; callers
    /// must treat such posts as outside any date window.
    pub fn featured_at_utc(&self) -> Option<DateTime<Utc>> {
        self.featured_at
            .as_deref()
            .and_then(|raw| DateTime::parse_from_rfc3339(raw).ok())
            .map(|dt| dt.with_timezone(&Utc))
    }
}
