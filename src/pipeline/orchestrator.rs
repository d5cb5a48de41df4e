//! The fetch-filter orchestrator.
//!
//! One [`Exporter::run`] call drives a complete export as a single
//! sequential task: fetch a page, filter it against the date window, fold
//! rate-limit headers, consult the early-stop heuristic, sleep, repeat.
//! Suspension points (the network call and the sleeps) race against the
//! cancellation token so a disconnected client or Ctrl+C stops the loop
//! without delivering a partial CSV.

use crate::fetcher::PageFetcher;
use crate::output::csv::{csv_filename, encode_table, post_row, CSV_HEADER};
use crate::pipeline::config::MAX_PAGES;
use crate::pipeline::early_stop::EarlyStop;
use crate::pipeline::progress::{ProgressEvent, ProgressSink};
use crate::pipeline::rate_limit::RateLimitTracker;
use crate::pipeline::window::DateWindow;
use crate::pipeline::ExportError;
use crate::shutdown::CancelToken;
use crate::Post;
use chrono::NaiveDate;
use tracing::{debug, info, warn};

/// Terminal result of a successful export run.
#[derive(Debug, Clone, PartialEq)]
pub enum ExportOutcome {
    /// At least one post matched; a CSV was generated
    Csv {
        /// Suggested download filename
        filename: String,
        /// Full CSV text, BOM included
        csv: String,
        /// Data row count
        rows: usize,
    },
    /// No post matched the requested date. Not a failure.
    Empty,
}

/// Drives one export end to end.
pub struct Exporter<'a> {
    fetcher: &'a dyn PageFetcher,
    sink: &'a dyn ProgressSink,
    cancel: CancelToken,
}

impl<'a> Exporter<'a> {
    /// Create an exporter over a page source and an event sink.
    pub fn new(fetcher: &'a dyn PageFetcher, sink: &'a dyn ProgressSink) -> Self {
        Self {
            fetcher,
            sink,
            cancel: CancelToken::new(),
        }
    }

    /// Attach a cancellation token checked at every suspension point.
    pub fn with_cancel(mut self, cancel: CancelToken) -> Self {
        self.cancel = cancel;
        self
    }

    /// Run the export for one calendar date.
    ///
    /// Emits the full event lifecycle into the sink, including the terminal
    /// `complete` or `error` event, and returns the outcome. Rows already
    /// accumulated are discarded on any error; no partial CSV is produced.
    pub async fn run(&self, date: NaiveDate) -> Result<ExportOutcome, ExportError> {
        match self.run_inner(date).await {
            Ok(ExportOutcome::Empty) => {
                // Distinct "not found" outcome: surfaced to streaming
                // consumers as a terminal error event, but not an error to
                // the caller.
                self.sink.emit(ProgressEvent::Error {
                    message: format!("No posts found for {date}"),
                    details: None,
                });
                Ok(ExportOutcome::Empty)
            }
            Ok(outcome) => Ok(outcome),
            Err(error) => {
                let details = match &error {
                    ExportError::Fetch(fetch) => Some(fetch.to_string()),
                    _ => None,
                };
                self.sink.emit(ProgressEvent::Error {
                    message: format!("Export failed: {error}"),
                    details,
                });
                Err(error)
            }
        }
    }

    async fn run_inner(&self, date: NaiveDate) -> Result<ExportOutcome, ExportError> {
        let window = DateWindow::for_date(date);
        let mut tracker = RateLimitTracker::new();
        let mut early_stop = EarlyStop::new();
        let mut matched: Vec<Post> = Vec::new();
        let mut cursor: Option<String> = None;
        let mut fetched = 0usize;
        let mut pages = 0usize;

        self.sink.emit(ProgressEvent::Start {
            message: format!("Fetching posts for {date}"),
        });

        loop {
            if self.cancel.is_cancelled() {
                return Err(ExportError::Cancelled);
            }

            let page = tokio::select! {
                _ = self.cancel.cancelled() => return Err(ExportError::Cancelled),
                result = self.fetcher.fetch_page(cursor.as_deref(), tracker.reset_hint()) => result?,
            };
            pages += 1;
            fetched += page.posts.len();

            // Filter while fetching: peak memory stays at one page plus the
            // matched set.
            matched.extend(page.posts.iter().filter(|p| window.accepts(p)).cloned());

            self.sink.emit(ProgressEvent::Progress {
                message: format!(
                    "Page {pages}: {fetched} posts fetched, {} within {date}",
                    matched.len()
                ),
                page: pages,
                fetched,
                matched: matched.len(),
            });

            tracker.update(&page.rate_limit);
            let stop_early = early_stop.observe_page(&page.posts, &window);

            // Termination checks, in priority order.
            if !page.has_next {
                debug!(pages, "upstream reports no further pages");
                break;
            }
            if page.posts.is_empty() {
                debug!(pages, "empty page, stopping");
                break;
            }
            if pages >= MAX_PAGES {
                warn!(pages, "page ceiling reached, stopping");
                break;
            }
            if stop_early {
                info!(
                    pages,
                    streak = early_stop.streak(),
                    "remaining pages predate the window, stopping early"
                );
                break;
            }

            cursor = page.next_cursor;

            let wait = tracker.wait_policy();
            if tracker.is_throttling() {
                self.sink.emit(ProgressEvent::Waiting {
                    message: format!(
                        "Rate limit budget low, waiting {}s",
                        wait.as_secs()
                    ),
                    wait_ms: wait.as_millis() as u64,
                    rate_limit: tracker.snapshot(),
                });
            }
            tokio::select! {
                _ = self.cancel.cancelled() => return Err(ExportError::Cancelled),
                _ = tokio::time::sleep(wait) => {}
            }
        }

        self.sink.emit(ProgressEvent::Filtering {
            message: format!("{} posts matched {date}", matched.len()),
            matched: matched.len(),
        });

        if matched.is_empty() {
            return Ok(ExportOutcome::Empty);
        }

        self.sink.emit(ProgressEvent::Generating {
            message: format!("Generating CSV for {} posts", matched.len()),
        });

        let rows: Vec<Vec<String>> = matched.iter().map(post_row).collect();
        let csv = encode_table(&CSV_HEADER, &rows).map_err(|e| ExportError::Output(e.to_string()))?;
        let filename = csv_filename(date);

        self.sink.emit(ProgressEvent::Complete {
            message: format!("Export complete: {} posts", rows.len()),
            filename: filename.clone(),
            csv: csv.clone(),
            count: rows.len(),
        });

        Ok(ExportOutcome::Csv {
            filename,
            csv,
            rows: rows.len(),
        })
    }
}
