//! Export route handlers.

use crate::fetcher::{GraphQlClient, RetryWait};
use crate::pipeline::{
    ChannelSink, ExportError, ExportOutcome, Exporter, LogSink, ProgressEvent,
};
use crate::server::AppState;
use crate::shutdown::CancelToken;
use axum::extract::State;
use axum::http::{header, StatusCode};
use axum::response::sse::{Event, Sse};
use axum::response::{IntoResponse, Response};
use axum::Json;
use chrono::NaiveDate;
use futures::Stream;
use serde::Deserialize;
use serde_json::json;
use std::convert::Infallible;
use std::time::Duration;
use tokio::sync::mpsc;
use tracing::error;

/// Per-retry wait cap for the buffered endpoint, which has a caller waiting
/// on the whole response.
const BUFFERED_RETRY_CAP: Duration = Duration::from_secs(30);

/// Inbound request body.
#[derive(Debug, Deserialize)]
pub struct ExportRequest {
    /// Calendar date, `YYYY-MM-DD`
    pub date: Option<String>,
}

fn parse_date(body: Option<&ExportRequest>) -> Result<NaiveDate, String> {
    let raw = body
        .and_then(|b| b.date.as_deref())
        .ok_or_else(|| "date is required (YYYY-MM-DD)".to_string())?;
    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .map_err(|_| format!("invalid date '{raw}', expected YYYY-MM-DD"))
}

fn error_body(status: StatusCode, message: String, details: Option<String>) -> Response {
    let mut body = json!({ "error": message });
    if let Some(details) = details {
        body["details"] = json!(details);
    }
    (status, Json(body)).into_response()
}

/// Buffered export: runs the pipeline to completion and returns the CSV as
/// an attachment. "No posts" is a 404, never a 500.
pub async fn export_handler(
    State(state): State<AppState>,
    body: Option<Json<ExportRequest>>,
) -> Response {
    let date = match parse_date(body.as_deref()) {
        Ok(date) => date,
        Err(message) => return error_body(StatusCode::BAD_REQUEST, message, None),
    };

    let token = match state.config.require_token() {
        Ok(token) => token.to_string(),
        Err(e) => {
            return error_body(StatusCode::INTERNAL_SERVER_ERROR, e.to_string(), None);
        }
    };

    let client = GraphQlClient::new(state.config.api_url.clone(), token)
        .with_retry_wait(RetryWait::Capped(BUFFERED_RETRY_CAP));
    let sink = LogSink;
    let exporter = Exporter::new(&client, &sink);

    match exporter.run(date).await {
        Ok(ExportOutcome::Csv { filename, csv, .. }) => {
            let headers = [
                (
                    header::CONTENT_TYPE,
                    "text/csv; charset=utf-8".to_string(),
                ),
                (
                    header::CONTENT_DISPOSITION,
                    format!("attachment; filename=\"{filename}\""),
                ),
            ];
            (headers, csv).into_response()
        }
        Ok(ExportOutcome::Empty) => error_body(
            StatusCode::NOT_FOUND,
            format!("No posts found for {date}"),
            None,
        ),
        Err(e) => {
            error!("export failed: {e}");
            let (status, details) = match &e {
                ExportError::Fetch(fetch) => (StatusCode::BAD_GATEWAY, Some(fetch.to_string())),
                _ => (StatusCode::INTERNAL_SERVER_ERROR, None),
            };
            error_body(status, "Export failed".to_string(), details)
        }
    }
}

/// Streaming export: every progress event is pushed to the client as an SSE
/// frame. A dropped connection cancels the in-flight pipeline through the
/// channel sink's token.
pub async fn export_stream_handler(
    State(state): State<AppState>,
    body: Option<Json<ExportRequest>>,
) -> Sse<impl Stream<Item = Result<Event, Infallible>>> {
    let (tx, mut rx) = mpsc::unbounded_channel::<ProgressEvent>();

    match (parse_date(body.as_deref()), state.config.require_token()) {
        (Err(message), _) => {
            let _ = tx.send(ProgressEvent::Error {
                message,
                details: None,
            });
        }
        (_, Err(e)) => {
            let _ = tx.send(ProgressEvent::Error {
                message: e.to_string(),
                details: None,
            });
        }
        (Ok(date), Ok(token)) => {
            let cancel = CancelToken::new();
            let sink = ChannelSink::new(tx, cancel.clone());
            let client = GraphQlClient::new(state.config.api_url.clone(), token.to_string())
                .with_retry_wait(RetryWait::Uncapped);

            tokio::spawn(async move {
                let exporter = Exporter::new(&client, &sink).with_cancel(cancel);
                // Terminal events are already in the sink; nothing left to
                // report here.
                let _ = exporter.run(date).await;
            });
        }
    }

    let stream = async_stream::stream! {
        while let Some(event) = rx.recv().await {
            match Event::default().json_data(&event) {
                Ok(frame) => yield Ok::<_, Infallible>(frame),
                Err(e) => {
                    error!("failed to serialize progress event: {e}");
                    break;
                }
            }
        }
    };

    Sse::new(stream)
}
