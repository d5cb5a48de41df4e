//! HTTP service exposing the export pipeline.
//!
//! Two endpoints drive the same pipeline over different transports:
//!
//! - `POST /api/export` runs the export to completion and returns the CSV
//!   as a download attachment (the buffered, latency-bounded variant)
//! - `POST /api/export/stream` returns a server-sent-events stream of
//!   progress events, terminated by a `complete` or `error` event
//!
//! Routing and request parsing are deliberately thin; all behavior lives in
//! [`crate::pipeline`].

pub mod routes;

pub use routes::{export_handler, export_stream_handler};

use crate::config::Config;
use axum::routing::post;
use axum::Router;
use std::sync::Arc;
use tracing::info;

/// Server errors
#[derive(Debug, thiserror::Error)]
pub enum ServerError {
    /// Socket bind or serve failure
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Shared state handed to every handler.
#[derive(Clone)]
pub struct AppState {
    /// Startup configuration
    pub config: Arc<Config>,
}

/// Build the service router.
pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/api/export", post(export_handler))
        .route("/api/export/stream", post(export_stream_handler))
        .with_state(state)
}

/// Bind and serve until the process exits.
pub async fn serve(config: Config) -> Result<(), ServerError> {
    let addr = config.bind_address;
    let state = AppState {
        config: Arc::new(config),
    };
    let app = router(state);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    info!("listening on {addr}");
    axum::serve(listener, app).await?;
    Ok(())
}
