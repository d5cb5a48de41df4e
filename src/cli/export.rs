//! Export command implementation.

use crate::cli::CliError;
use crate::config::Config;
use crate::fetcher::{GraphQlClient, RetryWait};
use crate::output::csv_filename;
use crate::pipeline::{ExportOutcome, Exporter, LogSink};
use crate::shutdown::CancelToken;
use chrono::NaiveDate;
use clap::Parser;
use std::path::PathBuf;
use tracing::info;

/// Arguments for `export`.
#[derive(Debug, Parser)]
pub struct ExportArgs {
    /// Day to export, YYYY-MM-DD (UTC)
    #[arg(long)]
    pub date: String,

    /// Output path; defaults to product-hunt-posts-<date>.csv in the
    /// current directory
    #[arg(long)]
    pub output: Option<PathBuf>,
}

impl ExportArgs {
    /// Run the export and write the CSV to disk.
    pub async fn execute(&self, config: &Config, cancel: CancelToken) -> Result<(), CliError> {
        let date = NaiveDate::parse_from_str(&self.date, "%Y-%m-%d").map_err(|_| {
            CliError::InvalidArgument(format!(
                "invalid date '{}', expected YYYY-MM-DD",
                self.date
            ))
        })?;

        let token = config.require_token()?;
        let client = GraphQlClient::new(config.api_url.clone(), token.to_string())
            .with_retry_wait(RetryWait::Uncapped);
        let sink = LogSink;
        let exporter = Exporter::new(&client, &sink).with_cancel(cancel);

        match exporter.run(date).await? {
            ExportOutcome::Csv { filename, csv, rows } => {
                let path = self
                    .output
                    .clone()
                    .unwrap_or_else(|| PathBuf::from(csv_filename(date)));
                std::fs::write(&path, csv.as_bytes())?;
                info!(
                    path = %path.display(),
                    rows,
                    suggested_name = %filename,
                    "CSV written"
                );
            }
            ExportOutcome::Empty => {
                info!("no posts found for {date}, nothing written");
            }
        }
        Ok(())
    }
}
