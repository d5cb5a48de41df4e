//! CLI command implementations

pub mod export;
pub mod serve;

pub use export::ExportArgs;
pub use serve::ServeArgs;

use crate::config::ConfigError;
use crate::pipeline::ExportError;
use crate::server::ServerError;
use clap::{Parser, Subcommand};

/// Export Product Hunt launches for a day to CSV.
#[derive(Debug, Parser)]
#[command(name = "product-hunt-exporter", version, about)]
pub struct Cli {
    /// Subcommand to run
    #[command(subcommand)]
    pub command: Commands,
}

/// Available commands
#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Export one day's posts to a CSV file
    Export(ExportArgs),
    /// Run the HTTP service
    Serve(ServeArgs),
}

/// CLI errors
#[derive(Debug, thiserror::Error)]
pub enum CliError {
    /// Configuration error
    #[error("configuration error: {0}")]
    Config(#[from] ConfigError),

    /// Export error
    #[error("export error: {0}")]
    Export(#[from] ExportError),

    /// Server error
    #[error("server error: {0}")]
    Server(#[from] ServerError),

    /// Invalid argument
    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    /// Filesystem error while writing output
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}
