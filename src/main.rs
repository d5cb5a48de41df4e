//! Main entry point for the product-hunt-exporter CLI.

use clap::Parser;
use product_hunt_exporter::cli::{Cli, Commands};
use product_hunt_exporter::config::Config;
use product_hunt_exporter::shutdown::CancelToken;
use tracing::error;
use tracing_subscriber::EnvFilter;

/// Initialize tracing subscriber with optional JSON formatting.
fn init_tracing() {
    // Check if JSON output is requested via environment variable
    let json_format = std::env::var("LOG_FORMAT")
        .map(|v| v.to_lowercase() == "json")
        .unwrap_or(false);

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("product_hunt_exporter=info"));

    if json_format {
        tracing_subscriber::fmt()
            .json()
            .with_env_filter(filter)
            .init();
    } else {
        tracing_subscriber::fmt().with_env_filter(filter).init();
    }
}

#[tokio::main]
async fn main() {
    init_tracing();

    let cli = Cli::parse();

    let config = match Config::from_env() {
        Ok(config) => config,
        Err(e) => {
            error!("Configuration failed: {e}");
            std::process::exit(1);
        }
    };

    // Ctrl+C cancels the in-flight export at its next suspension point.
    let cancel = CancelToken::new();
    tokio::spawn({
        let cancel = cancel.clone();
        async move {
            if tokio::signal::ctrl_c().await.is_ok() {
                tracing::warn!("Ctrl+C received - aborting export...");
                cancel.cancel();
            }
        }
    });

    let result = match cli.command {
        Commands::Export(ref args) => args
            .execute(&config, cancel.clone())
            .await
            .map_err(|e| anyhow::anyhow!(e)),
        Commands::Serve(ref args) => args.execute(&config).await.map_err(|e| anyhow::anyhow!(e)),
    };

    if let Err(e) = result {
        error!("Command failed: {}", e);
        std::process::exit(1);
    }
}
