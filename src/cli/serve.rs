//! Serve command implementation.

use crate::cli::CliError;
use crate::config::Config;
use crate::server;
use clap::Parser;
use std::net::SocketAddr;

/// Arguments for `serve`.
#[derive(Debug, Parser)]
pub struct ServeArgs {
    /// Bind address; overrides BIND_ADDRESS from the environment
    #[arg(long)]
    pub bind: Option<SocketAddr>,
}

impl ServeArgs {
    /// Run the HTTP service until the process exits.
    pub async fn execute(&self, config: &Config) -> Result<(), CliError> {
        let mut config = config.clone();
        if let Some(bind) = self.bind {
            config.bind_address = bind;
        }
        server::serve(config).await?;
        Ok(())
    }
}
