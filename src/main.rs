//! Gomoku Rooms - room-based two-player five-in-a-row server.

#![warn(missing_docs)]

mod cli;
mod config;
mod games;
mod registry;
mod server;
mod session;
mod transport;

use anyhow::Result;
use clap::Parser;
use cli::{Cli, Command};
use config::ServerConfig;
use tracing::info;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env file
    dotenvy::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();

    match cli.command {
        Command::Serve { host, port, config } => {
            let base = match config {
                Some(path) => ServerConfig::from_file(path)?,
                None => ServerConfig::default(),
            };
            let config = base.with_bind(host, port);

            info!("Starting gomoku rooms server");
            server::serve(config).await
        }
    }
}
