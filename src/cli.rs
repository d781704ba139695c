//! Command-line interface for gomoku_rooms.

use clap::{Parser, Subcommand};

/// Gomoku Rooms - server-authoritative five-in-a-row over WebSocket
#[derive(Parser, Debug)]
#[command(name = "gomoku_rooms")]
#[command(about = "Room-based two-player gomoku server", long_about = None)]
#[command(version)]
pub struct Cli {
    /// Subcommand to run
    #[command(subcommand)]
    pub command: Command,
}

/// Available commands
#[derive(Subcommand, Debug)]
pub enum Command {
    /// Run the game server
    Serve {
        /// Host to bind to (overrides config file)
        #[arg(long)]
        host: Option<String>,

        /// Port to bind to (overrides config file)
        #[arg(short, long)]
        port: Option<u16>,

        /// Path to a TOML config file
        #[arg(long)]
        config: Option<std::path::PathBuf>,
    },
}
