//! Binary crate for the `weather-report` command-line tool.
//!
//! This crate focuses on:
//! - Parsing CLI arguments
//! - Interactive menu and key configuration
//! - File logging and human-facing output

use clap::Parser;

mod cli;
mod interactive;
mod logging;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cmd = cli::Cli::parse();
    cmd.run().await
}
