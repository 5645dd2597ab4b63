//! Warden CLI
//!
//! Command-line interface for Kratos session validation and identity admin.

#![warn(clippy::all)]
#![forbid(unsafe_code)]

use anyhow::Result;
use clap::Parser;
use warden_cli::cli::Cli;
use warden_cli::{commands, logging};

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    logging::init(cli.verbose);

    commands::run(cli).await?;
    Ok(())
}
