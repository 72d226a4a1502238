//! schemagen CLI tool

#![forbid(unsafe_code)]

use anyhow::Result;
use clap::Parser;
use schemagen::observability;
use schemagen_cli::{Cli, Commands};

fn main() -> Result<()> {
    let cli = Cli::parse();
    observability::init(&cli.observability())?;

    match &cli.command {
        Commands::Generate(cmd) => cmd.execute()?,
        Commands::Tables(cmd) => cmd.execute()?,
        Commands::Init(cmd) => cmd.execute()?,
    }

    Ok(())
}
