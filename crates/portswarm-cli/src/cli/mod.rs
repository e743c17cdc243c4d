//! CLI for the portswarm peer.

mod commands;

use anyhow::Result;
use clap::{Parser, Subcommand};
use portswarm_core::config;

use commands::{run_get, run_list, run_serve};

/// Top-level CLI for the portswarm peer.
#[derive(Debug, Parser)]
#[command(name = "portswarm")]
#[command(about = "Cooperative multi-peer file transfer over a fixed local port pool", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: CliCommand,
}

#[derive(Debug, Subcommand)]
pub enum CliCommand {
    /// Claim a port from the pool and serve the share directory.
    Serve,

    /// Enumerate files advertised across the pool.
    List,

    /// Download a file from every peer that holds it.
    Get {
        /// Advertised file name, exactly as listed.
        name: String,
    },
}

impl CliCommand {
    pub fn run_from_args() -> Result<()> {
        let cli = Cli::parse();
        let cfg = config::load_or_init()?;
        tracing::debug!("loaded config: {:?}", cfg);
        match cli.command {
            CliCommand::Serve => run_serve(&cfg),
            CliCommand::List => run_list(&cfg),
            CliCommand::Get { name } => {
                tracing::info!("get file={}", name);
                run_get(&cfg, &name)
            }
        }
    }
}
