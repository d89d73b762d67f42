//! CLI for the Countries API Gateway

pub mod serve;

use clap::{Parser, Subcommand};

/// Countries API Gateway - Authenticated proxy for filtered country data
#[derive(Parser)]
#[command(name = "countries-gateway")]
#[command(version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand)]
pub enum Command {
    /// Run the API server
    Serve,
}
