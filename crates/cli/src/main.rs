//! Quarry Ledger CLI - Database migrations and offline cost computation.
//!
//! # Usage
//!
//! ```bash
//! # Run database migrations
//! quarry-cli migrate
//!
//! # Fill in the derived fields of a block record
//! quarry-cli compute block --input block.json
//!
//! # Same, reading stdin and forcing the area-only formula
//! cat gala.json | quarry-cli compute gala --formula area
//! ```
//!
//! # Commands
//!
//! - `migrate` - Run database migrations
//! - `compute` - Print a batch record with its derived fields filled in

#![cfg_attr(not(test), forbid(unsafe_code))]

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use quarry_ledger_core::{BatchKind, DimensionFormula};

mod commands;

#[derive(Parser)]
#[command(name = "quarry-cli")]
#[command(author, version, about = "Quarry Ledger CLI tools")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run database migrations
    Migrate,
    /// Compute derived cost and area fields for a batch record
    Compute {
        /// Batch kind (`block`, `todi`, `gala`, `stone`)
        kind: BatchKind,

        /// JSON file to read (default: stdin)
        #[arg(short, long)]
        input: Option<PathBuf>,

        /// Override the configured formula (`volumetric` or `area`)
        #[arg(short, long)]
        formula: Option<DimensionFormula>,
    },
}

#[tokio::main]
async fn main() {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    let result: Result<(), Box<dyn std::error::Error>> = run(cli).await;

    if let Err(e) = result {
        tracing::error!("Command failed: {e}");
        std::process::exit(1);
    }
}

async fn run(cli: Cli) -> Result<(), Box<dyn std::error::Error>> {
    match cli.command {
        Commands::Migrate => commands::migrate::run().await?,
        Commands::Compute {
            kind,
            input,
            formula,
        } => commands::compute::run(kind, input.as_deref(), formula)?,
    }
    Ok(())
}
