//! # Release Comb CLI
//!
//! This is the binary entry point for the `release-comb` command-line tool.
//!
//! Its primary responsibilities are:
//! - Parsing command-line arguments using `clap`.
//! - Setting up logging.
//! - Executing the appropriate command and turning errors into a non-zero exit.
//!
//! All of the actual work lives in the `release_comb` library crate.

mod cli;
mod commands;

use anyhow::Result;
use clap::Parser;

fn main() -> Result<()> {
    let cli = cli::Cli::parse();
    cli.execute()
}
