//! # Locate Command Implementation
//!
//! Prints the Steam library that holds the game, discovering and caching it
//! on first use.

use std::path::PathBuf;

use anyhow::Result;
use clap::Args;

use release_comb::defaults;
use release_comb::install::{self, InstallProbe};

use super::Context;

/// Find the Steam library holding the game
#[derive(Args, Debug)]
pub struct LocateArgs {
    /// Ignore and overwrite the cached location
    #[arg(long)]
    pub refresh: bool,

    /// Cache file for the discovered location
    #[arg(long, value_name = "FILE", default_value = defaults::INSTALL_CACHE_FILE)]
    pub cache: PathBuf,

    /// Print the game directory instead of the library
    #[arg(long)]
    pub game: bool,
}

pub fn execute(args: LocateArgs, context: &Context) -> Result<()> {
    let cache = context.resolve(&args.cache);
    if args.refresh && cache.exists() {
        std::fs::remove_file(&cache)?;
    }

    let library = InstallProbe::new(&cache)
        .locate()
        .ok_or_else(|| anyhow::anyhow!("Could not find a Steam library with the game installed"))?;

    if args.game {
        println!("{}", install::game_dir(&library).display());
    } else {
        println!("{}", library.display());
    }
    Ok(())
}
