//! CLI argument parsing and command dispatch

use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand};

use crate::commands::{self, Context};

/// Release Comb - Deduplicate a multi-version release tree into a shared layout
#[derive(Parser, Debug)]
#[command(name = "release-comb")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Subcommand to execute
    #[command(subcommand)]
    command: Commands,

    /// Colorize output (always, never, auto)
    #[arg(long, global = true, value_name = "WHEN", default_value = "auto")]
    color: String,

    /// Set log level (error, warn, info, debug, trace). RUST_LOG takes precedence
    #[arg(long, global = true, value_name = "LEVEL", default_value = "warn")]
    log_level: String,

    /// Project root holding Releases/, Common/ and the corpus document
    #[arg(long, global = true, value_name = "DIR", env = "RELEASE_COMB_ROOT", default_value = ".")]
    root: PathBuf,

    /// Settings file (defaults to release-comb.yaml under the project root)
    #[arg(long, global = true, value_name = "FILE", env = "RELEASE_COMB_SETTINGS")]
    settings: Option<PathBuf>,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Flatten, deduplicate and normalize the release tree
    Comb(commands::comb::CombArgs),

    /// Copy the project into a mod folder
    Deploy(commands::deploy::DeployArgs),

    /// Validate the corpus document and show what it declares
    Corpus(commands::corpus::CorpusArgs),

    /// Show the mod's package id and targeted host version
    Metadata(commands::metadata::MetadataArgs),

    /// Put the mod and its dependencies at the front of the active mod list
    Activate(commands::activate::ActivateArgs),

    /// Find the Steam library holding the game
    Locate(commands::locate::LocateArgs),

    /// Generate shell completion scripts
    Completions(commands::completions::CompletionsArgs),
}

impl Cli {
    /// Execute the CLI command
    pub fn execute(self) -> Result<()> {
        init_logging(&self.log_level);

        let context = Context {
            root: self.root,
            settings: self.settings,
            color: self.color,
        };

        match self.command {
            Commands::Comb(args) => commands::comb::execute(args, &context),
            Commands::Deploy(args) => commands::deploy::execute(args, &context),
            Commands::Corpus(args) => commands::corpus::execute(args, &context),
            Commands::Metadata(args) => commands::metadata::execute(args, &context),
            Commands::Activate(args) => commands::activate::execute(args, &context),
            Commands::Locate(args) => commands::locate::execute(args, &context),
            Commands::Completions(args) => commands::completions::execute(args),
        }
    }
}

fn init_logging(level: &str) {
    let env = env_logger::Env::default().default_filter_or(level);
    // A second initialisation (as in tests) keeps the first logger.
    let _ = env_logger::Builder::from_env(env)
        .format_timestamp(None)
        .format_target(false)
        .try_init();
}
