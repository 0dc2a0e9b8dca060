//! # CLI Command Implementations
//!
//! This module contains the implementation for each subcommand of the
//! `release-comb` command-line tool, one file per subcommand.
//!
//! ## Structure
//!
//! Each command module contains:
//! - An `Args` struct that defines the command-specific arguments and options,
//!   derived using `clap`.
//! - An `execute` function that takes the parsed `Args` (and the global
//!   [`Context`]) and performs the command's logic by calling into the
//!   `release_comb` library.

use std::path::{Path, PathBuf};

use anyhow::{Context as _, Result};

use release_comb::config::{self, Settings};
use release_comb::layout::ProjectLayout;
use release_comb::output::OutputConfig;

pub mod activate;
pub mod comb;
pub mod completions;
pub mod corpus;
pub mod deploy;
pub mod locate;
pub mod metadata;

/// Global options shared by every command.
#[derive(Debug, Clone)]
pub struct Context {
    pub root: PathBuf,
    pub settings: Option<PathBuf>,
    pub color: String,
}

impl Context {
    pub fn output(&self) -> OutputConfig {
        OutputConfig::from_env_and_flag(&self.color)
    }

    pub fn settings(&self) -> Result<Settings> {
        config::load(&self.root, self.settings.as_deref())
            .with_context(|| format!("Failed to load settings for {}", self.root.display()))
    }

    pub fn layout(&self, settings: &Settings) -> ProjectLayout {
        ProjectLayout::new(&self.root, settings)
    }

    /// Resolves a user-supplied path against the project root.
    pub fn resolve(&self, path: &Path) -> PathBuf {
        if path.is_absolute() {
            path.to_path_buf()
        } else {
            self.root.join(path)
        }
    }

    #[cfg(test)]
    pub fn for_root(root: &Path) -> Self {
        Self {
            root: root.to_path_buf(),
            settings: None,
            color: "never".to_string(),
        }
    }
}
