//! Shared test utilities for integration and E2E tests.
//!
//! This module provides a project fixture (a temporary directory holding a
//! corpus document and a release tree) plus helpers for asserting on the
//! combed result.
//!
//! ## Usage
//!
//! ```rust,ignore
//! mod common;
//! use common::prelude::*;
//!
//! #[test]
//! fn test_example() {
//!     let fixture = TestFixture::new()
//!         .with_corpus(corpora::LIBRARY_AND_NATIVE)
//!         .with_artifact("A/1.4/Assemblies/Lib.dll");
//!     // ... test code
//! }
//! ```

use assert_fs::prelude::*;
use std::path::{Path, PathBuf};

use release_comb::config::Settings;
use release_comb::error::Result;
use release_comb::layout::ProjectLayout;
use release_comb::phases::orchestrator::{self, Options};
use release_comb::phases::Report;

/// Re-export commonly used test dependencies for convenience.
pub mod prelude {
    #[allow(unused_imports)]
    pub use assert_cmd::cargo::cargo_bin_cmd;
    pub use assert_fs::prelude::*;
    #[allow(unused_imports)]
    pub use predicates::prelude::*;

    #[allow(unused_imports)]
    pub use super::corpora;
    #[allow(unused_imports)]
    pub use super::files_under;
    pub use super::TestFixture;
}

/// Corpus documents used across tests.
#[allow(dead_code)]
pub mod corpora {
    /// No bundles at all.
    pub const EMPTY: &str = "<Corpus><Resources /></Corpus>";

    /// `Lib` is a shared library, `libsodium` a shared native module and
    /// `Mod.Core` a versioned release resource.
    pub const LIBRARY_AND_NATIVE: &str = r#"<?xml version="1.0" encoding="utf-8"?>
<Corpus>
  <Resources>
    <ResourceBundle Root="Common/Libraries">
      <Resource Type="Assembly" Name="Lib" Root="Assemblies" />
      <Resource Type="NetStandardAssembly" Name="System.Memory" Root="Assemblies" Optional="true" />
    </ResourceBundle>
    <ResourceBundle Root="Common/Natives">
      <Resource Type="Dll" Name="libsodium" Root="Assemblies" />
    </ResourceBundle>
    <ResourceBundle Root="Releases/Core" Versioned="true">
      <Resource Type="Assembly" Name="Mod.Core" Root="Assemblies" />
    </ResourceBundle>
  </Resources>
</Corpus>"#;

    /// Lacks the `Resources` collection.
    pub const MALFORMED: &str = "<Corpus><Bundles /></Corpus>";
}

/// A temporary project directory.
pub struct TestFixture {
    temp_dir: assert_fs::TempDir,
    settings: Settings,
}

#[allow(dead_code)]
impl TestFixture {
    /// Create a new test fixture with an empty temporary directory.
    pub fn new() -> Self {
        Self {
            temp_dir: assert_fs::TempDir::new().expect("Failed to create temp directory"),
            settings: Settings::default(),
        }
    }

    /// Write `Corpus.xml`.
    pub fn with_corpus(self, content: &str) -> Self {
        self.with_file("Corpus.xml", content)
    }

    /// Write `release-comb.yaml`. Also used by [`TestFixture::comb`].
    pub fn with_settings(mut self, content: &str) -> Self {
        self.settings = release_comb::config::parse(content).expect("Invalid settings");
        self.with_file("release-comb.yaml", content)
    }

    /// Add a file under `Releases/`, with its path as content.
    pub fn with_artifact(self, relative: &str) -> Self {
        let path = format!("Releases/{}", relative);
        self.with_file(&path, &path)
    }

    /// Add several files under `Releases/`.
    pub fn with_artifacts(self, relatives: &[&str]) -> Self {
        relatives
            .iter()
            .fold(self, |fixture, relative| fixture.with_artifact(relative))
    }

    /// Add a file with the given path and content.
    pub fn with_file(self, path: &str, content: &str) -> Self {
        self.temp_dir
            .child(path)
            .write_str(content)
            .expect("Failed to write file");
        self
    }

    /// Get the path to the temporary directory.
    pub fn path(&self) -> &Path {
        self.temp_dir.path()
    }

    pub fn layout(&self) -> ProjectLayout {
        ProjectLayout::new(self.path(), &self.settings)
    }

    pub fn exists(&self, relative: &str) -> bool {
        self.path().join(relative).is_file()
    }

    pub fn read(&self, relative: &str) -> String {
        std::fs::read_to_string(self.path().join(relative)).expect("Failed to read file")
    }

    /// Run the whole pipeline against this project.
    pub fn comb_with(&self, options: Options) -> Result<Report> {
        orchestrator::execute(&self.layout(), &self.settings, options, &mut |_| {})
    }

    pub fn comb(&self) -> Report {
        self.comb_with(Options::default()).expect("Comb failed")
    }

    /// Create a command configured to run in this fixture's directory.
    pub fn command(&self) -> assert_cmd::Command {
        let mut cmd = assert_cmd::cargo::cargo_bin_cmd!("release-comb");
        cmd.current_dir(self.path())
            .env_remove("RELEASE_COMB_ROOT")
            .env_remove("RELEASE_COMB_SETTINGS")
            .env("NO_COLOR", "1");
        cmd
    }
}

impl Default for TestFixture {
    fn default() -> Self {
        Self::new()
    }
}

/// Every file under `dir`, relative to it, with `/` separators, sorted.
#[allow(dead_code)]
pub fn files_under(dir: &Path) -> Vec<String> {
    let mut files: Vec<String> = walkdir::WalkDir::new(dir)
        .into_iter()
        .filter_map(|entry| entry.ok())
        .filter(|entry| entry.file_type().is_file())
        .map(|entry| relative(dir, entry.path()))
        .collect();
    files.sort();
    files
}

fn relative(dir: &Path, path: &Path) -> String {
    path.strip_prefix(dir)
        .map(PathBuf::from)
        .unwrap_or_else(|_| path.to_path_buf())
        .to_string_lossy()
        .replace('\\', "/")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fixture_writes_artifacts() {
        let fixture = TestFixture::new()
            .with_corpus(corpora::EMPTY)
            .with_artifact("A/1.5/Assemblies/X.dll");
        assert!(fixture.exists("Corpus.xml"));
        assert_eq!(
            fixture.read("Releases/A/1.5/Assemblies/X.dll"),
            "Releases/A/1.5/Assemblies/X.dll"
        );
    }

    #[test]
    fn test_files_under_is_sorted_and_relative() {
        let fixture = TestFixture::new()
            .with_artifacts(&["B/1.5/Assemblies/Y.dll", "A/1.4/Assemblies/X.dll"]);
        assert_eq!(
            files_under(&fixture.path().join("Releases")),
            vec!["A/1.4/Assemblies/X.dll", "B/1.5/Assemblies/Y.dll"]
        );
    }
}
