//! # Error Handling
//!
//! This module defines the centralized error type for `release-comb`. It uses
//! `thiserror` to derive a single `Error` enum covering every failure mode of
//! the library, and a `Result<T>` alias used throughout.
//!
//! ## Taxonomy
//!
//! - **`MalformedCorpus` / `UnknownResourceType`**: the corpus document cannot
//!   be understood. Fatal, raised before the release tree is touched.
//! - **`TreeLayout`**: a category/version entry lacks its `Assemblies` folder.
//!   This is the only recoverable variant; the walker logs it and skips the
//!   entry.
//! - **`Filesystem`**: a move, delete, rename or mkdir failed. Carries the
//!   operation and the offending path. Never retried; the run aborts.
//! - **`Settings`**, **`Metadata`**, **`Activation`**: problems with the
//!   optional collaborator documents.
//!
//! Missing companion or sibling files are not errors and have no variant.

use std::path::{Path, PathBuf};

use thiserror::Error;

/// Main error type for release-comb operations
#[derive(Error, Debug)]
pub enum Error {
    /// The corpus document could not be parsed or lacks its `Resources`
    /// collection.
    #[error("Malformed corpus {}: {message}", path.display())]
    MalformedCorpus { path: PathBuf, message: String },

    /// A resource declared a `Type` that is not a known resource kind.
    #[error("Unknown resource type '{value}' (expected Dll, Assembly or NetStandardAssembly)")]
    UnknownResourceType { value: String },

    /// A release tree entry does not follow `<category>/<version>/Assemblies`.
    #[error("Unexpected release tree layout at {}: {message}", path.display())]
    TreeLayout { path: PathBuf, message: String },

    /// A filesystem mutation failed.
    #[error("Failed to {operation} {}: {message}", path.display())]
    Filesystem {
        operation: String,
        path: PathBuf,
        message: String,
    },

    /// The settings file could not be loaded.
    #[error("Settings error: {message}{}", hint.as_ref().map(|h| format!("\n  hint: {}", h)).unwrap_or_default())]
    Settings {
        message: String,
        /// Optional hint for how to fix the settings file
        hint: Option<String>,
    },

    /// A mod metadata document could not be read.
    #[error("Metadata error in {}: {message}", path.display())]
    Metadata { path: PathBuf, message: String },

    /// The mod activation list could not be read or written.
    #[error("Activation list error in {}: {message}", path.display())]
    Activation { path: PathBuf, message: String },

    /// An I/O error, wrapped from `std::io::Error`.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// A YAML parsing error, wrapped from `serde_yaml::Error`.
    #[error("YAML parsing error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    /// A JSON serialization error, wrapped from `serde_json::Error`.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// A regular expression error, wrapped from `regex::Error`.
    #[error("Regex error: {0}")]
    Regex(#[from] regex::Error),

    /// A semantic versioning parsing error, wrapped from `semver::Error`.
    #[error("Semver parsing error: {0}")]
    Semver(#[from] semver::Error),
}

impl Error {
    /// Builds a `Filesystem` error from an I/O failure on `path`.
    pub fn filesystem(operation: &str, path: &Path, source: std::io::Error) -> Self {
        Error::Filesystem {
            operation: operation.to_string(),
            path: path.to_path_buf(),
            message: source.to_string(),
        }
    }

    /// Whether this error must abort the run.
    ///
    /// Only `TreeLayout` is recovered locally by skipping the entry.
    pub fn is_fatal(&self) -> bool {
        !matches!(self, Error::TreeLayout { .. })
    }
}

/// A convenient type alias for `Result<T, Error>`.
pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display_malformed_corpus() {
        let error = Error::MalformedCorpus {
            path: PathBuf::from("Corpus.xml"),
            message: "missing 'Resources' element".to_string(),
        };
        let display = format!("{}", error);
        assert!(display.contains("Malformed corpus"));
        assert!(display.contains("Corpus.xml"));
        assert!(display.contains("Resources"));
    }

    #[test]
    fn test_error_display_unknown_resource_type() {
        let error = Error::UnknownResourceType {
            value: "Shader".to_string(),
        };
        let display = format!("{}", error);
        assert!(display.contains("Unknown resource type 'Shader'"));
    }

    #[test]
    fn test_error_display_filesystem() {
        let io = std::io::Error::new(std::io::ErrorKind::PermissionDenied, "denied");
        let error = Error::filesystem("delete", Path::new("Releases/A/1.4/Assemblies/X.dll"), io);
        let display = format!("{}", error);
        assert!(display.starts_with("Failed to delete"));
        assert!(display.contains("X.dll"));
        assert!(display.contains("denied"));
    }

    #[test]
    fn test_error_display_settings_with_hint() {
        let error = Error::Settings {
            message: "unknown field `releasez`".to_string(),
            hint: Some("Did you mean `releases`?".to_string()),
        };
        let display = format!("{}", error);
        assert!(display.contains("Settings error"));
        assert!(display.contains("hint:"));
        assert!(display.contains("releases"));
    }

    #[test]
    fn test_tree_layout_is_not_fatal() {
        let error = Error::TreeLayout {
            path: PathBuf::from("Releases/Core/1.5"),
            message: "no Assemblies folder".to_string(),
        };
        assert!(!error.is_fatal());
        assert!(Error::UnknownResourceType {
            value: "x".to_string()
        }
        .is_fatal());
    }

    #[test]
    fn test_error_from_io_error() {
        let io_error = std::io::Error::new(std::io::ErrorKind::NotFound, "File not found");
        let error: Error = io_error.into();
        let display = format!("{}", error);
        assert!(display.contains("I/O error"));
        assert!(display.contains("File not found"));
    }

    #[test]
    fn test_error_from_yaml_error() {
        let yaml_error = serde_yaml::from_str::<serde_yaml::Value>("invalid: [unclosed").unwrap_err();
        let error: Error = yaml_error.into();
        assert!(format!("{}", error).contains("YAML parsing error"));
    }
}
