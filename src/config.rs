//! # Settings
//!
//! This module defines the optional `release-comb.yaml` settings file and its
//! parsing. Every field has a default (see [`crate::defaults`]), so a project
//! that follows the conventional layout needs no settings file at all.
//!
//! ```yaml
//! releases: Releases
//! common: Common
//! corpus: Corpus.xml
//! libraries:
//!   - Lib.Shared
//! promote_duplicates: true
//! ```
//!
//! Unknown keys are rejected so that a typo does not silently fall back to a
//! default.

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::defaults;
use crate::error::{Error, Result};

/// Project-level settings for a comb run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Settings {
    /// Release tree root, relative to the project root.
    pub releases: PathBuf,
    /// Shared output root, relative to the project root.
    pub common: PathBuf,
    /// Corpus document, relative to the project root.
    pub corpus: PathBuf,
    /// Runtime-specific subfolder merged upward before classification.
    pub framework_folder: String,
    /// Prefix of the host-version tag stripped by the normalizer.
    pub version_tag_prefix: String,
    /// Extension of debug-symbol companion files, without the dot.
    pub debug_symbol_extension: String,
    /// Category excluded from classification.
    pub bootstrap_category: String,
    /// Stems supplied by the host runtime. Always deleted.
    pub host_provided: Vec<String>,
    /// Stems never shipped. Always deleted.
    pub filtered: Vec<String>,
    /// Stems starting with this prefix are deleted.
    pub internal_prefix: String,
    /// Known-library allowlist. Matching artifacts are relocated into the
    /// shared libraries directory, replacing any stale copy.
    pub libraries: Vec<String>,
    /// Declare every stem found in two or more version folders a known
    /// library before classifying.
    pub promote_duplicates: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            releases: PathBuf::from(defaults::RELEASES_DIR),
            common: PathBuf::from(defaults::COMMON_DIR),
            corpus: PathBuf::from(defaults::CORPUS_FILE),
            framework_folder: defaults::FRAMEWORK_FOLDER.to_string(),
            version_tag_prefix: defaults::VERSION_TAG_PREFIX.to_string(),
            debug_symbol_extension: defaults::DEBUG_SYMBOL_EXTENSION.to_string(),
            bootstrap_category: defaults::BOOTSTRAP_CATEGORY.to_string(),
            host_provided: defaults::host_provided(),
            filtered: defaults::filtered(),
            internal_prefix: defaults::INTERNAL_PREFIX.to_string(),
            libraries: Vec::new(),
            promote_duplicates: false,
        }
    }
}

const KNOWN_KEYS: &str = "releases, common, corpus, framework_folder, version_tag_prefix, \
debug_symbol_extension, bootstrap_category, host_provided, filtered, internal_prefix, \
libraries, promote_duplicates";

/// Parse settings from a YAML string. An empty document yields the defaults.
pub fn parse(yaml: &str) -> Result<Settings> {
    if yaml.trim().is_empty() {
        return Ok(Settings::default());
    }

    let settings: Settings = serde_yaml::from_str(yaml).map_err(|e| {
        let message = e.to_string();
        let hint = if message.contains("unknown field") {
            Some(format!("Valid keys are: {}", KNOWN_KEYS))
        } else {
            None
        };
        Error::Settings { message, hint }
    })?;

    if settings.debug_symbol_extension.starts_with('.') {
        return Err(Error::Settings {
            message: format!(
                "debug_symbol_extension '{}' must not start with a dot",
                settings.debug_symbol_extension
            ),
            hint: Some("Write the extension bare, e.g. `pdb`".to_string()),
        });
    }

    Ok(settings)
}

/// Parse settings from a file.
pub fn from_file(path: &Path) -> Result<Settings> {
    let content = fs::read_to_string(path).map_err(|e| Error::Settings {
        message: format!("Failed to read {}: {}", path.display(), e),
        hint: None,
    })?;
    parse(&content)
}

/// Resolve the settings for a project.
///
/// An explicit path must exist. Otherwise `release-comb.yaml` under `root` is
/// used when present, and the defaults when not.
pub fn load(root: &Path, explicit: Option<&Path>) -> Result<Settings> {
    match explicit {
        Some(path) => from_file(path),
        None => {
            let candidate = root.join(defaults::SETTINGS_FILE);
            if candidate.is_file() {
                log::debug!("Using settings file {}", candidate.display());
                from_file(&candidate)
            } else {
                Ok(Settings::default())
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_empty_settings_are_defaults() {
        assert_eq!(parse("").unwrap(), Settings::default());
        assert_eq!(parse("   \n").unwrap(), Settings::default());
    }

    #[test]
    fn test_partial_settings_keep_other_defaults() {
        let settings = parse("releases: Out/Releases\nlibraries: [Lib.Shared]\n").unwrap();
        assert_eq!(settings.releases, PathBuf::from("Out/Releases"));
        assert_eq!(settings.libraries, vec!["Lib.Shared".to_string()]);
        assert_eq!(settings.common, PathBuf::from("Common"));
        assert_eq!(settings.framework_folder, "net48");
        assert!(!settings.promote_duplicates);
    }

    #[test]
    fn test_unknown_key_has_hint() {
        let err = parse("releasez: Foo\n").unwrap_err();
        let display = err.to_string();
        assert!(display.contains("unknown field"));
        assert!(display.contains("hint:"));
        assert!(display.contains("releases"));
    }

    #[test]
    fn test_dotted_extension_rejected() {
        let err = parse("debug_symbol_extension: .pdb\n").unwrap_err();
        assert!(matches!(err, Error::Settings { .. }));
    }

    #[test]
    fn test_load_prefers_project_file() {
        let temp = TempDir::new().unwrap();
        fs::write(
            temp.path().join(defaults::SETTINGS_FILE),
            "promote_duplicates: true\n",
        )
        .unwrap();

        let settings = load(temp.path(), None).unwrap();
        assert!(settings.promote_duplicates);
    }

    #[test]
    fn test_load_without_file_uses_defaults() {
        let temp = TempDir::new().unwrap();
        assert_eq!(load(temp.path(), None).unwrap(), Settings::default());
    }

    #[test]
    fn test_load_missing_explicit_file_fails() {
        let temp = TempDir::new().unwrap();
        let err = load(temp.path(), Some(&temp.path().join("nope.yaml"))).unwrap_err();
        assert!(err.to_string().contains("nope.yaml"));
    }
}
