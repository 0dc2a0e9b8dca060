//! Case-folded artifact identifiers.
//!
//! Artifact file names are case-insensitive identifiers. Every name that is
//! compared anywhere in the pipeline goes through [`ArtifactKey`] exactly once,
//! at ingestion, so that all lookups compare already-folded strings.

use std::fmt;
use std::path::Path;

/// A lowercase-folded file stem or file name.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ArtifactKey(String);

impl ArtifactKey {
    /// Folds `name` into a key.
    pub fn new(name: &str) -> Self {
        Self(name.to_lowercase())
    }

    /// Key of a path's file stem (`Foo.RW15.dll` -> `foo.rw15`).
    pub fn stem_of(path: &Path) -> Option<Self> {
        path.file_stem().and_then(|s| s.to_str()).map(Self::new)
    }

    /// Key of a path's full file name (`Foo.dll` -> `foo.dll`).
    pub fn file_name_of(path: &Path) -> Option<Self> {
        path.file_name().and_then(|s| s.to_str()).map(Self::new)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Whether this key starts with `prefix`. Both sides are folded.
    pub fn starts_with(&self, prefix: &ArtifactKey) -> bool {
        !prefix.0.is_empty() && self.0.starts_with(&prefix.0)
    }
}

impl From<&str> for ArtifactKey {
    fn from(name: &str) -> Self {
        Self::new(name)
    }
}

impl fmt::Display for ArtifactKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Whether `extension` equals `expected`, ignoring case.
pub fn extension_is(path: &Path, expected: &str) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .is_some_and(|e| e.eq_ignore_ascii_case(expected))
}
