//! # Release Tree Walker
//!
//! Enumerates `releases_root/<category>/<version>/Assemblies/<file>` so that
//! the phases never deal with the directory convention themselves.
//!
//! The walk is lazy across `Assemblies` directories and eager within one: a
//! directory's listing is snapshotted when the walk reaches it. Phases that
//! mutate the directory they are walking (moving native siblings, renaming)
//! therefore see a stable listing, and must re-check that an artifact still
//! exists before acting on it.
//!
//! Entries are yielded in directory-listing order. That order is platform
//! dependent, and it decides which copy survives when two artifacts compete
//! for the same destination.

use std::fs;
use std::path::{Path, PathBuf};

use walkdir::WalkDir;

use crate::defaults;
use crate::error::{Error, Result};
use crate::key::ArtifactKey;

/// A file discovered under an `Assemblies` directory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Artifact {
    pub path: PathBuf,
    /// Case-folded file stem.
    pub stem: ArtifactKey,
    /// Extension as found on disk, without the dot.
    pub extension: Option<String>,
}

impl Artifact {
    pub fn from_path(path: PathBuf) -> Option<Self> {
        let stem = ArtifactKey::stem_of(&path)?;
        let extension = path
            .extension()
            .and_then(|e| e.to_str())
            .map(|e| e.to_string());
        Some(Self {
            path,
            stem,
            extension,
        })
    }

    pub fn file_name(&self) -> &str {
        self.path
            .file_name()
            .and_then(|n| n.to_str())
            .unwrap_or_default()
    }

    /// Directory holding the artifact.
    pub fn dir(&self) -> &Path {
        self.path.parent().unwrap_or_else(|| Path::new(""))
    }

    /// Whether the artifact's extension equals `extension`, ignoring case.
    pub fn has_extension(&self, extension: &str) -> bool {
        self.extension
            .as_deref()
            .is_some_and(|e| e.eq_ignore_ascii_case(extension))
    }
}

/// One `<category>/<version>/Assemblies` directory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AssembliesDir {
    pub category: String,
    pub version: String,
    pub path: PathBuf,
}

/// Walker over a release tree.
#[derive(Debug, Clone)]
pub struct ReleaseTree {
    root: PathBuf,
    skip_category: Option<ArtifactKey>,
}

impl ReleaseTree {
    pub fn new(root: &Path) -> Self {
        Self {
            root: root.to_path_buf(),
            skip_category: None,
        }
    }

    /// Excludes a category, compared case-insensitively.
    pub fn skipping(mut self, category: &str) -> Self {
        self.skip_category = Some(ArtifactKey::new(category));
        self
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Every `Assemblies` directory in the tree.
    ///
    /// Version entries without an `Assemblies` folder are logged and skipped.
    /// A missing release root yields nothing.
    pub fn assemblies_dirs(&self) -> Vec<AssembliesDir> {
        let mut dirs = Vec::new();
        if !self.root.is_dir() {
            log::warn!("Release root {} does not exist", self.root.display());
            return dirs;
        }

        // No min_depth: filter_entry must see the category level to prune it.
        let versions = WalkDir::new(&self.root)
            .max_depth(2)
            .into_iter()
            .filter_entry(|entry| entry.depth() != 1 || !self.is_skipped(entry.file_name()));

        for entry in versions {
            let entry = match entry {
                Ok(entry) => entry,
                Err(e) => {
                    log::warn!("Skipping unreadable release entry: {}", e);
                    continue;
                }
            };
            if entry.depth() != 2 || !entry.file_type().is_dir() {
                continue;
            }

            match self.assemblies_in(entry.path()) {
                Ok(dir) => dirs.push(dir),
                Err(e) => log::warn!("{}", e),
            }
        }

        dirs
    }

    /// Lazily yields every artifact in the tree.
    pub fn artifacts(&self) -> impl Iterator<Item = Artifact> {
        self.assemblies_dirs()
            .into_iter()
            .flat_map(|dir| list_artifacts(&dir.path))
    }

    fn is_skipped(&self, name: &std::ffi::OsStr) -> bool {
        match (&self.skip_category, name.to_str()) {
            (Some(skip), Some(name)) => ArtifactKey::new(name) == *skip,
            _ => false,
        }
    }

    fn assemblies_in(&self, version_dir: &Path) -> Result<AssembliesDir> {
        let layout_error = |message: &str| Error::TreeLayout {
            path: version_dir.to_path_buf(),
            message: message.to_string(),
        };

        let path = version_dir.join(defaults::ASSEMBLIES_DIR);
        if !path.is_dir() {
            return Err(layout_error("missing 'Assemblies' folder; skipping"));
        }

        let name_of = |p: Option<&Path>| {
            p.and_then(|p| p.file_name())
                .and_then(|n| n.to_str())
                .map(|n| n.to_string())
        };
        let version =
            name_of(Some(version_dir)).ok_or_else(|| layout_error("version folder is not valid UTF-8"))?;
        let category = name_of(version_dir.parent())
            .ok_or_else(|| layout_error("category folder is not valid UTF-8"))?;

        Ok(AssembliesDir {
            category,
            version,
            path,
        })
    }
}

/// Snapshot of the regular files directly inside `dir`.
pub fn list_artifacts(dir: &Path) -> Vec<Artifact> {
    let entries = match fs::read_dir(dir) {
        Ok(entries) => entries,
        Err(e) => {
            log::warn!("Could not list {}: {}", dir.display(), e);
            return Vec::new();
        }
    };

    entries
        .filter_map(|entry| entry.ok())
        .filter(|entry| entry.file_type().is_ok_and(|t| t.is_file()))
        .filter_map(|entry| Artifact::from_path(entry.path()))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn touch(root: &Path, relative: &str) {
        let path = root.join(relative);
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(path, b"x").unwrap();
    }

    fn sorted_names(tree: &ReleaseTree) -> Vec<String> {
        let mut names: Vec<String> = tree
            .artifacts()
            .map(|a| {
                a.path
                    .strip_prefix(tree.root())
                    .unwrap()
                    .to_string_lossy()
                    .replace('\\', "/")
            })
            .collect();
        names.sort();
        names
    }

    #[test]
    fn test_walk_yields_assemblies_files() {
        let temp = TempDir::new().unwrap();
        touch(temp.path(), "Core/1.4/Assemblies/A.dll");
        touch(temp.path(), "Core/1.5/Assemblies/A.dll");
        touch(temp.path(), "Core/1.5/Assemblies/A.pdb");
        touch(temp.path(), "Core/1.5/Defs/Thing.xml");
        fs::create_dir_all(temp.path().join("Core/1.5/Assemblies/net48")).unwrap();

        let tree = ReleaseTree::new(temp.path());
        assert_eq!(
            sorted_names(&tree),
            vec![
                "Core/1.4/Assemblies/A.dll",
                "Core/1.5/Assemblies/A.dll",
                "Core/1.5/Assemblies/A.pdb",
            ]
        );
    }

    #[test]
    fn test_walk_skips_bootstrap_case_insensitively() {
        let temp = TempDir::new().unwrap();
        touch(temp.path(), "bootstrap/1.5/Assemblies/Boot.dll");
        touch(temp.path(), "Core/1.5/Assemblies/A.dll");

        let tree = ReleaseTree::new(temp.path()).skipping("Bootstrap");
        assert_eq!(sorted_names(&tree), vec!["Core/1.5/Assemblies/A.dll"]);

        let all = ReleaseTree::new(temp.path());
        assert_eq!(sorted_names(&all).len(), 2);
    }

    #[test]
    fn test_layout_errors_are_skipped() {
        let temp = TempDir::new().unwrap();
        fs::create_dir_all(temp.path().join("Core/1.3")).unwrap();
        touch(temp.path(), "Core/1.5/Assemblies/A.dll");
        touch(temp.path(), "README.md");
        touch(temp.path(), "Core/notes.txt");

        let tree = ReleaseTree::new(temp.path());
        let dirs = tree.assemblies_dirs();
        assert_eq!(dirs.len(), 1);
        assert_eq!(dirs[0].category, "Core");
        assert_eq!(dirs[0].version, "1.5");
    }

    #[test]
    fn test_missing_root_yields_nothing() {
        let tree = ReleaseTree::new(Path::new("/nonexistent/Releases"));
        assert_eq!(tree.artifacts().count(), 0);
    }

    #[test]
    fn test_artifact_parts() {
        let artifact = Artifact::from_path(PathBuf::from("x/Assemblies/Foo.RW15.DLL")).unwrap();
        assert_eq!(artifact.stem.as_str(), "foo.rw15");
        assert_eq!(artifact.extension.as_deref(), Some("DLL"));
        assert!(artifact.has_extension("dll"));
        assert_eq!(artifact.file_name(), "Foo.RW15.DLL");
        assert_eq!(artifact.dir(), Path::new("x/Assemblies"));
    }
}
