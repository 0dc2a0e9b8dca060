//! On-disk primitives used by the pipeline.
//!
//! Every mutation of the release tree goes through the [`Disk`] trait. The
//! [`HostDisk`] implementation touches the real filesystem; [`SimulatedDisk`]
//! records planned creations and removals on top of it so that a dry run sees
//! the same existence answers a real run would.
//!
//! Existence lookups are case-insensitive on every platform, because artifact
//! names are case-insensitive identifiers.

use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};

use walkdir::WalkDir;

use crate::error::{Error, Result};
use crate::key::ArtifactKey;

/// Existence checks and file mutations.
pub trait Disk {
    /// Finds a regular file directly in `dir` whose name folds to `name`.
    fn find(&self, dir: &Path, name: &ArtifactKey) -> Option<PathBuf>;

    /// Removes a file. Returns `false` when it did not exist.
    fn remove_file(&mut self, path: &Path) -> Result<bool>;

    /// Moves a file, creating the destination's parent and replacing any file
    /// already at `to`. Returns `false` when `from` did not exist.
    fn move_file(&mut self, from: &Path, to: &Path) -> Result<bool>;

    /// Regular files directly inside `dir`, in listing order.
    fn list(&self, dir: &Path) -> Vec<PathBuf>;

    /// Creates `dir` and its parents.
    fn create_dir_all(&mut self, dir: &Path) -> Result<()>;

    /// Whether a file matching `path`'s name exists in its directory.
    fn exists(&self, path: &Path) -> bool {
        match (path.parent(), ArtifactKey::file_name_of(path)) {
            (Some(dir), Some(name)) => self.find(dir, &name).is_some(),
            _ => false,
        }
    }

    /// Whether mutations are only being recorded.
    fn is_simulated(&self) -> bool {
        false
    }
}

/// The real filesystem.
#[derive(Debug, Default, Clone, Copy)]
pub struct HostDisk;

impl Disk for HostDisk {
    /// The returned path carries the name as listed, never the folded key.
    fn find(&self, dir: &Path, name: &ArtifactKey) -> Option<PathBuf> {
        self.list(dir)
            .into_iter()
            .find(|path| ArtifactKey::file_name_of(path).as_ref() == Some(name))
    }

    fn list(&self, dir: &Path) -> Vec<PathBuf> {
        match fs::read_dir(dir) {
            Ok(entries) => entries
                .filter_map(|entry| entry.ok())
                .filter(|entry| entry.file_type().is_ok_and(|t| t.is_file()))
                .map(|entry| entry.path())
                .collect(),
            Err(_) => Vec::new(),
        }
    }

    fn create_dir_all(&mut self, dir: &Path) -> Result<()> {
        fs::create_dir_all(dir).map_err(|e| Error::filesystem("create directory", dir, e))
    }

    fn remove_file(&mut self, path: &Path) -> Result<bool> {
        if !path.is_file() {
            return Ok(false);
        }
        fs::remove_file(path).map_err(|e| Error::filesystem("delete", path, e))?;
        Ok(true)
    }

    fn move_file(&mut self, from: &Path, to: &Path) -> Result<bool> {
        if !from.is_file() {
            return Ok(false);
        }
        if let Some(parent) = to.parent() {
            fs::create_dir_all(parent).map_err(|e| Error::filesystem("create directory", parent, e))?;
        }

        if let Err(rename_error) = fs::rename(from, to) {
            // Renames cannot cross devices; fall back to copy and delete.
            fs::copy(from, to).map_err(|_| Error::filesystem("move", from, rename_error))?;
            fs::remove_file(from).map_err(|e| Error::filesystem("delete", from, e))?;
        }
        Ok(true)
    }
}

/// Overlay that records mutations instead of performing them.
#[derive(Debug, Default)]
pub struct SimulatedDisk {
    host: HostDisk,
    created: HashSet<PathBuf>,
    removed: HashSet<PathBuf>,
}

impl SimulatedDisk {
    pub fn new() -> Self {
        Self::default()
    }
}

impl Disk for SimulatedDisk {
    fn find(&self, dir: &Path, name: &ArtifactKey) -> Option<PathBuf> {
        let created = self.created.iter().find(|path| {
            path.parent() == Some(dir) && ArtifactKey::file_name_of(path).as_ref() == Some(name)
        });
        if let Some(path) = created {
            return Some(path.clone());
        }

        self.host
            .find(dir, name)
            .filter(|path| !self.removed.contains(path))
    }

    fn list(&self, dir: &Path) -> Vec<PathBuf> {
        let mut files: Vec<PathBuf> = self
            .host
            .list(dir)
            .into_iter()
            .filter(|path| !self.removed.contains(path))
            .collect();
        for path in &self.created {
            if path.parent() == Some(dir) && !files.contains(path) {
                files.push(path.clone());
            }
        }
        files
    }

    fn create_dir_all(&mut self, _dir: &Path) -> Result<()> {
        Ok(())
    }

    fn remove_file(&mut self, path: &Path) -> Result<bool> {
        if !self.exists(path) {
            return Ok(false);
        }
        self.created.remove(path);
        self.removed.insert(path.to_path_buf());
        Ok(true)
    }

    fn move_file(&mut self, from: &Path, to: &Path) -> Result<bool> {
        if !self.exists(from) {
            return Ok(false);
        }
        self.created.remove(from);
        self.removed.insert(from.to_path_buf());
        self.removed.remove(to);
        self.created.insert(to.to_path_buf());
        Ok(true)
    }

    fn is_simulated(&self) -> bool {
        true
    }
}

/// Recursively moves the file tree under `src` into `dest`, overwriting files
/// that already exist there, then removes `src`. Returns the number of files
/// moved.
pub fn merge_tree_into(src: &Path, dest: &Path) -> Result<usize> {
    let mut moved = 0;

    for entry in WalkDir::new(src).min_depth(1) {
        let entry = entry.map_err(|e| Error::Filesystem {
            operation: "walk".to_string(),
            path: src.to_path_buf(),
            message: e.to_string(),
        })?;
        let relative = match entry.path().strip_prefix(src) {
            Ok(relative) => relative,
            Err(_) => continue,
        };
        let target = dest.join(relative);

        if entry.file_type().is_dir() {
            fs::create_dir_all(&target).map_err(|e| Error::filesystem("create directory", &target, e))?;
        } else {
            if target.is_dir() {
                fs::remove_dir_all(&target).map_err(|e| Error::filesystem("delete", &target, e))?;
            }
            fs::copy(entry.path(), &target).map_err(|e| Error::filesystem("copy", entry.path(), e))?;
            moved += 1;
        }
    }

    fs::remove_dir_all(src).map_err(|e| Error::filesystem("delete", src, e))?;
    Ok(moved)
}

/// Recursively copies `src` into `dest`, creating directories as needed.
pub fn copy_tree(src: &Path, dest: &Path) -> Result<usize> {
    let mut copied = 0;

    for entry in WalkDir::new(src) {
        let entry = entry.map_err(|e| Error::Filesystem {
            operation: "walk".to_string(),
            path: src.to_path_buf(),
            message: e.to_string(),
        })?;
        let relative = match entry.path().strip_prefix(src) {
            Ok(relative) => relative,
            Err(_) => continue,
        };
        let target = dest.join(relative);

        if entry.file_type().is_dir() {
            fs::create_dir_all(&target).map_err(|e| Error::filesystem("create directory", &target, e))?;
        } else {
            fs::copy(entry.path(), &target).map_err(|e| Error::filesystem("copy", entry.path(), e))?;
            copied += 1;
        }
    }

    Ok(copied)
}
