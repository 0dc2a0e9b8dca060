//! Copies a combed project into a mod folder.
//!
//! The target directory is removed first, so it always mirrors the project.

use std::fs;
use std::path::{Path, PathBuf};

use crate::error::{Error, Result};
use crate::layout::{self, ProjectLayout};

/// Directories copied when present.
const OPTIONAL_DIRS: &[&str] = &["About"];

/// Files copied when present.
const OPTIONAL_FILES: &[&str] = &["LICENSE", "README.md", "LoadFolders.xml"];

/// What a deploy copied.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Deployment {
    pub target: PathBuf,
    pub files: usize,
    /// Optional entries that were not found.
    pub skipped: Vec<String>,
}

/// Copy the project's shipped content into `target`.
///
/// `Common/` and `Releases/` must exist. The corpus document is copied as
/// well, under its own file name.
pub fn execute(layout: &ProjectLayout, target: &Path) -> Result<Deployment> {
    let target = layout::normalize(&layout.root().join(target));
    if layout.root().starts_with(&target) {
        return Err(Error::Filesystem {
            operation: "deploy to".to_string(),
            path: target,
            message: "the target contains the project itself".to_string(),
        });
    }

    for required in [layout.common(), layout.releases()] {
        if !required.is_dir() {
            return Err(Error::Filesystem {
                operation: "deploy".to_string(),
                path: required.to_path_buf(),
                message: "directory does not exist".to_string(),
            });
        }
    }

    if target.exists() {
        log::debug!("Removing previous deployment {}", target.display());
        fs::remove_dir_all(&target).map_err(|e| Error::filesystem("delete", &target, e))?;
    }
    fs::create_dir_all(&target).map_err(|e| Error::filesystem("create directory", &target, e))?;

    let mut deployment = Deployment {
        target: target.clone(),
        ..Deployment::default()
    };

    for dir in OPTIONAL_DIRS {
        let source = layout.root().join(dir);
        if source.is_dir() {
            deployment.files += crate::filesystem::copy_tree(&source, &target.join(dir))?;
        } else {
            log::warn!("{} does not exist; skipping", source.display());
            deployment.skipped.push(dir.to_string());
        }
    }

    for dir in [layout.common(), layout.releases()] {
        let name = dir.file_name().unwrap_or_default();
        deployment.files += crate::filesystem::copy_tree(dir, &target.join(name))?;
    }

    let corpus_name = layout
        .corpus()
        .file_name()
        .and_then(|n| n.to_str())
        .unwrap_or(crate::defaults::CORPUS_FILE);
    let files = OPTIONAL_FILES
        .iter()
        .map(|name| (layout.root().join(name), name.to_string()))
        .chain(std::iter::once((
            layout.corpus().to_path_buf(),
            corpus_name.to_string(),
        )));

    for (source, name) in files {
        if !source.is_file() {
            log::warn!("{} does not exist; skipping", source.display());
            deployment.skipped.push(name);
            continue;
        }
        let dest = target.join(&name);
        fs::copy(&source, &dest).map_err(|e| Error::filesystem("copy", &source, e))?;
        deployment.files += 1;
    }

    Ok(deployment)
}
