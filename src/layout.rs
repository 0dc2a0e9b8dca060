//! Project directory layout.
//!
//! Resolves the conventional paths of a release project (release tree, shared
//! output directories, corpus document) from a root and [`Settings`], so that
//! the phases never assemble raw paths themselves.

use std::path::{Component, Path, PathBuf};

use crate::config::Settings;
use crate::defaults;

/// Which shared bundle a directory corresponds to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SharedBundle {
    Libraries,
    Natives,
}

/// Resolved paths of one project.
#[derive(Debug, Clone)]
pub struct ProjectLayout {
    root: PathBuf,
    releases: PathBuf,
    common: PathBuf,
    corpus: PathBuf,
}

impl ProjectLayout {
    pub fn new(root: &Path, settings: &Settings) -> Self {
        Self {
            root: normalize(root),
            releases: normalize(&root.join(&settings.releases)),
            common: normalize(&root.join(&settings.common)),
            corpus: normalize(&root.join(&settings.corpus)),
        }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// `Releases/`
    pub fn releases(&self) -> &Path {
        &self.releases
    }

    /// `Common/`
    pub fn common(&self) -> &Path {
        &self.common
    }

    pub fn corpus(&self) -> &Path {
        &self.corpus
    }

    /// `Common/Libraries/Assemblies/`
    pub fn libraries_dir(&self) -> PathBuf {
        self.bundle_dir(SharedBundle::Libraries)
    }

    /// `Common/Natives/Assemblies/`
    pub fn natives_dir(&self) -> PathBuf {
        self.bundle_dir(SharedBundle::Natives)
    }

    pub fn bundle_dir(&self, bundle: SharedBundle) -> PathBuf {
        let name = match bundle {
            SharedBundle::Libraries => defaults::LIBRARIES_DIR,
            SharedBundle::Natives => defaults::NATIVES_DIR,
        };
        self.common.join(name).join(defaults::ASSEMBLIES_DIR)
    }

    /// Resolves a corpus bundle root (relative to the project root) and
    /// reports whether it designates one of the shared bundles.
    ///
    /// Both `Common/Libraries` and `Common/Libraries/Assemblies` match.
    pub fn shared_bundle_for(&self, bundle_root: &Path) -> Option<SharedBundle> {
        let resolved = self.resolve(bundle_root);
        [SharedBundle::Libraries, SharedBundle::Natives]
            .into_iter()
            .find(|bundle| {
                let dir = self.bundle_dir(*bundle);
                resolved == dir || dir.parent() == Some(resolved.as_path())
            })
    }

    /// Joins `relative` onto the project root and normalizes the result.
    pub fn resolve(&self, relative: &Path) -> PathBuf {
        normalize(&self.root.join(relative))
    }
}

/// Lexically normalizes a path: drops `.` components and folds `..` into its
/// parent. Does not touch the filesystem.
pub fn normalize(path: &Path) -> PathBuf {
    let mut out = PathBuf::new();
    for component in path.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => {
                if !out.pop() {
                    out.push("..");
                }
            }
            other => out.push(other.as_os_str()),
        }
    }
    out
}
