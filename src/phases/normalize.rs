//! Phase 3: Version-Suffix Normalizer
//!
//! Modules compiled once per host version carry the version as a tag segment
//! (`Foo.RW15.dll`). The tag is stripped so every version folder ships the
//! module under one name (`Foo.dll`).
//!
//! When the stripped name already exists, the existing file is deleted and
//! the tagged file takes its place. Which copy survives therefore depends on
//! directory-listing order, which is platform dependent. This is deliberate:
//! no canonical tie-break is imposed.

use std::path::{Path, PathBuf};

use crate::companion::Companions;
use crate::error::Result;
use crate::filesystem::Disk;
use crate::key::ArtifactKey;
use crate::tree::ReleaseTree;

use super::Report;

/// The name `file_name` normalizes to, if it carries a version tag.
///
/// The name is split on `.` from the right into exactly three segments; the
/// middle one must start with `tag_prefix`, ignoring case. Case of the
/// remaining segments is preserved.
///
/// ```
/// use release_comb::phases::normalize::target_name;
///
/// assert_eq!(target_name("Foo.RW15.dll", "RW").as_deref(), Some("Foo.dll"));
/// assert_eq!(target_name("A.B.rw1_5.pdb", "RW").as_deref(), Some("A.B.pdb"));
/// assert_eq!(target_name("Foo.Bar.dll", "RW"), None);
/// assert_eq!(target_name("Foo.dll", "RW"), None);
/// ```
pub fn target_name(file_name: &str, tag_prefix: &str) -> Option<String> {
    let mut parts = file_name.rsplitn(3, '.');
    let extension = parts.next()?;
    let tag = parts.next()?;
    let root = parts.next()?;

    if root.is_empty() || tag_prefix.is_empty() {
        return None;
    }
    if !ArtifactKey::new(tag).starts_with(&ArtifactKey::new(tag_prefix)) {
        return None;
    }

    Some(format!("{}.{}", root, extension))
}

/// Strip version tags from every artifact in the tree. Debug-symbol files
/// are never renamed on their own; they follow their primary.
///
/// Returns the new paths of the renamed files.
pub fn execute<D: Disk + ?Sized>(
    tree: &ReleaseTree,
    tag_prefix: &str,
    companions: &Companions,
    disk: &mut D,
    report: &mut Report,
) -> Result<Vec<PathBuf>> {
    let mut renamed = Vec::new();
    for dir in tree.assemblies_dirs() {
        for path in disk.list(&dir.path) {
            if crate::key::extension_is(&path, companions.extension()) {
                continue;
            }
            if let Some(dest) = rename_one(&path, tag_prefix, companions, disk, report)? {
                renamed.push(dest);
            }
        }
    }
    Ok(renamed)
}

fn rename_one<D: Disk + ?Sized>(
    path: &Path,
    tag_prefix: &str,
    companions: &Companions,
    disk: &mut D,
    report: &mut Report,
) -> Result<Option<PathBuf>> {
    let Some(file_name) = path.file_name().and_then(|n| n.to_str()) else {
        return Ok(None);
    };
    let Some(target) = target_name(file_name, tag_prefix) else {
        return Ok(None);
    };
    if !disk.exists(path) {
        return Ok(None);
    }

    let dest = path.with_file_name(&target);
    if let Some(existing) = disk.find(dir_of(path), &ArtifactKey::new(&target)) {
        log::debug!("Replacing {} with {}", existing.display(), path.display());
        let removed = companions.remove(disk, &existing)?;
        if removed.companion {
            report.companions += 1;
        }
    }

    log::debug!("Renaming {} to {}", path.display(), target);
    let moved = companions.relocate(disk, path, &dest)?;
    if moved.primary {
        report.renamed += 1;
    }
    if moved.companion {
        report.companions += 1;
    }
    Ok(moved.primary.then_some(dest))
}

fn dir_of(path: &Path) -> &Path {
    path.parent().unwrap_or_else(|| Path::new(""))
}
