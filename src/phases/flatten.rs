//! Phase 1: Framework-Folder Flattener
//!
//! Some builds drop their output into a runtime-specific subfolder
//! (`Assemblies/net48/`). Before anything is classified, that subfolder's
//! tree is merged upward into its `Assemblies` directory and removed, so the
//! nested files take part in deduplication.
//!
//! Every `Assemblies` directory is independent of the others, so the merges
//! run in parallel. The bootstrap category is flattened too.

use std::path::{Path, PathBuf};

use rayon::prelude::*;

use crate::error::Result;
use crate::filesystem;
use crate::key::ArtifactKey;
use crate::tree::ReleaseTree;

/// One merged framework folder.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Flattened {
    pub folder: PathBuf,
    pub files: usize,
}

/// Merge every `<category>/<version>/Assemblies/<framework_folder>` upward.
///
/// With `dry_run`, the folders are only discovered. Running this twice is a
/// no-op the second time, since the folders are gone.
pub fn execute(releases: &Path, framework_folder: &str, dry_run: bool) -> Result<Vec<Flattened>> {
    let name = ArtifactKey::new(framework_folder);
    let nested: Vec<(PathBuf, PathBuf)> = ReleaseTree::new(releases)
        .assemblies_dirs()
        .into_iter()
        .filter_map(|dir| find_folder(&dir.path, &name).map(|folder| (folder, dir.path)))
        .collect();

    if dry_run {
        return Ok(nested
            .into_iter()
            .map(|(folder, _)| {
                log::debug!("Would flatten {}", folder.display());
                Flattened { folder, files: 0 }
            })
            .collect());
    }

    nested
        .par_iter()
        .map(|(folder, assemblies)| {
            let files = filesystem::merge_tree_into(folder, assemblies)?;
            log::debug!("Flattened {} ({} files)", folder.display(), files);
            Ok(Flattened {
                folder: folder.clone(),
                files,
            })
        })
        .collect()
}

/// The subdirectory of `dir` whose name folds to `name`, if any.
fn find_folder(dir: &Path, name: &ArtifactKey) -> Option<PathBuf> {
    std::fs::read_dir(dir)
        .ok()?
        .filter_map(|entry| entry.ok())
        .filter(|entry| entry.file_type().is_ok_and(|t| t.is_dir()))
        .map(|entry| entry.path())
        .find(|path| ArtifactKey::file_name_of(path).as_ref() == Some(name))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    fn touch(root: &Path, relative: &str, content: &str) {
        let path = root.join(relative);
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(path, content).unwrap();
    }

    #[test]
    fn test_flatten_merges_and_removes_folder() {
        let temp = TempDir::new().unwrap();
        touch(temp.path(), "Core/1.5/Assemblies/net48/X.dll", "nested");
        touch(temp.path(), "Core/1.5/Assemblies/net48/X.pdb", "nested");
        touch(temp.path(), "Core/1.5/Assemblies/X.dll", "stale");
        touch(temp.path(), "Bootstrap/1.5/Assemblies/NET48/Boot.dll", "b");

        let flattened = execute(temp.path(), "net48", false).unwrap();
        assert_eq!(flattened.len(), 2);

        let assemblies = temp.path().join("Core/1.5/Assemblies");
        assert_eq!(fs::read_to_string(assemblies.join("X.dll")).unwrap(), "nested");
        assert!(assemblies.join("X.pdb").exists());
        assert!(!assemblies.join("net48").exists());
        assert!(temp.path().join("Bootstrap/1.5/Assemblies/Boot.dll").exists());
    }

    #[test]
    fn test_flatten_is_idempotent() {
        let temp = TempDir::new().unwrap();
        touch(temp.path(), "Core/1.5/Assemblies/net48/X.dll", "x");

        assert_eq!(execute(temp.path(), "net48", false).unwrap().len(), 1);
        assert!(execute(temp.path(), "net48", false).unwrap().is_empty());
    }

    #[test]
    fn test_dry_run_leaves_folder() {
        let temp = TempDir::new().unwrap();
        touch(temp.path(), "Core/1.5/Assemblies/net48/X.dll", "x");

        let flattened = execute(temp.path(), "net48", true).unwrap();
        assert_eq!(flattened.len(), 1);
        assert!(temp.path().join("Core/1.5/Assemblies/net48/X.dll").exists());
    }
}
