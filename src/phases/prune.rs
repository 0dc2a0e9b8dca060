//! Phase 4: Dangling shared-file prune.
//!
//! A file left in a release folder after classification is the copy that
//! ships. If the shared libraries directory still holds a file of the same
//! name, it is a leftover from an earlier run and is removed with its
//! companion. The bootstrap category is not consulted.
//!
//! Names the shared tables claim are never pruned: their shared copy is the
//! canonical one, and a release copy of the same name is the redundant side.

use std::collections::HashSet;
use std::path::Path;

use crate::companion::Companions;
use crate::error::Result;
use crate::filesystem::Disk;
use crate::key::ArtifactKey;
use crate::tree::ReleaseTree;

use super::{Report, SharedState};

pub fn execute<D: Disk + ?Sized>(
    tree: &ReleaseTree,
    libraries_dir: &Path,
    state: &SharedState,
    companions: &Companions,
    disk: &mut D,
    report: &mut Report,
) -> Result<()> {
    let shipped: HashSet<ArtifactKey> = tree
        .assemblies_dirs()
        .iter()
        .flat_map(|dir| disk.list(&dir.path))
        .filter(|path| !crate::key::extension_is(path, companions.extension()))
        .filter_map(|path| ArtifactKey::file_name_of(&path))
        .collect();

    for shared in disk.list(libraries_dir) {
        if crate::key::extension_is(&shared, companions.extension()) {
            continue;
        }
        let (Some(name), Some(stem)) = (
            ArtifactKey::file_name_of(&shared),
            ArtifactKey::stem_of(&shared),
        ) else {
            continue;
        };
        if !shipped.contains(&name) || state.is_shared(&stem) {
            continue;
        }

        log::debug!("Pruning {}", shared.display());
        let removed = companions.remove(disk, &shared)?;
        if removed.primary {
            report.pruned += 1;
        }
        if removed.companion {
            report.companions += 1;
        }
    }

    Ok(())
}
