//! # Companion-File Propagator
//!
//! A primary artifact's debug-symbol companion shares its stem and carries a
//! fixed extension (`Foo.dll` / `Foo.pdb`). Whatever happens to the primary
//! happens to the companion too, so no debug file is ever left without its
//! primary. A missing companion is a no-op.

use std::path::{Path, PathBuf};

use crate::error::Result;
use crate::filesystem::Disk;
use crate::key::ArtifactKey;

/// What a propagated operation actually touched.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Propagation {
    pub primary: bool,
    pub companion: bool,
}

/// Mirrors primary-file operations onto debug-symbol companions.
#[derive(Debug, Clone)]
pub struct Companions {
    extension: String,
}

impl Companions {
    /// `extension` is given without the dot, e.g. `pdb`.
    pub fn new(extension: &str) -> Self {
        Self {
            extension: extension.to_string(),
        }
    }

    pub fn extension(&self) -> &str {
        &self.extension
    }

    /// Expected companion path of `primary`, in the primary's directory.
    pub fn path_for(&self, primary: &Path) -> PathBuf {
        primary.with_extension(&self.extension)
    }

    /// Locates the companion on disk, ignoring case.
    pub fn find<D: Disk + ?Sized>(&self, disk: &D, primary: &Path) -> Option<PathBuf> {
        let expected = self.path_for(primary);
        let dir = expected.parent()?;
        let name = ArtifactKey::file_name_of(&expected)?;
        disk.find(dir, &name)
    }

    /// Deletes `primary` and its companion.
    pub fn remove<D: Disk + ?Sized>(&self, disk: &mut D, primary: &Path) -> Result<Propagation> {
        let companion = self.find(disk, primary);
        let primary_removed = disk.remove_file(primary)?;
        let companion_removed = match companion {
            Some(path) => disk.remove_file(&path)?,
            None => false,
        };

        Ok(Propagation {
            primary: primary_removed,
            companion: companion_removed,
        })
    }

    /// Moves `primary` to `dest` and its companion next to it.
    pub fn relocate<D: Disk + ?Sized>(
        &self,
        disk: &mut D,
        primary: &Path,
        dest: &Path,
    ) -> Result<Propagation> {
        let companion = self.find(disk, primary);
        let primary_moved = disk.move_file(primary, dest)?;
        let companion_moved = match companion {
            Some(path) => disk.move_file(&path, &self.path_for(dest))?,
            None => false,
        };

        Ok(Propagation {
            primary: primary_moved,
            companion: companion_moved,
        })
    }
}
