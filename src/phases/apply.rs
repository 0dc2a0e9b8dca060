//! Applies classification decisions.
//!
//! This is the only place in the classify phase that mutates the disk. Every
//! delete and relocate goes through [`Companions`], so a primary's debug file
//! always shares its fate.

use std::path::Path;

use crate::companion::{Companions, Propagation};
use crate::error::Result;
use crate::filesystem::Disk;
use crate::key::ArtifactKey;

use super::{Action, Decision, Report};

/// Performs [`Action`]s against a [`Disk`] and records them in a [`Report`].
pub struct Applier<'a, D: Disk + ?Sized> {
    disk: &'a mut D,
    companions: &'a Companions,
    report: &'a mut Report,
}

impl<'a, D: Disk + ?Sized> Applier<'a, D> {
    pub fn new(disk: &'a mut D, companions: &'a Companions, report: &'a mut Report) -> Self {
        Self {
            disk,
            companions,
            report,
        }
    }

    pub fn apply_all(&mut self, actions: &[Action]) -> Result<()> {
        for action in actions {
            self.apply(action)?;
        }
        Ok(())
    }

    pub fn apply(&mut self, action: &Action) -> Result<()> {
        match &action.decision {
            Decision::KeepInPlace => {
                log::debug!("Keeping {}", action.path.display());
                self.report.kept += 1;
            }
            Decision::Delete(reason) => {
                log::debug!("Deleting {} ({:?})", action.path.display(), reason);
                let result = self.companions.remove(&mut *self.disk, &action.path)?;
                if result.primary {
                    self.report.record_delete(*reason);
                }
                self.count_companion(result);
            }
            Decision::RelocateTo { dest, replace } => {
                if *replace {
                    self.remove_stale(&action.path, dest)?;
                }
                log::debug!("Moving {} to {}", action.path.display(), dest.display());
                let result = self.companions.relocate(&mut *self.disk, &action.path, dest)?;
                if result.primary {
                    self.report.relocated += 1;
                }
                self.count_companion(result);
            }
        }
        Ok(())
    }

    /// Deletes whatever file already occupies `dest`, matched by name
    /// ignoring case, along with its companion.
    fn remove_stale(&mut self, source: &Path, dest: &Path) -> Result<()> {
        let (Some(dir), Some(name)) = (dest.parent(), ArtifactKey::file_name_of(dest)) else {
            return Ok(());
        };
        let Some(stale) = self.disk.find(dir, &name) else {
            return Ok(());
        };
        if stale == source {
            return Ok(());
        }

        log::debug!("Replacing stale {}", stale.display());
        let result = self.companions.remove(&mut *self.disk, &stale)?;
        if result.primary {
            self.report.replaced += 1;
        }
        self.count_companion(result);
        Ok(())
    }

    fn count_companion(&mut self, result: Propagation) {
        if result.companion {
            self.report.companions += 1;
        }
    }
}
