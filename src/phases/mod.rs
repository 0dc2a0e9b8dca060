//! Implementation of the phases of a comb run.
//!
//! ## Overview
//!
//! A run follows these phases, in order:
//! 1. Flatten - Merge nested runtime folders (`Assemblies/net48/`) upward
//! 2. Classify - Delete, relocate or keep every artifact (with companions)
//! 3. Normalize - Strip host-version tags from artifact names
//! 4. Prune - Drop shared copies superseded by a release copy
//!
//! Classification is split into a pure decision step ([`classify`]) and a
//! single applier ([`apply`]) that performs every mutation. All mutations go
//! through [`crate::filesystem::Disk`], so a dry run executes the same code
//! against a simulated disk.

use std::fmt;

use serde::Serialize;

pub mod apply;
pub mod classify;
pub mod flatten;
pub mod normalize;
pub mod orchestrator;
pub mod prune;

pub use classify::{Action, Classifier, Decision, DeleteReason, Policy, SharedState};

/// A user-visible step of the pipeline.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Step {
    Flatten,
    Classify,
    Normalize,
    Prune,
}

impl fmt::Display for Step {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let text = match self {
            Step::Flatten => "Removing runtime identification folders",
            Step::Classify => "Reducing duplicate files",
            Step::Normalize => "Trimming host-version suffixes",
            Step::Prune => "Removing dangling shared files",
        };
        f.write_str(text)
    }
}

/// Counts of everything a run did (or, in a dry run, would do).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Report {
    pub dry_run: bool,
    /// Nested framework folders merged upward.
    pub flattened: usize,
    pub deleted_host_provided: usize,
    pub deleted_filtered: usize,
    pub deleted_duplicates: usize,
    /// Artifacts moved into a shared directory.
    pub relocated: usize,
    /// Stale shared copies replaced by a known library.
    pub replaced: usize,
    /// Artifacts renamed by the normalizer.
    pub renamed: usize,
    /// Shared copies removed because a release copy supersedes them.
    pub pruned: usize,
    /// Companion files moved or deleted alongside their primaries.
    pub companions: usize,
    /// Artifacts left in place. Not a mutation.
    pub kept: usize,
}

impl Report {
    pub fn new(dry_run: bool) -> Self {
        Self {
            dry_run,
            ..Self::default()
        }
    }

    pub fn record_delete(&mut self, reason: DeleteReason) {
        match reason {
            DeleteReason::HostProvided => self.deleted_host_provided += 1,
            DeleteReason::Filtered => self.deleted_filtered += 1,
            DeleteReason::Duplicate => self.deleted_duplicates += 1,
        }
    }

    pub fn deleted(&self) -> usize {
        self.deleted_host_provided + self.deleted_filtered + self.deleted_duplicates
    }

    /// Total number of filesystem mutations.
    pub fn mutations(&self) -> usize {
        self.flattened
            + self.deleted()
            + self.relocated
            + self.replaced
            + self.renamed
            + self.pruned
            + self.companions
    }

    /// Whether the run changed nothing. A second run over an already combed
    /// tree must be a no-op.
    pub fn is_noop(&self) -> bool {
        self.mutations() == 0
    }
}
