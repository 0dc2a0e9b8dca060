//! Phase 2: Duplicate Classifier
//!
//! Decides, per artifact, whether it is deleted, relocated into a shared
//! bundle directory, or left in place. The decision is a pure function of the
//! artifact's name, the [`Policy`], the [`SharedState`] seeded from the corpus,
//! and existence checks against the [`Disk`]. All mutation happens in
//! [`super::apply`].
//!
//! ## Precedence
//!
//! Checks run in a fixed order and the first match wins:
//!
//! 1.  **Provided by host**: the host runtime ships this assembly. Delete.
//! 2.  **Filtered**: build-time-only, or internal to the shared mod framework
//!     (prefix match). Delete.
//! 3.  **Known library**: relocate into the shared libraries directory,
//!     replacing whatever stale copy is already there. Names declared by a
//!     versioned bundle are built per host version and never relocated.
//! 4.  **Common resource**: declared by the corpus' libraries bundle. The
//!     first copy is relocated; later copies are redundant and deleted.
//! 5.  **Common native**: declared by the corpus' natives bundle. Each of the
//!     `.dll`/`.so`/`.dylib` siblings is resolved independently, since a
//!     version folder usually carries only some of them.
//! 6.  Otherwise the artifact stays where it is.
//!
//! Membership is decided by the case-folded file stem only.

use std::collections::{HashMap, HashSet};
use std::path::{Path, PathBuf};

use crate::config::Settings;
use crate::corpus::Corpus;
use crate::defaults::NATIVE_EXTENSIONS;
use crate::filesystem::Disk;
use crate::key::ArtifactKey;
use crate::layout::{ProjectLayout, SharedBundle};
use crate::tree::{Artifact, ReleaseTree};

/// Why an artifact is deleted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeleteReason {
    HostProvided,
    Filtered,
    /// A shared copy already exists.
    Duplicate,
}

/// What happens to one file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Decision {
    Delete(DeleteReason),
    /// Move to `dest`. With `replace`, any file already matching `dest`'s
    /// name is deleted first.
    RelocateTo { dest: PathBuf, replace: bool },
    KeepInPlace,
}

/// A decision bound to the file it applies to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Action {
    pub path: PathBuf,
    pub decision: Decision,
}

impl Action {
    fn new(path: &Path, decision: Decision) -> Self {
        Self {
            path: path.to_path_buf(),
            decision,
        }
    }
}

/// Fixed name-based policies.
#[derive(Debug, Clone)]
pub struct Policy {
    host_provided: HashSet<ArtifactKey>,
    filtered: HashSet<ArtifactKey>,
    internal_prefix: ArtifactKey,
    debug_extension: String,
}

impl Policy {
    pub fn from_settings(settings: &Settings) -> Self {
        Self {
            host_provided: settings.host_provided.iter().map(|n| ArtifactKey::new(n)).collect(),
            filtered: settings.filtered.iter().map(|n| ArtifactKey::new(n)).collect(),
            internal_prefix: ArtifactKey::new(&settings.internal_prefix),
            debug_extension: settings.debug_symbol_extension.clone(),
        }
    }

    pub fn is_host_provided(&self, stem: &ArtifactKey) -> bool {
        self.host_provided.contains(stem)
    }

    pub fn is_filtered(&self, stem: &ArtifactKey) -> bool {
        self.filtered.contains(stem) || stem.starts_with(&self.internal_prefix)
    }

    /// Whether the artifact is a debug-symbol companion. Companions are never
    /// classified on their own.
    pub fn is_companion(&self, artifact: &Artifact) -> bool {
        artifact.has_extension(&self.debug_extension)
    }

    pub fn debug_extension(&self) -> &str {
        &self.debug_extension
    }
}

/// Known-shared lookup tables, owned by one classifier instance.
#[derive(Debug, Clone, Default)]
pub struct SharedState {
    /// Known-library allowlist (check 3).
    libraries: HashSet<ArtifactKey>,
    /// Corpus libraries bundle: name -> declared source path (check 4).
    common_resources: HashMap<ArtifactKey, PathBuf>,
    /// Corpus natives bundle: name -> declared source path (check 5).
    common_native_resources: HashMap<ArtifactKey, PathBuf>,
    /// Names declared by versioned bundles. Kept per version folder.
    versioned: HashSet<ArtifactKey>,
}

impl SharedState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seeds the common tables from the corpus bundles that resolve to the
    /// shared libraries and natives directories. Versioned bundles only
    /// record their names, which are then never shared.
    pub fn from_corpus(corpus: &Corpus, layout: &ProjectLayout) -> Self {
        let mut state = Self::new();

        for bundle in &corpus.bundles {
            if bundle.versioned {
                state
                    .versioned
                    .extend(bundle.resources.iter().map(|r| ArtifactKey::new(&r.name)));
                continue;
            }
            let Some(shared) = layout.shared_bundle_for(&bundle.root) else {
                continue;
            };
            let bundle_root = layout.resolve(&bundle.root);

            for resource in &bundle.resources {
                let source = resource.dir_in(&bundle_root).join(&resource.name);
                let table = match shared {
                    SharedBundle::Libraries => &mut state.common_resources,
                    SharedBundle::Natives => &mut state.common_native_resources,
                };
                table.insert(ArtifactKey::new(&resource.name), source);
            }
        }

        state
    }

    /// Adds a name to the known-library allowlist. Returns `false` when it
    /// was already known.
    pub fn declare_library(&mut self, name: &str) -> bool {
        self.libraries.insert(ArtifactKey::new(name))
    }

    pub fn is_library(&self, stem: &ArtifactKey) -> bool {
        self.libraries.contains(stem)
    }

    pub fn common_resource(&self, stem: &ArtifactKey) -> Option<&Path> {
        self.common_resources.get(stem).map(PathBuf::as_path)
    }

    pub fn common_native(&self, stem: &ArtifactKey) -> Option<&Path> {
        self.common_native_resources.get(stem).map(PathBuf::as_path)
    }

    /// Whether a versioned bundle declares this stem.
    pub fn is_versioned(&self, stem: &ArtifactKey) -> bool {
        self.versioned.contains(stem)
    }

    /// Whether any table already claims this stem.
    pub fn is_shared(&self, stem: &ArtifactKey) -> bool {
        self.is_library(stem)
            || self.common_resources.contains_key(stem)
            || self.common_native_resources.contains_key(stem)
    }

    pub fn library_names(&self) -> Vec<&ArtifactKey> {
        let mut names: Vec<_> = self.libraries.iter().collect();
        names.sort();
        names
    }

    pub fn common_resource_names(&self) -> Vec<&ArtifactKey> {
        let mut names: Vec<_> = self.common_resources.keys().collect();
        names.sort();
        names
    }

    pub fn common_native_names(&self) -> Vec<&ArtifactKey> {
        let mut names: Vec<_> = self.common_native_resources.keys().collect();
        names.sort();
        names
    }
}

/// Classifies artifacts against the policies and shared tables.
#[derive(Debug, Clone)]
pub struct Classifier {
    policy: Policy,
    state: SharedState,
    libraries_dir: PathBuf,
    natives_dir: PathBuf,
}

impl Classifier {
    pub fn new(policy: Policy, state: SharedState, layout: &ProjectLayout) -> Self {
        Self {
            policy,
            state,
            libraries_dir: layout.libraries_dir(),
            natives_dir: layout.natives_dir(),
        }
    }

    pub fn policy(&self) -> &Policy {
        &self.policy
    }

    pub fn state(&self) -> &SharedState {
        &self.state
    }

    pub fn state_mut(&mut self) -> &mut SharedState {
        &mut self.state
    }

    pub fn libraries_dir(&self) -> &Path {
        &self.libraries_dir
    }

    pub fn natives_dir(&self) -> &Path {
        &self.natives_dir
    }

    /// Decides what happens to `artifact`.
    ///
    /// Usually one action for the artifact itself. A common native yields one
    /// action per sibling extension actually present next to it. Debug-symbol
    /// companions yield nothing; they follow their primary.
    pub fn classify<D: Disk + ?Sized>(&self, artifact: &Artifact, disk: &D) -> Vec<Action> {
        if self.policy.is_companion(artifact) {
            return Vec::new();
        }
        let stem = &artifact.stem;

        if self.policy.is_host_provided(stem) {
            return vec![Action::new(&artifact.path, Decision::Delete(DeleteReason::HostProvided))];
        }

        if self.policy.is_filtered(stem) {
            return vec![Action::new(&artifact.path, Decision::Delete(DeleteReason::Filtered))];
        }

        if self.state.is_library(stem) && !self.state.is_versioned(stem) {
            let dest = self.libraries_dir.join(artifact.file_name());
            return vec![Action::new(
                &artifact.path,
                Decision::RelocateTo {
                    dest,
                    replace: true,
                },
            )];
        }

        if self.state.common_resource(stem).is_some() {
            let decision = self.first_copy_wins(&artifact.path, &self.libraries_dir, disk);
            return vec![Action::new(&artifact.path, decision)];
        }

        if self.state.common_native(stem).is_some() {
            return self.classify_native(artifact, disk);
        }

        vec![Action::new(&artifact.path, Decision::KeepInPlace)]
    }

    fn classify_native<D: Disk + ?Sized>(&self, artifact: &Artifact, disk: &D) -> Vec<Action> {
        let stem = artifact
            .path
            .file_stem()
            .and_then(|s| s.to_str())
            .unwrap_or_else(|| artifact.stem.as_str());

        NATIVE_EXTENSIONS
            .iter()
            .filter_map(|extension| {
                let name = ArtifactKey::new(&format!("{}.{}", stem, extension));
                disk.find(artifact.dir(), &name)
            })
            .map(|sibling| {
                let decision = self.first_copy_wins(&sibling, &self.natives_dir, disk);
                Action::new(&sibling, decision)
            })
            .collect()
    }

    fn first_copy_wins<D: Disk + ?Sized>(&self, path: &Path, shared_dir: &Path, disk: &D) -> Decision {
        let Some(name) = ArtifactKey::file_name_of(path) else {
            return Decision::KeepInPlace;
        };

        if disk.find(shared_dir, &name).is_some() {
            Decision::Delete(DeleteReason::Duplicate)
        } else {
            let file_name = path.file_name().unwrap_or_default();
            Decision::RelocateTo {
                dest: shared_dir.join(file_name),
                replace: false,
            }
        }
    }
}

/// Stems that occur in two or more version folders, excluding anything the
/// policy deletes, the shared tables already claim, or a versioned bundle
/// declares. Read-only.
pub fn discover_duplicates(tree: &ReleaseTree, classifier: &Classifier) -> Vec<ArtifactKey> {
    let mut seen: HashMap<ArtifactKey, HashSet<PathBuf>> = HashMap::new();

    for artifact in tree.artifacts() {
        if classifier.policy.is_companion(&artifact) {
            continue;
        }
        seen.entry(artifact.stem.clone())
            .or_default()
            .insert(artifact.dir().to_path_buf());
    }

    let mut duplicates: Vec<ArtifactKey> = seen
        .into_iter()
        .filter(|(_, dirs)| dirs.len() > 1)
        .map(|(stem, _)| stem)
        .filter(|stem| {
            !classifier.policy.is_host_provided(stem)
                && !classifier.policy.is_filtered(stem)
                && !classifier.state.is_shared(stem)
                && !classifier.state.is_versioned(stem)
        })
        .collect();
    duplicates.sort();
    duplicates
}
