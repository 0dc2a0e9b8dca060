//! Orchestrator for a complete comb run
//!
//! This module wires the phases together in their fixed order and owns the
//! choice between the real disk and a simulated one.

use std::collections::HashSet;
use std::path::PathBuf;

use crate::companion::Companions;
use crate::config::Settings;
use crate::corpus;
use crate::error::Result;
use crate::filesystem::{Disk, HostDisk, SimulatedDisk};
use crate::layout::ProjectLayout;
use crate::tree::{Artifact, ReleaseTree};

use super::apply::Applier;
use super::classify::discover_duplicates;
use super::{flatten, normalize, prune, Classifier, Decision, Policy, Report, SharedState, Step};

/// Per-run switches that are not part of the project settings.
#[derive(Debug, Clone, Copy, Default)]
pub struct Options {
    /// Compute every decision without touching the disk.
    pub dry_run: bool,
    /// Promote stems found in several version folders to known libraries,
    /// in addition to the `promote_duplicates` setting.
    pub promote_duplicates: bool,
}

/// Execute the complete comb pipeline
///
/// 1. Load the corpus. A malformed corpus aborts here, before any mutation
/// 2. Flatten nested framework folders
/// 3. Classify every artifact outside the bootstrap category
/// 4. Normalize version-tagged names, then classify the renamed files whose
///    new name is claimed by a shared table
/// 5. Prune shared copies superseded by a release copy
///
/// `on_step` is called as each step starts. The first filesystem error aborts
/// the run; whatever was already done stays done.
pub fn execute(
    layout: &ProjectLayout,
    settings: &Settings,
    options: Options,
    on_step: &mut dyn FnMut(Step),
) -> Result<Report> {
    let corpus = corpus::load(layout.corpus())?;
    log::debug!(
        "Loaded {} bundles ({} resources) from {}",
        corpus.bundles.len(),
        corpus.resource_count(),
        layout.corpus().display()
    );

    let mut report = Report::new(options.dry_run);
    let mut disk: Box<dyn Disk> = if options.dry_run {
        Box::new(SimulatedDisk::new())
    } else {
        Box::new(HostDisk)
    };
    let companions = Companions::new(&settings.debug_symbol_extension);

    // Step 1: Flatten
    start(on_step, Step::Flatten);
    let flattened = flatten::execute(layout.releases(), &settings.framework_folder, options.dry_run)?;
    report.flattened = flattened.len();

    // Step 2: Classify
    start(on_step, Step::Classify);
    let mut state = SharedState::from_corpus(&corpus, layout);
    for library in &settings.libraries {
        state.declare_library(library);
    }
    let mut classifier = Classifier::new(Policy::from_settings(settings), state, layout);
    let tree = ReleaseTree::new(layout.releases()).skipping(&settings.bootstrap_category);

    if options.promote_duplicates || settings.promote_duplicates {
        for stem in discover_duplicates(&tree, &classifier) {
            log::debug!("Promoting {} to a known library", stem);
            classifier.state_mut().declare_library(stem.as_str());
        }
    }

    disk.create_dir_all(classifier.libraries_dir())?;
    disk.create_dir_all(classifier.natives_dir())?;
    classify_tree(&tree, &classifier, &companions, &mut *disk, &mut report)?;

    // Step 3: Normalize
    start(on_step, Step::Normalize);
    let all_categories = ReleaseTree::new(layout.releases());
    let renamed = normalize::execute(
        &all_categories,
        &settings.version_tag_prefix,
        &companions,
        &mut *disk,
        &mut report,
    )?;
    settle_renamed(renamed, &tree, &classifier, &companions, &mut *disk, &mut report)?;

    // Step 4: Prune
    start(on_step, Step::Prune);
    prune::execute(
        &tree,
        classifier.libraries_dir(),
        classifier.state(),
        &companions,
        &mut *disk,
        &mut report,
    )?;

    Ok(report)
}

fn start(on_step: &mut dyn FnMut(Step), step: Step) {
    log::info!("{}", step);
    on_step(step);
}

/// Classify and apply, one `Assemblies` directory at a time. Each listing is
/// snapshotted, so files moved away earlier in the same directory (native
/// siblings) are skipped when their turn comes.
fn classify_tree(
    tree: &ReleaseTree,
    classifier: &Classifier,
    companions: &Companions,
    disk: &mut dyn Disk,
    report: &mut Report,
) -> Result<()> {
    for dir in tree.assemblies_dirs() {
        for path in disk.list(&dir.path) {
            if !disk.exists(&path) {
                continue;
            }
            let Some(artifact) = Artifact::from_path(path) else {
                continue;
            };

            let actions = classifier.classify(&artifact, &*disk);
            Applier::new(&mut *disk, companions, &mut *report).apply_all(&actions)?;
        }
    }
    Ok(())
}

/// Classify files that normalization renamed, so a stripped name that a
/// shared table claims is resolved in the same run. Only files inside the
/// classified tree are considered, and keep decisions are not recounted.
fn settle_renamed(
    renamed: Vec<PathBuf>,
    tree: &ReleaseTree,
    classifier: &Classifier,
    companions: &Companions,
    disk: &mut dyn Disk,
    report: &mut Report,
) -> Result<()> {
    let classified: HashSet<PathBuf> = tree.assemblies_dirs().into_iter().map(|dir| dir.path).collect();

    for path in renamed {
        if !path.parent().is_some_and(|dir| classified.contains(dir)) || !disk.exists(&path) {
            continue;
        }
        let Some(artifact) = Artifact::from_path(path) else {
            continue;
        };

        let actions: Vec<_> = classifier
            .classify(&artifact, &*disk)
            .into_iter()
            .filter(|action| action.decision != Decision::KeepInPlace)
            .collect();
        Applier::new(&mut *disk, companions, &mut *report).apply_all(&actions)?;
    }
    Ok(())
}
