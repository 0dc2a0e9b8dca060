//! # Release Comb Library
//!
//! This library packages a multi-version release tree into a deduplicated
//! distribution layout. It is designed to be used by the `release-comb`
//! command-line tool but can also be driven directly from build scripts.
//!
//! ## Quick Example
//!
//! ```
//! use std::path::Path;
//! use release_comb::corpus;
//! use release_comb::phases::normalize::target_name;
//!
//! let xml = r#"<Corpus><Resources>
//!   <ResourceBundle Root="Common/Libraries">
//!     <Resource Type="Assembly" Name="Lib.Shared" Root="Assemblies" />
//!   </ResourceBundle>
//! </Resources></Corpus>"#;
//! let corpus = corpus::parse(xml, Path::new("Corpus.xml")).unwrap();
//! assert_eq!(corpus.resource_count(), 1);
//!
//! assert_eq!(target_name("Foo.RW15.dll", "RW").as_deref(), Some("Foo.dll"));
//! ```
//!
//! ## Core Concepts
//!
//! - **Release tree (`tree`)**: `Releases/<category>/<version>/Assemblies/<file>`.
//!   Every file found there is an artifact.
//! - **Corpus (`corpus`)**: the document declaring which bundles exist. The
//!   bundles rooted at the shared libraries and natives directories seed the
//!   set of names that are already shared.
//! - **Artifact keys (`key`)**: artifact names are case-insensitive and are
//!   folded once, when they enter the pipeline.
//! - **Disk (`filesystem`)**: every mutation goes through the `Disk` trait, so
//!   a dry run replays the same decisions against a simulated overlay.
//! - **Companions (`companion`)**: a debug-symbol file shares the fate of its
//!   primary artifact.
//! - **Settings (`config`)**: the optional `release-comb.yaml` file.
//!
//! ## Execution Flow
//!
//! The main entry point is `phases::orchestrator::execute`:
//!
//! 1.  **Flatten**: merge `Assemblies/net48/` folders upward.
//! 2.  **Classify**: delete host-provided and filtered artifacts, move shared
//!     ones into `Common/`, delete redundant copies, keep the rest.
//! 3.  **Normalize**: strip host-version tags (`Foo.RW15.dll` to `Foo.dll`).
//! 4.  **Prune**: drop shared copies a release copy supersedes.
//!
//! The run is not transactional, but it is idempotent: running it again over
//! a partially or fully combed tree finishes the job and then changes nothing.
//!
//! Around the pipeline sit a few collaborators used by the command layer:
//! `deploy` (copy the project into a mod folder), `metadata` (package id and
//! target version), `activation` (the host's active mod list) and `install`
//! (locate the game's Steam library).

pub mod activation;
pub mod companion;
pub mod config;
pub mod corpus;
pub mod defaults;
pub mod deploy;
pub mod error;
pub mod filesystem;
pub mod install;
pub mod key;
pub mod layout;
pub mod metadata;
pub mod output;
pub mod phases;
pub mod tree;
