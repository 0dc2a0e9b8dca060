//! Snapshot tests for CLI output using insta.
//!
//! These tests capture the version banner and the comb report as snapshots,
//! making it easy to review changes to user-facing output.
//!
//! To update snapshots after intentional changes:
//! ```bash
//! cargo insta test --accept
//! ```

mod common;
use common::prelude::*;

/// Normalize version and timing parts of CLI output for stable snapshots
fn normalize_output(output: &str) -> String {
    let version = regex::Regex::new(r"release-comb \d+\.\d+\.\d+").unwrap();
    let versioned = version.replace_all(output, "release-comb [VERSION]");
    let elapsed = regex::Regex::new(r"in \d+\.\d+s").unwrap();
    let timed = elapsed.replace_all(&versioned, "in [ELAPSED]");
    timed
        .lines()
        .map(|line| line.trim_end())
        .collect::<Vec<_>>()
        .join("\n")
}

/// One of each rule: a nested framework folder, a duplicate shared library,
/// a host-provided assembly and a version-tagged release artifact.
fn release_tree() -> TestFixture {
    TestFixture::new()
        .with_corpus(corpora::LIBRARY_AND_NATIVE)
        .with_artifacts(&[
            "A/1.4/Assemblies/net48/Lib.dll",
            "B/1.5/Assemblies/Lib.dll",
            "B/1.5/Assemblies/System.dll",
            "B/1.5/Assemblies/Mod.RW15.dll",
        ])
}

#[test]
fn test_version_snapshot() {
    let mut cmd = cargo_bin_cmd!("release-comb");
    let output = cmd
        .arg("--version")
        .output()
        .expect("Failed to execute command");

    let stdout = String::from_utf8_lossy(&output.stdout);
    let normalized = normalize_output(&stdout);

    insta::assert_snapshot!("version", normalized);
}

#[test]
fn test_comb_summary_snapshot() {
    let fixture = release_tree();
    let output = fixture
        .command()
        .arg("comb")
        .output()
        .expect("Failed to execute command");

    let stdout = String::from_utf8_lossy(&output.stdout);
    let normalized = normalize_output(&stdout);

    insta::assert_snapshot!("comb_summary", normalized);
}

#[test]
fn test_comb_json_report_snapshot() {
    let fixture = release_tree();
    let output = fixture
        .command()
        .args(["comb", "--json"])
        .output()
        .expect("Failed to execute command");

    let stdout = String::from_utf8_lossy(&output.stdout);
    let normalized = normalize_output(&stdout);

    insta::assert_snapshot!("comb_json_report", normalized);
}

#[test]
fn test_comb_nothing_to_do_snapshot() {
    let fixture = release_tree();
    fixture.comb();

    let output = fixture
        .command()
        .arg("comb")
        .output()
        .expect("Failed to execute command");

    let stdout = String::from_utf8_lossy(&output.stdout);
    let normalized = normalize_output(&stdout);

    insta::assert_snapshot!("comb_nothing_to_do", normalized);
}
