//! End-to-end tests for the `release-comb corpus` command.

mod common;
use common::prelude::*;

/// Test that a valid corpus is summarized with its shared names
#[test]
#[cfg_attr(not(feature = "integration-tests"), ignore)]
fn test_corpus_summary() {
    let fixture = TestFixture::new().with_corpus(corpora::LIBRARY_AND_NATIVE);

    fixture
        .command()
        .arg("corpus")
        .assert()
        .success()
        .stdout(predicate::str::contains("is valid: 3 bundles, 4 resources"))
        .stdout(predicate::str::contains("Common/Libraries"))
        .stdout(predicate::str::contains("(versioned)"))
        .stdout(predicate::str::contains("Shared libraries: lib, system.memory"))
        .stdout(predicate::str::contains("Shared natives: libsodium"));
}

/// Test that --json prints the parsed document
#[test]
#[cfg_attr(not(feature = "integration-tests"), ignore)]
fn test_corpus_json() {
    let fixture = TestFixture::new().with_corpus(corpora::LIBRARY_AND_NATIVE);

    let output = fixture
        .command()
        .args(["corpus", "--json"])
        .output()
        .unwrap();
    assert!(output.status.success());

    let corpus: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(corpus["bundles"].as_array().map(Vec::len), Some(3));
}

/// Test that --path reads another document
#[test]
#[cfg_attr(not(feature = "integration-tests"), ignore)]
fn test_corpus_explicit_path() {
    let fixture = TestFixture::new().with_file("docs/Other.xml", corpora::EMPTY);

    fixture
        .command()
        .args(["corpus", "--path", "docs/Other.xml"])
        .assert()
        .success()
        .stdout(predicate::str::contains("is valid: 0 bundles, 0 resources"))
        .stdout(predicate::str::contains("Shared libraries: none"));
}

/// Test that a malformed corpus fails with a message naming the file
#[test]
#[cfg_attr(not(feature = "integration-tests"), ignore)]
fn test_corpus_malformed() {
    let fixture = TestFixture::new().with_corpus(corpora::MALFORMED);

    fixture
        .command()
        .arg("corpus")
        .assert()
        .code(1)
        .stderr(predicate::str::contains("Corpus.xml"));
}
