//! Benchmarks for the hot paths of a comb run.
//!
//! Classification is measured against a synthetic release tree on disk,
//! through a [`SimulatedDisk`] so that iterations never mutate it.

use std::fs;
use std::path::Path;

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use release_comb::config::Settings;
use release_comb::corpus;
use release_comb::filesystem::SimulatedDisk;
use release_comb::layout::ProjectLayout;
use release_comb::phases::normalize::target_name;
use release_comb::phases::{Classifier, Policy, SharedState};
use release_comb::tree::{Artifact, ReleaseTree};

const CORPUS: &str = r#"<Corpus><Resources>
  <ResourceBundle Root="Common/Libraries">
    <Resource Type="Assembly" Name="Lib0" Root="Assemblies" />
    <Resource Type="Assembly" Name="Lib1" Root="Assemblies" />
    <Resource Type="Assembly" Name="Lib2" Root="Assemblies" />
  </ResourceBundle>
  <ResourceBundle Root="Common/Natives">
    <Resource Type="Dll" Name="libnative" Root="Assemblies" />
  </ResourceBundle>
</Resources></Corpus>"#;

/// Writes `categories` categories with three version folders each.
fn create_tree(root: &Path, categories: usize) {
    for category in 0..categories {
        for version in ["1.3", "1.4", "1.5"] {
            let dir = root
                .join("Releases")
                .join(format!("Category{}", category))
                .join(version)
                .join("Assemblies");
            fs::create_dir_all(&dir).unwrap();
            let files = [
                "Lib0.dll".to_string(),
                "Lib0.pdb".to_string(),
                "Lib1.dll".to_string(),
                "Lib2.dll".to_string(),
                "System.dll".to_string(),
                "UnityEngine.dll".to_string(),
                "libnative.so".to_string(),
                "libnative.dll".to_string(),
                format!("Category{}.RW{}.dll", category, version.replace('.', "")),
            ];
            for file in files {
                fs::write(dir.join(file), "x").unwrap();
            }
        }
    }
}

fn classifier(layout: &ProjectLayout) -> Classifier {
    let settings = Settings::default();
    let corpus = corpus::parse(CORPUS, Path::new("Corpus.xml")).unwrap();
    let state = SharedState::from_corpus(&corpus, layout);
    Classifier::new(Policy::from_settings(&settings), state, layout)
}

fn bench_classify(c: &mut Criterion) {
    let mut group = c.benchmark_group("classify_tree");

    for categories in [1usize, 10, 50] {
        let temp = tempfile::TempDir::new().unwrap();
        create_tree(temp.path(), categories);
        let layout = ProjectLayout::new(temp.path(), &Settings::default());
        let classifier = classifier(&layout);
        let artifacts: Vec<Artifact> = ReleaseTree::new(layout.releases()).artifacts().collect();
        let disk = SimulatedDisk::new();

        group.bench_with_input(
            BenchmarkId::from_parameter(artifacts.len()),
            &artifacts,
            |b, artifacts| {
                b.iter(|| {
                    let actions: usize = artifacts
                        .iter()
                        .map(|artifact| classifier.classify(black_box(artifact), &disk).len())
                        .sum();
                    black_box(actions)
                })
            },
        );
    }

    group.finish();
}

fn bench_walk(c: &mut Criterion) {
    let temp = tempfile::TempDir::new().unwrap();
    create_tree(temp.path(), 10);
    let releases = temp.path().join("Releases");

    c.bench_function("walk_release_tree", |b| {
        b.iter(|| black_box(ReleaseTree::new(&releases).artifacts().count()))
    });
}

fn bench_target_name(c: &mut Criterion) {
    let names = [
        "Foo.RW15.dll",
        "Foo.Bar.dll",
        "Mod.Core.RW14.pdb",
        "Plain.dll",
        "Deeply.Nested.Name.Space.RW13.dll",
    ];

    c.bench_function("version_tag_target_name", |b| {
        b.iter(|| {
            names
                .iter()
                .filter_map(|name| target_name(black_box(name), "RW"))
                .count()
        })
    });
}

criterion_group!(benches, bench_classify, bench_walk, bench_target_name);
criterion_main!(benches);
