//! # Corpus Command Implementation
//!
//! Loads and validates the corpus document, lists its bundles and resources,
//! and shows which names seed the shared tables used by `comb`.
//!
//! This command is a safe, read-only operation that does not modify any files.

use std::path::PathBuf;

use anyhow::Result;
use clap::Args;

use release_comb::corpus;
use release_comb::key::ArtifactKey;
use release_comb::output::{bold, dim, marker, OutputConfig, Status};
use release_comb::phases::SharedState;

use super::Context;

/// Validate the corpus document and show what it declares
#[derive(Args, Debug)]
pub struct CorpusArgs {
    /// Corpus document (defaults to the `corpus` setting)
    #[arg(short, long, value_name = "FILE")]
    pub path: Option<PathBuf>,

    /// Print the parsed corpus as JSON
    #[arg(long)]
    pub json: bool,
}

pub fn execute(args: CorpusArgs, context: &Context) -> Result<()> {
    let out = context.output();
    let settings = context.settings()?;
    let layout = context.layout(&settings);
    let path = args
        .path
        .map(|p| context.resolve(&p))
        .unwrap_or_else(|| layout.corpus().to_path_buf());

    let corpus = corpus::load(&path)?;
    if args.json {
        println!("{}", serde_json::to_string_pretty(&corpus)?);
        return Ok(());
    }

    println!(
        "{} {} is valid: {} bundles, {} resources",
        marker(&out, Status::Ok),
        path.display(),
        corpus.bundles.len(),
        corpus.resource_count()
    );

    for bundle in &corpus.bundles {
        let shared = layout.shared_bundle_for(&bundle.root);
        let note = match (bundle.versioned, shared) {
            (true, _) => " (versioned)".to_string(),
            (false, Some(kind)) => format!(" (shared {:?})", kind).to_lowercase(),
            (false, None) => String::new(),
        };
        println!(
            "\n{}{}",
            bold(&out, &bundle.root.display().to_string()),
            dim(&out, &note)
        );
        for resource in &bundle.resources {
            let optional = if resource.optional { " optional" } else { "" };
            println!(
                "   {} {}{}",
                resource.name,
                dim(&out, &format!("[{}]", resource.kind)),
                dim(&out, optional)
            );
        }
    }

    let state = SharedState::from_corpus(&corpus, &layout);
    println!();
    print_names(&out, "Shared libraries", &state.common_resource_names());
    print_names(&out, "Shared natives", &state.common_native_names());
    Ok(())
}

fn print_names(out: &OutputConfig, label: &str, names: &[&ArtifactKey]) {
    let list = if names.is_empty() {
        "none".to_string()
    } else {
        names
            .iter()
            .map(|n| n.as_str())
            .collect::<Vec<_>>()
            .join(", ")
    };
    println!("{} {}: {}", marker(out, Status::Info), label, list);
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn test_unknown_type_is_reported() {
        let temp = TempDir::new().unwrap();
        fs::write(
            temp.path().join("Corpus.xml"),
            r#"<Corpus><Resources><ResourceBundle Root="Common/Libraries">
                <Resource Type="Shader" Name="X" />
            </ResourceBundle></Resources></Corpus>"#,
        )
        .unwrap();

        let result = execute(
            CorpusArgs {
                path: None,
                json: false,
            },
            &Context::for_root(temp.path()),
        );
        assert!(result.unwrap_err().to_string().contains("Shader"));
    }
}
