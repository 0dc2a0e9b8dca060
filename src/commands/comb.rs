//! Comb command implementation
//!
//! The comb command runs the whole pipeline over the project's release tree:
//! 1. Flatten nested framework folders
//! 2. Classify and deduplicate artifacts
//! 3. Strip host-version tags
//! 4. Prune superseded shared copies
//!
//! Optionally, the combed project is then deployed.

use std::path::PathBuf;
use std::time::Instant;

use anyhow::Result;
use clap::Args;

use release_comb::output::{dim, marker, OutputConfig, Status};
use release_comb::phases::orchestrator::{self, Options};
use release_comb::phases::{Report, Step};

use super::Context;

/// Arguments for the comb command
#[derive(Args, Debug)]
pub struct CombArgs {
    /// Show what would be done without making changes
    #[arg(short = 'n', long)]
    pub dry_run: bool,

    /// Treat every stem found in several version folders as a shared library
    #[arg(long)]
    pub promote_duplicates: bool,

    /// Print the run report as JSON instead of a summary
    #[arg(long)]
    pub json: bool,

    /// Deploy the combed project to this directory afterwards
    #[arg(long, value_name = "DIR", conflicts_with = "dry_run")]
    pub deploy: Option<PathBuf>,

    /// Suppress all output except errors
    #[arg(short, long)]
    pub quiet: bool,
}

/// Execute the comb command
pub fn execute(args: CombArgs, context: &Context) -> Result<()> {
    let out = context.output();
    let start_time = Instant::now();
    let chatty = !args.quiet && !args.json;

    let settings = context.settings()?;
    let layout = context.layout(&settings);

    if chatty {
        println!(
            "{} Combing {}",
            marker(&out, Status::Scan),
            layout.releases().display()
        );
        if args.dry_run {
            println!("{} No changes will be made", marker(&out, Status::DryRun));
        }
    }

    let options = Options {
        dry_run: args.dry_run,
        promote_duplicates: args.promote_duplicates,
    };
    let mut on_step = |step: Step| {
        if chatty {
            println!("{} {}...", marker(&out, Status::Step), step);
        }
    };

    let report = match orchestrator::execute(&layout, &settings, options, &mut on_step) {
        Ok(report) => report,
        Err(e) => {
            if !args.quiet {
                eprintln!("{} Comb failed", marker(&out, Status::Err));
            }
            return Err(e.into());
        }
    };

    if args.json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else if chatty {
        print_summary(&out, &report);
        println!(
            "{} Combed in {:.2}s",
            marker(&out, Status::Ok),
            start_time.elapsed().as_secs_f64()
        );
    }

    if let Some(target) = args.deploy {
        let deployment = release_comb::deploy::execute(&layout, &context.resolve(&target))?;
        if chatty {
            println!(
                "{} Deployed {} files to {}",
                marker(&out, Status::Ok),
                deployment.files,
                deployment.target.display()
            );
        }
    }

    Ok(())
}

fn print_summary(out: &OutputConfig, report: &Report) {
    if report.is_noop() {
        println!("{} Nothing to do", marker(out, Status::Info));
        return;
    }

    let lines = [
        ("folders flattened", report.flattened),
        ("deleted (host provided)", report.deleted_host_provided),
        ("deleted (filtered)", report.deleted_filtered),
        ("deleted (duplicate)", report.deleted_duplicates),
        ("moved to Common", report.relocated),
        ("stale shared copies replaced", report.replaced),
        ("renamed", report.renamed),
        ("pruned from Common", report.pruned),
        ("debug symbols carried along", report.companions),
    ];

    println!("{} Summary:", marker(out, Status::Info));
    for (label, count) in lines.iter().filter(|(_, count)| *count > 0) {
        println!("   {} {}", count, label);
    }
    if report.kept > 0 {
        println!("   {}", dim(out, &format!("{} kept in place", report.kept)));
    }
    if report.dry_run {
        println!(
            "   {}",
            dim(out, &format!("({} changes would be made)", report.mutations()))
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    fn args() -> CombArgs {
        CombArgs {
            dry_run: false,
            promote_duplicates: false,
            json: false,
            deploy: None,
            quiet: true,
        }
    }

    #[test]
    fn test_missing_corpus_fails() {
        let temp = TempDir::new().unwrap();
        let result = execute(args(), &Context::for_root(temp.path()));
        assert!(result.is_err());
        assert!(result.unwrap_err().to_string().contains("Corpus.xml"));
    }

    #[test]
    fn test_comb_and_deploy() {
        let temp = TempDir::new().unwrap();
        let root = temp.path().join("project");
        fs::create_dir_all(root.join("Releases/Core/1.5/Assemblies")).unwrap();
        fs::write(root.join("Releases/Core/1.5/Assemblies/System.dll"), "x").unwrap();
        fs::write(root.join("Corpus.xml"), "<Corpus><Resources /></Corpus>").unwrap();

        let target = temp.path().join("Mods/Out");
        let result = execute(
            CombArgs {
                deploy: Some(target.clone()),
                ..args()
            },
            &Context::for_root(&root),
        );
        assert!(result.is_ok());
        assert!(!root.join("Releases/Core/1.5/Assemblies/System.dll").exists());
        assert!(target.join("Releases/Core/1.5/Assemblies").is_dir());
        assert!(target.join("Common/Libraries/Assemblies").is_dir());
    }
}
