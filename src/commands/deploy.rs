//! # Deploy Command Implementation
//!
//! Copies `About/`, `Common/`, `Releases/` and the top-level project files
//! into a mod folder, replacing whatever was there. Run `comb` first, or use
//! `comb --deploy`.

use std::path::PathBuf;

use anyhow::Result;
use clap::Args;

use release_comb::deploy;
use release_comb::output::{marker, Status};

use super::Context;

/// Copy the project into a mod folder
#[derive(Args, Debug)]
pub struct DeployArgs {
    /// Target directory. Removed first if it exists
    #[arg(value_name = "DIR")]
    pub target: PathBuf,
}

pub fn execute(args: DeployArgs, context: &Context) -> Result<()> {
    let out = context.output();
    let settings = context.settings()?;
    let layout = context.layout(&settings);
    let target = context.resolve(&args.target);

    println!(
        "{} Deploying to {}",
        marker(&out, Status::Scan),
        target.display()
    );
    let deployment = deploy::execute(&layout, &target)?;

    for skipped in &deployment.skipped {
        println!("{} {} not found, skipped", marker(&out, Status::Warn), skipped);
    }
    println!(
        "{} Copied {} files",
        marker(&out, Status::Ok),
        deployment.files
    );
    Ok(())
}
