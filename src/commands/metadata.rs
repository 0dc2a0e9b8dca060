//! # Metadata Command Implementation
//!
//! Shows the mod's package id (from `About/About.xml`) and, when a properties
//! file is given, the host version the build targets.

use std::path::PathBuf;

use anyhow::Result;
use clap::Args;

use release_comb::metadata;
use release_comb::output::{marker, Status};

use super::Context;

/// Show the mod's package id and targeted host version
#[derive(Args, Debug)]
pub struct MetadataArgs {
    /// Mod metadata document
    #[arg(long, value_name = "FILE", default_value = "About/About.xml")]
    pub about: PathBuf,

    /// MSBuild properties file declaring `RimWorldVersion`
    #[arg(long, value_name = "FILE")]
    pub props: Option<PathBuf>,

    /// Print only the package id
    #[arg(long)]
    pub id_only: bool,
}

pub fn execute(args: MetadataArgs, context: &Context) -> Result<()> {
    let out = context.output();
    let package_id = metadata::package_id(&context.resolve(&args.about))?;

    if args.id_only {
        println!("{}", package_id);
        return Ok(());
    }

    println!("{} Package id: {}", marker(&out, Status::Info), package_id);
    if let Some(props) = args.props {
        let version = metadata::target_version(&context.resolve(&props))?;
        println!("{} Target version: {}", marker(&out, Status::Info), version);
    }
    Ok(())
}
