//! # Activate Command Implementation
//!
//! Edits the host's `ModsConfig.xml` so that the mod loads: Harmony first,
//! the core game second, then this mod. Ids already in the list are moved,
//! never duplicated.

use std::path::PathBuf;

use anyhow::Result;
use clap::Args;

use release_comb::activation::ModsConfig;
use release_comb::defaults::{CORE_ID, HARMONY_ID};
use release_comb::metadata;
use release_comb::output::{marker, Status};

use super::Context;

/// Put the mod and its dependencies at the front of the active mod list
#[derive(Args, Debug)]
pub struct ActivateArgs {
    /// The host's ModsConfig.xml
    #[arg(value_name = "MODS_CONFIG")]
    pub mods_config: PathBuf,

    /// Package id to activate (defaults to the id in About/About.xml)
    #[arg(long, value_name = "ID")]
    pub package_id: Option<String>,

    /// Print the resulting list without saving it
    #[arg(short = 'n', long)]
    pub dry_run: bool,
}

pub fn execute(args: ActivateArgs, context: &Context) -> Result<()> {
    let out = context.output();
    let package_id = match args.package_id {
        Some(id) => id,
        None => metadata::package_id(&context.root.join("About").join("About.xml"))?,
    };

    let mut config = ModsConfig::load(&context.resolve(&args.mods_config))?;
    let mut mods = config.list();
    let before = mods.clone();
    mods.ensure_front(HARMONY_ID, CORE_ID);
    mods.insert_at(2, &package_id);

    if mods == before {
        println!("{} {} is already active", marker(&out, Status::Ok), package_id);
        return Ok(());
    }

    if args.dry_run {
        println!("{} Active mods would be:", marker(&out, Status::DryRun));
    } else {
        config.set(&mods)?;
        config.save()?;
        println!("{} Active mods:", marker(&out, Status::Ok));
    }
    for (index, id) in mods.ids().iter().enumerate() {
        println!("   {:>3}. {}", index + 1, id);
    }
    Ok(())
}
