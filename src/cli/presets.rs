//! Presets command implementation

use anyhow::{Context, Result};
use clap::Args;
use std::fs;
use std::path::PathBuf;

use crate::presets::{collect_presets, render_catalog};

#[derive(Args)]
pub struct PresetsArgs {
    /// Directory holding template profiles
    #[arg(value_name = "DIR", default_value = "templates")]
    pub dir: PathBuf,

    /// Write the catalog to this file (e.g. templates/templates.md)
    #[arg(short, long, value_name = "FILE")]
    pub output: Option<PathBuf>,
}

pub fn run(args: PresetsArgs) -> Result<()> {
    if !args.dir.is_dir() {
        anyhow::bail!("Path is not a directory: {}", args.dir.display());
    }

    let entries = collect_presets(&args.dir)?;
    let catalog = render_catalog(&entries);

    match &args.output {
        Some(path) => {
            fs::write(path, &catalog)
                .with_context(|| format!("Failed writing catalog: {}", path.display()))?;
            println!("Wrote {} presets to {}", entries.len(), path.display());
        }
        None => print!("{}", catalog),
    }
    Ok(())
}
