//! Plan command implementation

use anyhow::{Context, Result};
use clap::{Args, ValueEnum};
use std::fs;
use std::path::PathBuf;

use super::utils::{resolve_config, ConfigArgs, ProfileArgs};
use crate::plan::Planner;
use crate::render::{render_jsonl, render_text};

#[derive(Clone, Copy, ValueEnum)]
pub enum PlanFormat {
    Text,
    Jsonl,
}

#[derive(Args)]
pub struct PlanArgs {
    #[command(flatten)]
    pub profiles: ProfileArgs,

    #[command(flatten)]
    pub config: ConfigArgs,

    /// Output format
    #[arg(short, long, value_enum, default_value = "text")]
    pub format: PlanFormat,

    /// Write to this file instead of stdout
    #[arg(short, long, value_name = "FILE")]
    pub output: Option<PathBuf>,

    /// Omit the generated_at timestamp from JSONL output
    #[arg(long)]
    pub no_timestamp: bool,
}

pub fn run(args: PlanArgs) -> Result<()> {
    let config = resolve_config(&args.config, &args.config.overrides())?;
    let (baseline, target) = args.profiles.load()?;

    let plan = Planner::new(baseline, &target, config.engine_settings()).plan()?;

    let rendered = match args.format {
        PlanFormat::Text => render_text(&plan),
        PlanFormat::Jsonl => render_jsonl(&plan, !args.no_timestamp)?,
    };

    match &args.output {
        Some(path) => {
            if let Some(parent) = path.parent() {
                fs::create_dir_all(parent)?;
            }
            fs::write(path, rendered)
                .with_context(|| format!("Failed writing plan: {}", path.display()))?;
            println!("Wrote {} events to {}", plan.events.len(), path.display());
        }
        None => print!("{}", rendered),
    }
    Ok(())
}
