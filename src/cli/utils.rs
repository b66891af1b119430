//! Shared CLI utilities.

use anyhow::{Context, Result};
use clap::Args;
use std::path::PathBuf;

use crate::config::{apply_env_overrides, load_config, merge_cli_with_config, CliOverrides, Config};
use crate::profile::Profile;

#[derive(Args)]
pub struct ProfileArgs {
    /// Default profile the editor starts from (e.g. defaults/human_male.ini)
    #[arg(short = 'd', long = "default", value_name = "INI")]
    pub default: PathBuf,

    /// Target profile to reproduce
    #[arg(short = 't', long, value_name = "INI")]
    pub target: PathBuf,
}

impl ProfileArgs {
    pub fn load(&self) -> Result<(Profile, Profile)> {
        let baseline = Profile::load(&self.default)
            .with_context(|| format!("Invalid default profile: {}", self.default.display()))?;
        let target = Profile::load(&self.target)
            .with_context(|| format!("Invalid target profile: {}", self.target.display()))?;
        Ok((baseline, target))
    }
}

#[derive(Args)]
pub struct ConfigArgs {
    /// Path to config file (autoslider.toml or autoslider.yml)
    #[arg(short = 'c', long, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Delay per slider step press/release (ms)
    #[arg(long, value_name = "MS")]
    pub step_delay_ms: Option<u64>,

    /// Delay per navigation press/release (ms)
    #[arg(long, value_name = "MS")]
    pub nav_delay_ms: Option<u64>,
}

impl ConfigArgs {
    pub fn overrides(&self) -> CliOverrides {
        CliOverrides {
            step_delay_ms: self.step_delay_ms,
            nav_delay_ms: self.nav_delay_ms,
            ..CliOverrides::default()
        }
    }
}

/// File (explicit or discovered in the working directory), then env, then CLI.
pub fn resolve_config(args: &ConfigArgs, overrides: &CliOverrides) -> Result<Config> {
    let cwd = std::env::current_dir().context("Failed to read working directory")?;
    let file_config = load_config(&cwd, args.config.as_deref())?;
    let config = merge_cli_with_config(apply_env_overrides(file_config)?, overrides);
    config.validate()?;
    tracing::debug!("Resolved config: {:?}", config);
    Ok(config)
}
