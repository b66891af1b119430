//! Environment and CLI overrides on top of the file config.

use anyhow::{Context, Result};
use figment::providers::{Env, Serialized};
use figment::Figment;

use super::Config;

pub const ENV_PREFIX: &str = "AUTOSLIDER_";

/// Flags the CLI can set directly.
#[derive(Debug, Clone, Default)]
pub struct CliOverrides {
    pub window_title: Option<String>,
    pub countdown_secs: Option<u64>,
    pub step_delay_ms: Option<u64>,
    pub nav_delay_ms: Option<u64>,
}

/// Layer `AUTOSLIDER_*` variables over `config`. Nested keys use `__`,
/// e.g. `AUTOSLIDER_KEYS__CONFIRM=31`.
pub fn apply_env_overrides(config: Config) -> Result<Config> {
    Figment::from(Serialized::defaults(config))
        .merge(Env::prefixed(ENV_PREFIX).split("__"))
        .extract()
        .context("Invalid AUTOSLIDER_* environment override")
}

pub fn merge_cli_with_config(mut config: Config, cli: &CliOverrides) -> Config {
    if let Some(title) = &cli.window_title {
        config.window_title = title.clone();
    }
    if let Some(secs) = cli.countdown_secs {
        config.countdown_secs = secs;
    }
    if let Some(ms) = cli.step_delay_ms {
        config.step_delay_ms = ms;
    }
    if let Some(ms) = cli.nav_delay_ms {
        config.nav_delay_ms = ms;
    }
    config
}
