//! Configuration loading and merging
//!
//! Handles loading from config files, environment variables, and CLI arguments
//! with proper precedence (CLI > Env > File > Defaults).

use anyhow::{ensure, Result};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::encode::Timing;
use crate::plan::EngineSettings;
use crate::propagate::{ClampPolicy, ClampTable, DependencyTable};
use crate::sink::KeyBindings;

pub mod loader;
pub mod merge;

pub use loader::load_config;
pub use merge::{apply_env_overrides, merge_cli_with_config, CliOverrides};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Title of the editor window to focus.
    pub window_title: String,
    /// Seconds to wait after focusing, so the user can take their hands off.
    pub countdown_secs: u64,
    pub step_delay_ms: u64,
    pub nav_delay_ms: u64,
    pub activation_value: i32,
    pub attribute_scales: BTreeMap<String, i32>,
    /// Page → clamp policy; unlisted pages clamp narrow.
    pub clamp: BTreeMap<String, ClampPolicy>,
    /// Replaces the built-in dependency table when non-empty.
    pub dependencies: BTreeMap<String, Vec<String>>,
    pub keys: KeyBindings,
}

impl Default for Config {
    fn default() -> Self {
        let timing = Timing::default();
        Self {
            window_title: "Dragon's Dogma 2".to_string(),
            countdown_secs: 3,
            step_delay_ms: timing.step_delay_ms,
            nav_delay_ms: timing.nav_delay_ms,
            activation_value: 1,
            attribute_scales: BTreeMap::from([("chest_shape".to_string(), 2)]),
            clamp: BTreeMap::from([("markings".to_string(), ClampPolicy::Wide)]),
            dependencies: BTreeMap::new(),
            keys: KeyBindings::default(),
        }
    }
}

impl Config {
    pub fn validate(&self) -> Result<()> {
        ensure!(!self.window_title.trim().is_empty(), "window_title must not be empty");
        ensure!(self.step_delay_ms <= 1000, "step_delay_ms must be at most 1000");
        ensure!(self.nav_delay_ms <= 5000, "nav_delay_ms must be at most 5000");
        for (fragment, scale) in &self.attribute_scales {
            ensure!(!fragment.is_empty(), "attribute_scales keys must not be empty");
            ensure!(*scale >= 1, "attribute scale for '{}' must be >= 1", fragment);
        }
        Ok(())
    }

    pub fn timing(&self) -> Timing {
        Timing { step_delay_ms: self.step_delay_ms, nav_delay_ms: self.nav_delay_ms }
    }

    pub fn engine_settings(&self) -> EngineSettings {
        let dependencies = if self.dependencies.is_empty() {
            DependencyTable::default()
        } else {
            DependencyTable::from_entries(self.dependencies.clone())
        };

        EngineSettings {
            timing: self.timing(),
            dependencies,
            clamp: ClampTable::new(self.clamp.clone()),
            attribute_scales: self
                .attribute_scales
                .iter()
                .map(|(fragment, scale)| (fragment.clone(), *scale))
                .collect(),
            activation_value: self.activation_value,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_valid_and_matches_engine_defaults() {
        let cfg = Config::default();
        cfg.validate().expect("valid");
        let settings = cfg.engine_settings();
        let defaults = EngineSettings::default();
        assert_eq!(settings.timing, defaults.timing);
        assert_eq!(settings.dependencies, defaults.dependencies);
        assert_eq!(settings.clamp, defaults.clamp);
        assert_eq!(settings.attribute_scales, defaults.attribute_scales);
    }

    #[test]
    fn test_custom_dependencies_replace_defaults() {
        let cfg = Config {
            dependencies: BTreeMap::from([("jaw".to_string(), vec!["chin".to_string()])]),
            ..Config::default()
        };
        let table = cfg.engine_settings().dependencies;
        assert_eq!(table.len(), 1);
        assert_eq!(table.dependents("jaw"), Some(&["chin".to_string()][..]));
        assert!(table.dependents("arm_size").is_none());
    }

    #[test]
    fn test_validate_rejects_zero_scale() {
        let cfg = Config {
            attribute_scales: BTreeMap::from([("chest_shape".to_string(), 0)]),
            ..Config::default()
        };
        assert!(cfg.validate().is_err());
    }
}
