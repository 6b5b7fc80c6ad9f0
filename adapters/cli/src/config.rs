//! TOML configuration for the headless session.

use std::{fs, path::Path};

use anyhow::{Context, Result};
use serde::Deserialize;
use valley_system_controls::ControlsConfig;
use valley_world::WorldConfig;

/// Settings read from the optional `--config` file.
#[derive(Clone, Debug, Default, PartialEq, Deserialize)]
#[serde(default)]
pub(crate) struct CliConfig {
    pub(crate) world: WorldConfig,
    pub(crate) controls: ControlsConfig,
}

impl CliConfig {
    /// Loads the configuration, falling back to defaults when no path is given.
    pub(crate) fn load(path: Option<&Path>) -> Result<Self> {
        let Some(path) = path else {
            return Ok(Self::default());
        };
        let contents = fs::read_to_string(path)
            .with_context(|| format!("failed to read config file {}", path.display()))?;
        Self::parse(&contents).with_context(|| format!("invalid config file {}", path.display()))
    }

    fn parse(contents: &str) -> Result<Self> {
        toml::from_str(contents).context("failed to parse TOML")
    }
}
