// Copyright (c) 2025 Ronan LE MEILLAT, SCTG Development
// This file is part of the ssa-noise-monitor project and is licensed under the
// SCTG Development Non-Commercial License v1.0 (see LICENSE.md for details).

//! Configuration management for the noise monitor
//!
//! The effective configuration is produced by merging three trees:
//! the built-in defaults, an optional persisted file (YAML, so plain JSON
//! files are accepted too) and explicit overrides from the command line.
//! The defaults define the accepted schema; see [`merge`].
//!
//! ## Configuration Structure
//!
//! - `instrument`: how to reach the spectrum analyzer
//! - `sampling`: acquisition interval, history capacity and loop tick
//! - `connect`: skip the interactive prompt
//!
//! ## Usage
//!
//! ```no_run
//! use ssa_noise_monitor::config::{self, Config};
//! use serde_json::json;
//!
//! let path = config::default_config_path().unwrap();
//! let persisted = config::load_persisted(&path);
//! let overrides = json!({ "sampling": { "interval_s": 0.5 } });
//! let config = Config::resolve(persisted.as_ref(), &overrides).unwrap();
//! println!("History capacity: {}", config.sampling.history_capacity);
//! ```

pub mod instrument;
pub mod merge;
pub mod prompt;
pub mod sampling;
pub mod utils;

use std::fs::{self, File};
use std::io::Write;
use std::path::{Path, PathBuf};

use anyhow::Context;
use log::{debug, warn};
use serde::{Deserialize, Serialize};
use serde_json::Value;

pub use instrument::InstrumentConfig;
pub use merge::{merge, set_leaf};
pub use prompt::{obtain_config, ConfigPrompter, ConsolePrompter};
pub use sampling::SamplingConfig;
pub use utils::{is_valid_instrument_address, validate_connection_target};

use crate::error::{MonitorError, Result};

/// File name of the persisted configuration under `$HOME/.config`
pub const DEFAULT_CONFIG_FILE: &str = "ssa3021x-noise-monitor.yaml";

/// Root configuration structure for the noise monitor.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Config {
    /// Spectrum analyzer connection settings.
    #[serde(default)]
    pub instrument: InstrumentConfig,

    /// Sampling loop settings.
    #[serde(default)]
    pub sampling: SamplingConfig,

    /// Start sampling without the interactive prompt.
    #[serde(default)]
    pub connect: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            instrument: InstrumentConfig::default(),
            sampling: SamplingConfig::default(),
            connect: false,
        }
    }
}

impl Config {
    /// Merge the defaults with `persisted` and `overrides`, then validate.
    ///
    /// Fails with [`MonitorError::InvalidConfiguration`] if the merged tree
    /// does not fit the configuration types or breaks an invariant.
    pub fn resolve(persisted: Option<&Value>, overrides: &Value) -> Result<Self> {
        let defaults = serde_json::to_value(Self::default())
            .map_err(|e| MonitorError::InvalidConfiguration(e.to_string()))?;
        let merged = merge(&defaults, persisted, overrides);
        Self::from_value(merged)
    }

    /// Deserialize a configuration tree and validate it
    pub fn from_value(value: Value) -> Result<Self> {
        let config: Config = serde_json::from_value(value)
            .map_err(|e| MonitorError::InvalidConfiguration(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Check the record invariants
    pub fn validate(&self) -> Result<()> {
        utils::validate_specific_rules(self)
    }

    /// Save the configuration to a YAML file, creating parent directories
    pub fn save_to_file<P: AsRef<Path>>(&self, path: P) -> anyhow::Result<()> {
        let path = path.as_ref();
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() && !parent.exists() {
                debug!("Creating parent directory: {:?}", parent);
                fs::create_dir_all(parent).with_context(|| {
                    format!("Failed to create parent directory for config at {:?}", parent)
                })?;
            }
        }

        let yaml =
            serde_yml::to_string(self).context("Failed to serialize configuration to YAML")?;

        let mut file = File::create(path)
            .with_context(|| format!("Failed to create config file at {:?}", path))?;

        file.write_all(yaml.as_bytes())
            .with_context(|| format!("Failed to write configuration to {:?}", path))?;

        Ok(())
    }
}

/// Default location of the persisted configuration
///
/// `None` when no home directory is known.
pub fn default_config_path() -> Option<PathBuf> {
    std::env::var_os("HOME")
        .filter(|home| !home.is_empty())
        .map(|home| PathBuf::from(home).join(".config").join(DEFAULT_CONFIG_FILE))
}

/// Read a persisted configuration tree
///
/// A missing or unreadable file is not an error: it is logged and the
/// caller falls back to the defaults.
pub fn load_persisted<P: AsRef<Path>>(path: P) -> Option<Value> {
    let path = path.as_ref();
    match read_tree(path) {
        Ok(value) => {
            debug!("Loaded persisted configuration from {:?}", path);
            Some(value)
        }
        Err(err) => {
            warn!("Failed to load configuration file {:?}: {:#}", path, err);
            None
        }
    }
}

fn read_tree(path: &Path) -> anyhow::Result<Value> {
    let contents = fs::read_to_string(path)
        .with_context(|| format!("Failed to read configuration file at {:?}", path))?;

    // YAML first, then convert to a JSON value for merging
    let yaml_value: serde_yml::Value = serde_yml::from_str(&contents)
        .with_context(|| format!("Failed to parse YAML configuration from {:?}", path))?;

    serde_json::to_value(&yaml_value)
        .with_context(|| format!("Failed to convert YAML configuration from {:?}", path))
}
