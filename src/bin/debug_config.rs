// Copyright (c) 2025 Ronan LE MEILLAT, SCTG Development
// This file is part of the ssa-noise-monitor project and is licensed under the
// SCTG Development Non-Commercial License v1.0 (see LICENSE.md for details).

// Print the effective configuration for a configuration file
use anyhow::{Context, Result};
use serde_json::json;
use ssa_noise_monitor::config::{default_config_path, load_persisted, Config};
use std::path::PathBuf;

fn main() -> Result<()> {
    env_logger::Builder::from_default_env()
        .filter_level(log::LevelFilter::Warn)
        .init();

    let path = match std::env::args_os().nth(1) {
        Some(arg) => PathBuf::from(arg),
        None => default_config_path().context("No path given and no home directory")?,
    };

    println!("Testing file: {:?}", path);
    println!("File exists: {}", path.exists());

    let persisted = load_persisted(&path);
    match Config::resolve(persisted.as_ref(), &json!({})) {
        Ok(config) => {
            let yaml = serde_yml::to_string(&config)?;
            println!("Effective configuration:\n{}", yaml);
        }
        Err(e) => println!("Validation failed: {}", e),
    }

    Ok(())
}
