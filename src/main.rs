// Copyright (c) 2025 Ronan LE MEILLAT, SCTG Development
// This file is part of the ssa-noise-monitor project and is licensed under the
// SCTG Development Non-Commercial License v1.0 (see LICENSE.md for details).

// Main entry point for the SSA3021X noise monitor
use anyhow::Result;
use clap::Parser;
use log::{debug, info, warn};
use serde_json::{json, Value};
use std::path::PathBuf;

use ssa_noise_monitor::acquisition::create_trace_source;
use ssa_noise_monitor::config::{
    default_config_path, load_persisted, obtain_config, set_leaf, validate_connection_target,
    Config, ConsolePrompter,
};
use ssa_noise_monitor::daemon::Daemon;
use ssa_noise_monitor::visualization::{JsonLinesRenderer, LogRenderer, Renderer};

/// Peak signal and SNR monitor for SSA3021X spectrum analyzers
#[derive(Debug, Parser)]
#[command(author, version, about, long_about = None)]
pub struct Args {
    /// Path to configuration file (YAML format)
    #[arg(long)]
    config: Option<PathBuf>,

    /// Instrument address (host or host:port)
    #[arg(long)]
    address: Option<String>,

    /// Number of samples kept in the signal and SNR history
    #[arg(long)]
    window: Option<usize>,

    /// Minimum time between two sweeps, in seconds
    #[arg(long)]
    interval: Option<f64>,

    /// Connect immediately without the interactive prompt
    #[arg(long)]
    connect: bool,

    /// Use the simulated analyzer instead of a real instrument
    #[arg(long)]
    simulate: bool,

    /// Write rendered series to this file (JSON lines)
    #[arg(long)]
    output: Option<PathBuf>,

    /// Save the effective configuration back to the configuration file
    #[arg(long)]
    save_config: bool,

    /// Enable verbose logging (debug level)
    #[arg(short = 'v', long = "verbose")]
    verbose: bool,

    /// Disable all logging output
    #[arg(short = 'q', long = "quiet")]
    quiet: bool,
}

impl Args {
    /// Command line values as a configuration override tree
    fn overrides(&self) -> Value {
        let mut tree = json!({});
        if let Some(address) = &self.address {
            set_leaf(&mut tree, &["instrument", "address"], json!(address));
        }
        if let Some(window) = self.window {
            set_leaf(&mut tree, &["sampling", "history_capacity"], json!(window));
        }
        if let Some(interval) = self.interval {
            set_leaf(&mut tree, &["sampling", "interval_s"], json!(interval));
        }
        if self.connect {
            set_leaf(&mut tree, &["connect"], json!(true));
        }
        if self.simulate {
            set_leaf(&mut tree, &["instrument", "simulated"], json!(true));
        }
        tree
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    let log_level = if args.quiet {
        log::LevelFilter::Off
    } else if args.verbose {
        log::LevelFilter::Debug
    } else {
        log::LevelFilter::Info
    };

    env_logger::Builder::from_default_env()
        .filter_level(log_level)
        .init();

    // Load configuration
    let config_path = args.config.clone().or_else(default_config_path);
    let persisted = match &config_path {
        Some(path) if path.exists() => load_persisted(path),
        Some(path) => {
            debug!("No configuration file at {:?}, using defaults", path);
            None
        }
        None => None,
    };

    let overrides = args.overrides();
    let resolved = Config::resolve(persisted.as_ref(), &overrides);

    let config = match resolved {
        Ok(config) if config.connect => config,
        Err(err) if args.connect => return Err(err.into()),
        resolved => {
            let initial = resolved.unwrap_or_else(|err| {
                warn!("Configuration rejected ({}), starting from defaults", err);
                Config::default()
            });
            match prompt_config(initial)? {
                Some(config) => config,
                None => {
                    info!("Configuration cancelled");
                    return Ok(());
                }
            }
        }
    };
    validate_connection_target(&config)?;

    if args.save_config {
        match &config_path {
            Some(path) => {
                config.save_to_file(path)?;
                info!("Configuration saved to {:?}", path);
            }
            None => warn!("No configuration path available, not saving"),
        }
    }

    let mut renderers: Vec<Box<dyn Renderer>> = vec![Box::new(LogRenderer::new())];
    if let Some(output) = &args.output {
        info!("Writing rendered series to {:?}", output);
        renderers.push(Box::new(JsonLinesRenderer::create(output)?));
    }

    info!("Starting in daemon mode");
    let source = create_trace_source(&config.instrument);

    let mut daemon = Daemon::new();
    daemon.start_signal_handlers();
    daemon.start_console_commands();
    daemon.launch(&config, source, renderers).await?;

    Ok(())
}

/// Let the user review `initial` on the console
///
/// The stdin lock is released before the console command reader starts.
fn prompt_config(initial: Config) -> Result<Option<Config>> {
    let stdin = std::io::stdin();
    let mut prompter = ConsolePrompter::new(stdin.lock(), std::io::stdout());
    obtain_config(&mut prompter, initial)
}
