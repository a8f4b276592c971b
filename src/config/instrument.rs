// Copyright (c) 2025 Ronan LE MEILLAT, SCTG Development
// This file is part of the ssa-noise-monitor project and is licensed under the
// SCTG Development Non-Commercial License v1.0 (see LICENSE.md for details).

//! Instrument connection configuration
//!
//! This module defines how the monitor reaches the spectrum analyzer.

use serde::{Deserialize, Serialize};

/// Configuration of the spectrum analyzer connection.
///
/// The analyzer is driven through SCPI over a raw TCP socket. The address
/// may be left unset in the configuration file and supplied interactively
/// or on the command line.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InstrumentConfig {
    /// Network address of the analyzer, `host` or `host:port`.
    pub address: Option<String>,

    /// SCPI socket port used when the address carries no port.
    #[serde(default = "default_port")]
    pub port: u16,

    /// Timeout in milliseconds applied to connect, read and write.
    ///
    /// A stuck instrument stalls the sampling loop for at most this long
    /// per operation before the tick is reported as failed.
    #[serde(default = "default_timeout_ms")]
    pub timeout_ms: u64,

    /// Use the simulated analyzer instead of a real instrument.
    #[serde(default)]
    pub simulated: bool,
}

fn default_port() -> u16 {
    5025 // SCPI raw socket
}

fn default_timeout_ms() -> u64 {
    5000
}

impl Default for InstrumentConfig {
    fn default() -> Self {
        Self {
            address: None,
            port: default_port(),
            timeout_ms: default_timeout_ms(),
            simulated: false,
        }
    }
}
