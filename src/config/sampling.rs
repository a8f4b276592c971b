// Copyright (c) 2025 Ronan LE MEILLAT, SCTG Development
// This file is part of the ssa-noise-monitor project and is licensed under the
// SCTG Development Non-Commercial License v1.0 (see LICENSE.md for details).

//! Sampling configuration

use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Configuration of the sampling loop.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SamplingConfig {
    /// Seconds between two acquisitions, `0` polls as fast as the loop runs.
    pub interval_s: f64,

    /// Number of samples retained in each rolling history.
    pub history_capacity: usize,

    /// Loop poll period in milliseconds.
    #[serde(default = "default_tick_ms")]
    pub tick_ms: u64,
}

fn default_tick_ms() -> u64 {
    1
}

impl SamplingConfig {
    /// Acquisition interval, `None` if negative or not finite
    pub fn interval(&self) -> Option<Duration> {
        Duration::try_from_secs_f64(self.interval_s).ok()
    }

    pub fn tick(&self) -> Duration {
        Duration::from_millis(self.tick_ms)
    }
}

impl Default for SamplingConfig {
    fn default() -> Self {
        Self {
            interval_s: 1.0,
            history_capacity: 1000,
            tick_ms: default_tick_ms(),
        }
    }
}
