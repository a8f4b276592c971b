// Copyright (c) 2025 Ronan LE MEILLAT, SCTG Development
// This file is part of the ssa-noise-monitor project and is licensed under the
// SCTG Development Non-Commercial License v1.0 (see LICENSE.md for details).

//! Simulated spectrum analyzer
//!
//! This module provides an analyzer that synthesizes sweeps with the
//! NoiseGenerator, for running the monitor without hardware.

use log::debug;

use super::TraceSource;
use crate::error::{MonitorError, Result};
use crate::spectral::Trace;
use crate::utility::noise_generator::NoiseGenerator;

/// Sweep points of an SSA3021X trace
pub const SWEEP_POINTS: usize = 751;

/// Analyzer producing a noisy carrier in the middle of a 10 MHz span.
///
/// Amplitudes are linear (mV). The carrier level wanders from sweep to
/// sweep so the signal and SNR series have something to show.
pub struct SimulatedAnalyzer {
    generator: NoiseGenerator,
    connected: bool,
    start_hz: f64,
    stop_hz: f64,
    noise_floor: f64,
    noise_sigma: f64,
    carrier: f64,
    carrier_jitter: f64,
    carrier_width: f64,
}

impl SimulatedAnalyzer {
    pub fn new() -> Self {
        Self::with_generator(NoiseGenerator::new_from_system_time())
    }

    /// Analyzer with a reproducible sweep sequence
    pub fn with_seed(seed: u32) -> Self {
        Self::with_generator(NoiseGenerator::new(seed))
    }

    fn with_generator(generator: NoiseGenerator) -> Self {
        Self {
            generator,
            connected: false,
            start_hz: 995e6,
            stop_hz: 1005e6,
            noise_floor: 0.02,
            noise_sigma: 0.004,
            carrier: 1.0,
            carrier_jitter: 0.05,
            carrier_width: 6.0,
        }
    }
}

impl Default for SimulatedAnalyzer {
    fn default() -> Self {
        Self::new()
    }
}

impl TraceSource for SimulatedAnalyzer {
    fn connect(&mut self, address: &str) -> Result<()> {
        debug!("Simulated analyzer connected as {}", address);
        self.connected = true;
        Ok(())
    }

    fn disconnect(&mut self) -> Result<()> {
        self.connected = false;
        Ok(())
    }

    fn identify(&mut self) -> Result<String> {
        Ok("Siglent Technologies,SSA3021X,SIMULATED,0.0.0".to_string())
    }

    fn acquire_trace(&mut self) -> Result<Trace> {
        if !self.connected {
            return Err(MonitorError::AcquisitionFailure(
                "simulated analyzer is not connected".to_string(),
            ));
        }

        let carrier = self.carrier * (1.0 + self.carrier_jitter * self.generator.random_gaussian());
        let amplitudes = self.generator.generate_carrier_sweep(
            SWEEP_POINTS,
            self.noise_floor,
            self.noise_sigma,
            carrier,
            self.carrier_width,
        );
        Ok(Trace::from_span(self.start_hz, self.stop_hz, amplitudes))
    }
}
