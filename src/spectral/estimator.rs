// Copyright (c) 2025 Ronan LE MEILLAT, SCTG Development
// This file is part of the ssa-noise-monitor project and is licensed under the
// SCTG Development Non-Commercial License v1.0 (see LICENSE.md for details).

//! Peak signal and SNR estimation
//!
//! The estimator assumes the carrier sits away from the span edges: the
//! first and last quarter of the trace are taken as noise floor and the
//! trace maximum as signal.

use super::Trace;
use crate::error::{MonitorError, Result};

/// Peak signal and SNR derived from a single trace
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Estimate {
    pub peak_signal: f64,
    pub noise_floor: f64,
    pub snr: f64,
}

/// Samples used for the noise floor: `[..len/4]` followed by `[3*len/4..]`
pub fn noise_floor_samples(amplitudes: &[f64]) -> Vec<f64> {
    let len = amplitudes.len();
    let head = &amplitudes[..len / 4];
    let tail = &amplitudes[3 * len / 4..];
    head.iter().chain(tail.iter()).copied().collect()
}

/// Estimate peak signal and SNR of `trace`
pub fn estimate(trace: &Trace) -> Result<Estimate> {
    let amplitudes = trace.amplitudes();
    if amplitudes.is_empty() {
        return Err(MonitorError::EmptyTrace);
    }

    let peak_signal = amplitudes
        .iter()
        .copied()
        .fold(f64::NEG_INFINITY, f64::max);

    let noise = noise_floor_samples(amplitudes);
    if noise.is_empty() {
        return Err(MonitorError::EmptyTrace);
    }
    let noise_floor = noise.iter().sum::<f64>() / noise.len() as f64;

    Ok(Estimate {
        peak_signal,
        noise_floor,
        snr: ratio(peak_signal, noise_floor),
    })
}

fn ratio(peak_signal: f64, noise_floor: f64) -> f64 {
    if noise_floor == 0.0 {
        // Sign of a zero floor must not flip the result
        return if peak_signal > 0.0 {
            f64::INFINITY
        } else if peak_signal == 0.0 {
            f64::NAN
        } else {
            f64::NEG_INFINITY
        };
    }
    peak_signal / noise_floor
}
