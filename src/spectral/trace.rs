// Copyright (c) 2025 Ronan LE MEILLAT, SCTG Development
// This file is part of the ssa-noise-monitor project and is licensed under the
// SCTG Development Non-Commercial License v1.0 (see LICENSE.md for details).

//! Spectrum analyzer trace

use serde::{Deserialize, Serialize};

use crate::error::{MonitorError, Result};

/// One acquired sweep: frequencies in Hz and the parallel amplitudes
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Trace {
    frequencies: Vec<f64>,
    amplitudes: Vec<f64>,
}

impl Trace {
    /// Build a trace, rejecting mismatched frequency/amplitude lengths
    pub fn new(frequencies: Vec<f64>, amplitudes: Vec<f64>) -> Result<Self> {
        if frequencies.len() != amplitudes.len() {
            return Err(MonitorError::AcquisitionFailure(format!(
                "trace has {} frequencies but {} amplitudes",
                frequencies.len(),
                amplitudes.len()
            )));
        }
        Ok(Self {
            frequencies,
            amplitudes,
        })
    }

    /// Build a trace from amplitudes with frequencies linearly spaced
    /// between `start_hz` and `stop_hz` (both included)
    pub fn from_span(start_hz: f64, stop_hz: f64, amplitudes: Vec<f64>) -> Self {
        let frequencies = linspace(start_hz, stop_hz, amplitudes.len());
        Self {
            frequencies,
            amplitudes,
        }
    }

    pub fn frequencies(&self) -> &[f64] {
        &self.frequencies
    }

    pub fn amplitudes(&self) -> &[f64] {
        &self.amplitudes
    }

    /// Frequencies scaled to MHz, as plotted on the raw trace
    pub fn frequencies_mhz(&self) -> Vec<f64> {
        self.frequencies.iter().map(|f| f / 1e6).collect()
    }

    pub fn len(&self) -> usize {
        self.amplitudes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.amplitudes.is_empty()
    }
}

fn linspace(start: f64, stop: f64, points: usize) -> Vec<f64> {
    match points {
        0 => Vec::new(),
        1 => vec![start],
        n => {
            let step = (stop - start) / (n - 1) as f64;
            let last = n - 1;
            (0..n)
                .map(|i| if i == last { stop } else { start + step * i as f64 })
                .collect()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_mismatched_lengths_rejected() {
        let result = Trace::new(vec![1.0, 2.0], vec![1.0]);
        assert!(matches!(result, Err(MonitorError::AcquisitionFailure(_))));
    }

    #[test]
    fn test_from_span_includes_endpoints() {
        let trace = Trace::from_span(1e6, 5e6, vec![0.0; 5]);
        assert_eq!(trace.frequencies(), &[1e6, 2e6, 3e6, 4e6, 5e6]);
        assert_relative_eq!(trace.frequencies_mhz()[4], 5.0);
    }

    #[test]
    fn test_from_span_degenerate_lengths() {
        assert!(Trace::from_span(1.0, 2.0, vec![]).frequencies().is_empty());
        assert_eq!(Trace::from_span(1.0, 2.0, vec![3.0]).frequencies(), &[1.0]);
    }
}
