// Copyright (c) 2025 Ronan LE MEILLAT, SCTG Development
// This file is part of the ssa-noise-monitor project and is licensed under the
// SCTG Development Non-Commercial License v1.0 (see LICENSE.md for details).

//! # Gaussian Noise Generator
//!
//! This module provides a lightweight generator for Gaussian noise, used to
//! synthesize spectrum analyzer sweeps when no instrument is attached:
//!
//! - Running the monitor without hardware (`--simulate`)
//! - Producing reproducible traces for tests
//!
//! ## Features
//!
//! * Fast XORShift pseudo-random number generation
//! * Box-Muller transform for Gaussian distribution
//! * Synthetic sweeps made of a noise floor and a Gaussian-shaped carrier
//!
//! ## Examples
//!
//! ```rust
//! use ssa_noise_monitor::utility::noise_generator::NoiseGenerator;
//!
//! let mut generator = NoiseGenerator::new(12345);
//!
//! // 751 points of -80 dBm noise floor with a -20 dBm carrier in the middle
//! let sweep = generator.generate_carrier_sweep(751, -80.0, 1.5, -20.0, 4.0);
//! assert_eq!(sweep.len(), 751);
//! ```

use std::time::SystemTime;

/// Random number generator using the XORShift algorithm.
///
/// This struct implements a fast and lightweight pseudo-random number
/// generator. It is suitable for generating noise samples but must not be
/// used for cryptographic purposes.
///
/// # Examples
///
/// ```
/// use ssa_noise_monitor::utility::noise_generator::NoiseGenerator;
///
/// let mut generator = NoiseGenerator::new(12345);
/// let uniform = generator.random_float();
/// assert!((-1.0..=1.0).contains(&uniform));
/// ```
pub struct NoiseGenerator {
    /// Internal XORShift state, never zero
    rng_state: u32,
}

impl NoiseGenerator {
    /// Creates a new noise generator with a given seed.
    ///
    /// Using the same seed produces the same sequence. A zero seed would
    /// lock XORShift at zero and is replaced by a fixed non-zero value.
    pub fn new(seed: u32) -> Self {
        Self {
            rng_state: if seed == 0 { 0x9E37_79B9 } else { seed },
        }
    }

    /// Creates a new noise generator seeded from the system clock.
    pub fn new_from_system_time() -> Self {
        let seed = SystemTime::now()
            .duration_since(SystemTime::UNIX_EPOCH)
            .map(|elapsed| elapsed.as_millis() as u32)
            .unwrap_or_default();
        Self::new(seed)
    }

    /// Uniformly distributed value in `[-1.0, 1.0]`.
    pub fn random_float(&mut self) -> f64 {
        self.rng_state ^= self.rng_state << 13;
        self.rng_state ^= self.rng_state >> 17;
        self.rng_state ^= self.rng_state << 5;

        (self.rng_state as f64 / u32::MAX as f64) * 2.0 - 1.0
    }

    /// Standard normal value using the Box-Muller transform.
    pub fn random_gaussian(&mut self) -> f64 {
        let u1 = (self.random_float() + 1.0) / 2.0;
        let u2 = (self.random_float() + 1.0) / 2.0;

        // Avoid ln(0)
        let u1 = u1.max(0.0001);

        (-2.0 * u1.ln()).sqrt() * (2.0 * std::f64::consts::PI * u2).cos()
    }

    /// Generates `points` samples of a noise floor around `floor` with
    /// standard deviation `sigma`.
    pub fn generate_noise_floor(&mut self, points: usize, floor: f64, sigma: f64) -> Vec<f64> {
        (0..points)
            .map(|_| floor + self.random_gaussian() * sigma)
            .collect()
    }

    /// Generates a sweep with a noise floor and a carrier centred on the
    /// middle point.
    ///
    /// # Arguments
    ///
    /// * `points` - Number of sweep points
    /// * `floor` - Mean noise floor level
    /// * `sigma` - Standard deviation of the noise floor
    /// * `carrier` - Carrier level at its centre
    /// * `width` - Carrier standard deviation, in points
    pub fn generate_carrier_sweep(
        &mut self,
        points: usize,
        floor: f64,
        sigma: f64,
        carrier: f64,
        width: f64,
    ) -> Vec<f64> {
        let centre = points as f64 / 2.0;
        let width = width.max(f64::EPSILON);
        self.generate_noise_floor(points, floor, sigma)
            .into_iter()
            .enumerate()
            .map(|(i, noise)| {
                let offset = (i as f64 - centre) / width;
                let shape = (-0.5 * offset * offset).exp();
                noise + (carrier - floor) * shape
            })
            .collect()
    }
}
