// Copyright (c) 2025 Ronan LE MEILLAT, SCTG Development
// This file is part of the ssa-noise-monitor project and is licensed under the
// SCTG Development Non-Commercial License v1.0 (see LICENSE.md for details).
//!
//! Spectral trace module
//!
//! This module holds the trace returned by one analyzer sweep and the
//! peak signal / SNR estimation derived from it.

mod estimator;
mod trace;

pub use estimator::{estimate, noise_floor_samples, Estimate};
pub use trace::Trace;
