// Copyright (c) 2025 Ronan LE MEILLAT, SCTG Development
// This file is part of the ssa-noise-monitor project and is licensed under the
// SCTG Development Non-Commercial License v1.0 (see LICENSE.md for details).

//! SSA3021X noise monitor library
//!
//! This library samples a Siglent SSA3021X spectrum analyzer on a fixed
//! interval, estimates the peak signal and signal-to-noise ratio of every
//! sweep and keeps a rolling history of both for display.

pub mod acquisition;
pub mod config;
pub mod daemon;
pub mod error;
pub mod history;
pub mod spectral;
pub mod utility;
pub mod visualization;

pub use error::{MonitorError, Result};
