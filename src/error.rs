// Copyright (c) 2025 Ronan LE MEILLAT, SCTG Development
// This file is part of the ssa-noise-monitor project and is licensed under the
// SCTG Development Non-Commercial License v1.0 (see LICENSE.md for details).

//! Error taxonomy shared by the monitor components
//!
//! Configuration errors are fatal to startup. Trace and acquisition errors
//! are recovered by the sampling loop on the tick where they occur.

/// Errors raised by the sampling core and its collaborators
#[derive(thiserror::Error, Debug, Clone, PartialEq)]
pub enum MonitorError {
    #[error("History capacity must be at least 1 (got {0})")]
    InvalidCapacity(usize),
    #[error("Invalid configuration: {0}")]
    InvalidConfiguration(String),
    #[error("Trace contains no usable amplitude samples")]
    EmptyTrace,
    #[error("Acquisition failed: {0}")]
    AcquisitionFailure(String),
}

impl MonitorError {
    /// Errors that only skip the current tick
    pub fn is_recoverable(&self) -> bool {
        matches!(
            self,
            MonitorError::EmptyTrace | MonitorError::AcquisitionFailure(_)
        )
    }
}

pub type Result<T> = std::result::Result<T, MonitorError>;
