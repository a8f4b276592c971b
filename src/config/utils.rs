// Copyright (c) 2025 Ronan LE MEILLAT, SCTG Development
// This file is part of the ssa-noise-monitor project and is licensed under the
// SCTG Development Non-Commercial License v1.0 (see LICENSE.md for details).

//! Configuration utilities
//!
//! This module provides the validation rules applied to a merged
//! configuration before the sampling loop may start.

use log::debug;

use super::Config;
use crate::error::{MonitorError, Result};

/// Check if a string looks like a usable instrument address
///
/// Accepts an IP address, a socket address (`ip:port`), or a host name
/// optionally followed by `:port`.
///
/// # Arguments
///
/// * `addr` - The address string to validate
///
/// # Returns
///
/// `true` if the address is plausible, `false` otherwise
pub fn is_valid_instrument_address(addr: &str) -> bool {
    if addr.parse::<std::net::IpAddr>().is_ok() || addr.parse::<std::net::SocketAddr>().is_ok() {
        return true;
    }

    let (host, port) = match addr.rsplit_once(':') {
        Some((host, port)) => (host, Some(port)),
        None => (addr, None),
    };
    if let Some(port) = port {
        if port.parse::<u16>().is_err() {
            return false;
        }
    }

    !host.is_empty()
        && host
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '.')
}

/// Validates the invariants of a configuration record.
///
/// # Validation Rules
///
/// - **History capacity**: at least one sample
/// - **Sampling interval**: finite and not negative
/// - **Loop tick and instrument timeout**: at least one millisecond
pub fn validate_specific_rules(config: &Config) -> Result<()> {
    debug!("Performing configuration validation checks");

    let sampling = &config.sampling;
    if sampling.history_capacity < 1 {
        return Err(MonitorError::InvalidConfiguration(format!(
            "history capacity must be at least 1 (got {})",
            sampling.history_capacity
        )));
    }

    if sampling.interval().is_none() {
        return Err(MonitorError::InvalidConfiguration(format!(
            "sampling interval must be a positive number of seconds or zero (got {})",
            sampling.interval_s
        )));
    }

    if sampling.tick_ms < 1 {
        return Err(MonitorError::InvalidConfiguration(
            "loop tick must be at least 1 ms".to_string(),
        ));
    }

    if config.instrument.timeout_ms < 1 {
        return Err(MonitorError::InvalidConfiguration(
            "instrument timeout must be at least 1 ms".to_string(),
        ));
    }

    Ok(())
}

/// Validates that the configuration designates an instrument to connect to.
///
/// The simulated analyzer needs no address.
pub fn validate_connection_target(config: &Config) -> Result<()> {
    if config.instrument.simulated {
        return Ok(());
    }

    match config.instrument.address.as_deref().map(str::trim) {
        None | Some("") => Err(MonitorError::InvalidConfiguration(
            "instrument address is not set".to_string(),
        )),
        Some(address) if !is_valid_instrument_address(address) => {
            Err(MonitorError::InvalidConfiguration(format!(
                "instrument address '{}' is not a valid host or host:port",
                address
            )))
        }
        Some(_) => Ok(()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_instrument_addresses() {
        assert!(is_valid_instrument_address("192.168.1.20"));
        assert!(is_valid_instrument_address("192.168.1.20:5025"));
        assert!(is_valid_instrument_address("ssa3021x.lab"));
        assert!(is_valid_instrument_address("ssa3021x.lab:5025"));
        assert!(is_valid_instrument_address("::1"));
        assert!(!is_valid_instrument_address("ssa:port"));
        assert!(!is_valid_instrument_address("bad host"));
        assert!(!is_valid_instrument_address(""));
    }

    #[test]
    fn test_defaults_are_valid() {
        assert!(validate_specific_rules(&Config::default()).is_ok());
    }

    #[test]
    fn test_zero_capacity_rejected() {
        let mut config = Config::default();
        config.sampling.history_capacity = 0;
        assert!(matches!(
            validate_specific_rules(&config),
            Err(MonitorError::InvalidConfiguration(_))
        ));
    }

    #[test]
    fn test_negative_and_nan_interval_rejected() {
        let mut config = Config::default();
        config.sampling.interval_s = -0.5;
        assert!(validate_specific_rules(&config).is_err());
        config.sampling.interval_s = f64::NAN;
        assert!(validate_specific_rules(&config).is_err());
        config.sampling.interval_s = 0.0;
        assert!(validate_specific_rules(&config).is_ok());
    }

    #[test]
    fn test_connection_target() {
        let mut config = Config::default();
        assert!(validate_connection_target(&config).is_err());

        config.instrument.address = Some("  ".to_string());
        assert!(validate_connection_target(&config).is_err());

        config.instrument.address = Some("10.0.0.5".to_string());
        assert!(validate_connection_target(&config).is_ok());

        config.instrument.address = None;
        config.instrument.simulated = true;
        assert!(validate_connection_target(&config).is_ok());
    }
}
