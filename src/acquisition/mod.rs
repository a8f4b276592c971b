// Copyright (c) 2025 Ronan LE MEILLAT, SCTG Development
// This file is part of the ssa-noise-monitor project and is licensed under the
// SCTG Development Non-Commercial License v1.0 (see LICENSE.md for details).

//! Trace acquisition module
//!
//! This module handles the acquisition of sweeps from the spectrum
//! analyzer, either a real SSA3021X reached over SCPI or a simulated one.
//! The connection is held by an [`InstrumentSession`], which releases it
//! exactly once whatever way the sampling loop ends.

use log::{info, warn};

mod scpi;
mod simulated;

pub use scpi::{parse_trace_values, ScpiAnalyzer, MAX_ANSWER_BYTES};
pub use simulated::SimulatedAnalyzer;

use crate::config::InstrumentConfig;
use crate::error::{MonitorError, Result};
use crate::spectral::Trace;

/// Address reported for the simulated analyzer
pub const SIMULATED_ADDRESS: &str = "simulated";

/// Represents an instrument able to deliver spectrum traces
pub trait TraceSource: Send {
    /// Open the connection to the instrument at `address`
    fn connect(&mut self, address: &str) -> Result<()>;

    /// Close the connection
    fn disconnect(&mut self) -> Result<()>;

    /// Instrument identification string
    fn identify(&mut self) -> Result<String>;

    /// Acquire one sweep, blocking until the instrument answers
    fn acquire_trace(&mut self) -> Result<Trace>;
}

impl<T: TraceSource + ?Sized> TraceSource for Box<T> {
    fn connect(&mut self, address: &str) -> Result<()> {
        (**self).connect(address)
    }

    fn disconnect(&mut self) -> Result<()> {
        (**self).disconnect()
    }

    fn identify(&mut self) -> Result<String> {
        (**self).identify()
    }

    fn acquire_trace(&mut self) -> Result<Trace> {
        (**self).acquire_trace()
    }
}

/// A connected instrument, disconnected when dropped
pub struct InstrumentSession<S: TraceSource> {
    source: S,
    connected: bool,
}

impl<S: TraceSource> InstrumentSession<S> {
    /// Connect `source` to `address` and log its identification
    pub fn open(mut source: S, address: &str) -> Result<Self> {
        info!("Connecting to instrument at {}", address);
        source.connect(address)?;
        let mut session = Self {
            source,
            connected: true,
        };

        match session.source.identify() {
            Ok(id) => info!("Connected to {}", id),
            Err(err) => warn!("Connected, but identification failed: {}", err),
        }
        Ok(session)
    }

    /// Acquire one trace from the connected instrument
    pub fn acquire_trace(&mut self) -> Result<Trace> {
        if !self.connected {
            return Err(MonitorError::AcquisitionFailure(
                "instrument session is closed".to_string(),
            ));
        }
        self.source.acquire_trace()
    }

    pub fn is_connected(&self) -> bool {
        self.connected
    }

    /// Disconnect now and report the outcome
    pub fn close(mut self) -> Result<()> {
        self.release()
    }

    fn release(&mut self) -> Result<()> {
        if !self.connected {
            return Ok(());
        }
        self.connected = false;
        info!("Disconnecting from instrument");
        self.source.disconnect()
    }
}

impl<S: TraceSource> Drop for InstrumentSession<S> {
    fn drop(&mut self) {
        if let Err(err) = self.release() {
            warn!("Failed to disconnect from instrument: {}", err);
        }
    }
}

/// Build the trace source selected by the configuration
pub fn create_trace_source(config: &InstrumentConfig) -> Box<dyn TraceSource> {
    if config.simulated {
        info!("Using simulated spectrum analyzer");
        Box::new(SimulatedAnalyzer::new())
    } else {
        Box::new(ScpiAnalyzer::new(config))
    }
}

/// Address to hand to [`TraceSource::connect`]
pub fn connection_address(config: &InstrumentConfig) -> Result<String> {
    if config.simulated {
        return Ok(SIMULATED_ADDRESS.to_string());
    }
    config
        .address
        .as_deref()
        .map(str::trim)
        .filter(|address| !address.is_empty())
        .map(str::to_string)
        .ok_or_else(|| {
            MonitorError::InvalidConfiguration("instrument address is not set".to_string())
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::{
        atomic::{AtomicUsize, Ordering},
        Arc,
    };

    #[derive(Default)]
    struct Counters {
        connects: AtomicUsize,
        disconnects: AtomicUsize,
    }

    struct CountingSource {
        counters: Arc<Counters>,
        fail_connect: bool,
    }

    impl TraceSource for CountingSource {
        fn connect(&mut self, _address: &str) -> Result<()> {
            if self.fail_connect {
                return Err(MonitorError::AcquisitionFailure("refused".to_string()));
            }
            self.counters.connects.fetch_add(1, Ordering::SeqCst);
            Ok(())
        }

        fn disconnect(&mut self) -> Result<()> {
            self.counters.disconnects.fetch_add(1, Ordering::SeqCst);
            Ok(())
        }

        fn identify(&mut self) -> Result<String> {
            Ok("counting".to_string())
        }

        fn acquire_trace(&mut self) -> Result<Trace> {
            Trace::new(vec![1.0], vec![1.0])
        }
    }

    fn source(counters: &Arc<Counters>, fail_connect: bool) -> CountingSource {
        CountingSource {
            counters: counters.clone(),
            fail_connect,
        }
    }

    #[test]
    fn test_drop_disconnects_once() {
        let counters = Arc::new(Counters::default());
        {
            let mut session = InstrumentSession::open(source(&counters, false), "x").unwrap();
            assert!(session.acquire_trace().is_ok());
        }
        assert_eq!(counters.connects.load(Ordering::SeqCst), 1);
        assert_eq!(counters.disconnects.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_close_then_drop_disconnects_once() {
        let counters = Arc::new(Counters::default());
        let session = InstrumentSession::open(source(&counters, false), "x").unwrap();
        session.close().unwrap();
        assert_eq!(counters.disconnects.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_failed_connect_never_disconnects() {
        let counters = Arc::new(Counters::default());
        assert!(InstrumentSession::open(source(&counters, true), "x").is_err());
        assert_eq!(counters.disconnects.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn test_panic_still_disconnects() {
        let counters = Arc::new(Counters::default());
        let inner = counters.clone();
        let result = std::panic::catch_unwind(move || {
            let _session = InstrumentSession::open(source(&inner, false), "x").unwrap();
            panic!("loop failure");
        });
        assert!(result.is_err());
        assert_eq!(counters.disconnects.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_connection_address() {
        let mut config = InstrumentConfig::default();
        assert!(connection_address(&config).is_err());
        config.address = Some(" 10.0.0.3 ".to_string());
        assert_eq!(connection_address(&config).unwrap(), "10.0.0.3");
        config.simulated = true;
        assert_eq!(connection_address(&config).unwrap(), SIMULATED_ADDRESS);
    }
}
