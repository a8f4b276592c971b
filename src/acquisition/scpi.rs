// Copyright (c) 2025 Ronan LE MEILLAT, SCTG Development
// This file is part of the ssa-noise-monitor project and is licensed under the
// SCTG Development Non-Commercial License v1.0 (see LICENSE.md for details).

//! SSA3021X client over an SCPI raw socket
//!
//! Commands are newline terminated ASCII. A sweep is read as the
//! comma-separated amplitudes of trace 1; the frequency axis is rebuilt
//! from the start and stop frequencies of the current span.

use std::io::{BufRead, BufReader, Read, Write};
use std::net::{IpAddr, SocketAddr, TcpStream, ToSocketAddrs};
use std::time::Duration;

use log::{debug, warn};

use super::TraceSource;
use crate::config::InstrumentConfig;
use crate::error::{MonitorError, Result};
use crate::spectral::Trace;

const QUERY_IDENTIFICATION: &str = "*IDN?";
const QUERY_START_FREQUENCY: &str = ":SENSe:FREQuency:STARt?";
const QUERY_STOP_FREQUENCY: &str = ":SENSe:FREQuency:STOP?";
const QUERY_TRACE_DATA: &str = ":TRACe:DATA? 1";

/// Longest accepted answer line, newline included
pub const MAX_ANSWER_BYTES: u64 = 1 << 20;

struct Connection {
    reader: BufReader<TcpStream>,
    writer: TcpStream,
}

/// Spectrum analyzer reached through SCPI over TCP
pub struct ScpiAnalyzer {
    default_port: u16,
    timeout: Duration,
    target: Option<SocketAddr>,
    connection: Option<Connection>,
}

impl ScpiAnalyzer {
    pub fn new(config: &InstrumentConfig) -> Self {
        Self {
            default_port: config.port,
            timeout: Duration::from_millis(config.timeout_ms.max(1)),
            target: None,
            connection: None,
        }
    }

    /// Resolve `host`, `ip`, `host:port` or `ip:port`
    fn resolve(&self, address: &str) -> Result<SocketAddr> {
        if let Ok(addr) = address.parse::<SocketAddr>() {
            return Ok(addr);
        }
        if let Ok(ip) = address.parse::<IpAddr>() {
            return Ok(SocketAddr::new(ip, self.default_port));
        }

        let (host, port) = match address.rsplit_once(':') {
            Some((host, port)) => {
                let port = port.parse::<u16>().map_err(|_| {
                    MonitorError::AcquisitionFailure(format!("invalid port in '{}'", address))
                })?;
                (host, port)
            }
            None => (address, self.default_port),
        };

        (host, port)
            .to_socket_addrs()
            .map_err(|e| failure(&format!("cannot resolve {}", address), e))?
            .next()
            .ok_or_else(|| {
                MonitorError::AcquisitionFailure(format!("no address found for {}", address))
            })
    }

    fn open(&self, target: SocketAddr) -> Result<Connection> {
        let stream = TcpStream::connect_timeout(&target, self.timeout)
            .map_err(|e| failure(&format!("cannot connect to {}", target), e))?;
        stream
            .set_read_timeout(Some(self.timeout))
            .and_then(|_| stream.set_write_timeout(Some(self.timeout)))
            .and_then(|_| stream.set_nodelay(true))
            .map_err(|e| failure("cannot configure socket", e))?;

        let writer = stream
            .try_clone()
            .map_err(|e| failure("cannot clone socket", e))?;
        Ok(Connection {
            reader: BufReader::new(stream),
            writer,
        })
    }

    /// Reopen the socket dropped after an I/O error
    fn ensure_connected(&mut self) -> Result<&mut Connection> {
        if self.connection.is_none() {
            let target = self.target.ok_or_else(|| {
                MonitorError::AcquisitionFailure("analyzer is not connected".to_string())
            })?;
            debug!("Reconnecting to {}", target);
            self.connection = Some(self.open(target)?);
        }
        self.connection.as_mut().ok_or_else(|| {
            MonitorError::AcquisitionFailure("analyzer is not connected".to_string())
        })
    }

    /// Send `command` and read one response line
    fn query(&mut self, command: &str) -> Result<String> {
        let connection = self.ensure_connected()?;
        let result = exchange(connection, command);
        if result.is_err() {
            // A late answer would desynchronise the next query
            warn!("Dropping analyzer socket after failed '{}'", command);
            self.connection = None;
        }
        result
    }

    fn query_number(&mut self, command: &str) -> Result<f64> {
        let answer = self.query(command)?;
        answer.trim().parse::<f64>().map_err(|_| {
            MonitorError::AcquisitionFailure(format!(
                "unexpected answer to {}: '{}'",
                command, answer
            ))
        })
    }
}

fn exchange(connection: &mut Connection, command: &str) -> Result<String> {
    connection
        .writer
        .write_all(format!("{}\n", command).as_bytes())
        .and_then(|_| connection.writer.flush())
        .map_err(|e| failure(&format!("cannot send {}", command), e))?;

    let mut line = String::new();
    let read = (&mut connection.reader)
        .take(MAX_ANSWER_BYTES)
        .read_line(&mut line)
        .map_err(|e| failure(&format!("no answer to {}", command), e))?;
    if read == 0 {
        return Err(MonitorError::AcquisitionFailure(format!(
            "connection closed while waiting for {}",
            command
        )));
    }
    if !line.ends_with('\n') {
        return Err(MonitorError::AcquisitionFailure(format!(
            "answer to {} is not terminated within {} bytes",
            command, MAX_ANSWER_BYTES
        )));
    }
    Ok(line.trim_end().to_string())
}

fn failure(context: &str, err: std::io::Error) -> MonitorError {
    MonitorError::AcquisitionFailure(format!("{}: {}", context, err))
}

/// Parse the comma-separated amplitudes returned by `:TRACe:DATA?`
pub fn parse_trace_values(data: &str) -> Result<Vec<f64>> {
    data.split(',')
        .map(str::trim)
        .filter(|value| !value.is_empty())
        .map(|value| {
            value.parse::<f64>().map_err(|_| {
                MonitorError::AcquisitionFailure(format!("invalid trace value '{}'", value))
            })
        })
        .collect()
}

impl TraceSource for ScpiAnalyzer {
    fn connect(&mut self, address: &str) -> Result<()> {
        let target = self.resolve(address)?;
        self.connection = Some(self.open(target)?);
        self.target = Some(target);
        debug!("Connected to SCPI socket {}", target);
        Ok(())
    }

    fn disconnect(&mut self) -> Result<()> {
        self.target = None;
        if let Some(connection) = self.connection.take() {
            if let Err(err) = connection.writer.shutdown(std::net::Shutdown::Both) {
                debug!("Analyzer socket already closed: {}", err);
            }
        }
        Ok(())
    }

    fn identify(&mut self) -> Result<String> {
        self.query(QUERY_IDENTIFICATION)
    }

    fn acquire_trace(&mut self) -> Result<Trace> {
        let start = self.query_number(QUERY_START_FREQUENCY)?;
        let stop = self.query_number(QUERY_STOP_FREQUENCY)?;
        let data = self.query(QUERY_TRACE_DATA)?;
        let amplitudes = parse_trace_values(&data)?;
        debug!(
            "Acquired {} points from {:.3} MHz to {:.3} MHz",
            amplitudes.len(),
            start / 1e6,
            stop / 1e6
        );
        Ok(Trace::from_span(start, stop, amplitudes))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_trace_values() {
        assert_eq!(
            parse_trace_values("-80.5, -79.25,-30.0,").unwrap(),
            vec![-80.5, -79.25, -30.0]
        );
        assert!(parse_trace_values("").unwrap().is_empty());
        assert!(matches!(
            parse_trace_values("1.0,abc"),
            Err(MonitorError::AcquisitionFailure(_))
        ));
    }

    #[test]
    fn test_resolve_forms() {
        let analyzer = ScpiAnalyzer::new(&InstrumentConfig::default());
        assert_eq!(
            analyzer.resolve("10.0.0.1").unwrap(),
            "10.0.0.1:5025".parse::<SocketAddr>().unwrap()
        );
        assert_eq!(
            analyzer.resolve("10.0.0.1:6000").unwrap(),
            "10.0.0.1:6000".parse::<SocketAddr>().unwrap()
        );
        assert_eq!(analyzer.resolve("::1").unwrap().port(), 5025);
        assert!(analyzer.resolve("localhost:notaport").is_err());
    }

    #[test]
    fn test_acquire_without_connect_fails() {
        let mut analyzer = ScpiAnalyzer::new(&InstrumentConfig::default());
        assert!(matches!(
            analyzer.acquire_trace(),
            Err(MonitorError::AcquisitionFailure(_))
        ));
        assert!(analyzer.disconnect().is_ok());
    }
}
