// Copyright (c) 2025 Ronan LE MEILLAT, SCTG Development
// This file is part of the ssa-noise-monitor project and is licensed under the
// SCTG Development Non-Commercial License v1.0 (see LICENSE.md for details).

//! Interactive configuration
//!
//! Before sampling starts the user may review the instrument address,
//! history capacity and sampling interval. Invalid answers are reported
//! and the prompt is shown again; cancelling ends the program cleanly.

use std::io::{BufRead, Write};
use std::str::FromStr;

use anyhow::Result;
use log::warn;

use super::{utils, Config};
use crate::error::MonitorError;

/// Source of an interactively confirmed configuration
pub trait ConfigPrompter {
    /// Ask for a configuration starting from `current`.
    ///
    /// Returns `Ok(None)` when the user cancels.
    fn prompt(&mut self, current: &Config) -> Result<Option<Config>>;

    /// Show a validation error before the next prompt
    fn report_error(&mut self, error: &MonitorError) -> Result<()>;
}

/// Prompt until the user provides a valid configuration or cancels
pub fn obtain_config<P: ConfigPrompter + ?Sized>(
    prompter: &mut P,
    initial: Config,
) -> Result<Option<Config>> {
    let mut current = initial;
    loop {
        let Some(candidate) = prompter.prompt(&current)? else {
            return Ok(None);
        };

        let checked = candidate
            .validate()
            .and_then(|_| utils::validate_connection_target(&candidate));
        match checked {
            Ok(()) => return Ok(Some(candidate)),
            Err(err) => {
                warn!("Rejected configuration: {}", err);
                prompter.report_error(&err)?;
                current = candidate;
            }
        }
    }
}

/// Line-oriented prompter over any reader/writer pair
pub struct ConsolePrompter<R, W> {
    input: R,
    output: W,
}

impl<R: BufRead, W: Write> ConsolePrompter<R, W> {
    pub fn new(input: R, output: W) -> Self {
        Self { input, output }
    }

    /// Print `question` and read one trimmed line, `None` at end of input
    fn ask(&mut self, question: &str) -> Result<Option<String>> {
        write!(self.output, "{}", question)?;
        self.output.flush()?;

        let mut line = String::new();
        if self.input.read_line(&mut line)? == 0 {
            return Ok(None);
        }
        Ok(Some(line.trim().to_string()))
    }

    /// Ask for a value until it parses; an empty answer keeps `current`
    fn ask_parsed<T>(&mut self, label: &str, current: T) -> Result<Option<T>>
    where
        T: FromStr + std::fmt::Display + Copy,
    {
        loop {
            let Some(answer) = self.ask(&format!("{} [{}]: ", label, current))? else {
                return Ok(None);
            };
            if answer.is_empty() {
                return Ok(Some(current));
            }
            match answer.parse::<T>() {
                Ok(value) => return Ok(Some(value)),
                Err(_) => writeln!(self.output, "Invalid {}: '{}'", label.to_lowercase(), answer)?,
            }
        }
    }
}

impl<R: BufRead, W: Write> ConfigPrompter for ConsolePrompter<R, W> {
    fn prompt(&mut self, current: &Config) -> Result<Option<Config>> {
        let mut config = current.clone();

        let shown = config.instrument.address.as_deref().unwrap_or("unset");
        let Some(address) = self.ask(&format!("Instrument address [{}]: ", shown))? else {
            return Ok(None);
        };
        if !address.is_empty() {
            config.instrument.address = Some(address);
        }

        let Some(capacity) =
            self.ask_parsed("History capacity", config.sampling.history_capacity)?
        else {
            return Ok(None);
        };
        config.sampling.history_capacity = capacity;

        let Some(interval) = self.ask_parsed("Sampling interval (s)", config.sampling.interval_s)?
        else {
            return Ok(None);
        };
        config.sampling.interval_s = interval;

        let Some(confirm) = self.ask("Connect? [Y/n]: ")? else {
            return Ok(None);
        };
        if matches!(confirm.to_lowercase().as_str(), "n" | "no") {
            return Ok(None);
        }

        Ok(Some(config))
    }

    fn report_error(&mut self, error: &MonitorError) -> Result<()> {
        writeln!(self.output, "{}", error)?;
        Ok(())
    }
}
