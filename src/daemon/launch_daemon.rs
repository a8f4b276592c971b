// Copyright (c) 2025 Ronan LE MEILLAT, SCTG Development
// This file is part of the ssa-noise-monitor project and is licensed under the
// SCTG Development Non-Commercial License v1.0 (see LICENSE.md for details).

use std::io::BufRead;
use std::sync::mpsc::{self, Receiver, RecvTimeoutError, Sender};
use std::time::Duration;

use anyhow::{Context, Result};
use log::{debug, info, warn};
use tokio::task::JoinHandle;

use super::sampling_loop::{Control, LoopStats, SamplingLoop};
use crate::acquisition::{connection_address, InstrumentSession, TraceSource};
use crate::config::Config;
use crate::visualization::Renderer;

/// Runs the sampling loop and feeds it control requests
pub struct Daemon {
    tasks: Vec<JoinHandle<()>>,
    controls: Sender<Control>,
    receiver: Option<Receiver<Control>>,
}

impl Default for Daemon {
    fn default() -> Self {
        Self::new()
    }
}

impl Daemon {
    /// Create a new daemon instance
    pub fn new() -> Self {
        let (controls, receiver) = mpsc::channel();
        Daemon {
            tasks: Vec::new(),
            controls,
            receiver: Some(receiver),
        }
    }

    /// Sender for additional control producers
    pub fn controls(&self) -> Sender<Control> {
        self.controls.clone()
    }

    /// Turn Ctrl-C and SIGTERM into exit requests
    ///
    /// Must be called from within a tokio runtime.
    pub fn start_signal_handlers(&mut self) {
        let controls = self.controls();
        self.tasks.push(tokio::spawn(async move {
            match tokio::signal::ctrl_c().await {
                Ok(()) => {
                    info!("Interrupt received");
                    let _ = controls.send(Control::Exit);
                }
                Err(err) => warn!("Cannot listen for Ctrl-C: {}", err),
            }
        }));

        #[cfg(unix)]
        {
            use tokio::signal::unix::{signal, SignalKind};

            let controls = self.controls();
            self.tasks.push(tokio::spawn(async move {
                match signal(SignalKind::terminate()) {
                    Ok(mut terminate) => {
                        if terminate.recv().await.is_some() {
                            info!("Termination signal received");
                            let _ = controls.send(Control::Exit);
                        }
                    }
                    Err(err) => warn!("Cannot listen for SIGTERM: {}", err),
                }
            }));
        }
    }

    /// Read `clear` / `exit` commands from standard input
    ///
    /// The reader is a detached thread: a pending console read must not
    /// keep the runtime alive at shutdown.
    pub fn start_console_commands(&self) {
        let controls = self.controls();
        std::thread::spawn(move || {
            let stdin = std::io::stdin();
            for line in stdin.lock().lines() {
                let Ok(line) = line else { break };
                match parse_command(&line) {
                    Some(control) => {
                        if controls.send(control).is_err() {
                            break;
                        }
                    }
                    None if line.trim().is_empty() => {}
                    None => warn!("Unknown command '{}' (use clear or exit)", line.trim()),
                }
            }
            debug!("Console command reader finished");
        });
    }

    /// Connect to the instrument and sample until an exit request
    ///
    /// The loop runs on a blocking thread since acquisitions block on
    /// instrument I/O. The instrument is released on every exit path.
    /// Once every control producer is gone the loop exits as well.
    pub async fn launch<S, R>(self, config: &Config, source: S, renderer: R) -> Result<LoopStats>
    where
        S: TraceSource + 'static,
        R: Renderer + 'static,
    {
        let Daemon {
            mut tasks,
            controls,
            receiver,
        } = self;
        // From here only the producers hold the channel open
        drop(controls);

        let result = run_sampling(config, source, renderer, receiver).await;
        abort_all(&mut tasks);

        let stats = result?;
        info!(
            "Sampling stopped after {} acquisitions ({} failed)",
            stats.acquisitions, stats.failures
        );
        Ok(stats)
    }

    /// Stop the signal listeners
    pub fn shutdown(&mut self) {
        abort_all(&mut self.tasks);
    }
}

async fn run_sampling<S, R>(
    config: &Config,
    source: S,
    renderer: R,
    receiver: Option<Receiver<Control>>,
) -> Result<LoopStats>
where
    S: TraceSource + 'static,
    R: Renderer + 'static,
{
    let receiver = receiver.context("Daemon has already been launched")?;
    let address = connection_address(&config.instrument)?;
    let sampling = config.sampling.clone();

    let handle = tokio::task::spawn_blocking(move || -> Result<LoopStats> {
        let session = InstrumentSession::open(source, &address)?;
        let mut sampling_loop = SamplingLoop::new(session, renderer, &sampling)?;
        let tick = sampling.tick();
        let stats = sampling_loop.run(|| poll_control(&receiver, tick));
        sampling_loop.shutdown()?;
        Ok(stats)
    });

    handle.await.context("Sampling loop aborted")?
}

fn abort_all(tasks: &mut Vec<JoinHandle<()>>) {
    for task in tasks.drain(..) {
        task.abort();
    }
}

/// Wait up to `tick` for a control request
///
/// A closed channel is treated as an exit request.
pub fn poll_control(receiver: &Receiver<Control>, tick: Duration) -> Option<Control> {
    match receiver.recv_timeout(tick) {
        Ok(control) => Some(control),
        Err(RecvTimeoutError::Timeout) => None,
        Err(RecvTimeoutError::Disconnected) => Some(Control::Exit),
    }
}

/// Map a console line to a control request
pub fn parse_command(line: &str) -> Option<Control> {
    match line.trim().to_lowercase().as_str() {
        "c" | "clear" => Some(Control::Clear),
        "q" | "quit" | "exit" => Some(Control::Exit),
        _ => None,
    }
}
