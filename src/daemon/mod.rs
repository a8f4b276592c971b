// Copyright (c) 2025 Ronan LE MEILLAT, SCTG Development
// This file is part of the ssa-noise-monitor project and is licensed under the
// SCTG Development Non-Commercial License v1.0 (see LICENSE.md for details).

//! # Daemon Module
//!
//! The daemon module runs the monitor: it connects to the analyzer, samples
//! it on a fixed interval and hands updated series to the renderer until an
//! exit request arrives.
//!
//! ## Components
//!
//! * **Scheduler**: decides when the next acquisition may start
//! * **Sampling loop**: one tick of acquire, estimate, record and render
//! * **Launch Daemon**: signal and console handling around the loop, and
//!   release of the instrument on shutdown
//!
//! ## Usage
//!
//! ```no_run
//! use ssa_noise_monitor::acquisition::create_trace_source;
//! use ssa_noise_monitor::config::Config;
//! use ssa_noise_monitor::daemon::Daemon;
//! use ssa_noise_monitor::visualization::LogRenderer;
//!
//! async fn run(config: Config) -> anyhow::Result<()> {
//!     let source = create_trace_source(&config.instrument);
//!
//!     let mut daemon = Daemon::new();
//!     daemon.start_signal_handlers();
//!     daemon.start_console_commands();
//!
//!     // Returns once Ctrl+C, SIGTERM or an `exit` command is seen
//!     let stats = daemon.launch(&config, source, LogRenderer::new()).await?;
//!     println!("{} sweeps", stats.acquisitions);
//!     Ok(())
//! }
//! ```

pub mod launch_daemon;
pub mod sampling_loop;
pub mod scheduler;

pub use launch_daemon::{parse_command, poll_control, Daemon};
pub use sampling_loop::{Control, LoopStats, SamplingLoop, TickOutcome};
pub use scheduler::{AcquisitionScheduler, SchedulerState};
