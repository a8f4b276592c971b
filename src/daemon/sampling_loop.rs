// Copyright (c) 2025 Ronan LE MEILLAT, SCTG Development
// This file is part of the ssa-noise-monitor project and is licensed under the
// SCTG Development Non-Commercial License v1.0 (see LICENSE.md for details).

//! Sampling loop
//!
//! One [`SamplingLoop`] owns every piece of mutable loop state: the
//! instrument session, both rolling histories, the scheduler and the
//! redraw flag. Each call to [`SamplingLoop::tick`] is one iteration.

use std::time::{Duration, Instant};

use log::{debug, error, info, warn};

use super::scheduler::AcquisitionScheduler;
use crate::acquisition::{InstrumentSession, TraceSource};
use crate::config::SamplingConfig;
use crate::error::{MonitorError, Result};
use crate::history::RollingHistory;
use crate::spectral::{estimate, Trace};
use crate::visualization::{Renderer, Series};

/// External request observed by the loop
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Control {
    /// Empty both histories
    Clear,
    /// Leave the loop
    Exit,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TickOutcome {
    Continue,
    Exit,
}

/// Counters kept over the loop lifetime
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct LoopStats {
    pub ticks: u64,
    pub acquisitions: u64,
    pub failures: u64,
}

pub struct SamplingLoop<S: TraceSource, R: Renderer> {
    session: InstrumentSession<S>,
    renderer: R,
    scheduler: AcquisitionScheduler,
    interval: Duration,
    signal: RollingHistory,
    snr: RollingHistory,
    last_trace: Option<Trace>,
    redraw: bool,
    stats: LoopStats,
}

impl<S: TraceSource, R: Renderer> SamplingLoop<S, R> {
    /// Build a loop around an open session
    pub fn new(session: InstrumentSession<S>, renderer: R, sampling: &SamplingConfig) -> Result<Self> {
        let interval = sampling.interval().ok_or_else(|| {
            MonitorError::InvalidConfiguration(format!(
                "sampling interval must be a positive number of seconds or zero (got {})",
                sampling.interval_s
            ))
        })?;

        Ok(Self {
            session,
            renderer,
            scheduler: AcquisitionScheduler::new(),
            interval,
            signal: RollingHistory::new(sampling.history_capacity)?,
            snr: RollingHistory::new(sampling.history_capacity)?,
            last_trace: None,
            redraw: true,
            stats: LoopStats::default(),
        })
    }

    /// Run one iteration at time `now`
    pub fn tick(&mut self, now: Instant, control: Option<Control>) -> TickOutcome {
        self.stats.ticks += 1;

        match control {
            Some(Control::Exit) => {
                info!("Exit requested, stopping sampling loop");
                return TickOutcome::Exit;
            }
            Some(Control::Clear) => {
                info!("Clearing signal and SNR history");
                self.signal.clear();
                self.snr.clear();
                self.redraw = true;
            }
            None => {}
        }

        if self.scheduler.is_due(now) {
            self.sample(now);
        }

        if self.redraw {
            self.render();
            self.redraw = false;
        }

        TickOutcome::Continue
    }

    /// Tick until an exit request; `poll` waits for the next tick
    pub fn run<F>(&mut self, mut poll: F) -> LoopStats
    where
        F: FnMut() -> Option<Control>,
    {
        info!(
            "Sampling every {:?}, keeping {} samples",
            self.interval,
            self.signal.capacity()
        );
        loop {
            let control = poll();
            if self.tick(Instant::now(), control) == TickOutcome::Exit {
                break;
            }
        }
        self.stats
    }

    fn sample(&mut self, now: Instant) {
        let acquired = self
            .session
            .acquire_trace()
            .and_then(|trace| estimate(&trace).map(|estimate| (trace, estimate)));

        let (trace, estimate) = match acquired {
            Ok(result) => result,
            Err(err) => {
                self.stats.failures += 1;
                if err.is_recoverable() {
                    warn!("Skipping sweep: {}", err);
                } else {
                    error!("Skipping sweep: {}", err);
                }
                return;
            }
        };

        self.signal.append(estimate.peak_signal);
        self.snr.append(estimate.snr);
        self.last_trace = Some(trace);
        self.stats.acquisitions += 1;

        self.scheduler.mark_acquired(now, self.interval);
        debug!(
            "Peak {:.4}, noise floor {:.4}, SNR {:.3}; next sweep in {:?}",
            estimate.peak_signal, estimate.noise_floor, estimate.snr, self.interval
        );

        self.redraw = true;
    }

    fn render(&mut self) {
        match &self.last_trace {
            Some(trace) => {
                let amplitudes: Vec<Option<f64>> =
                    trace.amplitudes().iter().copied().map(Some).collect();
                self.renderer
                    .render(Series::Raw, &trace.frequencies_mhz(), &amplitudes);
            }
            None => self.renderer.render(Series::Raw, &[], &[]),
        }

        let index: Vec<f64> = (0..self.signal.capacity()).map(|i| i as f64).collect();
        self.renderer
            .render(Series::Signal, &index, &self.signal.values());
        self.renderer.render(Series::Snr, &index, &self.snr.values());
    }

    pub fn signal_history(&self) -> &RollingHistory {
        &self.signal
    }

    pub fn snr_history(&self) -> &RollingHistory {
        &self.snr
    }

    pub fn last_trace(&self) -> Option<&Trace> {
        self.last_trace.as_ref()
    }

    pub fn stats(&self) -> LoopStats {
        self.stats
    }

    pub fn renderer(&self) -> &R {
        &self.renderer
    }

    /// Stop sampling and disconnect the instrument
    pub fn shutdown(self) -> Result<()> {
        let Self { session, .. } = self;
        session.close()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::VecDeque;

    /// Source replaying scripted peaks; `None` is a failed sweep
    struct ScriptedSource {
        peaks: VecDeque<Option<f64>>,
    }

    impl TraceSource for ScriptedSource {
        fn connect(&mut self, _address: &str) -> Result<()> {
            Ok(())
        }

        fn disconnect(&mut self) -> Result<()> {
            Ok(())
        }

        fn identify(&mut self) -> Result<String> {
            Ok("scripted".to_string())
        }

        fn acquire_trace(&mut self) -> Result<Trace> {
            match self.peaks.pop_front().flatten() {
                Some(peak) => Ok(Trace::from_span(
                    1e9,
                    1.007e9,
                    vec![1.0, 1.0, peak, 1.0, 1.0, 1.0, 1.0, 1.0],
                )),
                None => Err(MonitorError::AcquisitionFailure("timeout".to_string())),
            }
        }
    }

    #[derive(Default)]
    struct Recorder {
        frames: Vec<(Series, Vec<f64>, Vec<Option<f64>>)>,
    }

    impl Renderer for Recorder {
        fn render(&mut self, series: Series, x: &[f64], y: &[Option<f64>]) {
            self.frames.push((series, x.to_vec(), y.to_vec()));
        }
    }

    fn sampling_loop(
        peaks: Vec<Option<f64>>,
        capacity: usize,
        interval_s: f64,
    ) -> SamplingLoop<ScriptedSource, Recorder> {
        let source = ScriptedSource {
            peaks: peaks.into(),
        };
        let session = InstrumentSession::open(source, "scripted").unwrap();
        let sampling = SamplingConfig {
            interval_s,
            history_capacity: capacity,
            ..SamplingConfig::default()
        };
        SamplingLoop::new(session, Recorder::default(), &sampling).unwrap()
    }

    #[test]
    fn test_history_rolls_over() {
        let mut sampling_loop =
            sampling_loop(vec![Some(10.0), Some(20.0), Some(30.0), Some(40.0)], 3, 0.0);
        let now = Instant::now();

        for _ in 0..3 {
            sampling_loop.tick(now, None);
        }
        assert_eq!(
            sampling_loop.signal_history().values(),
            vec![Some(10.0), Some(20.0), Some(30.0)]
        );

        sampling_loop.tick(now, None);
        assert_eq!(
            sampling_loop.signal_history().values(),
            vec![Some(20.0), Some(30.0), Some(40.0)]
        );
        assert_eq!(sampling_loop.snr_history().latest(), Some(40.0));
        assert_eq!(sampling_loop.stats().acquisitions, 4);
    }

    #[test]
    fn test_interval_gates_acquisition() {
        let mut sampling_loop = sampling_loop(vec![Some(5.0), Some(6.0)], 4, 5.0);
        let base = Instant::now();

        sampling_loop.tick(base, None);
        sampling_loop.tick(base + Duration::from_secs(4), None);
        assert_eq!(sampling_loop.stats().acquisitions, 1);

        sampling_loop.tick(base + Duration::from_secs(5), None);
        assert_eq!(sampling_loop.stats().acquisitions, 2);
    }

    #[test]
    fn test_failed_sweep_is_retried_next_tick() {
        let mut sampling_loop = sampling_loop(vec![None, Some(7.0)], 4, 60.0);
        let now = Instant::now();

        sampling_loop.tick(now, None);
        assert_eq!(sampling_loop.stats().failures, 1);
        assert_eq!(sampling_loop.signal_history().filled(), 0);

        sampling_loop.tick(now, None);
        assert_eq!(sampling_loop.signal_history().latest(), Some(7.0));
    }

    #[test]
    fn test_clear_empties_both_histories() {
        let mut sampling_loop = sampling_loop(vec![Some(3.0)], 2, 60.0);
        let now = Instant::now();
        sampling_loop.tick(now, None);
        assert_eq!(sampling_loop.signal_history().filled(), 1);

        sampling_loop.tick(now, Some(Control::Clear));
        assert_eq!(sampling_loop.signal_history().values(), vec![None, None]);
        assert_eq!(sampling_loop.snr_history().values(), vec![None, None]);

        let (series, _, y) = sampling_loop.renderer().frames.last().unwrap();
        assert_eq!(*series, Series::Snr);
        assert_eq!(y, &vec![None, None]);
    }

    #[test]
    fn test_exit_skips_acquisition() {
        let mut sampling_loop = sampling_loop(vec![Some(3.0)], 2, 0.0);
        assert_eq!(
            sampling_loop.tick(Instant::now(), Some(Control::Exit)),
            TickOutcome::Exit
        );
        assert_eq!(sampling_loop.stats().acquisitions, 0);
        assert!(sampling_loop.renderer().frames.is_empty());
    }

    #[test]
    fn test_renders_only_on_change() {
        let mut sampling_loop = sampling_loop(vec![Some(3.0)], 2, 60.0);
        let now = Instant::now();

        sampling_loop.tick(now, None);
        let frames = &sampling_loop.renderer().frames;
        assert_eq!(frames.len(), 3);
        assert_eq!(frames[0].0, Series::Raw);
        assert_eq!(frames[0].1.len(), 8);
        assert_eq!(frames[0].1[0], 1000.0);
        assert_eq!(frames[1].0, Series::Signal);
        assert_eq!(frames[1].1, vec![0.0, 1.0]);

        sampling_loop.tick(now, None);
        assert_eq!(sampling_loop.renderer().frames.len(), 3);
    }

    #[test]
    fn test_first_tick_renders_even_without_trace() {
        let mut sampling_loop = sampling_loop(vec![None], 2, 60.0);
        sampling_loop.tick(Instant::now(), None);
        let frames = &sampling_loop.renderer().frames;
        assert_eq!(frames.len(), 3);
        assert!(frames[0].1.is_empty());
        assert_eq!(frames[2].2, vec![None, None]);
    }

    #[test]
    fn test_run_stops_on_exit() {
        let mut sampling_loop = sampling_loop(vec![Some(1.0), Some(2.0)], 2, 0.0);
        let mut script = vec![Some(Control::Exit), None, None].into_iter().rev();
        let stats = sampling_loop.run(|| script.next().flatten());
        assert_eq!(stats.ticks, 3);
        assert_eq!(stats.acquisitions, 2);
        assert!(sampling_loop.shutdown().is_ok());
    }
}
