// Copyright (c) 2025 Ronan LE MEILLAT, SCTG Development
// This file is part of the ssa-noise-monitor project and is licensed under the
// SCTG Development Non-Commercial License v1.0 (see LICENSE.md for details).

//! Acquisition scheduler
//!
//! Gates acquisitions on a single "next eligible time". A fresh scheduler
//! is due immediately; after an acquisition it stays idle for one interval.
//! A zero interval makes every check due. An interval reaching past the
//! range of [`Instant`] is never due again.

use std::time::{Duration, Instant};

/// Whether a new acquisition may start
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SchedulerState {
    Idle,
    Due,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
enum Gate {
    #[default]
    Open,
    At(Instant),
    Never,
}

#[derive(Debug, Clone, Default)]
pub struct AcquisitionScheduler {
    gate: Gate,
}

impl AcquisitionScheduler {
    pub fn new() -> Self {
        Self::default()
    }

    /// `true` iff `now` has reached the next eligible time
    pub fn is_due(&self, now: Instant) -> bool {
        match self.gate {
            Gate::Open => true,
            Gate::At(next) => now >= next,
            Gate::Never => false,
        }
    }

    pub fn state(&self, now: Instant) -> SchedulerState {
        if self.is_due(now) {
            SchedulerState::Due
        } else {
            SchedulerState::Idle
        }
    }

    /// Record an acquisition at `now`; the next one is due after `interval`
    pub fn mark_acquired(&mut self, now: Instant, interval: Duration) {
        self.gate = match now.checked_add(interval) {
            Some(next) => Gate::At(next),
            None => Gate::Never,
        };
    }

    /// Next eligible time, `None` when due now or never due again
    pub fn next_eligible(&self) -> Option<Instant> {
        match self.gate {
            Gate::At(next) => Some(next),
            Gate::Open | Gate::Never => None,
        }
    }

    /// Back to the initial, immediately due state
    pub fn reset(&mut self) {
        self.gate = Gate::Open;
    }
}
