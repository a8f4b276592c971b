// Copyright (c) 2025 Ronan LE MEILLAT, SCTG Development
// This file is part of the ssa-noise-monitor project and is licensed under the
// SCTG Development Non-Commercial License v1.0 (see LICENSE.md for details).

//! Rolling history buffers
//!
//! A [`RollingHistory`] keeps the last `capacity` values of a series. Slots
//! that never received a sample are `None`, so a consumer can tell "no data
//! yet" apart from a reading that is exactly zero.

use std::collections::VecDeque;

use crate::error::{MonitorError, Result};

/// Fixed-capacity FIFO of optional samples
#[derive(Debug, Clone)]
pub struct RollingHistory {
    slots: VecDeque<Option<f64>>,
    capacity: usize,
}

impl RollingHistory {
    /// Create a buffer with `capacity` empty slots
    pub fn new(capacity: usize) -> Result<Self> {
        if capacity < 1 {
            return Err(MonitorError::InvalidCapacity(capacity));
        }
        Ok(Self {
            slots: std::iter::repeat(None).take(capacity).collect(),
            capacity,
        })
    }

    /// Append a value at the logical end, discarding the oldest slot
    pub fn append(&mut self, value: f64) {
        // Length is pinned to capacity, so the front always exists
        self.slots.pop_front();
        self.slots.push_back(Some(value));
    }

    /// Reset every slot to empty
    pub fn clear(&mut self) {
        self.slots.iter_mut().for_each(|slot| *slot = None);
    }

    /// Full ordered content, oldest first
    pub fn values(&self) -> Vec<Option<f64>> {
        self.slots.iter().copied().collect()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Most recently appended value, if any
    pub fn latest(&self) -> Option<f64> {
        self.slots.back().copied().flatten()
    }

    /// Number of occupied slots
    pub fn filled(&self) -> usize {
        self.slots.iter().filter(|slot| slot.is_some()).count()
    }
}
