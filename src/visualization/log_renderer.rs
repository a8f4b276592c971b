// Copyright (c) 2025 Ronan LE MEILLAT, SCTG Development
// This file is part of the ssa-noise-monitor project and is licensed under the
// SCTG Development Non-Commercial License v1.0 (see LICENSE.md for details).

use log::debug;

use super::{Renderer, Series};

/// Renderer that logs a one-line summary per series
#[derive(Debug, Default)]
pub struct LogRenderer;

impl LogRenderer {
    pub fn new() -> Self {
        Self
    }
}

impl Renderer for LogRenderer {
    fn render(&mut self, series: Series, x: &[f64], y: &[Option<f64>]) {
        let filled = y.iter().filter(|v| v.is_some()).count();
        let latest = y.iter().rev().find_map(|v| *v);
        match (series, latest) {
            (Series::Raw, Some(_)) => {
                let peak = y.iter().flatten().copied().fold(f64::NEG_INFINITY, f64::max);
                debug!(
                    "[raw] {} points, {:.3}..{:.3} MHz, max {:.4}",
                    y.len(),
                    x.first().copied().unwrap_or_default(),
                    x.last().copied().unwrap_or_default(),
                    peak
                );
            }
            (_, Some(latest)) => {
                debug!("[{}] {}/{} samples, latest {:.4}", series, filled, y.len(), latest)
            }
            (_, None) => debug!("[{}] no data yet", series),
        }
    }
}
