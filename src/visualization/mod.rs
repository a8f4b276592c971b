// Copyright (c) 2025 Ronan LE MEILLAT, SCTG Development
// This file is part of the ssa-noise-monitor project and is licensed under the
// SCTG Development Non-Commercial License v1.0 (see LICENSE.md for details).
//!
//! Visualization module
//!
//! This module handles data presentation. The sampling loop hands three
//! named series to a [`Renderer`] whenever something changed: the last raw
//! sweep, the peak signal history and the SNR history.

mod json_lines;
mod log_renderer;

pub use json_lines::JsonLinesRenderer;
pub use log_renderer::LogRenderer;

use serde::Serialize;

/// Series drawn by the monitor
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Series {
    /// Amplitude against frequency (MHz) of the last sweep
    Raw,
    /// Peak signal history against sample index
    Signal,
    /// SNR history against sample index
    Snr,
}

impl Series {
    pub fn name(&self) -> &'static str {
        match self {
            Series::Raw => "raw",
            Series::Signal => "signal",
            Series::Snr => "snr",
        }
    }
}

impl std::fmt::Display for Series {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

/// Display surface for updated series.
///
/// `y` is parallel to `x`; `None` marks a history slot with no sample yet.
/// Implementations must be fast compared to the sampling interval.
pub trait Renderer: Send {
    fn render(&mut self, series: Series, x: &[f64], y: &[Option<f64>]);
}

impl<T: Renderer + ?Sized> Renderer for Box<T> {
    fn render(&mut self, series: Series, x: &[f64], y: &[Option<f64>]) {
        (**self).render(series, x, y)
    }
}

/// Fan out to several renderers in order
impl<T: Renderer> Renderer for Vec<T> {
    fn render(&mut self, series: Series, x: &[f64], y: &[Option<f64>]) {
        for renderer in self.iter_mut() {
            renderer.render(series, x, y);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Default)]
    struct Counting(usize);

    impl Renderer for Counting {
        fn render(&mut self, _series: Series, _x: &[f64], _y: &[Option<f64>]) {
            self.0 += 1;
        }
    }

    #[test]
    fn test_series_names() {
        assert_eq!(Series::Raw.name(), "raw");
        assert_eq!(Series::Signal.to_string(), "signal");
        assert_eq!(
            serde_json::to_string(&Series::Snr).unwrap(),
            "\"snr\""
        );
    }

    #[test]
    fn test_vec_fans_out() {
        let mut renderers = vec![Counting::default(), Counting::default()];
        renderers.render(Series::Raw, &[], &[]);
        assert!(renderers.iter().all(|r| r.0 == 1));
    }
}
