// Copyright (c) 2025 Ronan LE MEILLAT, SCTG Development
// This file is part of the ssa-noise-monitor project and is licensed under the
// SCTG Development Non-Commercial License v1.0 (see LICENSE.md for details).

//! JSON lines snapshot renderer
//!
//! Every render call becomes one JSON object on its own line:
//!
//! ```json
//! {"timestamp":"2025-06-01T10:00:00Z","series":"snr","x":[0.0,1.0],"y":[null,42.1]}
//! ```
//!
//! Empty history slots are `null`. JSON has no NaN or infinity, so those
//! values are written as the strings `"NaN"`, `"inf"` and `"-inf"` to stay
//! distinguishable from empty slots.

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use anyhow::Context;
use chrono::{DateTime, Utc};
use log::error;
use serde::{Serialize, Serializer};

use super::{Renderer, Series};

/// One sample of a rendered series
#[derive(Debug, Clone, Copy, PartialEq)]
struct Point(Option<f64>);

impl Serialize for Point {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self.0 {
            None => serializer.serialize_none(),
            Some(v) if v.is_nan() => serializer.serialize_str("NaN"),
            Some(v) if v == f64::INFINITY => serializer.serialize_str("inf"),
            Some(v) if v == f64::NEG_INFINITY => serializer.serialize_str("-inf"),
            Some(v) => serializer.serialize_f64(v),
        }
    }
}

#[derive(Serialize)]
struct Snapshot<'a> {
    timestamp: DateTime<Utc>,
    series: Series,
    x: &'a [f64],
    y: Vec<Point>,
}

/// Renderer writing series snapshots as JSON lines
pub struct JsonLinesRenderer<W: Write> {
    writer: W,
}

impl JsonLinesRenderer<BufWriter<File>> {
    /// Create (truncate) `path` and write snapshots to it
    pub fn create<P: AsRef<Path>>(path: P) -> anyhow::Result<Self> {
        let path = path.as_ref();
        let file = File::create(path)
            .with_context(|| format!("Failed to create render output at {:?}", path))?;
        Ok(Self::new(BufWriter::new(file)))
    }
}

impl<W: Write> JsonLinesRenderer<W> {
    pub fn new(writer: W) -> Self {
        Self { writer }
    }

    pub fn into_inner(self) -> W {
        self.writer
    }

    fn write_snapshot(&mut self, snapshot: &Snapshot<'_>) -> anyhow::Result<()> {
        serde_json::to_writer(&mut self.writer, snapshot)?;
        self.writer.write_all(b"\n")?;
        self.writer.flush()?;
        Ok(())
    }
}

impl<W: Write + Send> Renderer for JsonLinesRenderer<W> {
    fn render(&mut self, series: Series, x: &[f64], y: &[Option<f64>]) {
        let snapshot = Snapshot {
            timestamp: Utc::now(),
            series,
            x,
            y: y.iter().copied().map(Point).collect(),
        };
        if let Err(err) = self.write_snapshot(&snapshot) {
            error!("Failed to write {} snapshot: {}", series, err);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::{json, Value};

    fn lines(renderer: JsonLinesRenderer<Vec<u8>>) -> Vec<Value> {
        String::from_utf8(renderer.into_inner())
            .unwrap()
            .lines()
            .map(|line| serde_json::from_str(line).unwrap())
            .collect()
    }

    #[test]
    fn test_empty_zero_and_non_finite_are_distinct() {
        let mut renderer = JsonLinesRenderer::new(Vec::new());
        renderer.render(
            Series::Snr,
            &[0.0, 1.0, 2.0, 3.0, 4.0],
            &[None, Some(0.0), Some(f64::NAN), Some(f64::INFINITY), Some(2.5)],
        );

        let out = lines(renderer);
        assert_eq!(out.len(), 1);
        assert_eq!(out[0]["series"], json!("snr"));
        assert_eq!(out[0]["y"], json!([null, 0.0, "NaN", "inf", 2.5]));
        assert!(out[0]["timestamp"].is_string());
    }

    #[test]
    fn test_one_line_per_render() {
        let mut renderer = JsonLinesRenderer::new(Vec::new());
        renderer.render(Series::Raw, &[1.0], &[Some(-80.0)]);
        renderer.render(Series::Signal, &[0.0], &[None]);
        let out = lines(renderer);
        assert_eq!(out[0]["series"], json!("raw"));
        assert_eq!(out[1]["series"], json!("signal"));
        assert_eq!(out[1]["y"], json!([null]));
    }
}
