//! Chart rendering with the [`plotters`] bitmap backend.
//!
//! Submodules:
//! - `fdc`: flow-duration curve on a log value axis.
//! - `boxplot`: grouped water quality boxplots.
//! - `hydrograph`: precipitation over streamflow on a shared date axis.
//!
//! All renderers take an explicit `PlotConfig`, write PNG files into
//! `config.output_dir` (overwriting) and return the `Artifact` they wrote.

pub mod boxplot;
pub mod fdc;
pub mod hydrograph;

use std::fs;
use std::ops::Range;

use plotters::coord::ranged1d::{DefaultFormatting, KeyPointHint, Ranged};
use plotters::coord::types::RangedCoordf64;
use plotters::prelude::*;
use thiserror::Error;

use crate::config::{PlotConfig, Rgb};
use crate::model::HydroError;

pub use boxplot::{plot_boxplots, render_boxplot};
pub use fdc::{FDC_FILE, plot_fdc, render_fdc};
pub use hydrograph::{HYDROGRAPH_FILE, plot_hydrograph};

/// Errors that can occur during plot generation
#[derive(Error, Debug)]
pub enum PlotError {
    #[error("Failed to create drawing area: {0}")]
    DrawingArea(String),

    #[error("Failed to configure chart: {0}")]
    ChartConfig(String),

    #[error("Failed to draw chart elements: {0}")]
    Drawing(String),

    #[error("Failed to save plot to file: {0}")]
    FileSave(#[from] std::io::Error),

    #[error("Invalid data: {0}")]
    InvalidData(String),

    #[error(transparent)]
    Hydro(#[from] HydroError),
}

pub type Result<T> = core::result::Result<T, PlotError>;

// ---------------------------------------------------------------------------
// Shared helpers
// ---------------------------------------------------------------------------

pub(crate) fn rgb(color: Rgb) -> RGBColor {
    RGBColor(color[0], color[1], color[2])
}

/// Creates the output directory if needed.
pub(crate) fn prepare_output_dir(config: &PlotConfig) -> Result<()> {
    fs::create_dir_all(&config.output_dir)?;
    Ok(())
}

/// Line width in pixels for a width given in points.
pub(crate) fn stroke_px(config: &PlotConfig, points: f64) -> u32 {
    config.font_px(points).round().max(1.0) as u32
}

/// A pixel length derived from the base font size, for margins and label areas.
pub(crate) fn em(config: &PlotConfig, ems: f64) -> i32 {
    (config.base_font_px() * ems).round() as i32
}

/// Lower and upper bound of `values` padded by `fraction` of their span.
/// A zero span is widened by one unit on each side.
pub(crate) fn padded_range(values: impl Iterator<Item = f64>, fraction: f64) -> Option<(f64, f64)> {
    let (min, max) = values.fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), v| {
        (lo.min(v), hi.max(v))
    });
    if !min.is_finite() || !max.is_finite() {
        return None;
    }
    let span = max - min;
    if span == 0.0 {
        return Some((min - 1.0, max + 1.0));
    }
    Some((min - span * fraction, max + span * fraction))
}

/// Linear `f64` axis whose tick marks sit exactly at `ticks`.
///
/// Used for the FDC regime boundaries and the boxplot positions.
#[derive(Clone)]
pub(crate) struct KeyTickAxis {
    linear: RangedCoordf64,
    ticks: Vec<f64>,
}

impl KeyTickAxis {
    /// Ticks outside `range` are discarded.
    pub(crate) fn new(range: Range<f64>, ticks: impl IntoIterator<Item = f64>) -> Self {
        let ticks = ticks
            .into_iter()
            .filter(|t| *t >= range.start && *t <= range.end)
            .collect();
        Self {
            linear: range.into(),
            ticks,
        }
    }
}

impl Ranged for KeyTickAxis {
    type FormatOption = DefaultFormatting;
    type ValueType = f64;

    fn map(&self, value: &f64, limit: (i32, i32)) -> i32 {
        self.linear.map(value, limit)
    }

    fn key_points<Hint: KeyPointHint>(&self, hint: Hint) -> Vec<f64> {
        let max = hint.max_num_points();
        if max == 0 {
            return Vec::new();
        }
        let step = self.ticks.len().div_ceil(max).max(1);
        self.ticks.iter().copied().step_by(step).collect()
    }

    fn range(&self) -> Range<f64> {
        self.linear.range()
    }
}

pub(crate) fn area_err<E: std::fmt::Display>(e: E) -> PlotError {
    PlotError::DrawingArea(e.to_string())
}

pub(crate) fn chart_err<E: std::fmt::Display>(e: E) -> PlotError {
    PlotError::ChartConfig(e.to_string())
}

pub(crate) fn draw_err<E: std::fmt::Display>(e: E) -> PlotError {
    PlotError::Drawing(e.to_string())
}

/// Compact axis label: no decimals above 100, two significant decimals below.
pub(crate) fn format_value(value: f64) -> String {
    let magnitude = value.abs();
    if magnitude >= 100.0 || magnitude == 0.0 {
        format!("{:.0}", value)
    } else if magnitude >= 1.0 {
        format!("{:.1}", value)
    } else {
        format!("{:.2}", value)
    }
}
