//! Plot configuration.
//!
//! Every render call receives a `PlotConfig` explicitly; there is no
//! process-wide styling state. Configurations are usually loaded from a
//! TOML file where every key is optional:
//!
//! ```toml
//! dpi = 300
//! font_family = "Times New Roman"
//! output_dir = "plots"
//!
//! [fdc]
//! unit = "m³/s"
//! ```

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::model::{HydroError, UNIT_CONCENTRATION, UNIT_PRECIP, UNIT_STREAMFLOW};

/// Points per inch; font sizes are given in points and scaled by `dpi / 72`.
const POINTS_PER_INCH: f64 = 72.0;

const MAX_DPI: u32 = 2400;

// ---------------------------------------------------------------------------
// Configuration types
// ---------------------------------------------------------------------------

/// An RGB triple, `[r, g, b]` in TOML.
pub type Rgb = [u8; 3];

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PlotConfig {
    /// Output resolution in dots per inch.
    pub dpi: u32,
    pub font_family: String,
    /// Base font size in points.
    pub font_size_pt: f64,
    /// Directory charts are written to. Existing files are overwritten.
    pub output_dir: PathBuf,
    pub fdc: FdcConfig,
    pub boxplot: BoxplotConfig,
    pub hydrograph: HydrographConfig,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FdcConfig {
    pub width_in: f64,
    pub height_in: f64,
    pub unit: String,
    pub line_color: Rgb,
    /// Draw light gray separators between flow regime zones.
    pub show_regimes: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BoxplotConfig {
    pub width_in: f64,
    pub height_in: f64,
    pub unit: String,
    pub box_color: Rgb,
    pub median_color: Rgb,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct HydrographConfig {
    pub width_in: f64,
    pub height_in: f64,
    pub unit: String,
    pub precip_unit: String,
    pub streamflow_column: String,
    pub precip_column: String,
    pub streamflow_color: Rgb,
    pub precip_color: Rgb,
}

impl Default for PlotConfig {
    fn default() -> Self {
        Self {
            dpi: 600,
            font_family: "serif".to_string(),
            font_size_pt: 10.0,
            output_dir: PathBuf::from("."),
            fdc: FdcConfig::default(),
            boxplot: BoxplotConfig::default(),
            hydrograph: HydrographConfig::default(),
        }
    }
}

impl Default for FdcConfig {
    fn default() -> Self {
        Self {
            width_in: 5.0,
            height_in: 3.0,
            unit: UNIT_STREAMFLOW.to_string(),
            line_color: [0, 0, 139], // darkblue
            show_regimes: true,
        }
    }
}

impl Default for BoxplotConfig {
    fn default() -> Self {
        Self {
            width_in: 5.0,
            height_in: 3.0,
            unit: UNIT_CONCENTRATION.to_string(),
            box_color: [31, 119, 180],
            median_color: [255, 127, 14],
        }
    }
}

impl Default for HydrographConfig {
    fn default() -> Self {
        Self {
            width_in: 6.0,
            height_in: 5.0,
            unit: UNIT_STREAMFLOW.to_string(),
            precip_unit: UNIT_PRECIP.to_string(),
            streamflow_column: "streamflow".to_string(),
            precip_column: "precip".to_string(),
            streamflow_color: [0, 0, 139],   // darkblue
            precip_color: [135, 206, 235], // skyblue
        }
    }
}

// ---------------------------------------------------------------------------
// Derived sizes
// ---------------------------------------------------------------------------

impl PlotConfig {
    /// Pixel dimensions of a figure given in inches.
    pub fn pixels(&self, width_in: f64, height_in: f64) -> (u32, u32) {
        let dpi = self.dpi as f64;
        (
            (width_in * dpi).round() as u32,
            (height_in * dpi).round() as u32,
        )
    }

    /// Font size in pixels for a size given in points.
    pub fn font_px(&self, points: f64) -> f64 {
        points * self.dpi as f64 / POINTS_PER_INCH
    }

    /// Base font size in pixels.
    pub fn base_font_px(&self) -> f64 {
        self.font_px(self.font_size_pt)
    }

    /// Full path for an output file name.
    pub fn output_path(&self, file_name: &str) -> PathBuf {
        self.output_dir.join(file_name)
    }

    /// Rejects settings that cannot produce an image.
    pub fn validate(&self) -> Result<(), HydroError> {
        if self.dpi == 0 || self.dpi > MAX_DPI {
            return Err(HydroError::Config(format!(
                "dpi must be between 1 and {}, got {}",
                MAX_DPI, self.dpi
            )));
        }
        if !(self.font_size_pt > 0.0) {
            return Err(HydroError::Config(format!(
                "font_size_pt must be positive, got {}",
                self.font_size_pt
            )));
        }
        if self.font_family.trim().is_empty() {
            return Err(HydroError::Config("font_family must not be empty".to_string()));
        }
        let figures = [
            ("fdc", self.fdc.width_in, self.fdc.height_in),
            ("boxplot", self.boxplot.width_in, self.boxplot.height_in),
            ("hydrograph", self.hydrograph.width_in, self.hydrograph.height_in),
        ];
        for (name, width, height) in figures {
            if !(width > 0.0 && height > 0.0) {
                return Err(HydroError::Config(format!(
                    "{} figure size must be positive, got {}x{} in",
                    name, width, height
                )));
            }
        }
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Loading
// ---------------------------------------------------------------------------

/// Parses a configuration from TOML text and validates it.
pub fn parse_config(text: &str) -> Result<PlotConfig, HydroError> {
    let config: PlotConfig =
        toml::from_str(text).map_err(|e| HydroError::Config(e.to_string()))?;
    config.validate()?;
    Ok(config)
}

/// Loads a configuration file from disk.
pub fn load_config(path: impl AsRef<Path>) -> Result<PlotConfig, HydroError> {
    let path = path.as_ref();
    let text = fs::read_to_string(path).map_err(|e| {
        HydroError::Config(format!("failed to read {}: {}", path.display(), e))
    })?;
    parse_config(&text)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
