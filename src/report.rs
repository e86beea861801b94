//! Run manifest.
//!
//! Every render returns an `Artifact`; a `RenderReport` collects them and can
//! be written as JSON so downstream tooling knows which charts were produced.

use std::fs;
use std::path::{Path, PathBuf};

use chrono::Utc;
use serde::{Deserialize, Serialize};

use crate::analysis::exceedance::flow_at_exceedance;
use crate::model::{ExceedancePoint, HydroError};

// ============================================================================
// Artifacts
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ChartKind {
    FlowDuration,
    Boxplot,
    Hydrograph,
}

/// Streamflow at the 10/50/90 % exceedance levels of a curve.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FlowDurationSummary {
    pub q10: f64,
    pub q50: f64,
    pub q90: f64,
}

impl FlowDurationSummary {
    /// `None` for an empty curve.
    pub fn from_curve(points: &[ExceedancePoint]) -> Option<Self> {
        Some(Self {
            q10: flow_at_exceedance(points, 10.0)?,
            q50: flow_at_exceedance(points, 50.0)?,
            q90: flow_at_exceedance(points, 90.0)?,
        })
    }
}

/// One chart written to disk.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Artifact {
    pub kind: ChartKind,
    pub path: PathBuf,
    /// Parameter or title the chart is about, when there is one.
    pub subject: Option<String>,
    /// Observations drawn (after dropping missing or unplottable values).
    pub observations: usize,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub flow_duration: Option<FlowDurationSummary>,
}

// ============================================================================
// Report
// ============================================================================

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RenderReport {
    pub generated_at: String,
    pub dpi: u32,
    pub artifacts: Vec<Artifact>,
}

impl RenderReport {
    pub fn new(dpi: u32) -> Self {
        Self {
            generated_at: Utc::now().to_rfc3339(),
            dpi,
            artifacts: Vec::new(),
        }
    }

    pub fn push(&mut self, artifact: Artifact) {
        self.artifacts.push(artifact);
    }

    pub fn extend(&mut self, artifacts: impl IntoIterator<Item = Artifact>) {
        self.artifacts.extend(artifacts);
    }

    pub fn count(&self, kind: ChartKind) -> usize {
        self.artifacts.iter().filter(|a| a.kind == kind).count()
    }

    pub fn to_json(&self) -> Result<String, HydroError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    pub fn write_json(&self, path: impl AsRef<Path>) -> Result<(), HydroError> {
        fs::write(path, self.to_json()?)?;
        Ok(())
    }
}

// ============================================================================
// Tests
// ============================================================================
