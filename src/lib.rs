//! Hydrology plotting utilities.
//!
//! Flow-duration curves built with Weibull plotting positions, grouped water
//! quality boxplots and precipitation/streamflow hydrographs, rendered to PNG
//! with `plotters`.

pub mod analysis;
pub mod config;
pub mod ingest;
pub mod logging;
pub mod model;
pub mod render;
pub mod report;
pub mod synthetic;

pub use analysis::{ExceedanceCurveBuilder, GroupingStrategy, exceedance_curve};
pub use config::PlotConfig;
pub use model::{Column, ExceedancePoint, HydroError, TimeTable};
pub use render::{PlotError, plot_boxplots, plot_fdc, plot_hydrograph};
pub use report::{Artifact, ChartKind, RenderReport};
