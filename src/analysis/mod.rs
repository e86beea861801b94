//! Transforms applied to hydrology data before it is drawn.
//!
//! Submodules:
//! - `exceedance`: flow-duration curve positions and flow regime zones.
//! - `boxstats`: quartiles, whiskers and outliers for one box.
//! - `groupings`: splits a water quality column by calendar period.
//!
//! Nothing here touches the filesystem or the plotting backend.

pub mod boxstats;
pub mod exceedance;
pub mod groupings;

pub use exceedance::{ExceedanceCurveBuilder, FlowRegime, exceedance_curve, flow_at_exceedance};
pub use groupings::{Group, GroupingStrategy, Season};
