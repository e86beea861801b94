//! Seeded demo data.
//!
//! Gamma-distributed streamflow, water quality and precipitation series used
//! by the `demo` command and by tests that want realistic-looking input.
//! Draws come from one generator in a fixed order, so a seed always yields
//! the same three datasets.

use chrono::{Days, NaiveDate};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use rand_distr::Gamma;

use crate::model::{Column, HydroError, TimeTable};

pub const DEFAULT_SEED: u64 = 42;

/// Days in the single-station streamflow sample.
pub const STREAMFLOW_DAYS: usize = 365;

/// Water quality parameters and their gamma shape (scale is 1).
pub const WATER_QUALITY_SHAPES: [(&str, f64); 3] = [("T-N", 2.0), ("T-P", 3.0), ("SS", 4.0)];

pub struct DemoData {
    rng: StdRng,
}

impl DemoData {
    pub fn new(seed: u64) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
        }
    }

    /// `n` draws from Gamma(shape, scale).
    pub fn gamma_sample(&mut self, shape: f64, scale: f64, n: usize) -> Result<Vec<f64>, HydroError> {
        let gamma = Gamma::new(shape, scale)
            .map_err(|e| HydroError::InvalidInput(format!("gamma({}, {}): {}", shape, scale, e)))?;
        Ok((0..n).map(|_| self.rng.sample(gamma)).collect())
    }

    /// One year of daily streamflow, Gamma(2, 1) scaled by 100.
    pub fn streamflow(&mut self) -> Result<Vec<f64>, HydroError> {
        Ok(self
            .gamma_sample(2.0, 1.0, STREAMFLOW_DAYS)?
            .into_iter()
            .map(|q| q * 100.0)
            .collect())
    }

    /// Daily T-N, T-P and SS concentrations over `start..=end`.
    pub fn water_quality(&mut self, start: NaiveDate, end: NaiveDate) -> Result<TimeTable, HydroError> {
        let dates = daily_dates(start, end)?;
        let mut columns = Vec::with_capacity(WATER_QUALITY_SHAPES.len());
        for (name, shape) in WATER_QUALITY_SHAPES {
            columns.push(Column::new(name, self.gamma_sample(shape, 1.0, dates.len())?));
        }
        TimeTable::new(dates, columns)
    }

    /// Daily `streamflow` (Gamma(2, 1)) and `precip` (Gamma(3, 1)) over `start..=end`.
    pub fn streamflow_precip(&mut self, start: NaiveDate, end: NaiveDate) -> Result<TimeTable, HydroError> {
        let dates = daily_dates(start, end)?;
        let streamflow = self.gamma_sample(2.0, 1.0, dates.len())?;
        let precip = self.gamma_sample(3.0, 1.0, dates.len())?;
        TimeTable::new(
            dates,
            vec![
                Column::new("streamflow", streamflow),
                Column::new("precip", precip),
            ],
        )
    }
}

/// Every calendar day from `start` to `end`, inclusive.
pub fn daily_dates(start: NaiveDate, end: NaiveDate) -> Result<Vec<NaiveDate>, HydroError> {
    if end < start {
        return Err(HydroError::InvalidInput(format!(
            "date range ends before it starts: {} > {}",
            start, end
        )));
    }
    let days = (end - start).num_days() as u64;
    (0..=days)
        .map(|i| {
            start
                .checked_add_days(Days::new(i))
                .ok_or_else(|| HydroError::InvalidInput(format!("date overflow after {}", start)))
        })
        .collect()
}
