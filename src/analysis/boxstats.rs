//! Box-and-whisker statistics.
//!
//! Quartiles use linear interpolation between order statistics. Whiskers
//! reach the most extreme observation within 1.5 IQR of the box; anything
//! further out is reported as an outlier.

use crate::model::HydroError;

/// Whisker reach, as a multiple of the interquartile range.
pub const WHISKER_IQR_FACTOR: f64 = 1.5;

#[derive(Debug, Clone, PartialEq)]
pub struct BoxStats {
    pub count: usize,
    pub q1: f64,
    pub median: f64,
    pub q3: f64,
    pub whisker_low: f64,
    pub whisker_high: f64,
    pub outliers: Vec<f64>,
}

impl BoxStats {
    /// Computes statistics from raw values; `NaN` entries are skipped.
    pub fn from_values(values: &[f64]) -> Result<Self, HydroError> {
        let mut sorted: Vec<f64> = values.iter().copied().filter(|v| !v.is_nan()).collect();
        if sorted.is_empty() {
            return Err(HydroError::InvalidInput(
                "box statistics require at least one observation".to_string(),
            ));
        }
        sorted.sort_by(f64::total_cmp);

        let q1 = percentile_sorted(&sorted, 25.0);
        let median = percentile_sorted(&sorted, 50.0);
        let q3 = percentile_sorted(&sorted, 75.0);

        let reach = WHISKER_IQR_FACTOR * (q3 - q1);
        let low_fence = q1 - reach;
        let high_fence = q3 + reach;

        // The box itself is always inside the fences, so both searches hit.
        let whisker_low = sorted
            .iter()
            .copied()
            .find(|v| *v >= low_fence)
            .unwrap_or(q1);
        let whisker_high = sorted
            .iter()
            .rev()
            .copied()
            .find(|v| *v <= high_fence)
            .unwrap_or(q3);

        let outliers = sorted
            .iter()
            .copied()
            .filter(|v| *v < low_fence || *v > high_fence)
            .collect();

        Ok(Self {
            count: sorted.len(),
            q1,
            median,
            q3,
            whisker_low,
            whisker_high,
            outliers,
        })
    }

    pub fn iqr(&self) -> f64 {
        self.q3 - self.q1
    }

    /// Smallest and largest value drawn for this box, outliers included.
    pub fn extent(&self) -> (f64, f64) {
        let low = self
            .outliers
            .iter()
            .copied()
            .fold(self.whisker_low, f64::min);
        let high = self
            .outliers
            .iter()
            .copied()
            .fold(self.whisker_high, f64::max);
        (low, high)
    }
}

/// Percentile (0-100) of ascending `sorted` data by linear interpolation
/// at position `p / 100 * (n - 1)`.
///
/// Returns `NaN` for empty input.
pub fn percentile_sorted(sorted: &[f64], percentile: f64) -> f64 {
    if sorted.is_empty() {
        return f64::NAN;
    }
    let position = (percentile / 100.0).clamp(0.0, 1.0) * (sorted.len() - 1) as f64;
    let lower = position.floor() as usize;
    let upper = position.ceil() as usize;
    let fraction = position - lower as f64;
    sorted[lower] + fraction * (sorted[upper] - sorted[lower])
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_quartiles_interpolate() {
        let stats = BoxStats::from_values(&[1.0, 2.0, 3.0, 4.0]).unwrap();
        assert_eq!(stats.q1, 1.75);
        assert_eq!(stats.median, 2.5);
        assert_eq!(stats.q3, 3.25);
        assert_eq!(stats.iqr(), 1.5);
    }

    #[test]
    fn test_whiskers_stop_at_data_inside_fences() {
        // q1 = 2, q3 = 4, IQR = 2, fences at -1 and 7.
        let stats = BoxStats::from_values(&[1.0, 2.0, 3.0, 4.0, 5.0]).unwrap();
        assert_eq!(stats.whisker_low, 1.0);
        assert_eq!(stats.whisker_high, 5.0);
        assert!(stats.outliers.is_empty());
    }

    #[test]
    fn test_far_values_become_outliers() {
        let stats = BoxStats::from_values(&[1.0, 2.0, 3.0, 4.0, 5.0, 100.0]).unwrap();
        assert_eq!(stats.outliers, vec![100.0]);
        assert_eq!(stats.whisker_high, 5.0);
        assert_eq!(stats.extent(), (1.0, 100.0));
    }

    #[test]
    fn test_nan_is_skipped() {
        let stats = BoxStats::from_values(&[f64::NAN, 4.0, f64::NAN]).unwrap();
        assert_eq!(stats.count, 1);
        assert_eq!(stats.median, 4.0);
        assert_eq!(stats.whisker_low, 4.0);
        assert_eq!(stats.whisker_high, 4.0);
    }

    #[test]
    fn test_all_missing_is_invalid_input() {
        assert!(matches!(
            BoxStats::from_values(&[f64::NAN]),
            Err(HydroError::InvalidInput(_))
        ));
        assert!(matches!(
            BoxStats::from_values(&[]),
            Err(HydroError::InvalidInput(_))
        ));
    }

    #[test]
    fn test_percentile_sorted_edges() {
        let data = [10.0, 20.0, 30.0];
        assert_eq!(percentile_sorted(&data, 0.0), 10.0);
        assert_eq!(percentile_sorted(&data, 100.0), 30.0);
        assert_eq!(percentile_sorted(&data, 50.0), 20.0);
        assert!(percentile_sorted(&[], 50.0).is_nan());
    }
}
