//! Flow-duration curve transform.
//!
//! Turns a sample of observations into `(exceedance probability, value)`
//! pairs using the Weibull plotting position `rank / (n + 1)`, so no point
//! ever lands on exactly 0 or 1.

use crate::model::{ExceedancePoint, HydroError};

// ---------------------------------------------------------------------------
// Curve builder
// ---------------------------------------------------------------------------

/// Builds exceedance curves. Stateless; every call is a pure transform.
#[derive(Debug, Clone, Copy, Default)]
pub struct ExceedanceCurveBuilder;

impl ExceedanceCurveBuilder {
    pub fn new() -> Self {
        Self
    }

    /// Ranks the sample from largest to smallest and assigns each value the
    /// probability `rank / (n + 1)`.
    ///
    /// Returns exactly `sample.len()` points ordered by increasing
    /// probability (non-increasing value). Fails with
    /// `HydroError::InvalidInput` on an empty sample.
    pub fn build(&self, sample: &[f64]) -> Result<Vec<ExceedancePoint>, HydroError> {
        if sample.is_empty() {
            return Err(HydroError::InvalidInput(
                "exceedance curve requires a non-empty sample".to_string(),
            ));
        }

        let mut sorted = sample.to_vec();
        sorted.sort_by(|a, b| b.total_cmp(a));

        let denominator = (sorted.len() + 1) as f64;
        Ok(sorted
            .into_iter()
            .enumerate()
            .map(|(i, value)| ExceedancePoint {
                probability: (i + 1) as f64 / denominator,
                value,
            })
            .collect())
    }
}

/// Convenience wrapper around [`ExceedanceCurveBuilder::build`].
pub fn exceedance_curve(sample: &[f64]) -> Result<Vec<ExceedancePoint>, HydroError> {
    ExceedanceCurveBuilder.build(sample)
}

// ---------------------------------------------------------------------------
// Curve queries
// ---------------------------------------------------------------------------

/// Value at `percent` exceedance (e.g. 90.0 for Q90), linearly interpolated
/// between neighbouring points of a built curve.
///
/// Percentages outside the curve's range clamp to the first or last value.
/// Returns `None` for an empty curve.
pub fn flow_at_exceedance(points: &[ExceedancePoint], percent: f64) -> Option<f64> {
    let first = points.first()?;
    let last = points.last()?;

    if percent <= first.percent() {
        return Some(first.value);
    }
    if percent >= last.percent() {
        return Some(last.value);
    }

    points.windows(2).find_map(|pair| {
        let (lo, hi) = (pair[0], pair[1]);
        if percent >= lo.percent() && percent <= hi.percent() {
            let t = (percent - lo.percent()) / (hi.percent() - lo.percent());
            Some(lo.value + t * (hi.value - lo.value))
        } else {
            None
        }
    })
}

// ---------------------------------------------------------------------------
// Flow regime zones
// ---------------------------------------------------------------------------

/// Conventional flow-duration zones, in order of increasing exceedance.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FlowRegime {
    HighFlows,
    MoistConditions,
    MidRange,
    DryConditions,
    LowFlows,
}

impl FlowRegime {
    pub const ALL: [FlowRegime; 5] = [
        FlowRegime::HighFlows,
        FlowRegime::MoistConditions,
        FlowRegime::MidRange,
        FlowRegime::DryConditions,
        FlowRegime::LowFlows,
    ];

    /// Interior zone boundaries in percent exceedance.
    pub fn boundaries() -> [f64; 4] {
        [10.0, 40.0, 60.0, 90.0]
    }

    /// Zone containing an exceedance percentage. Values below 0 or above 100
    /// are treated as the nearest end zone.
    pub fn classify(percent: f64) -> Self {
        match percent {
            p if p < 10.0 => FlowRegime::HighFlows,
            p if p < 40.0 => FlowRegime::MoistConditions,
            p if p < 60.0 => FlowRegime::MidRange,
            p if p < 90.0 => FlowRegime::DryConditions,
            _ => FlowRegime::LowFlows,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            FlowRegime::HighFlows => "High Flows",
            FlowRegime::MoistConditions => "Moist Conditions",
            FlowRegime::MidRange => "Mid-Range Flows",
            FlowRegime::DryConditions => "Dry Conditions",
            FlowRegime::LowFlows => "Low Flows",
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn pairs(points: &[ExceedancePoint]) -> Vec<(f64, f64)> {
        points.iter().map(|p| (p.probability, p.value)).collect()
    }

    #[test]
    fn test_three_values_use_weibull_positions() {
        let points = exceedance_curve(&[10.0, 30.0, 20.0]).unwrap();
        assert_eq!(pairs(&points), vec![(0.25, 30.0), (0.5, 20.0), (0.75, 10.0)]);
    }

    #[test]
    fn test_equal_values_still_get_distinct_probabilities() {
        let points = exceedance_curve(&[5.0, 5.0, 5.0]).unwrap();
        let probs: Vec<f64> = points.iter().map(|p| p.probability).collect();
        assert_eq!(probs, vec![0.25, 0.5, 0.75]);
        assert!(points.iter().all(|p| p.value == 5.0));
    }

    #[test]
    fn test_empty_sample_is_invalid_input() {
        let result = exceedance_curve(&[]);
        assert!(
            matches!(result, Err(HydroError::InvalidInput(_))),
            "empty sample should be rejected, got {:?}",
            result
        );
    }

    #[test]
    fn test_single_value_sits_at_half() {
        let points = exceedance_curve(&[42.0]).unwrap();
        assert_eq!(pairs(&points), vec![(0.5, 42.0)]);
    }

    #[test]
    fn test_non_positive_values_are_kept() {
        // Log-axis suitability is the renderer's problem, not the transform's.
        let points = exceedance_curve(&[0.0, -1.0, 2.0]).unwrap();
        assert_eq!(pairs(&points), vec![(0.25, 2.0), (0.5, 0.0), (0.75, -1.0)]);
    }

    #[test]
    fn test_build_does_not_mutate_input() {
        let sample = vec![3.0, 1.0, 2.0];
        let _ = exceedance_curve(&sample).unwrap();
        assert_eq!(sample, vec![3.0, 1.0, 2.0]);
    }

    #[test]
    fn test_flow_at_exceedance_interpolates_and_clamps() {
        let points = exceedance_curve(&[10.0, 30.0, 20.0]).unwrap();
        assert_eq!(flow_at_exceedance(&points, 50.0), Some(20.0));
        assert_eq!(flow_at_exceedance(&points, 37.5), Some(25.0));
        assert_eq!(flow_at_exceedance(&points, 1.0), Some(30.0));
        assert_eq!(flow_at_exceedance(&points, 99.0), Some(10.0));
        assert_eq!(flow_at_exceedance(&[], 50.0), None);
    }

    #[test]
    fn test_flow_regime_classification() {
        assert_eq!(FlowRegime::classify(0.0), FlowRegime::HighFlows);
        assert_eq!(FlowRegime::classify(9.99), FlowRegime::HighFlows);
        assert_eq!(FlowRegime::classify(10.0), FlowRegime::MoistConditions);
        assert_eq!(FlowRegime::classify(50.0), FlowRegime::MidRange);
        assert_eq!(FlowRegime::classify(75.0), FlowRegime::DryConditions);
        assert_eq!(FlowRegime::classify(90.0), FlowRegime::LowFlows);
        assert_eq!(FlowRegime::classify(100.0), FlowRegime::LowFlows);
    }

    #[test]
    fn test_flow_regime_boundaries_separate_all_zones() {
        let boundaries = FlowRegime::boundaries();
        assert_eq!(boundaries.len() + 1, FlowRegime::ALL.len());
        for (i, b) in boundaries.iter().enumerate() {
            assert_eq!(FlowRegime::classify(*b), FlowRegime::ALL[i + 1]);
        }
    }

    proptest! {
        #[test]
        fn prop_one_point_per_observation(sample in prop::collection::vec(-1.0e6f64..1.0e6, 1..200)) {
            let points = exceedance_curve(&sample).unwrap();
            prop_assert_eq!(points.len(), sample.len());
        }

        #[test]
        fn prop_probabilities_strictly_increase_inside_unit_interval(
            sample in prop::collection::vec(-1.0e6f64..1.0e6, 1..200)
        ) {
            let points = exceedance_curve(&sample).unwrap();
            for p in &points {
                prop_assert!(p.probability > 0.0 && p.probability < 1.0);
            }
            for pair in points.windows(2) {
                prop_assert!(pair[0].probability < pair[1].probability);
            }
        }

        #[test]
        fn prop_values_do_not_increase(sample in prop::collection::vec(-1.0e6f64..1.0e6, 1..200)) {
            let points = exceedance_curve(&sample).unwrap();
            for pair in points.windows(2) {
                prop_assert!(pair[0].value >= pair[1].value);
            }
        }

        #[test]
        fn prop_rank_matches_probability(sample in prop::collection::vec(0.0f64..1.0e4, 1..100)) {
            let points = exceedance_curve(&sample).unwrap();
            let n = sample.len() as f64;
            for (i, p) in points.iter().enumerate() {
                prop_assert_eq!(p.probability, (i + 1) as f64 / (n + 1.0));
            }
        }

        #[test]
        fn prop_build_is_idempotent(sample in prop::collection::vec(-1.0e3f64..1.0e3, 1..100)) {
            let builder = ExceedanceCurveBuilder::new();
            let first = builder.build(&sample).unwrap();
            let second = builder.build(&sample).unwrap();
            prop_assert_eq!(first, second);
        }
    }
}
