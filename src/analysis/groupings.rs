//! Calendar grouping of water quality columns for boxplots.
//!
//! A `GroupingStrategy` decides how a date-indexed column is split into
//! labelled groups; each group becomes one box on the chart.

use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use chrono::Datelike;

use crate::model::{HydroError, TimeTable};

// ---------------------------------------------------------------------------
// Strategies
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum GroupingStrategy {
    /// One box per parameter over the whole record.
    #[default]
    All,
    /// One box per calendar month present, January first.
    Monthly,
    /// Spring, Summer, Autumn, Winter (meteorological seasons).
    Seasonal,
    /// One box per (year, parameter) on a single chart. Experimental.
    Annual,
}

impl GroupingStrategy {
    /// Annual grouping works but is not recommended yet.
    pub fn is_experimental(&self) -> bool {
        matches!(self, GroupingStrategy::Annual)
    }

    /// File name for a parameter's chart. `Annual` draws every parameter on
    /// one chart and ignores `parameter`.
    pub fn file_name(&self, parameter: &str) -> String {
        match self {
            GroupingStrategy::All => format!("{}_Boxplot.png", parameter),
            GroupingStrategy::Monthly => format!("{}_Monthly_Boxplot.png", parameter),
            GroupingStrategy::Seasonal => format!("{}_Seasonal_Boxplot.png", parameter),
            GroupingStrategy::Annual => "Annual_Boxplot.png".to_string(),
        }
    }
}

impl fmt::Display for GroupingStrategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GroupingStrategy::All => write!(f, "all"),
            GroupingStrategy::Monthly => write!(f, "monthly"),
            GroupingStrategy::Seasonal => write!(f, "seasonal"),
            GroupingStrategy::Annual => write!(f, "annual"),
        }
    }
}

impl FromStr for GroupingStrategy {
    type Err = HydroError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "all" => Ok(GroupingStrategy::All),
            "monthly" => Ok(GroupingStrategy::Monthly),
            "seasonal" => Ok(GroupingStrategy::Seasonal),
            "annual" => Ok(GroupingStrategy::Annual),
            other => Err(HydroError::InvalidInput(format!(
                "unknown grouping '{}' (expected all, monthly, seasonal or annual)",
                other
            ))),
        }
    }
}

// ---------------------------------------------------------------------------
// Seasons and months
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Season {
    Spring,
    Summer,
    Autumn,
    Winter,
}

impl Season {
    /// Meteorological season of a calendar month (1-12).
    pub fn from_month(month: u32) -> Self {
        match month {
            3..=5 => Season::Spring,
            6..=8 => Season::Summer,
            9..=11 => Season::Autumn,
            _ => Season::Winter,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Season::Spring => "Spring",
            Season::Summer => "Summer",
            Season::Autumn => "Autumn",
            Season::Winter => "Winter",
        }
    }
}

const MONTH_LABELS: [&str; 12] = [
    "Jan", "Feb", "Mar", "Apr", "May", "Jun", "Jul", "Aug", "Sep", "Oct", "Nov", "Dec",
];

/// Three-letter label for a calendar month (1-12).
pub fn month_label(month: u32) -> &'static str {
    MONTH_LABELS[(month.clamp(1, 12) - 1) as usize]
}

// ---------------------------------------------------------------------------
// Grouping
// ---------------------------------------------------------------------------

/// A labelled set of observations destined for one box.
#[derive(Debug, Clone, PartialEq)]
pub struct Group {
    pub label: String,
    pub values: Vec<f64>,
}

/// Splits one column into groups according to `strategy`.
///
/// Missing cells are dropped and groups left without any observation are
/// omitted. `Annual` groups every column at once and is handled by
/// [`group_annual`]; asking for it here is an error.
pub fn group_column(
    table: &TimeTable,
    parameter: &str,
    strategy: GroupingStrategy,
) -> Result<Vec<Group>, HydroError> {
    let series = table.series(parameter)?;

    let groups = match strategy {
        GroupingStrategy::All => vec![Group {
            label: parameter.to_string(),
            values: series.into_iter().map(|(_, v)| v).collect(),
        }],
        GroupingStrategy::Monthly => {
            let mut by_month: BTreeMap<u32, Vec<f64>> = BTreeMap::new();
            for (date, value) in series {
                by_month.entry(date.month()).or_default().push(value);
            }
            by_month
                .into_iter()
                .map(|(month, values)| Group {
                    label: month_label(month).to_string(),
                    values,
                })
                .collect()
        }
        GroupingStrategy::Seasonal => {
            let mut by_season: BTreeMap<Season, Vec<f64>> = BTreeMap::new();
            for (date, value) in series {
                by_season
                    .entry(Season::from_month(date.month()))
                    .or_default()
                    .push(value);
            }
            by_season
                .into_iter()
                .map(|(season, values)| Group {
                    label: season.label().to_string(),
                    values,
                })
                .collect()
        }
        GroupingStrategy::Annual => {
            return Err(HydroError::InvalidInput(format!(
                "annual grouping spans every column, cannot group '{}' alone",
                parameter
            )));
        }
    };

    Ok(groups.into_iter().filter(|g| !g.values.is_empty()).collect())
}

/// Groups every column by year, ordered by year then by column order.
///
/// This is the layout of the single annual chart.
pub fn group_annual(table: &TimeTable) -> Result<Vec<Group>, HydroError> {
    let mut by_year: BTreeMap<(i32, usize), Group> = BTreeMap::new();
    for (index, column) in table.columns().iter().enumerate() {
        for (date, value) in table.series(&column.name)? {
            by_year
                .entry((date.year(), index))
                .or_insert_with(|| Group {
                    label: format!("{} {}", date.year(), column.name),
                    values: Vec::new(),
                })
                .values
                .push(value);
        }
    }
    Ok(by_year.into_values().collect())
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Column;
    use chrono::NaiveDate;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn sample_table() -> TimeTable {
        let dates = vec![
            date(2022, 1, 15),
            date(2022, 4, 15),
            date(2022, 7, 15),
            date(2022, 12, 15),
            date(2023, 1, 15),
            date(2023, 10, 15),
        ];
        TimeTable::new(
            dates,
            vec![
                Column::new("T-N", vec![1.0, 2.0, 3.0, 4.0, 5.0, 6.0]),
                Column::new("T-P", vec![0.1, f64::NAN, 0.3, 0.4, 0.5, 0.6]),
            ],
        )
        .unwrap()
    }

    fn labels(groups: &[Group]) -> Vec<&str> {
        groups.iter().map(|g| g.label.as_str()).collect()
    }

    #[test]
    fn test_parse_strategy() {
        assert_eq!("all".parse::<GroupingStrategy>().unwrap(), GroupingStrategy::All);
        assert_eq!("Monthly".parse::<GroupingStrategy>().unwrap(), GroupingStrategy::Monthly);
        assert_eq!(" seasonal ".parse::<GroupingStrategy>().unwrap(), GroupingStrategy::Seasonal);
        assert_eq!("annual".parse::<GroupingStrategy>().unwrap(), GroupingStrategy::Annual);
        assert!("weekly".parse::<GroupingStrategy>().is_err());
    }

    #[test]
    fn test_display_round_trips_through_from_str() {
        for strategy in [
            GroupingStrategy::All,
            GroupingStrategy::Monthly,
            GroupingStrategy::Seasonal,
            GroupingStrategy::Annual,
        ] {
            assert_eq!(strategy.to_string().parse::<GroupingStrategy>().unwrap(), strategy);
        }
    }

    #[test]
    fn test_file_names() {
        assert_eq!(GroupingStrategy::All.file_name("SS"), "SS_Boxplot.png");
        assert_eq!(GroupingStrategy::Monthly.file_name("SS"), "SS_Monthly_Boxplot.png");
        assert_eq!(GroupingStrategy::Seasonal.file_name("SS"), "SS_Seasonal_Boxplot.png");
        assert_eq!(GroupingStrategy::Annual.file_name("SS"), "Annual_Boxplot.png");
    }

    #[test]
    fn test_only_annual_is_experimental() {
        assert!(GroupingStrategy::Annual.is_experimental());
        assert!(!GroupingStrategy::All.is_experimental());
        assert!(!GroupingStrategy::Monthly.is_experimental());
        assert!(!GroupingStrategy::Seasonal.is_experimental());
    }

    #[test]
    fn test_season_mapping() {
        let seasons: Vec<Season> = (1..=12).map(Season::from_month).collect();
        assert_eq!(
            seasons,
            vec![
                Season::Winter,
                Season::Winter,
                Season::Spring,
                Season::Spring,
                Season::Spring,
                Season::Summer,
                Season::Summer,
                Season::Summer,
                Season::Autumn,
                Season::Autumn,
                Season::Autumn,
                Season::Winter,
            ]
        );
    }

    #[test]
    fn test_all_grouping_is_single_group() {
        let groups = group_column(&sample_table(), "T-P", GroupingStrategy::All).unwrap();
        assert_eq!(labels(&groups), vec!["T-P"]);
        assert_eq!(groups[0].values, vec![0.1, 0.3, 0.4, 0.5, 0.6]);
    }

    #[test]
    fn test_monthly_grouping_in_calendar_order() {
        let groups = group_column(&sample_table(), "T-N", GroupingStrategy::Monthly).unwrap();
        assert_eq!(labels(&groups), vec!["Jan", "Apr", "Jul", "Oct", "Dec"]);
        assert_eq!(groups[0].values, vec![1.0, 5.0]);
    }

    #[test]
    fn test_seasonal_grouping_order_and_membership() {
        let groups = group_column(&sample_table(), "T-N", GroupingStrategy::Seasonal).unwrap();
        assert_eq!(labels(&groups), vec!["Spring", "Summer", "Autumn", "Winter"]);
        assert_eq!(groups[3].values, vec![1.0, 4.0, 5.0]);
    }

    #[test]
    fn test_groups_without_observations_are_dropped() {
        // April only holds a missing T-P value.
        let groups = group_column(&sample_table(), "T-P", GroupingStrategy::Monthly).unwrap();
        assert!(!labels(&groups).contains(&"Apr"));
    }

    #[test]
    fn test_annual_groups_interleave_parameters_by_year() {
        let groups = group_annual(&sample_table()).unwrap();
        assert_eq!(
            labels(&groups),
            vec!["2022 T-N", "2022 T-P", "2023 T-N", "2023 T-P"]
        );
        assert_eq!(groups[1].values, vec![0.1, 0.3, 0.4]);
    }

    #[test]
    fn test_annual_is_rejected_for_a_single_column() {
        let result = group_column(&sample_table(), "T-N", GroupingStrategy::Annual);
        assert!(matches!(result, Err(HydroError::InvalidInput(_))));
    }

    #[test]
    fn test_missing_parameter_is_an_error() {
        let result = group_column(&sample_table(), "SS", GroupingStrategy::All);
        assert!(matches!(result, Err(HydroError::MissingColumn(_))));
    }

    #[test]
    fn test_month_labels() {
        assert_eq!(month_label(1), "Jan");
        assert_eq!(month_label(12), "Dec");
    }
}
