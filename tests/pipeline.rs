//! End-to-end checks from CSV text through analysis and rendering.

use std::fs;

use hydroplot::analysis::exceedance::FlowRegime;
use hydroplot::analysis::groupings::group_column;
use hydroplot::ingest::{load_sample, load_table, parse_table};
use hydroplot::synthetic::{DEFAULT_SEED, DemoData};
use hydroplot::{
    ChartKind, ExceedanceCurveBuilder, GroupingStrategy, HydroError, PlotConfig, PlotError,
    RenderReport, plot_boxplots, plot_fdc, plot_hydrograph,
};

const WQ_CSV: &str = "\
Date,T-N,T-P
2023-01-15,1.2,0.10
2023-02-15,1.8,0.14
2023-04-10,2.4,
2023-07-04,3.1,0.31
2023-10-31,null,0.22
2023-12-25,1.1,0.09
";

fn config_in(dir: &std::path::Path) -> PlotConfig {
    PlotConfig {
        dpi: 72,
        output_dir: dir.to_path_buf(),
        ..PlotConfig::default()
    }
}

#[test]
fn test_csv_to_seasonal_groups() {
    let table = parse_table(WQ_CSV).unwrap();
    let groups = group_column(&table, "T-N", GroupingStrategy::Seasonal).unwrap();

    let labels: Vec<&str> = groups.iter().map(|g| g.label.as_str()).collect();
    assert_eq!(labels, vec!["Spring", "Summer", "Winter"]);
    assert_eq!(groups[2].values, vec![1.2, 1.8, 1.1]);
}

#[test]
fn test_sample_file_to_exceedance_curve() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("flow.txt");
    fs::write(&path, "streamflow\n10\n30\n\n20\n").unwrap();

    let sample = load_sample(&path, None).unwrap();
    let curve = ExceedanceCurveBuilder::new().build(&sample).unwrap();

    let pairs: Vec<(f64, f64)> = curve.iter().map(|p| (p.probability, p.value)).collect();
    assert_eq!(pairs, vec![(0.25, 30.0), (0.5, 20.0), (0.75, 10.0)]);
    assert_eq!(FlowRegime::classify(curve[0].percent()), FlowRegime::MoistConditions);
}

#[test]
fn test_table_column_as_sample() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("wq.csv");
    fs::write(&path, WQ_CSV).unwrap();

    let sample = load_sample(&path, Some("T-P")).unwrap();
    assert_eq!(sample.len(), 5);

    let err = load_sample(&path, Some("DO")).unwrap_err();
    assert!(matches!(err, HydroError::MissingColumn(name) if name == "DO"));
}

#[test]
fn test_empty_sample_fails_without_output() {
    let dir = tempfile::tempdir().unwrap();
    let result = plot_fdc(&[], "Station A", &config_in(dir.path()));
    assert!(matches!(result, Err(PlotError::Hydro(HydroError::InvalidInput(_)))));
    assert_eq!(fs::read_dir(dir.path()).unwrap().count(), 0);
}

#[test]
fn test_hydrograph_requires_precip_column() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("wq.csv");
    fs::write(&path, WQ_CSV).unwrap();
    let table = load_table(&path).unwrap();

    let result = plot_hydrograph(&table, "", &config_in(dir.path()));
    assert!(matches!(result, Err(PlotError::Hydro(HydroError::MissingColumn(_)))));
}

#[test]
fn test_demo_pipeline_writes_every_chart() {
    let dir = tempfile::tempdir().unwrap();
    let config = config_in(dir.path());
    let mut data = DemoData::new(DEFAULT_SEED);
    let mut report = RenderReport::new(config.dpi);

    report.push(plot_fdc(&data.streamflow().unwrap(), "Station A", &config).unwrap());

    let start = chrono::NaiveDate::from_ymd_opt(2022, 1, 1).unwrap();
    let end = chrono::NaiveDate::from_ymd_opt(2024, 12, 31).unwrap();
    let wq = data.water_quality(start, end).unwrap();
    for strategy in [
        GroupingStrategy::All,
        GroupingStrategy::Monthly,
        GroupingStrategy::Annual,
        GroupingStrategy::Seasonal,
    ] {
        report.extend(plot_boxplots(&wq, strategy, &config).unwrap());
    }

    let sp = data.streamflow_precip(start, end).unwrap();
    report.push(plot_hydrograph(&sp, "Station A", &config).unwrap());

    assert_eq!(report.count(ChartKind::FlowDuration), 1);
    assert_eq!(report.count(ChartKind::Boxplot), 3 + 3 + 1 + 3);
    assert_eq!(report.count(ChartKind::Hydrograph), 1);
    for artifact in &report.artifacts {
        assert!(artifact.path.exists(), "{} missing", artifact.path.display());
    }
    assert!(dir.path().join("SS_Seasonal_Boxplot.png").exists());
    assert!(dir.path().join("Annual_Boxplot.png").exists());
}
