//! `hydroplot` command line.
//!
//! Resolves the plot configuration (flags, then `.env`/environment, then the
//! TOML file), runs one chart command and optionally writes the JSON report.

use std::env;
use std::path::PathBuf;

use anyhow::Context as _;
use chrono::NaiveDate;
use clap::{Args, Parser, Subcommand};

use hydroplot::analysis::GroupingStrategy;
use hydroplot::config::{self, HydrographConfig, PlotConfig};
use hydroplot::ingest;
use hydroplot::logging::{self, Component, LogLevel};
use hydroplot::render;
use hydroplot::report::RenderReport;
use hydroplot::synthetic::{DEFAULT_SEED, DemoData};

const DEMO_STATION: &str = "Station A";

#[derive(Debug, Clone, Parser)]
#[command(author, version, about, long_about = None)]
pub struct CommandArgs {
    #[clap(flatten)]
    global: GlobalArg,
    /// Chart to draw
    #[command(subcommand)]
    mode: Mode,
}

#[derive(Debug, Clone, Args)]
struct GlobalArg {
    /// Plot configuration (TOML). Defaults to $HYDROPLOT_CONFIG if set
    #[arg(long, global = true)]
    config: Option<PathBuf>,
    /// Directory for PNG output. Defaults to $HYDROPLOT_OUTPUT_DIR, then the config
    #[arg(long, global = true)]
    output_dir: Option<PathBuf>,
    /// Write a JSON manifest of the charts produced
    #[arg(long, global = true)]
    report: Option<PathBuf>,
    /// Append log entries to this file
    #[arg(long, global = true)]
    log_file: Option<String>,
    /// Show debug output
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Debug, Clone, Subcommand)]
enum Mode {
    /// Flow-duration curve from a streamflow sample
    Fdc(#[clap(flatten)] FdcArg),
    /// Water quality boxplots, one chart per parameter
    Boxplot(#[clap(flatten)] BoxplotArg),
    /// Precipitation and streamflow hydrograph
    Hydrograph(#[clap(flatten)] HydrographArg),
    /// Render every chart from seeded synthetic data
    Demo(#[clap(flatten)] DemoArg),
}

#[derive(Debug, Clone, Args)]
struct FdcArg {
    /// Plain sample (one value per line), or a dated CSV table with --column
    input: PathBuf,
    /// Column to read when the input is a CSV table
    #[arg(long)]
    column: Option<String>,
    /// Station name used in the chart caption
    #[arg(long, default_value = "")]
    title: String,
}

#[derive(Debug, Clone, Args)]
struct BoxplotArg {
    /// Dated CSV table, one column per parameter
    input: PathBuf,
    /// all, monthly, seasonal or annual
    #[arg(long, default_value_t = GroupingStrategy::All)]
    grouping: GroupingStrategy,
}

#[derive(Debug, Clone, Args)]
struct HydrographArg {
    /// Dated CSV table with streamflow and precipitation columns
    input: PathBuf,
    /// Station name used in the chart caption
    #[arg(long, default_value = "")]
    title: String,
}

#[derive(Debug, Clone, Args)]
struct DemoArg {
    /// Random seed for the synthetic series
    #[arg(long, default_value_t = DEFAULT_SEED)]
    seed: u64,
}

pub fn run() -> anyhow::Result<()> {
    dotenv::dotenv().ok();
    let args = CommandArgs::parse();

    let level = if args.global.verbose {
        LogLevel::Debug
    } else {
        LogLevel::Info
    };
    logging::init_logger(level, args.global.log_file.as_deref(), false);

    let config = resolve_config(&args.global)?;
    let mut report = RenderReport::new(config.dpi);

    match &args.mode {
        Mode::Fdc(arg) => {
            let sample = ingest::load_sample(&arg.input, arg.column.as_deref())?;
            report.push(render::plot_fdc(&sample, &arg.title, &config)?);
        }
        Mode::Boxplot(arg) => {
            let table = ingest::load_table(&arg.input)?;
            report.extend(render::plot_boxplots(&table, arg.grouping, &config)?);
        }
        Mode::Hydrograph(arg) => {
            let table = ingest::load_table(&arg.input)?;
            report.push(render::plot_hydrograph(&table, &arg.title, &config)?);
        }
        Mode::Demo(arg) => run_demo(arg, &config, &mut report)?,
    }

    logging::info(
        Component::System,
        None,
        &format!(
            "{} chart(s) written to {}",
            report.artifacts.len(),
            config.output_dir.display()
        ),
    );

    if let Some(path) = &args.global.report {
        report
            .write_json(path)
            .with_context(|| format!("failed to write report {}", path.display()))?;
        logging::log_artifact_written(Component::System, path);
    }
    Ok(())
}

/// Command line flags win over the environment, which wins over the file.
fn resolve_config(global: &GlobalArg) -> anyhow::Result<PlotConfig> {
    let config_path = global
        .config
        .clone()
        .or_else(|| env::var_os("HYDROPLOT_CONFIG").map(PathBuf::from));

    let mut config = match &config_path {
        Some(path) => {
            let config = config::load_config(path)
                .with_context(|| format!("failed to load config {}", path.display()))?;
            logging::info(
                Component::Config,
                None,
                &format!("Loaded plot configuration from {}", path.display()),
            );
            config
        }
        None => PlotConfig::default(),
    };

    if let Some(dir) = global
        .output_dir
        .clone()
        .or_else(|| env::var_os("HYDROPLOT_OUTPUT_DIR").map(PathBuf::from))
    {
        config.output_dir = dir;
    }
    config.validate()?;
    Ok(config)
}

fn run_demo(arg: &DemoArg, config: &PlotConfig, report: &mut RenderReport) -> anyhow::Result<()> {
    let mut data = DemoData::new(arg.seed);
    logging::info(
        Component::System,
        None,
        &format!("Generating demo data with seed {}", arg.seed),
    );

    let flow = data.streamflow()?;
    report.push(render::plot_fdc(&flow, DEMO_STATION, config)?);

    let start = NaiveDate::from_ymd_opt(2022, 1, 1).context("invalid demo start date")?;
    let end = NaiveDate::from_ymd_opt(2024, 12, 31).context("invalid demo end date")?;

    let water_quality = data.water_quality(start, end)?;
    for strategy in [
        GroupingStrategy::All,
        GroupingStrategy::Monthly,
        GroupingStrategy::Annual,
        GroupingStrategy::Seasonal,
    ] {
        report.extend(render::plot_boxplots(&water_quality, strategy, config)?);
    }

    // The synthetic table always uses the default column names.
    let hydro_config = PlotConfig {
        hydrograph: HydrographConfig {
            streamflow_column: "streamflow".to_string(),
            precip_column: "precip".to_string(),
            ..config.hydrograph.clone()
        },
        ..config.clone()
    };
    let streamflow_precip = data.streamflow_precip(start, end)?;
    report.push(render::plot_hydrograph(
        &streamflow_precip,
        DEMO_STATION,
        &hydro_config,
    )?);
    Ok(())
}
