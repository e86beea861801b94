//! Flow-duration curve chart.
//!
//! Exceedance percentage on a linear 0-100 x axis with ticks at the flow
//! regime boundaries, streamflow on a log y axis.

use std::path::PathBuf;

use plotters::prelude::*;

use super::{
    KeyTickAxis, PlotError, Result, area_err, chart_err, draw_err, em, format_value,
    prepare_output_dir, rgb, stroke_px,
};
use crate::analysis::exceedance::{ExceedanceCurveBuilder, FlowRegime};
use crate::config::PlotConfig;
use crate::logging::{self, Component};
use crate::model::ExceedancePoint;
use crate::report::{Artifact, ChartKind, FlowDurationSummary};

pub const FDC_FILE: &str = "FDC.png";

/// Builds the exceedance curve for `sample` and renders it to `FDC.png`.
///
/// `title` may be empty; otherwise the chart is captioned `"<title> FDC"`.
pub fn plot_fdc(sample: &[f64], title: &str, config: &PlotConfig) -> Result<Artifact> {
    let points = ExceedanceCurveBuilder::new().build(sample)?;
    render_fdc(&points, title, config)
}

/// Renders an already built curve.
///
/// Non-positive and non-finite values cannot sit on a log axis; they are
/// dropped with a warning, and the call fails only if nothing plottable
/// remains.
pub fn render_fdc(points: &[ExceedancePoint], title: &str, config: &PlotConfig) -> Result<Artifact> {
    config.validate()?;

    let plottable: Vec<(f64, f64)> = points
        .iter()
        .filter(|p| p.value > 0.0 && p.value.is_finite())
        .map(|p| (p.percent(), p.value))
        .collect();

    let dropped = points.len() - plottable.len();
    if dropped > 0 {
        logging::warn(
            Component::Fdc,
            Some(title).filter(|t| !t.is_empty()),
            &format!(
                "{} non-positive or non-finite value(s) omitted from log axis",
                dropped
            ),
        );
    }
    if plottable.is_empty() {
        return Err(PlotError::InvalidData(
            "no positive values to draw on a log axis".to_string(),
        ));
    }

    let y_min = plottable.iter().map(|(_, v)| *v).fold(f64::INFINITY, f64::min) * 0.9;
    let y_max = plottable.iter().map(|(_, v)| *v).fold(f64::NEG_INFINITY, f64::max) * 1.1;

    prepare_output_dir(config)?;
    let path: PathBuf = config.output_path(FDC_FILE);
    let font = config.font_family.as_str();
    let font_px = config.base_font_px();

    // The backend borrows `path` until it is dropped.
    {
        let root = BitMapBackend::new(&path, config.pixels(config.fdc.width_in, config.fdc.height_in))
            .into_drawing_area();
        root.fill(&WHITE).map_err(area_err)?;

        let mut x_ticks = vec![0.0];
        x_ticks.extend(FlowRegime::boundaries());
        x_ticks.push(100.0);

        let mut builder = ChartBuilder::on(&root);
        builder
            .margin(em(config, 0.8))
            .x_label_area_size(em(config, 3.0))
            .y_label_area_size(em(config, 5.0));
        if !title.is_empty() {
            builder.caption(format!("{} FDC", title), (font, font_px * 1.2));
        }
        let mut chart = builder
            .build_cartesian_2d(
                KeyTickAxis::new(0f64..100f64, x_ticks),
                (y_min..y_max).log_scale(),
            )
            .map_err(chart_err)?;

        chart
            .configure_mesh()
            .x_desc("Flow Exceedance(%)")
            .y_desc(format!("Streamflow ({})", config.fdc.unit))
            .label_style((font, font_px))
            .axis_desc_style((font, font_px))
            .x_label_formatter(&|x| format!("{:.0}", x))
            .y_label_formatter(&|y| format_value(*y))
            .draw()
            .map_err(draw_err)?;

        if config.fdc.show_regimes {
            let separator = RGBColor(160, 160, 160).stroke_width(stroke_px(config, 0.5));
            chart
                .draw_series(FlowRegime::boundaries().into_iter().map(|b| {
                    PathElement::new(vec![(b, y_min), (b, y_max)], separator)
                }))
                .map_err(draw_err)?;
        }

        chart
            .draw_series(LineSeries::new(
                plottable.iter().copied(),
                rgb(config.fdc.line_color).stroke_width(stroke_px(config, 1.5)),
            ))
            .map_err(draw_err)?;

        root.present().map_err(draw_err)?;
    }

    let summary = FlowDurationSummary::from_curve(points);
    if let Some(s) = &summary {
        logging::debug(
            Component::Fdc,
            Some(title).filter(|t| !t.is_empty()),
            &format!("Q10={:.2} Q50={:.2} Q90={:.2}", s.q10, s.q50, s.q90),
        );
    }
    logging::log_artifact_written(Component::Fdc, &path);

    Ok(Artifact {
        kind: ChartKind::FlowDuration,
        path,
        subject: Some(title.to_string()).filter(|t| !t.is_empty()),
        observations: plottable.len(),
        flow_duration: summary,
    })
}
