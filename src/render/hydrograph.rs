//! Combined precipitation and streamflow hydrograph.
//!
//! Two stacked panels share the date axis with a 1:2 height ratio.
//! Precipitation hangs from the top of the upper panel as daily bars
//! (inverted axis); streamflow is a line in the lower panel.

use std::path::PathBuf;

use chrono::{Days, NaiveDate};
use plotters::prelude::*;

use super::{
    PlotError, Result, area_err, chart_err, draw_err, em, format_value, padded_range,
    prepare_output_dir, rgb, stroke_px,
};
use crate::config::PlotConfig;
use crate::logging::{self, Component};
use crate::model::TimeTable;
use crate::report::{Artifact, ChartKind};

pub const HYDROGRAPH_FILE: &str = "Hydrograph.png";

/// First and last date covered by either series, widened to at least one day.
fn date_span(a: &[(NaiveDate, f64)], b: &[(NaiveDate, f64)]) -> Option<(NaiveDate, NaiveDate)> {
    let dates = a.iter().chain(b).map(|(d, _)| *d);
    let start = dates.clone().min()?;
    let end = dates.max()?;
    if start == end {
        return Some((start, start.checked_add_days(Days::new(1))?));
    }
    Some((start, end))
}

/// Renders `Hydrograph.png` from the streamflow and precipitation columns
/// named in `config.hydrograph`.
///
/// `title` may be empty; otherwise the figure is captioned
/// `"<title> Hydrograph"`.
pub fn plot_hydrograph(table: &TimeTable, title: &str, config: &PlotConfig) -> Result<Artifact> {
    config.validate()?;
    let settings = &config.hydrograph;

    let precip = table.series(&settings.precip_column)?;
    let flow = table.series(&settings.streamflow_column)?;
    if flow.is_empty() {
        return Err(PlotError::InvalidData(format!(
            "column '{}' has no observations",
            settings.streamflow_column
        )));
    }

    let (start, end) = date_span(&flow, &precip)
        .ok_or_else(|| PlotError::InvalidData("no dates to draw".to_string()))?;
    let precip_max = precip
        .iter()
        .map(|(_, p)| *p)
        .fold(0.0f64, f64::max)
        .max(f64::EPSILON)
        * 1.05;
    let (flow_min, flow_max) = padded_range(flow.iter().map(|(_, q)| *q), 0.05)
        .ok_or_else(|| PlotError::InvalidData("no finite streamflow values".to_string()))?;

    prepare_output_dir(config)?;
    let path: PathBuf = config.output_path(HYDROGRAPH_FILE);
    let font = config.font_family.as_str();
    let font_px = config.base_font_px();
    let (width, height) = config.pixels(settings.width_in, settings.height_in);

    // The backend borrows `path` until it is dropped.
    {
        let root = BitMapBackend::new(&path, (width, height)).into_drawing_area();
        root.fill(&WHITE).map_err(area_err)?;
        let root = if title.is_empty() {
            root
        } else {
            root.titled(&format!("{} Hydrograph", title), (font, font_px * 1.2))
                .map_err(area_err)?
        };

        let panel_split = (root.dim_in_pixel().1 / 3) as i32;
        let (upper, lower) = root.split_vertically(panel_split);
        let y_area = em(config, 5.0);

        // Precipitation, drawn downward from the top edge.
        let mut precip_chart = ChartBuilder::on(&upper)
            .margin(em(config, 0.8))
            .x_label_area_size(em(config, 0.5))
            .y_label_area_size(y_area)
            .build_cartesian_2d(start..end, 0f64..precip_max)
            .map_err(chart_err)?;

        let no_label = |_: &NaiveDate| String::new();
        let inverted = |y: &f64| format_value(precip_max - *y);
        precip_chart
            .configure_mesh()
            .y_desc(format!("precipitation ({})", settings.precip_unit))
            .label_style((font, font_px))
            .axis_desc_style((font, font_px))
            .x_label_formatter(&no_label)
            .y_label_formatter(&inverted)
            .draw()
            .map_err(draw_err)?;

        let bar_style = rgb(settings.precip_color).filled();
        precip_chart
            .draw_series(precip.iter().filter(|(_, p)| *p > 0.0).map(|(d, p)| {
                let next = d.succ_opt().unwrap_or(*d);
                Rectangle::new([(*d, precip_max - *p), (next, precip_max)], bar_style)
            }))
            .map_err(draw_err)?;

        // Streamflow.
        let mut flow_chart = ChartBuilder::on(&lower)
            .margin(em(config, 0.8))
            .x_label_area_size(em(config, 3.0))
            .y_label_area_size(y_area)
            .build_cartesian_2d(start..end, flow_min..flow_max)
            .map_err(chart_err)?;

        let date_label = |d: &NaiveDate| d.format("%Y-%m").to_string();
        let value_label = |q: &f64| format_value(*q);
        flow_chart
            .configure_mesh()
            .x_desc("Date")
            .y_desc(format!("Streamflow ({})", settings.unit))
            .label_style((font, font_px))
            .axis_desc_style((font, font_px))
            .x_label_formatter(&date_label)
            .y_label_formatter(&value_label)
            .draw()
            .map_err(draw_err)?;

        flow_chart
            .draw_series(LineSeries::new(
                flow.iter().copied(),
                rgb(settings.streamflow_color).stroke_width(stroke_px(config, 1.0)),
            ))
            .map_err(draw_err)?;

        root.present().map_err(draw_err)?;
    }

    logging::log_artifact_written(Component::Hydrograph, &path);

    Ok(Artifact {
        kind: ChartKind::Hydrograph,
        path,
        subject: Some(title.to_string()).filter(|t| !t.is_empty()),
        observations: flow.len() + precip.len(),
        flow_duration: None,
    })
}
