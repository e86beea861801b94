//! Grouped water quality boxplots.
//!
//! Boxes sit at positions 1..=k on the x axis, one per group, labelled with
//! the group name.

use std::path::PathBuf;

use plotters::prelude::*;

use super::{
    KeyTickAxis, PlotError, Result, area_err, chart_err, draw_err, em, format_value, padded_range,
    prepare_output_dir, rgb, stroke_px,
};
use crate::analysis::boxstats::BoxStats;
use crate::analysis::groupings::{Group, GroupingStrategy, group_annual, group_column};
use crate::config::PlotConfig;
use crate::logging::{self, Component};
use crate::model::TimeTable;
use crate::report::{Artifact, ChartKind};

/// Half the width of a box, in x-axis units.
const BOX_HALF_WIDTH: f64 = 0.25;

/// Renders one boxplot per parameter of `table` (or a single chart for
/// `GroupingStrategy::Annual`) and returns the written artifacts in column
/// order.
///
/// The first failing chart aborts the batch.
pub fn plot_boxplots(
    table: &TimeTable,
    strategy: GroupingStrategy,
    config: &PlotConfig,
) -> Result<Vec<Artifact>> {
    if strategy.is_experimental() {
        logging::warn(
            Component::Boxplot,
            None,
            "Annual option is not recommended at this point. It will be updated in a future release.",
        );
        let groups = group_annual(table)?;
        let artifact = render_boxplot(
            &groups,
            &strategy.file_name(""),
            Some("Year, WQ"),
            None,
            config,
        )?;
        logging::log_render_summary(Component::Boxplot, 1, 1, 0);
        return Ok(vec![artifact]);
    }

    let names = table.column_names();
    let mut artifacts = Vec::with_capacity(names.len());
    for &name in &names {
        let rendered = group_column(table, name, strategy)
            .map_err(PlotError::from)
            .and_then(|groups| {
                render_boxplot(&groups, &strategy.file_name(name), None, Some(name), config)
            });
        match rendered {
            Ok(artifact) => artifacts.push(artifact),
            Err(e) => {
                logging::log_render_failure(Component::Boxplot, name, &e);
                logging::log_render_summary(
                    Component::Boxplot,
                    names.len(),
                    artifacts.len(),
                    1,
                );
                return Err(e);
            }
        }
    }

    logging::log_render_summary(Component::Boxplot, names.len(), artifacts.len(), 0);
    Ok(artifacts)
}

/// Draws `groups` as side-by-side boxes into `file_name` under the output
/// directory.
pub fn render_boxplot(
    groups: &[Group],
    file_name: &str,
    x_desc: Option<&str>,
    subject: Option<&str>,
    config: &PlotConfig,
) -> Result<Artifact> {
    config.validate()?;
    if groups.is_empty() {
        return Err(PlotError::InvalidData(format!(
            "{}: no groups with observations",
            file_name
        )));
    }

    let stats = groups
        .iter()
        .map(|g| BoxStats::from_values(&g.values))
        .collect::<core::result::Result<Vec<_>, _>>()?;
    let labels: Vec<&str> = groups.iter().map(|g| g.label.as_str()).collect();

    let (y_min, y_max) = padded_range(
        stats.iter().flat_map(|s| {
            let (lo, hi) = s.extent();
            [lo, hi]
        }),
        0.05,
    )
    .ok_or_else(|| PlotError::InvalidData("no finite values to draw".to_string()))?;

    prepare_output_dir(config)?;
    let path: PathBuf = config.output_path(file_name);
    let font = config.font_family.as_str();
    let font_px = config.base_font_px();

    // The backend borrows `path` until it is dropped.
    {
        let root = BitMapBackend::new(
            &path,
            config.pixels(config.boxplot.width_in, config.boxplot.height_in),
        )
        .into_drawing_area();
        root.fill(&WHITE).map_err(area_err)?;

        let positions: Vec<f64> = (1..=groups.len()).map(|i| i as f64).collect();
        let mut chart = ChartBuilder::on(&root)
            .margin(em(config, 0.8))
            .x_label_area_size(em(config, if x_desc.is_some() { 3.0 } else { 2.0 }))
            .y_label_area_size(em(config, 5.0))
            .build_cartesian_2d(
                KeyTickAxis::new(0.5f64..groups.len() as f64 + 0.5, positions),
                y_min..y_max,
            )
            .map_err(chart_err)?;

        let label_at = |x: &f64| -> String {
            let index = x.round() as usize;
            if (x - x.round()).abs() < 1e-9 && index >= 1 && index <= labels.len() {
                labels[index - 1].to_string()
            } else {
                String::new()
            }
        };

        let value_at = |y: &f64| format_value(*y);

        let mut mesh = chart.configure_mesh();
        mesh.y_desc(format!("Concentration ({})", config.boxplot.unit))
            .label_style((font, font_px))
            .axis_desc_style((font, font_px))
            .x_label_formatter(&label_at)
            .y_label_formatter(&value_at)
            .disable_x_mesh();
        if let Some(desc) = x_desc {
            mesh.x_desc(desc);
        }
        mesh.draw().map_err(draw_err)?;

        let line = rgb(config.boxplot.box_color).stroke_width(stroke_px(config, 1.0));
        let median = rgb(config.boxplot.median_color).stroke_width(stroke_px(config, 1.5));
        let cap_half = BOX_HALF_WIDTH / 2.0;

        let boxes = stats.iter().enumerate().map(|(i, s)| {
            let x = (i + 1) as f64;
            Rectangle::new([(x - BOX_HALF_WIDTH, s.q3), (x + BOX_HALF_WIDTH, s.q1)], line)
        });
        chart.draw_series(boxes).map_err(draw_err)?;

        let mut segments: Vec<PathElement<(f64, f64)>> = Vec::new();
        for (i, s) in stats.iter().enumerate() {
            let x = (i + 1) as f64;
            segments.push(PathElement::new(vec![(x, s.q3), (x, s.whisker_high)], line));
            segments.push(PathElement::new(vec![(x, s.q1), (x, s.whisker_low)], line));
            segments.push(PathElement::new(
                vec![(x - cap_half, s.whisker_high), (x + cap_half, s.whisker_high)],
                line,
            ));
            segments.push(PathElement::new(
                vec![(x - cap_half, s.whisker_low), (x + cap_half, s.whisker_low)],
                line,
            ));
        }
        chart.draw_series(segments).map_err(draw_err)?;

        chart
            .draw_series(stats.iter().enumerate().map(|(i, s)| {
                let x = (i + 1) as f64;
                PathElement::new(
                    vec![(x - BOX_HALF_WIDTH, s.median), (x + BOX_HALF_WIDTH, s.median)],
                    median,
                )
            }))
            .map_err(draw_err)?;

        let outlier_radius = em(config, 0.25).max(1);
        chart
            .draw_series(stats.iter().enumerate().flat_map(|(i, s)| {
                let x = (i + 1) as f64;
                s.outliers
                    .iter()
                    .map(move |v| Circle::new((x, *v), outlier_radius, line))
            }))
            .map_err(draw_err)?;

        root.present().map_err(draw_err)?;
    }

    logging::log_artifact_written(Component::Boxplot, &path);

    Ok(Artifact {
        kind: ChartKind::Boxplot,
        path,
        subject: subject.map(String::from),
        observations: stats.iter().map(|s| s.count).sum(),
        flow_duration: None,
    })
}
