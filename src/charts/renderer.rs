//! Static Chart Renderer
//! Writes the dashboard charts to PNG files with plotters.
//!
//! Layout:
//! 1. Caption: the chart title
//! 2. Mesh with axis descriptions
//! 3. Bars (histogram bins or category counts)

use crate::charts::chart_data::{BarData, ChartData, HistogramData};
use anyhow::{anyhow, Result};
use plotters::coord::Shift;
use plotters::prelude::*;
use std::path::Path;

const HIST_FILL: RGBColor = RGBColor(52, 152, 219);
const BAR_FILL: RGBColor = RGBColor(46, 204, 113);
const FONT: &str = "sans-serif";

fn draw_err<E: std::fmt::Debug>(e: E) -> anyhow::Error {
    anyhow!("Chart drawing failed: {:?}", e)
}

pub struct StaticChartRenderer;

impl StaticChartRenderer {
    /// Render a chart to a PNG file of the given pixel size.
    pub fn render_png(chart: &ChartData, path: &Path, size: (u32, u32)) -> Result<()> {
        if chart.is_empty() {
            return Err(anyhow!("{} has no values to draw", chart.title()));
        }

        let root = BitMapBackend::new(path, size).into_drawing_area();
        root.fill(&WHITE).map_err(draw_err)?;

        match chart {
            ChartData::Histogram(h) => Self::draw_histogram(&root, h, &chart.title())?,
            ChartData::Bar(b) => Self::draw_bar_chart(&root, b, &chart.title())?,
        }

        root.present().map_err(draw_err)?;
        log::info!("Exported '{}' to {}", chart.title(), path.display());
        Ok(())
    }

    fn draw_histogram(
        root: &DrawingArea<BitMapBackend<'_>, Shift>,
        data: &HistogramData,
        title: &str,
    ) -> Result<()> {
        let (x_min, x_max) = match (data.bins.first(), data.bins.last()) {
            (Some(first), Some(last)) => (first.start, last.end),
            _ => return Ok(()),
        };
        let y_max = data.bins.iter().map(|b| b.count).max().unwrap_or(0) as f64 * 1.1 + 1.0;

        let mut chart = ChartBuilder::on(root)
            .caption(title, (FONT, 28))
            .margin(20)
            .x_label_area_size(45)
            .y_label_area_size(60)
            .build_cartesian_2d(x_min..x_max, 0f64..y_max)
            .map_err(draw_err)?;

        chart
            .configure_mesh()
            .disable_x_mesh()
            .x_desc(data.column.as_str())
            .y_desc("Count")
            .draw()
            .map_err(draw_err)?;

        chart
            .draw_series(data.bins.iter().map(|bin| {
                Rectangle::new(
                    [(bin.start, 0.0), (bin.end, bin.count as f64)],
                    HIST_FILL.mix(0.8).filled(),
                )
            }))
            .map_err(draw_err)?;

        Ok(())
    }

    fn draw_bar_chart(
        root: &DrawingArea<BitMapBackend<'_>, Shift>,
        data: &BarData,
        title: &str,
    ) -> Result<()> {
        let n = data.categories.len() as u32;
        let y_max = data.categories.iter().map(|c| c.count).max().unwrap_or(0) as u32;
        let y_max = y_max + y_max / 10 + 1;
        let labels: Vec<String> = data.categories.iter().map(|c| c.value.clone()).collect();

        let mut chart = ChartBuilder::on(root)
            .caption(title, (FONT, 28))
            .margin(20)
            .x_label_area_size(60)
            .y_label_area_size(60)
            .build_cartesian_2d((0u32..n).into_segmented(), 0u32..y_max)
            .map_err(draw_err)?;

        let label_of = |v: &SegmentValue<u32>| match v {
            SegmentValue::Exact(i) | SegmentValue::CenterOf(i) => {
                labels.get(*i as usize).cloned().unwrap_or_default()
            }
            SegmentValue::Last => String::new(),
        };

        chart
            .configure_mesh()
            .disable_x_mesh()
            .x_labels(labels.len())
            .x_label_formatter(&label_of)
            .x_desc(data.column.as_str())
            .y_desc("Count")
            .draw()
            .map_err(draw_err)?;

        chart
            .draw_series(
                Histogram::vertical(&chart)
                    .style(BAR_FILL.filled())
                    .margin(8)
                    .data(
                        data.categories
                            .iter()
                            .enumerate()
                            .map(|(i, c)| (i as u32, c.count as u32)),
                    ),
            )
            .map_err(draw_err)?;

        Ok(())
    }
}
