//! Chart Plotter Module
//! Creates interactive visualizations using egui_plot.

use crate::charts::chart_data::{BarData, ChartData, HistogramData};
use egui::{Color32, RichText};
use egui_plot::{Bar, BarChart, Plot};

pub const HISTOGRAM_COLOR: Color32 = Color32::from_rgb(52, 152, 219); // Blue
pub const BAR_COLOR: Color32 = Color32::from_rgb(46, 204, 113); // Green

/// Draws dashboard charts with egui_plot.
pub struct ChartPlotter;

impl ChartPlotter {
    /// Draw any chart, or a hint when it has nothing to show.
    pub fn draw_chart(ui: &mut egui::Ui, chart: &ChartData, height: f32) {
        if chart.is_empty() {
            ui.label(RichText::new("No values to plot").color(Color32::GRAY));
            return;
        }
        match chart {
            ChartData::Histogram(h) => Self::draw_histogram(ui, h, height),
            ChartData::Bar(b) => Self::draw_bar_chart(ui, b, height),
        }
    }

    /// Histogram: X-axis column values, Y-axis row counts
    pub fn draw_histogram(ui: &mut egui::Ui, data: &HistogramData, height: f32) {
        let bars: Vec<Bar> = data
            .bins
            .iter()
            .map(|bin| {
                Bar::new((bin.start + bin.end) / 2.0, bin.count as f64)
                    .width(bin.end - bin.start)
                    .name(format!("{:.3} – {:.3}", bin.start, bin.end))
            })
            .collect();

        Plot::new(format!("histogram_{}", data.column))
            .height(height)
            .allow_scroll(false)
            .x_axis_label(data.column.clone())
            .y_axis_label("Count")
            .show(ui, |plot_ui| {
                plot_ui.bar_chart(
                    BarChart::new(bars)
                        .color(HISTOGRAM_COLOR)
                        .name(&data.column),
                );
            });
    }

    /// Bar chart of value counts: one bar per category, most frequent first
    pub fn draw_bar_chart(ui: &mut egui::Ui, data: &BarData, height: f32) {
        let labels: Vec<String> = data.categories.iter().map(|c| c.value.clone()).collect();
        let bars: Vec<Bar> = data
            .categories
            .iter()
            .enumerate()
            .map(|(i, c)| {
                Bar::new(i as f64, c.count as f64)
                    .width(0.7)
                    .name(&c.value)
            })
            .collect();

        Plot::new(format!("bar_{}", data.column))
            .height(height)
            .allow_scroll(false)
            .x_axis_label(data.column.clone())
            .y_axis_label("Count")
            .x_axis_formatter(move |mark, _range| {
                let v = mark.value;
                if v < 0.0 || v.fract() != 0.0 {
                    return String::new();
                }
                labels.get(v as usize).cloned().unwrap_or_default()
            })
            .show(ui, |plot_ui| {
                plot_ui.bar_chart(BarChart::new(bars).color(BAR_COLOR).name(&data.column));
            });

        if data.hidden > 0 {
            ui.label(
                RichText::new(format!("{} less frequent values not shown", data.hidden))
                    .size(11.0)
                    .color(Color32::GRAY),
            );
        }
    }
}
