//! Chart Viewer Widget
//! Histogram and bar chart cards for the current table, each with its own
//! column selector and PNG export.

use crate::charts::{ChartData, ChartPlotter};
use crate::config::DashboardConfig;
use crate::session::Session;
use egui::{Color32, ComboBox, RichText};

const CARD_HEIGHT: f32 = 320.0;
const CHART_SPACING: f32 = 15.0;

/// Which card a request refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChartSlot {
    Histogram,
    Bar,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChartViewerAction {
    None,
    /// A column selector changed; chart data must be rebuilt.
    SelectionChanged,
    ExportPng(ChartSlot),
}

#[derive(Default)]
pub struct ChartViewer {
    numeric_columns: Vec<String>,
    categorical_columns: Vec<String>,
    pub histogram_col: String,
    pub bar_col: String,
    histogram: Option<ChartData>,
    bar: Option<ChartData>,
}

impl ChartViewer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Rebuild both charts from the session's current table. Selected
    /// columns that disappeared fall back to the first available one.
    pub fn refresh(&mut self, session: &Session, config: &DashboardConfig) {
        let df = session.table();
        self.numeric_columns = crate::data::columns_of_kind(df, crate::data::ColumnKind::Numeric);
        self.categorical_columns =
            crate::data::columns_of_kind(df, crate::data::ColumnKind::Categorical);

        if !self.numeric_columns.contains(&self.histogram_col) {
            self.histogram_col = self.numeric_columns.first().cloned().unwrap_or_default();
        }
        if !self.categorical_columns.contains(&self.bar_col) {
            self.bar_col = self.categorical_columns.first().cloned().unwrap_or_default();
        }

        self.histogram = if self.histogram_col.is_empty() {
            None
        } else {
            session
                .histogram(&self.histogram_col, config.histogram_bins)
                .inspect_err(|e| log::warn!("Histogram failed: {}", e))
                .ok()
        };
        self.bar = if self.bar_col.is_empty() {
            None
        } else {
            session
                .bar_chart(&self.bar_col, config.value_counts_limit)
                .inspect_err(|e| log::warn!("Bar chart failed: {}", e))
                .ok()
        };
    }

    pub fn chart(&self, slot: ChartSlot) -> Option<&ChartData> {
        match slot {
            ChartSlot::Histogram => self.histogram.as_ref(),
            ChartSlot::Bar => self.bar.as_ref(),
        }
    }

    pub fn show(&mut self, ui: &mut egui::Ui) -> ChartViewerAction {
        let mut action = ChartViewerAction::None;

        ui.label(RichText::new("📈 Visualizations").size(18.0).strong());
        ui.add_space(8.0);

        if self.numeric_columns.is_empty() {
            ui.label(RichText::new("No numeric columns for a histogram.").color(Color32::GRAY));
        } else {
            Self::card(
                ui,
                "histogram_col",
                "Numeric column:",
                &self.numeric_columns,
                &mut self.histogram_col,
                self.histogram.as_ref(),
                ChartSlot::Histogram,
                &mut action,
            );
        }

        ui.add_space(CHART_SPACING);

        if self.categorical_columns.is_empty() {
            ui.label(
                RichText::new("No categorical columns for a bar chart.").color(Color32::GRAY),
            );
        } else {
            Self::card(
                ui,
                "bar_col",
                "Categorical column:",
                &self.categorical_columns,
                &mut self.bar_col,
                self.bar.as_ref(),
                ChartSlot::Bar,
                &mut action,
            );
        }

        action
    }

    #[allow(clippy::too_many_arguments)]
    fn card(
        ui: &mut egui::Ui,
        id: &str,
        prompt: &str,
        columns: &[String],
        selected: &mut String,
        chart: Option<&ChartData>,
        slot: ChartSlot,
        action: &mut ChartViewerAction,
    ) {
        egui::Frame::none()
            .rounding(8.0)
            .stroke(egui::Stroke::new(1.0, Color32::from_gray(90)))
            .fill(ui.visuals().widgets.noninteractive.bg_fill)
            .inner_margin(12.0)
            .show(ui, |ui| {
                ui.horizontal(|ui| {
                    ui.label(prompt);
                    let before = selected.clone();
                    ComboBox::from_id_salt(id)
                        .width(180.0)
                        .selected_text(selected.as_str())
                        .show_ui(ui, |ui| {
                            for col in columns {
                                ui.selectable_value(selected, col.clone(), col);
                            }
                        });
                    if *selected != before {
                        *action = ChartViewerAction::SelectionChanged;
                    }

                    ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                        let can_export = chart.is_some_and(|c| !c.is_empty());
                        if ui
                            .add_enabled(can_export, egui::Button::new("💾 Save PNG"))
                            .clicked()
                        {
                            *action = ChartViewerAction::ExportPng(slot);
                        }
                    });
                });

                ui.add_space(6.0);
                match chart {
                    Some(chart) => {
                        ui.label(RichText::new(chart.title()).size(15.0).strong());
                        ChartPlotter::draw_chart(ui, chart, CARD_HEIGHT);
                    }
                    None => {
                        ui.label(RichText::new("Chart unavailable").color(Color32::GRAY));
                    }
                }
            });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use polars::prelude::*;

    #[test]
    fn refresh_picks_first_columns() {
        let df = df!(
            "city" => ["a", "b", "a"],
            "temp" => [1.0, 2.0, 3.0]
        )
        .unwrap();
        let session = Session::from_frame("t.csv", df);
        let mut viewer = ChartViewer::new();
        viewer.refresh(&session, &DashboardConfig::default());

        assert_eq!(viewer.histogram_col, "temp");
        assert_eq!(viewer.bar_col, "city");
        assert_eq!(
            viewer.chart(ChartSlot::Histogram).map(|c| c.title()),
            Some("Histogram of temp".to_string())
        );
        assert_eq!(
            viewer.chart(ChartSlot::Bar).map(|c| c.title()),
            Some("Bar Chart of city".to_string())
        );
    }

    #[test]
    fn no_categorical_column_means_no_bar_chart() {
        let df = df!("x" => [1i64, 2, 3]).unwrap();
        let session = Session::from_frame("t.csv", df);
        let mut viewer = ChartViewer::new();
        viewer.refresh(&session, &DashboardConfig::default());
        assert!(viewer.chart(ChartSlot::Bar).is_none());
        assert!(viewer.chart(ChartSlot::Histogram).is_some());
    }
}
