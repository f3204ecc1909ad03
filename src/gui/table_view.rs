//! Table View Widget
//! Grids for the data previews, summary statistics, value counts and the
//! aggregation result.

use crate::config::DashboardConfig;
use crate::data::column_text;
use crate::session::Session;
use crate::stats::{ColumnSummary, ValueCount};
use egui::{Color32, RichText, ScrollArea};
use polars::prelude::DataFrame;

const MISSING_CELL: &str = "NaN";

/// Cached table snapshots for display. Rebuilt whenever the session changes,
/// never per frame.
#[derive(Default)]
pub struct DataView {
    file_name: String,
    loaded_shape: (usize, usize),
    loaded_preview: Option<DataFrame>,
    cleaned_preview: Option<DataFrame>,
    summary: Vec<ColumnSummary>,
    value_counts: Vec<(String, Vec<ValueCount>)>,
    aggregation: Option<DataFrame>,
}

impl DataView {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn refresh(&mut self, session: &Session, config: &DashboardConfig) {
        let rows = config.preview_rows;
        self.file_name = session.file_name();
        self.loaded_shape = session.loaded().shape();
        self.loaded_preview = Some(session.loaded().head(Some(rows)));
        self.cleaned_preview = Some(session.preview(rows));
        self.summary = session.summary_statistics().unwrap_or_else(|e| {
            log::warn!("Summary statistics failed: {}", e);
            Vec::new()
        });
        self.value_counts = session
            .value_counts()
            .into_iter()
            .map(|(col, mut counts)| {
                counts.truncate(config.value_counts_limit);
                (col, counts)
            })
            .collect();
        self.aggregation = session.last_aggregation().cloned();
    }

    pub fn show_uploaded(&self, ui: &mut egui::Ui) {
        let Some(df) = &self.loaded_preview else {
            return;
        };
        ui.label(RichText::new(format!("🗂 Uploaded Data: {}", self.file_name)).size(18.0).strong());
        ui.label(
            RichText::new(format!(
                "{} rows × {} columns",
                self.loaded_shape.0, self.loaded_shape.1
            ))
            .size(11.0)
            .color(Color32::GRAY),
        );
        draw_frame(ui, "loaded_preview", df);
    }

    pub fn show_cleaned(&self, ui: &mut egui::Ui) {
        let Some(df) = &self.cleaned_preview else {
            return;
        };
        ui.label(RichText::new("🧹 Cleaned Data Preview").size(18.0).strong());
        draw_frame(ui, "cleaned_preview", df);
    }

    pub fn show_statistics(&self, ui: &mut egui::Ui) {
        ui.label(RichText::new("📋 Summary Statistics").size(18.0).strong());
        if self.summary.is_empty() {
            ui.label(RichText::new("No numeric columns").color(Color32::GRAY));
        } else {
            draw_summary(ui, &self.summary);
        }

        ui.add_space(10.0);
        ui.label(RichText::new("Categorical Columns Value Counts").size(15.0).strong());
        if self.value_counts.is_empty() {
            ui.label(RichText::new("No categorical columns").color(Color32::GRAY));
        }
        for (column, counts) in &self.value_counts {
            egui::CollapsingHeader::new(format!("Value counts for {}", column))
                .id_salt(("value_counts", column))
                .default_open(false)
                .show(ui, |ui| draw_value_counts(ui, column, counts));
        }
    }

    pub fn show_aggregation(&self, ui: &mut egui::Ui) {
        if let Some(df) = &self.aggregation {
            ui.label(RichText::new("∑ Aggregated Data").size(18.0).strong());
            draw_frame(ui, "aggregation", df);
        }
    }
}

/// Draw a data frame as a striped grid. Missing cells show as `NaN`.
pub fn draw_frame(ui: &mut egui::Ui, id: &str, df: &DataFrame) {
    let cells: Vec<Vec<Option<String>>> = df.get_columns().iter().map(column_text).collect();

    ScrollArea::horizontal().id_salt(id).show(ui, |ui| {
        egui::Grid::new(id)
            .striped(true)
            .min_col_width(60.0)
            .show(ui, |ui| {
                for col in df.get_columns() {
                    ui.label(RichText::new(col.name().as_str()).strong());
                }
                ui.end_row();

                for row in 0..df.height() {
                    for col in &cells {
                        match col.get(row).and_then(|c| c.as_deref()) {
                            Some(text) => ui.label(text),
                            None => ui.label(RichText::new(MISSING_CELL).color(Color32::GRAY)),
                        };
                    }
                    ui.end_row();
                }
            });
    });
}

fn format_stat(v: f64) -> String {
    if v.is_nan() {
        MISSING_CELL.to_string()
    } else {
        format!("{:.4}", v)
    }
}

fn draw_summary(ui: &mut egui::Ui, summary: &[ColumnSummary]) {
    ScrollArea::horizontal().id_salt("summary_stats").show(ui, |ui| {
        egui::Grid::new("summary_stats")
            .striped(true)
            .min_col_width(70.0)
            .show(ui, |ui| {
                for header in ["", "count", "mean", "std", "min", "25%", "50%", "75%", "max"] {
                    ui.label(RichText::new(header).strong());
                }
                ui.end_row();

                for s in summary {
                    ui.label(RichText::new(&s.column).strong());
                    ui.label(s.count.to_string());
                    for v in [s.mean, s.std, s.min, s.p25, s.median, s.p75, s.max] {
                        ui.label(format_stat(v));
                    }
                    ui.end_row();
                }
            });
    });
}

fn draw_value_counts(ui: &mut egui::Ui, column: &str, counts: &[ValueCount]) {
    egui::Grid::new(("value_counts_grid", column))
        .striped(true)
        .show(ui, |ui| {
            ui.label(RichText::new(column).strong());
            ui.label(RichText::new("count").strong());
            ui.end_row();
            for vc in counts {
                ui.label(&vc.value);
                ui.label(vc.count.to_string());
                ui.end_row();
            }
        });
}
