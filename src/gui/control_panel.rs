//! Control Panel Widget
//! Left side panel with the upload, cleaning and aggregation controls.

use crate::data::{
    AggFunction, AggregationRequest, BulkStrategy, CategoricalStrategy, ColumnKind, ColumnScope,
    NumericStrategy,
};
use egui::{Color32, ComboBox, RichText, ScrollArea};
use polars::prelude::DataFrame;
use std::path::PathBuf;

/// Numeric cleaning choices as shown in the selector. The weight column for
/// the weighted average is picked separately.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum NumericMethod {
    #[default]
    DropRows,
    FillMean,
    FillMedian,
    FillWeightedAverage,
    Interpolate,
    LeaveAsIs,
}

impl NumericMethod {
    pub const ALL: [NumericMethod; 6] = [
        NumericMethod::DropRows,
        NumericMethod::FillMean,
        NumericMethod::FillMedian,
        NumericMethod::FillWeightedAverage,
        NumericMethod::Interpolate,
        NumericMethod::LeaveAsIs,
    ];

    pub fn to_strategy(self, weight_column: &str) -> NumericStrategy {
        match self {
            NumericMethod::DropRows => NumericStrategy::DropRows,
            NumericMethod::FillMean => NumericStrategy::FillMean,
            NumericMethod::FillMedian => NumericStrategy::FillMedian,
            NumericMethod::FillWeightedAverage => NumericStrategy::FillWeightedAverage {
                weight_column: weight_column.to_string(),
            },
            NumericMethod::Interpolate => NumericStrategy::Interpolate,
            NumericMethod::LeaveAsIs => NumericStrategy::LeaveAsIs,
        }
    }

    pub fn label(self) -> &'static str {
        self.to_strategy("").label()
    }
}

/// Column names of the current table, grouped the way the controls need them.
#[derive(Default, Clone)]
pub struct ColumnLists {
    pub all: Vec<String>,
    pub numeric: Vec<String>,
    pub categorical: Vec<String>,
    pub numeric_missing: Vec<String>,
    pub categorical_missing: Vec<String>,
}

impl ColumnLists {
    pub fn from_frame(df: &DataFrame) -> Self {
        Self {
            all: crate::data::column_names(df),
            numeric: crate::data::columns_of_kind(df, ColumnKind::Numeric),
            categorical: crate::data::columns_of_kind(df, ColumnKind::Categorical),
            numeric_missing: crate::data::columns_with_missing(df, ColumnKind::Numeric),
            categorical_missing: crate::data::columns_with_missing(df, ColumnKind::Categorical),
        }
    }
}

/// User settings for cleaning and aggregation
#[derive(Clone)]
pub struct UserSettings {
    pub file_path: Option<PathBuf>,
    pub numeric_method: NumericMethod,
    pub numeric_selected: Vec<bool>,
    pub weight_col: String,
    pub categorical_strategy: CategoricalStrategy,
    pub categorical_selected: Vec<bool>,
    pub bulk_strategy: BulkStrategy,
    pub group_col: String,
    pub agg_targets: Vec<bool>,
    pub agg_functions: Vec<bool>,
}

impl Default for UserSettings {
    fn default() -> Self {
        Self {
            file_path: None,
            numeric_method: NumericMethod::default(),
            numeric_selected: Vec::new(),
            weight_col: String::new(),
            categorical_strategy: CategoricalStrategy::DropRows,
            categorical_selected: Vec::new(),
            bulk_strategy: BulkStrategy::DropRows,
            group_col: String::new(),
            agg_targets: Vec::new(),
            // mean is pre-selected
            agg_functions: AggFunction::ALL
                .iter()
                .map(|f| *f == AggFunction::Mean)
                .collect(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatusKind {
    Info,
    Success,
    Error,
}

/// Left side control panel with file selection and processing controls.
pub struct ControlPanel {
    pub settings: UserSettings,
    pub columns: ColumnLists,
    pub status: String,
    pub status_kind: StatusKind,
    pub data_loaded: bool,
}

impl Default for ControlPanel {
    fn default() -> Self {
        Self {
            settings: UserSettings::default(),
            columns: ColumnLists::default(),
            status: "Upload a CSV or Excel file to generate a dashboard".to_string(),
            status_kind: StatusKind::Info,
            data_loaded: false,
        }
    }
}

impl ControlPanel {
    pub fn new() -> Self {
        Self::default()
    }

    /// Update available columns after the table changes. Selections that
    /// still name an existing column survive.
    pub fn update_columns(&mut self, columns: ColumnLists) {
        let s = &mut self.settings;
        s.numeric_selected =
            Self::carry_selection(&self.columns.numeric_missing, &s.numeric_selected, &columns.numeric_missing);
        s.categorical_selected = Self::carry_selection(
            &self.columns.categorical_missing,
            &s.categorical_selected,
            &columns.categorical_missing,
        );
        s.agg_targets = Self::carry_selection(&self.columns.all, &s.agg_targets, &columns.all);

        if !columns.numeric.contains(&s.weight_col) {
            s.weight_col = columns.numeric.first().cloned().unwrap_or_default();
        }
        if !columns.categorical.contains(&s.group_col) {
            s.group_col = columns.categorical.first().cloned().unwrap_or_default();
        }

        self.columns = columns;
        self.data_loaded = !self.columns.all.is_empty();
    }

    fn carry_selection(old: &[String], selected: &[bool], new: &[String]) -> Vec<bool> {
        new.iter()
            .map(|name| {
                old.iter()
                    .position(|o| o == name)
                    .and_then(|i| selected.get(i).copied())
                    .unwrap_or(false)
            })
            .collect()
    }

    fn selected(names: &[String], flags: &[bool]) -> Vec<String> {
        names
            .iter()
            .zip(flags.iter())
            .filter(|(_, &on)| on)
            .map(|(name, _)| name.clone())
            .collect()
    }

    /// Numeric strategy and scope as currently selected.
    pub fn numeric_request(&self) -> (NumericStrategy, ColumnScope) {
        let s = &self.settings;
        (
            s.numeric_method.to_strategy(&s.weight_col),
            ColumnScope::from_selection(Self::selected(
                &self.columns.numeric_missing,
                &s.numeric_selected,
            )),
        )
    }

    /// Categorical strategy and scope as currently selected.
    pub fn categorical_request(&self) -> (CategoricalStrategy, ColumnScope) {
        (
            self.settings.categorical_strategy,
            ColumnScope::from_selection(Self::selected(
                &self.columns.categorical_missing,
                &self.settings.categorical_selected,
            )),
        )
    }

    pub fn aggregation_request(&self) -> AggregationRequest {
        let s = &self.settings;
        AggregationRequest {
            group_by: s.group_col.clone(),
            targets: Self::selected(&self.columns.all, &s.agg_targets),
            functions: AggFunction::ALL
                .iter()
                .zip(s.agg_functions.iter())
                .filter(|(_, &on)| on)
                .map(|(f, _)| *f)
                .collect(),
        }
    }

    /// Draw the control panel
    pub fn show(&mut self, ui: &mut egui::Ui) -> ControlPanelAction {
        let mut action = ControlPanelAction::None;

        // Title
        ui.vertical_centered(|ui| {
            ui.add_space(5.0);
            ui.label(
                RichText::new("📊 Data Dashboard")
                    .size(22.0)
                    .color(Color32::from_rgb(100, 149, 237)),
            );
            ui.label(
                RichText::new("Upload, clean, summarize")
                    .size(11.0)
                    .color(Color32::GRAY),
            );
        });
        ui.add_space(10.0);
        ui.separator();
        ui.add_space(5.0);

        // ===== Data Source Section =====
        ui.label(RichText::new("📁 Data Source").size(14.0).strong());
        ui.add_space(5.0);

        egui::Frame::none()
            .fill(ui.visuals().widgets.noninteractive.bg_fill)
            .rounding(5.0)
            .inner_margin(8.0)
            .show(ui, |ui| {
                ui.horizontal(|ui| {
                    let path_text = self
                        .settings
                        .file_path
                        .as_ref()
                        .and_then(|p| p.file_name())
                        .map(|n| n.to_string_lossy().to_string())
                        .unwrap_or_else(|| "No file selected".to_string());

                    ui.label(RichText::new(&path_text).size(12.0).color(
                        if self.settings.file_path.is_some() {
                            Color32::WHITE
                        } else {
                            Color32::GRAY
                        },
                    ));

                    ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                        if ui.button("📂 Browse").clicked() {
                            action = ControlPanelAction::BrowseFile;
                        }
                    });
                });
            });

        ui.add_space(10.0);

        ui.add_enabled_ui(self.data_loaded, |ui| {
            ui.horizontal(|ui| {
                if ui.button("Remove duplicates").clicked() {
                    action = ControlPanelAction::RemoveDuplicates;
                }
                if ui.button("↺ Reset to loaded data").clicked() {
                    action = ControlPanelAction::Reset;
                }
            });

            ui.add_space(10.0);
            ui.separator();
            self.show_numeric_section(ui, &mut action);
            ui.separator();
            self.show_categorical_section(ui, &mut action);
            ui.separator();
            self.show_bulk_section(ui, &mut action);
            ui.separator();
            self.show_aggregation_section(ui, &mut action);
        });

        ui.add_space(10.0);
        ui.separator();
        ui.add_space(5.0);

        // ===== Status Section =====
        ui.label(RichText::new("ℹ Status").size(14.0).strong());
        ui.add_space(5.0);
        let status_color = match self.status_kind {
            StatusKind::Error => Color32::from_rgb(220, 53, 69),
            StatusKind::Success => Color32::from_rgb(40, 167, 69),
            StatusKind::Info => Color32::GRAY,
        };
        ui.label(RichText::new(&self.status).size(11.0).color(status_color));

        action
    }

    fn show_numeric_section(&mut self, ui: &mut egui::Ui, action: &mut ControlPanelAction) {
        ui.label(RichText::new("🔢 Missing Numeric Values").size(14.0).strong());
        ui.add_space(5.0);

        if self.columns.numeric_missing.is_empty() {
            ui.label(RichText::new("No numeric columns with missing values.").color(Color32::GRAY));
            return;
        }

        ComboBox::from_id_salt("numeric_method")
            .width(220.0)
            .selected_text(self.settings.numeric_method.label())
            .show_ui(ui, |ui| {
                for method in NumericMethod::ALL {
                    ui.selectable_value(&mut self.settings.numeric_method, method, method.label());
                }
            });

        if self.settings.numeric_method == NumericMethod::LeaveAsIs {
            ui.label("No changes will be made to missing numeric values.");
            return;
        }

        if self.settings.numeric_method == NumericMethod::FillWeightedAverage {
            ui.horizontal(|ui| {
                ui.label("Weight column:");
                ComboBox::from_id_salt("weight_col")
                    .width(140.0)
                    .selected_text(&self.settings.weight_col)
                    .show_ui(ui, |ui| {
                        for col in &self.columns.numeric {
                            ui.selectable_value(&mut self.settings.weight_col, col.clone(), col);
                        }
                    });
            });
        }

        ui.label(
            RichText::new("Columns (leave empty to apply to all numeric with missing values):")
                .size(11.0),
        );
        Self::checkbox_list(
            ui,
            "numeric_cols",
            &self.columns.numeric_missing,
            &mut self.settings.numeric_selected,
        );

        if ui.button("Apply Numeric Cleaning").clicked() {
            *action = ControlPanelAction::ApplyNumeric;
        }
    }

    fn show_categorical_section(&mut self, ui: &mut egui::Ui, action: &mut ControlPanelAction) {
        ui.label(RichText::new("🔤 Missing Categorical Values").size(14.0).strong());
        ui.add_space(5.0);

        if self.columns.categorical_missing.is_empty() {
            ui.label(
                RichText::new("No categorical columns with missing values.").color(Color32::GRAY),
            );
            return;
        }

        ComboBox::from_id_salt("categorical_strategy")
            .width(220.0)
            .selected_text(self.settings.categorical_strategy.label())
            .show_ui(ui, |ui| {
                for strategy in CategoricalStrategy::ALL {
                    ui.selectable_value(
                        &mut self.settings.categorical_strategy,
                        strategy,
                        strategy.label(),
                    );
                }
            });

        if self.settings.categorical_strategy == CategoricalStrategy::LeaveAsIs {
            ui.label("No changes will be made to missing categorical values.");
            return;
        }

        ui.label(RichText::new("Columns (leave empty to apply to all categorical):").size(11.0));
        Self::checkbox_list(
            ui,
            "categorical_cols",
            &self.columns.categorical_missing,
            &mut self.settings.categorical_selected,
        );

        if ui.button("Apply Categorical Cleaning").clicked() {
            *action = ControlPanelAction::ApplyCategorical;
        }
    }

    fn show_bulk_section(&mut self, ui: &mut egui::Ui, action: &mut ControlPanelAction) {
        egui::CollapsingHeader::new(RichText::new("🧹 Same method for all columns").strong())
            .default_open(false)
            .show(ui, |ui| {
                ComboBox::from_id_salt("bulk_strategy")
                    .width(220.0)
                    .selected_text(self.settings.bulk_strategy.label())
                    .show_ui(ui, |ui| {
                        for strategy in BulkStrategy::ALL {
                            ui.selectable_value(
                                &mut self.settings.bulk_strategy,
                                strategy,
                                strategy.label(),
                            );
                        }
                    });
                if ui.button("Apply to All Columns").clicked() {
                    *action = ControlPanelAction::ApplyAll;
                }
            });
    }

    fn show_aggregation_section(&mut self, ui: &mut egui::Ui, action: &mut ControlPanelAction) {
        ui.label(RichText::new("∑ Aggregation").size(14.0).strong());
        ui.add_space(5.0);

        if self.columns.categorical.is_empty() {
            ui.label(RichText::new("No categorical column to group by.").color(Color32::GRAY));
            return;
        }

        ui.horizontal(|ui| {
            ui.label("Group by:");
            ComboBox::from_id_salt("group_col")
                .width(150.0)
                .selected_text(&self.settings.group_col)
                .show_ui(ui, |ui| {
                    for col in &self.columns.categorical {
                        ui.selectable_value(&mut self.settings.group_col, col.clone(), col);
                    }
                });
        });

        ui.label(RichText::new("Columns to aggregate:").size(11.0));
        Self::checkbox_list(
            ui,
            "agg_targets",
            &self.columns.all,
            &mut self.settings.agg_targets,
        );

        ui.label(RichText::new("Functions:").size(11.0));
        ui.horizontal_wrapped(|ui| {
            for (f, on) in AggFunction::ALL
                .iter()
                .zip(self.settings.agg_functions.iter_mut())
            {
                ui.checkbox(on, f.name());
            }
        });

        if ui.button("Compute Aggregation").clicked() {
            *action = ControlPanelAction::Aggregate;
        }
    }

    fn checkbox_list(ui: &mut egui::Ui, id: &str, names: &[String], flags: &mut [bool]) {
        egui::Frame::none()
            .fill(ui.visuals().widgets.noninteractive.bg_fill)
            .rounding(5.0)
            .inner_margin(5.0)
            .show(ui, |ui| {
                ScrollArea::vertical()
                    .id_salt(id)
                    .max_height(110.0)
                    .show(ui, |ui| {
                        for (name, flag) in names.iter().zip(flags.iter_mut()) {
                            ui.checkbox(flag, name);
                        }
                    });
            });
    }

    /// Set status line
    pub fn set_status(&mut self, kind: StatusKind, status: &str) {
        self.status_kind = kind;
        self.status = status.to_string();
    }
}

/// Actions triggered by control panel
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ControlPanelAction {
    None,
    BrowseFile,
    RemoveDuplicates,
    Reset,
    ApplyNumeric,
    ApplyCategorical,
    ApplyAll,
    Aggregate,
}
