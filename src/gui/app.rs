//! Data Dashboard Main Application
//! Main window with control panel, tables and charts.

use crate::charts::StaticChartRenderer;
use crate::config::DashboardConfig;
use crate::data::{AggregationOutcome, CleaningOutcome};
use crate::gui::chart_viewer::{ChartSlot, ChartViewer, ChartViewerAction};
use crate::gui::control_panel::{ColumnLists, ControlPanel, ControlPanelAction, StatusKind};
use crate::gui::table_view::DataView;
use crate::session::Session;
use egui::SidePanel;
use std::path::PathBuf;

/// Main application window.
pub struct DashboardApp {
    config: DashboardConfig,
    session: Option<Session>,
    control_panel: ControlPanel,
    data_view: DataView,
    chart_viewer: ChartViewer,
}

impl DashboardApp {
    pub fn new(
        _cc: &eframe::CreationContext<'_>,
        config: DashboardConfig,
        initial_file: Option<PathBuf>,
    ) -> Self {
        let mut app = Self {
            config,
            session: None,
            control_panel: ControlPanel::new(),
            data_view: DataView::new(),
            chart_viewer: ChartViewer::new(),
        };
        if let Some(path) = initial_file {
            app.open_file(path);
        }
        app
    }

    /// Handle file selection
    fn handle_browse_file(&mut self) {
        let Some(path) = rfd::FileDialog::new()
            .add_filter("Data Files", &["csv", "xlsx", "xls"])
            .add_filter("CSV Files", &["csv"])
            .add_filter("Excel Files", &["xlsx", "xls"])
            .pick_file()
        else {
            return;
        };
        self.open_file(path);
    }

    /// Replace the session with one for `path`. A failed load keeps the
    /// previous session on screen.
    fn open_file(&mut self, path: PathBuf) {
        match Session::open(&path, &self.config) {
            Ok(session) => {
                let (rows, cols) = session.table().shape();
                self.control_panel.settings.file_path = Some(path);
                self.session = Some(session);
                self.refresh_views();
                self.control_panel.set_status(
                    StatusKind::Success,
                    &format!("Loaded {} rows, {} columns", rows, cols),
                );
            }
            Err(e) => {
                log::error!("Failed to load {}: {}", path.display(), e);
                self.control_panel
                    .set_status(StatusKind::Error, &format!("Error: {}", e));
            }
        }
    }

    /// Rebuild every cached view from the session's current table.
    fn refresh_views(&mut self) {
        let Some(session) = &self.session else {
            return;
        };
        self.control_panel
            .update_columns(ColumnLists::from_frame(session.table()));
        self.data_view.refresh(session, &self.config);
        self.chart_viewer.refresh(session, &self.config);
    }

    fn handle_action(&mut self, action: ControlPanelAction) {
        if action == ControlPanelAction::BrowseFile {
            self.handle_browse_file();
            return;
        }
        let Some(session) = self.session.as_mut() else {
            return;
        };

        let status = match action {
            ControlPanelAction::None | ControlPanelAction::BrowseFile => return,
            ControlPanelAction::Reset => {
                session.reset();
                Ok("Reset to the uploaded data".to_string())
            }
            ControlPanelAction::RemoveDuplicates => session
                .remove_duplicates()
                .map(|n| format!("Removed {} duplicate rows", n))
                .map_err(|e| e.to_string()),
            ControlPanelAction::ApplyNumeric => {
                let (strategy, scope) = self.control_panel.numeric_request();
                session
                    .clean_numeric(&strategy, &scope)
                    .map(|o| o.message("numeric"))
                    .map_err(|e| e.to_string())
            }
            ControlPanelAction::ApplyCategorical => {
                let (strategy, scope) = self.control_panel.categorical_request();
                session
                    .clean_categorical(strategy, &scope)
                    .map(|o| o.message("categorical"))
                    .map_err(|e| e.to_string())
            }
            ControlPanelAction::ApplyAll => {
                let strategy = self.control_panel.settings.bulk_strategy;
                session
                    .clean_all(strategy)
                    .map(|o| match o {
                        CleaningOutcome::Applied(report) => report.message,
                        other => other.message("missing"),
                    })
                    .map_err(|e| e.to_string())
            }
            ControlPanelAction::Aggregate => {
                let request = self.control_panel.aggregation_request();
                session
                    .aggregate(&request)
                    .map(|o| match o {
                        AggregationOutcome::Summary(df) => {
                            format!("Aggregated into {} groups", df.height())
                        }
                        AggregationOutcome::NothingToDo(msg) => msg,
                    })
                    .map_err(|e| e.to_string())
            }
        };

        match status {
            Ok(msg) => self.control_panel.set_status(StatusKind::Success, &msg),
            Err(msg) => self
                .control_panel
                .set_status(StatusKind::Error, &format!("Error: {}", msg)),
        }
        self.refresh_views();
    }

    /// Save a chart as PNG and open it with the system viewer.
    fn handle_export_png(&mut self, slot: ChartSlot) {
        let Some(chart) = self.chart_viewer.chart(slot) else {
            self.control_panel
                .set_status(StatusKind::Error, "No chart to export");
            return;
        };

        let default_name = format!("{}.png", chart.title().to_lowercase().replace(' ', "_"));
        let Some(path) = rfd::FileDialog::new()
            .add_filter("PNG Image", &["png"])
            .set_file_name(&default_name)
            .save_file()
        else {
            return;
        };

        let [width, height] = self.config.chart_export_size;
        match StaticChartRenderer::render_png(chart, &path, (width, height)) {
            Ok(()) => {
                self.control_panel.set_status(
                    StatusKind::Success,
                    &format!("Chart saved to {}", path.display()),
                );
                if let Err(e) = open::that(&path) {
                    log::warn!("Could not open {}: {}", path.display(), e);
                }
            }
            Err(e) => {
                log::error!("Chart export failed: {:#}", e);
                self.control_panel
                    .set_status(StatusKind::Error, &format!("Export error: {}", e));
            }
        }
    }
}

impl eframe::App for DashboardApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        // Left panel - Control Panel
        SidePanel::left("control_panel")
            .min_width(300.0)
            .max_width(360.0)
            .show(ctx, |ui| {
                egui::ScrollArea::vertical().show(ui, |ui| {
                    let action = self.control_panel.show(ui);
                    self.handle_action(action);
                });
            });

        // Central panel - tables and charts
        egui::CentralPanel::default().show(ctx, |ui| {
            if self.session.is_none() {
                ui.centered_and_justified(|ui| {
                    ui.label(
                        egui::RichText::new("Upload a CSV or Excel file to get started").size(20.0),
                    );
                });
                return;
            }

            let mut chart_action = ChartViewerAction::None;
            egui::ScrollArea::vertical()
                .auto_shrink([false, false])
                .show(ui, |ui| {
                    self.data_view.show_uploaded(ui);
                    ui.separator();
                    self.data_view.show_cleaned(ui);
                    ui.separator();
                    self.data_view.show_statistics(ui);
                    ui.separator();
                    self.data_view.show_aggregation(ui);
                    ui.add_space(10.0);
                    chart_action = self.chart_viewer.show(ui);
                });

            match chart_action {
                ChartViewerAction::None => {}
                ChartViewerAction::SelectionChanged => self.refresh_views(),
                ChartViewerAction::ExportPng(slot) => self.handle_export_png(slot),
            }
        });
    }
}
