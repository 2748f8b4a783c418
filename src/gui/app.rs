//! Air Quality Dashboard Application
//! Main window wiring: each selector change dispatches to an explicit
//! recomputation handler whose result lands in the chart viewer.

use crate::charts::StaticChartRenderer;
use crate::data::Dataset;
use crate::gui::{ChartViewer, ControlPanel, ControlPanelAction};
use crate::stats::Aggregator;
use egui::SidePanel;

/// Main application window.
pub struct DashboardApp {
    dataset: Dataset,
    control_panel: ControlPanel,
    chart_viewer: ChartViewer,
}

impl DashboardApp {
    pub fn new(_cc: &eframe::CreationContext<'_>, dataset: Dataset) -> Self {
        let dataset_name = dataset
            .file_path()
            .and_then(|p| p.file_name())
            .map(|n| n.to_string_lossy().to_string())
            .unwrap_or_else(|| "in-memory dataset".to_string());

        let mut app = Self {
            control_panel: ControlPanel::new(
                dataset_name,
                dataset.row_count(),
                dataset.year_span(),
            ),
            chart_viewer: ChartViewer::new(),
            dataset,
        };
        app.recompute_trend();
        app.recompute_correlation();
        app
    }

    /// Recompute the yearly trend for the current selection.
    fn recompute_trend(&mut self) {
        let field = self.control_panel.selection.trend_field.clone();
        self.chart_viewer.trend =
            Some(Aggregator::yearly_trend(&self.dataset, &field).map_err(|e| e.to_string()));
    }

    /// Recompute the correlation matrix for the current pair.
    fn recompute_correlation(&mut self) {
        let fields = vec![
            self.control_panel.selection.corr_field_a.clone(),
            self.control_panel.selection.corr_field_b.clone(),
        ];
        self.chart_viewer.correlation =
            Some(Aggregator::correlation(&self.dataset, &fields).map_err(|e| e.to_string()));
    }

    /// Render both charts into a PNG at a user-picked destination.
    fn handle_export_png(&mut self) {
        let (Some(Ok(trend)), Some(Ok(matrix))) =
            (&self.chart_viewer.trend, &self.chart_viewer.correlation)
        else {
            self.control_panel.set_status("No charts to export");
            return;
        };

        let Some(path) = rfd::FileDialog::new()
            .add_filter("PNG Image", &["png"])
            .set_file_name("air_quality_dashboard.png")
            .save_file()
        else {
            return; // User cancelled
        };

        match StaticChartRenderer::render_dashboard_to_bytes(trend, matrix, 1400, 1000) {
            Ok(png_bytes) => match std::fs::write(&path, &png_bytes) {
                Ok(()) => {
                    self.control_panel
                        .set_status(&format!("Exported {}", path.display()));
                    let _ = open::that(&path);
                }
                Err(e) => {
                    self.control_panel.set_status(&format!("Error: {}", e));
                }
            },
            Err(e) => {
                self.control_panel.set_status(&format!("Error: {}", e));
            }
        }
    }
}

impl eframe::App for DashboardApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        // Left panel - Control Panel
        SidePanel::left("control_panel")
            .min_width(280.0)
            .max_width(330.0)
            .show(ctx, |ui| {
                egui::ScrollArea::vertical().show(ui, |ui| {
                    let action = self.control_panel.show(ui);

                    match action {
                        ControlPanelAction::TrendFieldChanged => self.recompute_trend(),
                        ControlPanelAction::CorrelationFieldsChanged => {
                            self.recompute_correlation()
                        }
                        ControlPanelAction::ExportPng => self.handle_export_png(),
                        ControlPanelAction::None => {}
                    }
                });
            });

        // Central panel - Chart Viewer
        egui::CentralPanel::default().show(ctx, |ui| {
            self.chart_viewer.show(ui);
        });
    }
}
