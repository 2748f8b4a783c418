//! Control Panel Widget
//! Left side panel with the dataset summary, variable selectors, export
//! button and status line.

use crate::data::MEASUREMENT_FIELDS;
use egui::{Color32, ComboBox, RichText};

/// Current variable selections driving the two charts.
#[derive(Clone)]
pub struct Selection {
    pub trend_field: String,
    pub corr_field_a: String,
    pub corr_field_b: String,
}

impl Default for Selection {
    fn default() -> Self {
        Self {
            trend_field: "PM2.5".to_string(),
            corr_field_a: "TEMP".to_string(),
            corr_field_b: "PM2.5".to_string(),
        }
    }
}

/// Left side control panel. Selector changes are reported as actions so
/// the app can recompute exactly the affected chart.
pub struct ControlPanel {
    pub selection: Selection,
    pub dataset_name: String,
    pub row_count: usize,
    pub year_span: Option<(i64, i64)>,
    pub status: String,
}

impl ControlPanel {
    pub fn new(dataset_name: String, row_count: usize, year_span: Option<(i64, i64)>) -> Self {
        Self {
            selection: Selection::default(),
            dataset_name,
            row_count,
            year_span,
            status: "Ready".to_string(),
        }
    }

    /// Fields offered by the second correlation selector: everything
    /// except the first selection, so the disallowed pair cannot be
    /// constructed.
    pub fn partner_fields(&self) -> Vec<&'static str> {
        MEASUREMENT_FIELDS
            .iter()
            .copied()
            .filter(|f| *f != self.selection.corr_field_a)
            .collect()
    }

    /// Draw the control panel
    pub fn show(&mut self, ui: &mut egui::Ui) -> ControlPanelAction {
        let mut action = ControlPanelAction::None;

        // Title
        ui.vertical_centered(|ui| {
            ui.add_space(5.0);
            ui.label(
                RichText::new("🌍 Air Quality Dashboard")
                    .size(20.0)
                    .color(Color32::from_rgb(100, 149, 237)),
            );
            ui.label(
                RichText::new("Shunyi Station")
                    .size(11.0)
                    .color(Color32::GRAY),
            );
        });
        ui.add_space(10.0);
        ui.separator();
        ui.add_space(5.0);

        // ===== Dataset Section =====
        ui.label(RichText::new("📁 Dataset").size(14.0).strong());
        ui.add_space(5.0);

        egui::Frame::none()
            .fill(ui.visuals().widgets.noninteractive.bg_fill)
            .rounding(5.0)
            .inner_margin(8.0)
            .show(ui, |ui| {
                ui.label(RichText::new(&self.dataset_name).size(12.0));
                ui.label(
                    RichText::new(format!("{} observations", self.row_count))
                        .size(11.0)
                        .color(Color32::GRAY),
                );
                if let Some((first, last)) = self.year_span {
                    ui.label(
                        RichText::new(format!("{} to {}", first, last))
                            .size(11.0)
                            .color(Color32::GRAY),
                    );
                }
            });

        ui.add_space(15.0);
        ui.separator();
        ui.add_space(10.0);

        // ===== Trend Variable Section =====
        ui.label(RichText::new("📈 Trend Variable").size(14.0).strong());
        ui.add_space(5.0);

        ComboBox::from_id_salt("trend_field")
            .width(150.0)
            .selected_text(&self.selection.trend_field)
            .show_ui(ui, |ui| {
                for field in MEASUREMENT_FIELDS {
                    if ui
                        .selectable_label(self.selection.trend_field == field, field)
                        .clicked()
                    {
                        self.selection.trend_field = field.to_string();
                        action = ControlPanelAction::TrendFieldChanged;
                    }
                }
            });

        ui.add_space(15.0);
        ui.separator();
        ui.add_space(10.0);

        // ===== Correlation Variables Section =====
        ui.label(
            RichText::new("🌡 Correlation Variables")
                .size(14.0)
                .strong(),
        );
        ui.add_space(8.0);

        let label_width = 60.0;

        ui.horizontal(|ui| {
            ui.add_sized([label_width, 20.0], egui::Label::new("First:"));
            ComboBox::from_id_salt("corr_field_a")
                .width(150.0)
                .selected_text(&self.selection.corr_field_a)
                .show_ui(ui, |ui| {
                    for field in MEASUREMENT_FIELDS {
                        if ui
                            .selectable_label(self.selection.corr_field_a == field, field)
                            .clicked()
                        {
                            self.selection.corr_field_a = field.to_string();
                            action = ControlPanelAction::CorrelationFieldsChanged;
                        }
                    }
                });
        });

        ui.add_space(5.0);

        let partners = self.partner_fields();
        ui.horizontal(|ui| {
            ui.add_sized([label_width, 20.0], egui::Label::new("Second:"));
            ComboBox::from_id_salt("corr_field_b")
                .width(150.0)
                .selected_text(&self.selection.corr_field_b)
                .show_ui(ui, |ui| {
                    for field in partners {
                        if ui
                            .selectable_label(self.selection.corr_field_b == field, field)
                            .clicked()
                        {
                            self.selection.corr_field_b = field.to_string();
                            action = ControlPanelAction::CorrelationFieldsChanged;
                        }
                    }
                });
        });

        // The first selector may have just taken the second's value;
        // move the second to the next available field.
        if self.selection.corr_field_b == self.selection.corr_field_a {
            if let Some(fallback) = MEASUREMENT_FIELDS
                .iter()
                .find(|f| **f != self.selection.corr_field_a)
            {
                self.selection.corr_field_b = fallback.to_string();
                action = ControlPanelAction::CorrelationFieldsChanged;
            }
        }

        ui.add_space(15.0);
        ui.separator();
        ui.add_space(10.0);

        // ===== Export Section =====
        ui.vertical_centered(|ui| {
            let button = egui::Button::new(RichText::new("📄 Export PNG").size(14.0))
                .min_size(egui::vec2(160.0, 30.0));
            if ui.add(button).clicked() {
                action = ControlPanelAction::ExportPng;
            }
        });

        ui.add_space(15.0);
        ui.separator();
        ui.add_space(10.0);

        // ===== Status Section =====
        ui.label(RichText::new("📊 Status").size(14.0).strong());
        ui.add_space(5.0);

        let status_color = if self.status.contains("Error") {
            Color32::from_rgb(220, 53, 69)
        } else if self.status.contains("Exported") {
            Color32::from_rgb(40, 167, 69)
        } else {
            Color32::GRAY
        };
        ui.label(RichText::new(&self.status).size(11.0).color(status_color));

        action
    }

    /// Set the status line
    pub fn set_status(&mut self, status: &str) {
        self.status = status.to_string();
    }
}

/// Actions triggered by control panel
#[derive(Debug, Clone, PartialEq)]
pub enum ControlPanelAction {
    None,
    TrendFieldChanged,
    CorrelationFieldsChanged,
    ExportPng,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn second_selector_excludes_first_selection() {
        let mut panel = ControlPanel::new("test.csv".to_string(), 0, None);
        panel.selection.corr_field_a = "PM2.5".to_string();

        let partners = panel.partner_fields();
        assert!(!partners.contains(&"PM2.5"));
        assert!(partners.contains(&"TEMP"));
        assert_eq!(partners.len(), MEASUREMENT_FIELDS.len() - 1);
    }
}
