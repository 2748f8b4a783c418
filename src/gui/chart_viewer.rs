//! Chart Viewer Widget
//! Central scrollable panel with the page header, the two chart sections
//! and the footer.

use crate::charts::ChartPlotter;
use crate::stats::{CorrelationMatrix, YearlyTrend};
use egui::{Color32, RichText, ScrollArea};

/// Result slot for one chart: computed data, or an inline error rendered
/// in place of the chart while the rest of the page stays intact.
pub type ChartSlot<T> = Option<Result<T, String>>;

/// Central chart display area.
#[derive(Default)]
pub struct ChartViewer {
    pub trend: ChartSlot<YearlyTrend>,
    pub correlation: ChartSlot<CorrelationMatrix>,
}

impl ChartViewer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Draw the dashboard page.
    pub fn show(&self, ui: &mut egui::Ui) {
        ScrollArea::vertical()
            .auto_shrink([false, false])
            .show(ui, |ui| {
                ui.add_space(8.0);
                ui.label(
                    RichText::new("🌍 Air Quality Dashboard - Shunyi Station")
                        .size(24.0)
                        .strong(),
                );
                ui.label(
                    RichText::new(
                        "This dashboard provides insights into air quality levels, particularly \
                         PM2.5, and their correlation with weather conditions over the years.",
                    )
                    .size(13.0)
                    .color(Color32::GRAY),
                );
                ui.add_space(15.0);
                ui.separator();
                ui.add_space(10.0);

                match &self.trend {
                    Some(Ok(trend)) => {
                        ui.label(
                            RichText::new(format!(
                                "📈 Trend of {} Levels Over the Years",
                                trend.field
                            ))
                            .size(17.0)
                            .strong(),
                        );
                        ui.add_space(8.0);
                        ChartPlotter::draw_trend_chart(ui, trend);
                    }
                    Some(Err(error)) => Self::draw_inline_error(ui, error),
                    None => {
                        ui.label(RichText::new("No Data").size(16.0));
                    }
                }

                ui.add_space(20.0);
                ui.separator();
                ui.add_space(10.0);

                match &self.correlation {
                    Some(Ok(matrix)) => {
                        ui.label(
                            RichText::new(format!(
                                "🌡 Correlation Heatmap between {}",
                                matrix.fields.join(" and ")
                            ))
                            .size(17.0)
                            .strong(),
                        );
                        ui.add_space(8.0);
                        ChartPlotter::draw_heatmap(ui, matrix);
                    }
                    Some(Err(error)) => Self::draw_inline_error(ui, error),
                    None => {
                        ui.label(RichText::new("No Data").size(16.0));
                    }
                }

                ui.add_space(25.0);
                ui.separator();
                ui.add_space(8.0);
                ui.label(
                    RichText::new("© 2024 Air Quality Monitoring Team | Data Source: Shunyi Station")
                        .size(11.0)
                        .color(Color32::GRAY),
                );
                ui.add_space(8.0);
            });
    }

    fn draw_inline_error(ui: &mut egui::Ui, error: &str) {
        ui.label(
            RichText::new(format!("⚠ Chart unavailable: {}", error))
                .size(14.0)
                .color(Color32::from_rgb(220, 53, 69)),
        );
    }
}
