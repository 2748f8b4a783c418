//! Chart Plotter Module
//! Draws the interactive trend chart and annotated correlation heatmap.

use crate::stats::{CorrelationMatrix, YearlyTrend};
use egui::{vec2, Align2, Color32, FontId, Sense, Stroke};
use egui_plot::{Line, MarkerShape, Plot, PlotPoints, Points};

/// Trend line color
pub const TREND_COLOR: Color32 = Color32::from_rgb(52, 152, 219);

// Diverging heatmap endpoints and the undefined-cell grey
const POSITIVE_COLOR: Color32 = Color32::from_rgb(178, 24, 43);
const NEGATIVE_COLOR: Color32 = Color32::from_rgb(33, 102, 172);
const UNDEFINED_COLOR: Color32 = Color32::from_rgb(120, 120, 120);

const HEATMAP_CELL: f32 = 120.0;
const HEATMAP_LABEL_MARGIN: f32 = 70.0;
const HEATMAP_FOOTER: f32 = 28.0;

/// Creates the dashboard visualizations with egui.
pub struct ChartPlotter;

impl ChartPlotter {
    /// Draw the yearly trend line chart. Years whose mean is absent are
    /// simply not plotted, leaving a gap in the line.
    pub fn draw_trend_chart(ui: &mut egui::Ui, trend: &YearlyTrend) {
        let points: Vec<[f64; 2]> = trend
            .points
            .iter()
            .filter_map(|p| p.mean.map(|mean| [p.year as f64, mean]))
            .collect();

        Plot::new(format!("trend_{}", trend.field))
            .height(320.0)
            .allow_scroll(false)
            .x_axis_label("Year")
            .y_axis_label(format!("Average {} Level", trend.field))
            .x_axis_formatter(|mark, _range| {
                let v = mark.value;
                if (v - v.round()).abs() < 1e-6 {
                    format!("{:.0}", v.round())
                } else {
                    String::new()
                }
            })
            .show(ui, |plot_ui| {
                if points.is_empty() {
                    return;
                }
                plot_ui.line(
                    Line::new(PlotPoints::from_iter(points.iter().copied()))
                        .color(TREND_COLOR)
                        .width(2.0)
                        .name(&trend.field),
                );
                plot_ui.points(
                    Points::new(PlotPoints::from_iter(points.iter().copied()))
                        .radius(4.0)
                        .shape(MarkerShape::Circle)
                        .color(TREND_COLOR),
                );
            });
    }

    /// Paint the annotated correlation heatmap. Defined coefficients get
    /// a diverging fill and a two-decimal label; undefined ones render as
    /// a blank grey cell.
    pub fn draw_heatmap(ui: &mut egui::Ui, matrix: &CorrelationMatrix) {
        let n = matrix.size();
        let size = vec2(
            HEATMAP_LABEL_MARGIN + HEATMAP_CELL * n as f32,
            HEATMAP_CELL * n as f32 + HEATMAP_FOOTER,
        );
        let (rect, _) = ui.allocate_exact_size(size, Sense::hover());
        let painter = ui.painter_at(rect);
        let origin = rect.min + vec2(HEATMAP_LABEL_MARGIN, 0.0);

        for row in 0..n {
            for col in 0..n {
                let cell = egui::Rect::from_min_size(
                    origin + vec2(col as f32 * HEATMAP_CELL, row as f32 * HEATMAP_CELL),
                    vec2(HEATMAP_CELL, HEATMAP_CELL),
                );
                match matrix.get(row, col) {
                    Some(r) => {
                        painter.rect_filled(cell.shrink(1.0), 3.0, Self::coefficient_color(r));
                        let text_color = if r.abs() > 0.6 {
                            Color32::WHITE
                        } else {
                            Color32::BLACK
                        };
                        painter.text(
                            cell.center(),
                            Align2::CENTER_CENTER,
                            format!("{:.2}", r),
                            FontId::proportional(16.0),
                            text_color,
                        );
                    }
                    None => {
                        painter.rect_filled(
                            cell.shrink(1.0),
                            3.0,
                            UNDEFINED_COLOR.gamma_multiply(0.25),
                        );
                        painter.rect_stroke(
                            cell.shrink(1.0),
                            3.0,
                            Stroke::new(1.0, UNDEFINED_COLOR),
                        );
                    }
                }
            }
        }

        for (i, field) in matrix.fields.iter().enumerate() {
            painter.text(
                egui::pos2(
                    rect.min.x + HEATMAP_LABEL_MARGIN - 8.0,
                    origin.y + (i as f32 + 0.5) * HEATMAP_CELL,
                ),
                Align2::RIGHT_CENTER,
                field,
                FontId::proportional(13.0),
                ui.visuals().text_color(),
            );
            painter.text(
                egui::pos2(
                    origin.x + (i as f32 + 0.5) * HEATMAP_CELL,
                    origin.y + n as f32 * HEATMAP_CELL + HEATMAP_FOOTER / 2.0,
                ),
                Align2::CENTER_CENTER,
                field,
                FontId::proportional(13.0),
                ui.visuals().text_color(),
            );
        }
    }

    /// Map a coefficient in [-1, 1] onto a white-to-red (positive) or
    /// white-to-blue (negative) diverging scale.
    pub fn coefficient_color(r: f64) -> Color32 {
        let t = r.clamp(-1.0, 1.0) as f32;
        let base = if t >= 0.0 {
            POSITIVE_COLOR
        } else {
            NEGATIVE_COLOR
        };
        Self::lerp_color(Color32::WHITE, base, t.abs())
    }

    fn lerp_color(from: Color32, to: Color32, t: f32) -> Color32 {
        let lerp = |a: u8, b: u8| (a as f32 + (b as f32 - a as f32) * t).round() as u8;
        Color32::from_rgb(
            lerp(from.r(), to.r()),
            lerp(from.g(), to.g()),
            lerp(from.b(), to.b()),
        )
    }
}
