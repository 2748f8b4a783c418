//! Static Chart Renderer
//! Renders the current trend chart and correlation heatmap into an
//! in-memory PNG for the export button.

use crate::stats::{CorrelationMatrix, YearlyTrend};
use image::{DynamicImage, ImageFormat, RgbImage};
use plotters::coord::Shift;
use plotters::prelude::*;
use std::io::Cursor;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum RenderError {
    #[error("Chart rendering failed: {0}")]
    Draw(String),
    #[error("PNG encoding failed: {0}")]
    Encode(#[from] image::ImageError),
}

fn draw_err<E: std::fmt::Display>(e: E) -> RenderError {
    RenderError::Draw(e.to_string())
}

const TREND_RGB: RGBColor = RGBColor(52, 152, 219);

/// Renders dashboard images off-screen for export.
pub struct StaticChartRenderer;

impl StaticChartRenderer {
    /// Render the trend chart (top half) and heatmap (bottom half) into
    /// PNG bytes.
    pub fn render_dashboard_to_bytes(
        trend: &YearlyTrend,
        matrix: &CorrelationMatrix,
        width: u32,
        height: u32,
    ) -> Result<Vec<u8>, RenderError> {
        let mut buffer = vec![0u8; (width * height * 3) as usize];
        {
            let root =
                BitMapBackend::with_buffer(&mut buffer, (width, height)).into_drawing_area();
            root.fill(&WHITE).map_err(draw_err)?;

            let (top, bottom) = root.split_vertically((height / 2) as i32);
            Self::draw_trend(&top, trend)?;
            Self::draw_heatmap(&bottom, matrix)?;

            root.present().map_err(draw_err)?;
        }

        let img = RgbImage::from_raw(width, height, buffer)
            .ok_or_else(|| RenderError::Draw("pixel buffer size mismatch".to_string()))?;
        let mut png = Vec::new();
        DynamicImage::ImageRgb8(img).write_to(&mut Cursor::new(&mut png), ImageFormat::Png)?;
        Ok(png)
    }

    fn draw_trend(
        area: &DrawingArea<BitMapBackend, Shift>,
        trend: &YearlyTrend,
    ) -> Result<(), RenderError> {
        let points: Vec<(i32, f64)> = trend
            .points
            .iter()
            .filter_map(|p| p.mean.map(|mean| (p.year, mean)))
            .collect();

        if points.is_empty() {
            area.draw(&Text::new(
                "No data".to_string(),
                (40, 40),
                ("sans-serif", 24).into_font(),
            ))
            .map_err(draw_err)?;
            return Ok(());
        }

        let x_min = points.first().map(|p| p.0).unwrap_or(0);
        let x_max = points.last().map(|p| p.0).unwrap_or(0);
        let y_min = points.iter().map(|p| p.1).fold(f64::INFINITY, f64::min);
        let y_max = points.iter().map(|p| p.1).fold(f64::NEG_INFINITY, f64::max);
        let pad = ((y_max - y_min) * 0.1).max(1.0);

        let mut chart = ChartBuilder::on(area)
            .caption(
                format!("Average {} Level by Year", trend.field),
                ("sans-serif", 28),
            )
            .margin(20)
            .x_label_area_size(45)
            .y_label_area_size(70)
            .build_cartesian_2d((x_min - 1)..(x_max + 1), (y_min - pad)..(y_max + pad))
            .map_err(draw_err)?;

        chart
            .configure_mesh()
            .x_desc("Year")
            .y_desc(format!("Average {}", trend.field))
            .x_labels((x_max - x_min + 3) as usize)
            .draw()
            .map_err(draw_err)?;

        chart
            .draw_series(LineSeries::new(points.iter().copied(), &TREND_RGB))
            .map_err(draw_err)?;
        chart
            .draw_series(
                points
                    .iter()
                    .map(|&(x, y)| Circle::new((x, y), 4, TREND_RGB.filled())),
            )
            .map_err(draw_err)?;

        Ok(())
    }

    fn draw_heatmap(
        area: &DrawingArea<BitMapBackend, Shift>,
        matrix: &CorrelationMatrix,
    ) -> Result<(), RenderError> {
        let n = matrix.size() as i32;
        if n == 0 {
            return Ok(());
        }

        let (w, h) = area.dim_in_pixel();
        let margin_left = 120i32;
        let margin_top = 50i32;
        let margin_bottom = 40i32;
        let cell = ((w as i32 - margin_left - 20)
            .min(h as i32 - margin_top - margin_bottom)
            / n)
            .max(10);

        let title = format!(
            "Correlation Heatmap between {}",
            matrix.fields.join(" and ")
        );
        area.draw(&Text::new(
            title,
            (margin_left, 15),
            ("sans-serif", 26).into_font(),
        ))
        .map_err(draw_err)?;

        for row in 0..n {
            for col in 0..n {
                let x0 = margin_left + col * cell;
                let y0 = margin_top + row * cell;
                let bounds = [(x0 + 1, y0 + 1), (x0 + cell - 1, y0 + cell - 1)];
                match matrix.get(row as usize, col as usize) {
                    Some(r) => {
                        area.draw(&Rectangle::new(bounds, Self::coefficient_rgb(r).filled()))
                            .map_err(draw_err)?;
                        let label_color = if r.abs() > 0.6 { &WHITE } else { &BLACK };
                        area.draw(&Text::new(
                            format!("{:.2}", r),
                            (x0 + cell / 2 - 18, y0 + cell / 2 - 9),
                            ("sans-serif", 20).into_font().color(label_color),
                        ))
                        .map_err(draw_err)?;
                    }
                    None => {
                        // Undefined statistic: blank grey cell.
                        area.draw(&Rectangle::new(bounds, RGBColor(210, 210, 210).filled()))
                            .map_err(draw_err)?;
                    }
                }
            }
        }

        for (i, field) in matrix.fields.iter().enumerate() {
            let i = i as i32;
            area.draw(&Text::new(
                field.clone(),
                (15, margin_top + i * cell + cell / 2 - 8),
                ("sans-serif", 18).into_font(),
            ))
            .map_err(draw_err)?;
            area.draw(&Text::new(
                field.clone(),
                (margin_left + i * cell + cell / 2 - 22, margin_top + n * cell + 10),
                ("sans-serif", 18).into_font(),
            ))
            .map_err(draw_err)?;
        }

        Ok(())
    }

    /// White-to-red for positive coefficients, white-to-blue for
    /// negative, matching the interactive heatmap.
    fn coefficient_rgb(r: f64) -> RGBColor {
        let t = r.clamp(-1.0, 1.0);
        let (br, bg, bb) = if t >= 0.0 {
            (178.0, 24.0, 43.0)
        } else {
            (33.0, 102.0, 172.0)
        };
        let a = t.abs();
        let lerp = |base: f64| (255.0 + (base - 255.0) * a).round() as u8;
        RGBColor(lerp(br), lerp(bg), lerp(bb))
    }
}
