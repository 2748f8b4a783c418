//! Charts module - chart drawing and static rendering

mod plotter;
mod renderer;

pub use plotter::ChartPlotter;
pub use renderer::{RenderError, StaticChartRenderer};
