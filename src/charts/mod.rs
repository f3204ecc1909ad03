//! Charts module - Chart data and rendering

mod chart_data;
mod plotter;
mod renderer;

pub use chart_data::ChartData;
pub use plotter::ChartPlotter;
pub use renderer::StaticChartRenderer;
