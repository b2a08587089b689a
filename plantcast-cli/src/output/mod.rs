//! Output formatting for CLI.

mod chart;
mod json;
mod text;

pub use chart::ChartRenderer;
pub use json::JsonFormatter;
pub use text::TextFormatter;
#[cfg(test)]
mod tests;
