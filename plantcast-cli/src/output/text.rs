//! Text output: the forecast table, plant list and error lines.

use plantcast_core::{ForecastTable, PlantCode};

// ============================================================================
// ANSI Colors
// ============================================================================

pub(crate) const RESET: &str = "\x1b[0m";
pub(crate) const BOLD: &str = "\x1b[1m";
pub(crate) const DIM: &str = "\x1b[2m";
const RED: &str = "\x1b[31m";
const CYAN: &str = "\x1b[36m";

/// Header of the slot column.
const INTERVAL_HEADER: &str = "Interval";

/// Placeholder for a slot without a value.
const NO_VALUE: &str = "-";

/// Formats a slot value, keeping absent values distinct from zero.
pub fn format_value(value: Option<f64>) -> String {
    match value {
        Some(v) => format!("{v:.2} MW"),
        None => NO_VALUE.to_string(),
    }
}

/// Text formatter with optional colors.
pub struct TextFormatter {
    use_colors: bool,
}

impl TextFormatter {
    /// Creates a new text formatter.
    pub fn new(use_colors: bool) -> Self {
        Self { use_colors }
    }

    /// Formats the forecast table: one row per slot, one column per plant
    /// and day.
    pub fn format_table(&self, table: &ForecastTable) -> String {
        let headers: Vec<String> = table.columns.iter().map(|c| c.header()).collect();
        let rows: Vec<(&str, Vec<String>)> = table
            .rows()
            .map(|(label, values)| (label, values.into_iter().map(format_value).collect()))
            .collect();

        let label_width = rows
            .iter()
            .map(|(label, _)| label.chars().count())
            .chain(std::iter::once(INTERVAL_HEADER.len()))
            .max()
            .unwrap_or(INTERVAL_HEADER.len());

        let widths: Vec<usize> = headers
            .iter()
            .enumerate()
            .map(|(idx, header)| {
                rows.iter()
                    .map(|(_, cells)| cells[idx].chars().count())
                    .chain(std::iter::once(header.chars().count()))
                    .max()
                    .unwrap_or(0)
            })
            .collect();

        let mut lines = Vec::with_capacity(rows.len() + 2);

        // Pad before styling so escape codes don't skew alignment
        let mut header_line = self.bold(&format!("{INTERVAL_HEADER:<label_width$}"));
        for (header, width) in headers.iter().zip(&widths) {
            header_line.push_str("  ");
            header_line.push_str(&self.bold(&format!("{header:>width$}")));
        }
        lines.push(header_line);

        let total: usize = label_width + widths.iter().map(|w| w + 2).sum::<usize>();
        lines.push(self.dim(&"─".repeat(total)));

        for (label, cells) in &rows {
            let mut line = self.cyan(&format!("{label:<label_width$}"));
            for (cell, width) in cells.iter().zip(&widths) {
                line.push_str("  ");
                let padded = format!("{cell:>width$}");
                if cell == NO_VALUE {
                    line.push_str(&self.dim(&padded));
                } else {
                    line.push_str(&padded);
                }
            }
            lines.push(line);
        }

        lines.join("\n")
    }

    /// Message shown when nothing came back.
    pub fn format_no_data(&self) -> String {
        "No data available.".to_string()
    }

    /// Formats the plant catalog.
    pub fn format_plants(&self, plants: &[PlantCode]) -> String {
        let mut lines = vec![self.bold("Plants"), "─".repeat(20)];
        lines.extend(plants.iter().map(|p| format!("  {p}")));
        lines.push(String::new());
        lines.push(format!("Total: {} plants", plants.len()));
        lines.join("\n")
    }

    /// Formats the watch mode banner.
    pub fn format_watch_header(&self, time: &str, interval_secs: u64) -> String {
        format!(
            "{} - {} (refresh: {}s)\n{}",
            self.bold("Plantcast Watch Mode"),
            time,
            interval_secs,
            "─".repeat(50)
        )
    }

    /// Formats an error message.
    pub fn format_error(&self, context: &str, error: &str) -> String {
        format!("{}: {}", self.bold(context), self.red(error))
    }

    // ========================================================================
    // Color/style helpers
    // ========================================================================

    fn paint(&self, code: &str, text: &str) -> String {
        if self.use_colors {
            format!("{code}{text}{RESET}")
        } else {
            text.to_string()
        }
    }

    fn bold(&self, text: &str) -> String {
        self.paint(BOLD, text)
    }

    fn dim(&self, text: &str) -> String {
        self.paint(DIM, text)
    }

    fn red(&self, text: &str) -> String {
        self.paint(RED, text)
    }

    fn cyan(&self, text: &str) -> String {
        self.paint(CYAN, text)
    }
}

// ============================================================================
// Tests
// ============================================================================
