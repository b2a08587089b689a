//! Terminal chart: one sparkline per plant and day.
//!
//! Each line has one cell per time slot, scaled against the largest value
//! in the whole table so lines are comparable. Slots without a value stay
//! blank. Tomorrow's lines are dimmed.

use plantcast_core::{ForecastDay, ForecastTable, TIME_SLOTS};

use super::text::{BOLD, DIM, RESET};

/// Sparkline levels, lowest to highest.
const LEVELS: [char; 8] = ['▁', '▂', '▃', '▄', '▅', '▆', '▇', '█'];

/// 256-color palette stepping the hue wheel in 40 degree increments.
const PALETTE: [u8; 9] = [196, 208, 148, 46, 43, 39, 21, 129, 201];

/// Renders a [`ForecastTable`] as sparklines.
pub struct ChartRenderer {
    use_colors: bool,
}

impl ChartRenderer {
    /// Creates a new chart renderer.
    pub fn new(use_colors: bool) -> Self {
        Self { use_colors }
    }

    /// Renders every column of `table` as one labelled line.
    pub fn render(&self, table: &ForecastTable) -> String {
        let max = table.max_value().unwrap_or(0.0);
        let label_width = table
            .columns
            .iter()
            .map(|c| c.header().chars().count())
            .max()
            .unwrap_or(0);

        let mut plant_order: Vec<&str> = Vec::new();
        let mut lines = Vec::with_capacity(table.columns.len() + 2);

        lines.push(self.bold(&format!("Generation (max {max:.2} MW)")));

        for column in &table.columns {
            let code = column.series.code.as_str();
            let color_idx = match plant_order.iter().position(|c| *c == code) {
                Some(idx) => idx,
                None => {
                    plant_order.push(code);
                    plant_order.len() - 1
                }
            };

            let dimmed = column.day == ForecastDay::Tomorrow;
            let spark = sparkline(&column.series.values, max);
            let peak = column
                .series
                .max()
                .map_or_else(|| "-".to_string(), |v| format!("{v:.2}"));
            let label = format!("{:<label_width$}", column.header());

            let line = if dimmed {
                format!(
                    "{} │{}│ {}",
                    self.dim(&label),
                    self.colorize(color_idx, &spark, true),
                    self.dim(&peak)
                )
            } else {
                format!(
                    "{label} │{}│ {peak}",
                    self.colorize(color_idx, &spark, false)
                )
            };
            lines.push(line);
        }

        lines.push(axis(label_width));
        lines.join("\n")
    }

    fn colorize(&self, idx: usize, text: &str, dimmed: bool) -> String {
        if self.use_colors {
            let dim = if dimmed { "2;" } else { "" };
            format!("\x1b[{dim}38;5;{}m{text}{RESET}", PALETTE[idx % PALETTE.len()])
        } else {
            text.to_string()
        }
    }

    fn bold(&self, text: &str) -> String {
        if self.use_colors {
            format!("{BOLD}{text}{RESET}")
        } else {
            text.to_string()
        }
    }

    fn dim(&self, text: &str) -> String {
        if self.use_colors {
            format!("{DIM}{text}{RESET}")
        } else {
            text.to_string()
        }
    }
}

/// Maps values to sparkline cells; `None` becomes a space.
pub fn sparkline(values: &[Option<f64>], max: f64) -> String {
    values
        .iter()
        .map(|value| match value {
            None => ' ',
            Some(v) => LEVELS[level(*v, max)],
        })
        .collect()
}

#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
fn level(value: f64, max: f64) -> usize {
    if max <= 0.0 || !value.is_finite() {
        return 0;
    }
    let top = (LEVELS.len() - 1) as f64;
    ((value.max(0.0) / max) * top).round().min(top) as usize
}

/// Time axis under the chart, marking the first and last slot.
fn axis(label_width: usize) -> String {
    let first = TIME_SLOTS[0];
    let last = TIME_SLOTS[TIME_SLOTS.len() - 1];
    let span = TIME_SLOTS.len();
    let gap = span.saturating_sub(first.len() + last.len());
    format!("{:label_width$}  {first}{}{last}", "", " ".repeat(gap))
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sparkline_levels() {
        let values = [Some(0.0), Some(50.0), Some(100.0), None];
        assert_eq!(sparkline(&values, 100.0), "▁▅█ ");
    }

    #[test]
    fn test_sparkline_zero_max() {
        assert_eq!(sparkline(&[Some(0.0), None], 0.0), "▁ ");
    }

    #[test]
    fn test_level_clamps_negative_and_overflow() {
        assert_eq!(level(-5.0, 10.0), 0);
        assert_eq!(level(20.0, 10.0), LEVELS.len() - 1);
        assert_eq!(level(f64::NAN, 10.0), 0);
    }

    #[test]
    fn test_axis_spans_slots() {
        let line = axis(0);
        assert!(line.starts_with("  00:30"));
        assert!(line.ends_with("24:00:00"));
        assert_eq!(line.chars().count(), 2 + TIME_SLOTS.len());
    }
}
