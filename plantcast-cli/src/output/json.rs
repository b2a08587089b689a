//! JSON output formatting.

use anyhow::Result;
use plantcast_core::{ForecastDay, MergedForecast, PlantCode, PlantSeries};
use serde::Serialize;

// ============================================================================
// Output Types
// ============================================================================

/// Top-level forecast output.
#[derive(Debug, Serialize)]
pub struct ForecastOutput {
    pub days: Vec<DayOutput>,
}

/// One requested day.
#[derive(Debug, Serialize)]
pub struct DayOutput {
    pub day: ForecastDay,
    /// ISO date (`YYYY-MM-DD`).
    pub date: String,
    pub plants: Vec<PlantOutput>,
}

/// One plant's slots for a day.
#[derive(Debug, Serialize)]
pub struct PlantOutput {
    pub code: PlantCode,
    pub slots: Vec<SlotOutput>,
}

/// A single slot; `value` is `null` when the API had none.
#[derive(Debug, Serialize)]
pub struct SlotOutput {
    pub label: &'static str,
    pub value: Option<f64>,
}

// ============================================================================
// JSON Formatter
// ============================================================================

/// JSON formatter.
pub struct JsonFormatter {
    pretty: bool,
}

impl JsonFormatter {
    /// Creates a new JSON formatter.
    pub fn new(pretty: bool) -> Self {
        Self { pretty }
    }

    /// Formats any serializable value.
    pub fn format<T: Serialize>(&self, data: &T) -> Result<String> {
        let json = if self.pretty {
            serde_json::to_string_pretty(data)?
        } else {
            serde_json::to_string(data)?
        };
        Ok(json)
    }

    /// Formats fetched days for the selected plants.
    pub fn format_forecast(
        &self,
        days: &[(ForecastDay, MergedForecast)],
        selected: &[PlantCode],
    ) -> Result<String> {
        self.format(&Self::forecast_output(days, selected))
    }

    /// Builds the output tree; plants missing from a day are left out.
    pub fn forecast_output(
        days: &[(ForecastDay, MergedForecast)],
        selected: &[PlantCode],
    ) -> ForecastOutput {
        let days = days
            .iter()
            .map(|(day, forecast)| DayOutput {
                day: *day,
                date: forecast.date.format("%Y-%m-%d").to_string(),
                plants: selected
                    .iter()
                    .filter_map(|code| forecast.get(code))
                    .map(|record| {
                        let series = PlantSeries::from_record(record);
                        PlantOutput {
                            slots: series
                                .iter()
                                .map(|(label, value)| SlotOutput { label, value })
                                .collect(),
                            code: series.code,
                        }
                    })
                    .collect(),
            })
            .collect();

        ForecastOutput { days }
    }
}

// ============================================================================
// Tests
// ============================================================================
