//! Slot-aligned series handed to presenters.
//!
//! A [`ForecastRecord`] lists values in whatever order and label format the
//! API used. Presenters need every plant aligned to the same fixed row set,
//! so this module projects records onto [`TIME_SLOTS`], keeping missing
//! slots as `None`.

use serde::Serialize;
use tracing::trace;

use super::forecast::{ForecastDay, ForecastRecord, MergedForecast};
use super::plant::PlantCode;
use super::slots::{SLOT_COUNT, TIME_SLOTS, slot_index};

// ============================================================================
// Plant Series
// ============================================================================

/// One plant's forecast aligned to [`TIME_SLOTS`].
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PlantSeries {
    /// Plant code.
    pub code: PlantCode,
    /// Values by slot index. `None` means the API had no value.
    pub values: Vec<Option<f64>>,
}

impl PlantSeries {
    /// Projects a record onto the fixed slots.
    ///
    /// Labels that match no slot are dropped. If a label repeats, the last
    /// occurrence wins.
    pub fn from_record(record: &ForecastRecord) -> Self {
        let mut values = vec![None; SLOT_COUNT];
        for slot in &record.slots {
            match slot_index(&slot.label) {
                Some(idx) => values[idx] = slot.value,
                None => trace!(plant = %record.code, label = %slot.label, "Ignoring unknown slot label"),
            }
        }

        Self {
            code: record.code.clone(),
            values,
        }
    }

    /// Returns the largest value present, if any.
    pub fn max(&self) -> Option<f64> {
        self.values.iter().flatten().copied().reduce(f64::max)
    }

    /// Returns the number of slots with a value.
    pub fn filled(&self) -> usize {
        self.values.iter().filter(|v| v.is_some()).count()
    }

    /// Iterates `(label, value)` pairs in slot order.
    pub fn iter(&self) -> impl Iterator<Item = (&'static str, Option<f64>)> + '_ {
        TIME_SLOTS.iter().copied().zip(self.values.iter().copied())
    }
}

// ============================================================================
// Forecast Table
// ============================================================================

/// One column of the forecast table.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ForecastColumn {
    /// Day this column belongs to.
    pub day: ForecastDay,
    /// Slot-aligned values.
    pub series: PlantSeries,
}

impl ForecastColumn {
    /// Returns the column header, e.g. `VLAB2 (Today)`.
    pub fn header(&self) -> String {
        format!("{} ({})", self.series.code, self.day.label())
    }
}

/// Columns for every selected plant and day, ready for rendering.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ForecastTable {
    /// Columns grouped by plant, then by day.
    pub columns: Vec<ForecastColumn>,
}

impl ForecastTable {
    /// Builds the table for `selected` plants from the fetched days.
    ///
    /// Columns follow the selection order, and each plant's days sit next to
    /// each other in the order given. A plant absent from a day's forecast
    /// gets no column for that day.
    pub fn build(selected: &[PlantCode], days: &[(ForecastDay, &MergedForecast)]) -> Self {
        let mut columns = Vec::new();
        for code in selected {
            for (day, forecast) in days {
                if let Some(record) = forecast.get(code) {
                    columns.push(ForecastColumn {
                        day: *day,
                        series: PlantSeries::from_record(record),
                    });
                }
            }
        }

        Self { columns }
    }

    /// Returns true if there is nothing to render.
    pub fn is_empty(&self) -> bool {
        self.columns.is_empty()
    }

    /// Returns the largest value across all columns.
    pub fn max_value(&self) -> Option<f64> {
        self.columns
            .iter()
            .filter_map(|c| c.series.max())
            .reduce(f64::max)
    }

    /// Iterates table rows as `(label, values)` in slot order.
    pub fn rows(&self) -> impl Iterator<Item = (&'static str, Vec<Option<f64>>)> + '_ {
        TIME_SLOTS.iter().enumerate().map(|(idx, label)| {
            let values = self
                .columns
                .iter()
                .map(|c| c.series.values[idx])
                .collect();
            (*label, values)
        })
    }
}
