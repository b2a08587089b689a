//! Forecast request and response records.
//!
//! These types mirror the wire schema of the generation-forecast endpoint:
//!
//! ```json
//! // request
//! { "Ano": 2024, "Mes": 5, "Dia": 17, "CodigosUsinas": ["VLAB2", "VLAMZ"] }
//!
//! // response
//! {
//!   "Usinas": [
//!     {
//!       "Codigo": "VLAB2",
//!       "DadoInsumoPatamar": [
//!         { "PatamarHora": "00:30", "PatamarValor_PRE": 12.5 }
//!       ]
//!     }
//!   ]
//! }
//! ```
//!
//! Required fields are not defaulted, so a response that drifts from this
//! shape fails to deserialize instead of yielding silently empty data.

use chrono::{Datelike, Days, NaiveDate};
use serde::{Deserialize, Deserializer, Serialize};
use std::collections::HashSet;
use std::fmt;

use super::plant::PlantCode;
use crate::error::CoreError;

/// Server-imposed limit on plants per forecast request.
pub const MAX_PLANTS_PER_REQUEST: usize = 10;

// ============================================================================
// Request
// ============================================================================

/// Body of one forecast request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ForecastRequest {
    /// Calendar year.
    #[serde(rename = "Ano")]
    pub year: i32,
    /// Calendar month (1-12).
    #[serde(rename = "Mes")]
    pub month: u32,
    /// Day of month (1-31).
    #[serde(rename = "Dia")]
    pub day: u32,
    /// Plants in this batch.
    #[serde(rename = "CodigosUsinas")]
    pub plants: Vec<PlantCode>,
}

impl ForecastRequest {
    /// Builds a request for `date` covering `plants`.
    ///
    /// # Errors
    ///
    /// Returns `CoreError::BatchTooLarge` if more than
    /// [`MAX_PLANTS_PER_REQUEST`] plants are given.
    pub fn new(date: NaiveDate, plants: &[PlantCode]) -> Result<Self, CoreError> {
        if plants.len() > MAX_PLANTS_PER_REQUEST {
            return Err(CoreError::BatchTooLarge {
                size: plants.len(),
                limit: MAX_PLANTS_PER_REQUEST,
            });
        }

        Ok(Self {
            year: date.year(),
            month: date.month(),
            day: date.day(),
            plants: plants.to_vec(),
        })
    }
}

// ============================================================================
// Response
// ============================================================================

/// One time-slot entry of a plant forecast.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SlotValue {
    /// Slot label as reported by the API (e.g. "00:30", "24:00:00").
    #[serde(rename = "PatamarHora")]
    pub label: String,
    /// Forecast generation in MW. `None` when the API has no value.
    #[serde(rename = "PatamarValor_PRE", default)]
    pub value: Option<f64>,
}

/// Forecast for one plant on one day.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ForecastRecord {
    /// Plant code.
    #[serde(rename = "Codigo")]
    pub code: PlantCode,
    /// Time-slot values in the order the API returned them. Missing or
    /// null means no slots.
    #[serde(rename = "DadoInsumoPatamar", default, deserialize_with = "null_as_empty")]
    pub slots: Vec<SlotValue>,
}

fn null_as_empty<'de, D>(deserializer: D) -> Result<Vec<SlotValue>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<Vec<SlotValue>>::deserialize(deserializer)?.unwrap_or_default())
}

impl ForecastRecord {
    /// Returns the value reported for `label`, if any.
    pub fn value_at(&self, label: &str) -> Option<f64> {
        self.slots
            .iter()
            .find(|slot| slot.label == label)
            .and_then(|slot| slot.value)
    }
}

/// Body of a successful forecast response.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GenerationResponse {
    /// One record per plant the server had data for.
    #[serde(rename = "Usinas")]
    pub plants: Vec<ForecastRecord>,
}

impl GenerationResponse {
    /// Parses a response body.
    ///
    /// # Errors
    ///
    /// Returns `CoreError::Serialization` if the body does not match the
    /// expected schema.
    pub fn from_json(body: &str) -> Result<Self, CoreError> {
        Ok(serde_json::from_str(body)?)
    }
}

// ============================================================================
// Merged Forecast
// ============================================================================

/// All plant records fetched for one date, across every batch.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MergedForecast {
    /// Date the forecast covers.
    pub date: NaiveDate,
    records: Vec<ForecastRecord>,
}

impl MergedForecast {
    /// Creates an empty forecast for `date`.
    pub fn new(date: NaiveDate) -> Self {
        Self {
            date,
            records: Vec::new(),
        }
    }

    /// Appends the records of one batch.
    ///
    /// # Errors
    ///
    /// Returns `CoreError::DuplicatePlant` if a plant is already present,
    /// either from an earlier batch or twice within `records`. Nothing is
    /// appended in that case.
    pub fn extend(&mut self, records: Vec<ForecastRecord>) -> Result<(), CoreError> {
        let mut seen: HashSet<&PlantCode> = self.records.iter().map(|r| &r.code).collect();
        for record in &records {
            if !seen.insert(&record.code) {
                return Err(CoreError::DuplicatePlant(record.code.to_string()));
            }
        }

        self.records.extend(records);
        Ok(())
    }

    /// Returns the record for `code`, if the server returned one.
    pub fn get(&self, code: &PlantCode) -> Option<&ForecastRecord> {
        self.records.iter().find(|r| &r.code == code)
    }

    /// Returns all records in fetch order.
    pub fn records(&self) -> &[ForecastRecord] {
        &self.records
    }

    /// Returns the number of plant records.
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Returns true if no records were fetched.
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

// ============================================================================
// Forecast Day
// ============================================================================

/// Which calendar day a forecast is requested for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ForecastDay {
    /// The reference date itself.
    Today,
    /// The day after the reference date.
    Tomorrow,
}

impl ForecastDay {
    /// Resolves this day against a reference date.
    ///
    /// Saturates at the reference date if adding a day would overflow the
    /// calendar range.
    pub fn date_from(self, reference: NaiveDate) -> NaiveDate {
        match self {
            Self::Today => reference,
            Self::Tomorrow => reference.checked_add_days(Days::new(1)).unwrap_or(reference),
        }
    }

    /// Returns the column suffix used by presenters.
    pub fn label(self) -> &'static str {
        match self {
            Self::Today => "Today",
            Self::Tomorrow => "Tomorrow",
        }
    }
}

impl fmt::Display for ForecastDay {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn codes(list: &[&str]) -> Vec<PlantCode> {
        list.iter().map(|c| PlantCode::new(*c).unwrap()).collect()
    }

    fn record(code: &str) -> ForecastRecord {
        ForecastRecord {
            code: PlantCode::new(code).unwrap(),
            slots: vec![],
        }
    }

    #[test]
    fn test_request_from_date() {
        let date = NaiveDate::from_ymd_opt(2024, 5, 17).unwrap();
        let req = ForecastRequest::new(date, &codes(&["VLAB2"])).unwrap();
        assert_eq!((req.year, req.month, req.day), (2024, 5, 17));
    }

    #[test]
    fn test_request_rejects_oversized_batch() {
        let date = NaiveDate::from_ymd_opt(2024, 5, 17).unwrap();
        let plants: Vec<PlantCode> = (0..11)
            .map(|i| PlantCode::new(format!("P{i}")).unwrap())
            .collect();
        let err = ForecastRequest::new(date, &plants).unwrap_err();
        assert!(matches!(err, CoreError::BatchTooLarge { size: 11, limit: 10 }));
    }

    #[test]
    fn test_merged_rejects_duplicate_across_batches() {
        let date = NaiveDate::from_ymd_opt(2024, 5, 17).unwrap();
        let mut merged = MergedForecast::new(date);
        merged.extend(vec![record("A"), record("B")]).unwrap();

        let err = merged.extend(vec![record("C"), record("A")]).unwrap_err();
        assert!(matches!(err, CoreError::DuplicatePlant(ref c) if c == "A"));
        // Nothing from the rejected batch is kept
        assert_eq!(merged.len(), 2);
    }

    #[test]
    fn test_merged_rejects_duplicate_within_batch() {
        let date = NaiveDate::from_ymd_opt(2024, 5, 17).unwrap();
        let mut merged = MergedForecast::new(date);
        assert!(merged.extend(vec![record("A"), record("A")]).is_err());
        assert!(merged.is_empty());
    }

    #[test]
    fn test_merged_lookup() {
        let date = NaiveDate::from_ymd_opt(2024, 5, 17).unwrap();
        let mut merged = MergedForecast::new(date);
        merged.extend(vec![record("A"), record("B")]).unwrap();

        assert!(merged.get(&PlantCode::new("B").unwrap()).is_some());
        assert!(merged.get(&PlantCode::new("Z").unwrap()).is_none());
    }

    #[test]
    fn test_forecast_day_resolution() {
        let date = NaiveDate::from_ymd_opt(2024, 12, 31).unwrap();
        assert_eq!(ForecastDay::Today.date_from(date), date);
        assert_eq!(
            ForecastDay::Tomorrow.date_from(date),
            NaiveDate::from_ymd_opt(2025, 1, 1).unwrap()
        );
    }

    #[test]
    fn test_value_at() {
        let rec = ForecastRecord {
            code: PlantCode::new("A").unwrap(),
            slots: vec![
                SlotValue { label: "00:30".into(), value: Some(1.5) },
                SlotValue { label: "01:00".into(), value: None },
            ],
        };
        assert_eq!(rec.value_at("00:30"), Some(1.5));
        assert_eq!(rec.value_at("01:00"), None);
        assert_eq!(rec.value_at("01:30"), None);
    }
}
