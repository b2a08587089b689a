//! Domain models for Plantcast.
//!
//! ## Submodules
//!
//! - [`auth`] - Credentials and token pairs
//! - [`plant`] - Plant codes and the default catalog
//! - [`slots`] - The fixed half-hour time-slot labels
//! - [`forecast`] - Wire-level request/response records and merged results
//! - [`series`] - Slot-aligned series for presenters

mod auth;
mod forecast;
mod plant;
mod series;
mod slots;

// Re-export everything at the models level
pub use auth::{Credentials, TokenPair};
pub use forecast::{
    ForecastDay, ForecastRecord, ForecastRequest, GenerationResponse, MAX_PLANTS_PER_REQUEST,
    MergedForecast, SlotValue,
};
pub use plant::{DEFAULT_PLANTS, PlantCode, default_catalog};
pub use series::{ForecastColumn, ForecastTable, PlantSeries};
pub use slots::{SLOT_COUNT, TIME_SLOTS, slot_index};
