// Lint configuration for this crate
#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::must_use_candidate)]

//! # Plantcast Core
//!
//! Core types and models for the Plantcast forecast viewer.
//!
//! This crate provides the foundational abstractions used across all other
//! Plantcast crates, including:
//!
//! - Session credentials and token pairs
//! - The plant catalog and the fixed half-hour time-slot labels
//! - Wire-level forecast request/response records
//! - Presenter-facing series aligned to the time slots
//!
//! ## Key Types
//!
//! ### Auth
//! - [`Credentials`] - Login/password supplied by the user
//! - [`TokenPair`] - Access + refresh token issued by the API
//!
//! ### Forecast
//! - [`PlantCode`] - Opaque plant identifier
//! - [`ForecastRequest`] - One batch request (at most 10 plants)
//! - [`ForecastRecord`] - One plant's forecast for a day
//! - [`MergedForecast`] - All records for one date
//! - [`ForecastDay`] - Today / Tomorrow selector
//!
//! ### Presentation
//! - [`PlantSeries`] - Values aligned to [`TIME_SLOTS`]
//! - [`ForecastTable`] - Columns for every selected plant and day

pub mod error;
pub mod models;

// Re-export error types
pub use error::CoreError;

// Re-export all model types
pub use models::{
    // Auth
    Credentials,
    TokenPair,
    // Plants
    DEFAULT_PLANTS,
    PlantCode,
    default_catalog,
    // Time slots
    SLOT_COUNT,
    TIME_SLOTS,
    slot_index,
    // Forecast
    ForecastDay,
    ForecastRecord,
    ForecastRequest,
    GenerationResponse,
    MAX_PLANTS_PER_REQUEST,
    MergedForecast,
    SlotValue,
    // Presentation
    ForecastColumn,
    ForecastTable,
    PlantSeries,
};
