//! Plant identifiers and the default catalog.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::CoreError;

/// Plants shown when the configuration does not override the catalog.
pub const DEFAULT_PLANTS: [&str; 11] = [
    "VLAB2", "VLAMZ", "VLARN", "VLCAN", "VLCARC", "VLCNB", "VLFIG", "VLMNV", "VLSDMA", "VLSDMC",
    "VLSM2A",
];

/// Opaque code identifying a generation plant (e.g. `VLAB2`).
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PlantCode(String);

impl PlantCode {
    /// Creates a plant code, rejecting empty or whitespace-bearing input.
    ///
    /// # Errors
    ///
    /// Returns `CoreError::InvalidPlantCode` if the code is empty or
    /// contains whitespace.
    pub fn new(code: impl Into<String>) -> Result<Self, CoreError> {
        let code = code.into();
        if code.is_empty() || code.chars().any(char::is_whitespace) {
            return Err(CoreError::InvalidPlantCode(code));
        }
        Ok(Self(code))
    }

    /// Returns the code as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for PlantCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl FromStr for PlantCode {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s.trim())
    }
}

impl AsRef<str> for PlantCode {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// Returns the default plant catalog as typed codes.
pub fn default_catalog() -> Vec<PlantCode> {
    DEFAULT_PLANTS
        .iter()
        .map(|code| PlantCode((*code).to_string()))
        .collect()
}
