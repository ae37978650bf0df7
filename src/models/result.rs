//! Lookup output as returned to callers.

use serde::{Deserialize, Serialize};

use crate::error::LookupError;

/// The four fields projected from the matched row.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Irradiance {
    #[serde(rename = "TEMP")]
    pub temp: f64,
    #[serde(rename = "GHI")]
    pub ghi: f64,
    #[serde(rename = "DNI")]
    pub dni: f64,
    #[serde(rename = "DIF")]
    pub dif: f64,
}

/// Either all four fields, or exactly `{"error": "..."}`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum LookupResult {
    Found(Irradiance),
    Error { error: String },
}

impl LookupResult {
    pub fn is_error(&self) -> bool {
        matches!(self, LookupResult::Error { .. })
    }
}

impl From<Result<Irradiance, LookupError>> for LookupResult {
    fn from(result: Result<Irradiance, LookupError>) -> Self {
        match result {
            Ok(irradiance) => LookupResult::Found(irradiance),
            Err(e) => LookupResult::Error {
                error: e.to_string(),
            },
        }
    }
}
