//! Error taxonomy for dataset loading and nearest-match lookups.

use thiserror::Error;

use crate::source::SourceKind;

/// Everything that can make a single lookup fail.
///
/// Messages are written for the caller, not the server log: they carry the
/// upstream error text or the expected/actual column lists so format drift
/// can be diagnosed from the response alone.
#[derive(Debug, Error)]
pub enum LookupError {
    /// The remote fetch failed (transport error, timeout, non-success status).
    #[error("{source_kind} data source unavailable: {detail}")]
    SourceUnavailable {
        source_kind: SourceKind,
        detail: String,
    },

    /// The fetched columns could not be resolved to the canonical schema.
    #[error("data source format issue: expected columns {expected:?}, but got {actual:?}")]
    Schema {
        expected: Vec<String>,
        actual: Vec<String>,
    },

    /// The body could not be read as delimited text or records at all.
    #[error("data source returned unreadable content: {0}")]
    Parse(String),

    /// Query coordinates must be finite numbers.
    #[error("invalid query coordinate: lat={lat}, lon={lon}")]
    InvalidQuery { lat: f64, lon: f64 },

    /// The source produced zero usable rows.
    #[error("no data found in the data source")]
    EmptyTable,

    #[error("invalid configuration: {0}")]
    InvalidConfig(String),
}

impl LookupError {
    pub fn unavailable(source_kind: SourceKind, detail: impl std::fmt::Display) -> Self {
        LookupError::SourceUnavailable {
            source_kind,
            detail: detail.to_string(),
        }
    }
}

pub type Result<T> = std::result::Result<T, LookupError>;
