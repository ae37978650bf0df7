//! Dataset loader: fetch, parse, normalize.

mod parse;
mod schema;

use tracing::{debug, info};

use crate::error::{LookupError, Result};
use crate::models::Table;
use crate::source::{FetchRaw, RawData, Source};

pub use parse::{parse_raw, RawTable};
pub use schema::{coerce, normalize, resolve_columns, ColumnMap};

/// Per-deployment loading behaviour
#[derive(Debug, Clone, PartialEq)]
pub struct LoaderOptions {
    /// Discard rows whose latitude or longitude is exactly 0
    pub drop_zero_coordinates: bool,
    /// Header names for delimited sources that ship without a header row
    pub headers: Option<Vec<String>>,
    pub delimiter: u8,
}

impl Default for LoaderOptions {
    fn default() -> Self {
        Self {
            drop_zero_coordinates: false,
            headers: None,
            delimiter: b',',
        }
    }
}

/// Loads a fresh [`Table`] from its source on every call.
#[derive(Debug, Clone)]
pub struct DatasetLoader<S = Source> {
    source: S,
    options: LoaderOptions,
}

impl<S: FetchRaw> DatasetLoader<S> {
    pub fn new(source: S, options: LoaderOptions) -> Self {
        Self { source, options }
    }

    pub fn source(&self) -> &S {
        &self.source
    }

    /// Fetch once and build the canonical table.
    pub async fn load(&self) -> Result<Table> {
        let raw = self.source.fetch_raw().await?;
        let table = build_table(raw, &self.options)?;
        info!(
            "Loaded {} rows from {} source",
            table.len(),
            self.source.kind()
        );
        Ok(table)
    }
}

/// Parse, resolve the schema, coerce, and apply the zero-coordinate filter.
pub fn build_table(raw: RawData, options: &LoaderOptions) -> Result<Table> {
    if raw.is_empty() {
        return Err(LookupError::EmptyTable);
    }

    let raw = parse_raw(raw, options.delimiter, options.headers.as_deref())?;
    if raw.is_empty() {
        return Err(LookupError::EmptyTable);
    }

    let table = normalize(&raw)?;
    if !options.drop_zero_coordinates {
        return Ok(table);
    }

    let before = table.len();
    let kept: Table = table
        .iter()
        .filter(|row| !row.has_zero_coordinate())
        .copied()
        .collect();
    debug!(
        "Dropped {} rows with zero latitude/longitude",
        before - kept.len()
    );
    Ok(kept)
}
