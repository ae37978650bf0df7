//! Helios - nearest solar irradiance lookup over a remote tabular dataset
//!
//! The library fetches the dataset from one configured source, normalizes it
//! to the canonical six-column table, and returns the closest row's values.
//! The `query` and `lookup` binaries are thin boundaries around
//! [`SolarService::lookup`].

pub mod config;
pub mod error;
pub mod loader;
pub mod models;
pub mod nearest;
pub mod service;
pub mod source;

pub use config::{Config, Credentials};
pub use error::LookupError;
pub use loader::{DatasetLoader, LoaderOptions};
pub use models::{Column, Irradiance, LookupResult, SolarRow, Table};
pub use nearest::{find_nearest, validate_query};
pub use service::SolarService;
pub use source::{FetchRaw, RawData, Source, SourceKind};
