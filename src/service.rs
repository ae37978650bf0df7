//! The single query the crate exposes: nearest irradiance for a coordinate.

use tracing::{debug, warn};

use crate::config::{Config, Credentials};
use crate::error::Result;
use crate::loader::DatasetLoader;
use crate::models::{Irradiance, LookupResult};
use crate::nearest::{find_nearest, validate_query};
use crate::source::{FetchRaw, Source, SourceKind};

/// Owns the configured loader. Holds no per-query state, so one instance is
/// shared across concurrent requests.
#[derive(Debug, Clone)]
pub struct SolarService<S = Source> {
    loader: DatasetLoader<S>,
}

impl SolarService<Source> {
    pub fn from_config(config: &Config, credentials: &Credentials) -> Result<Self> {
        let source = Source::from_config(&config.source, credentials, config.timeout())?;
        let loader = DatasetLoader::new(source, config.loader_options()?);
        Ok(Self::new(loader))
    }
}

impl<S: FetchRaw> SolarService<S> {
    pub fn new(loader: DatasetLoader<S>) -> Self {
        Self { loader }
    }

    pub fn source_kind(&self) -> SourceKind {
        self.loader.source().kind()
    }

    /// Fetch a fresh table and match against it.
    pub async fn try_lookup(&self, lat: f64, lon: f64) -> Result<Irradiance> {
        validate_query(lat, lon)?;
        let table = self.loader.load().await?;
        find_nearest(&table, lat, lon)
    }

    /// Like [`try_lookup`](Self::try_lookup) but folds failures into the
    /// `{error}` result instead of returning them.
    pub async fn lookup(&self, lat: f64, lon: f64) -> LookupResult {
        debug!("Lookup for ({}, {})", lat, lon);
        let result = self.try_lookup(lat, lon).await;
        if let Err(e) = &result {
            warn!("Lookup for ({}, {}) failed: {}", lat, lon, e);
        }
        LookupResult::from(result)
    }
}
