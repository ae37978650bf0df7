//! Remote data sources.
//!
//! Every backend exposes the same [`FetchRaw`] capability. The concrete
//! backend is picked once from configuration and wrapped in [`Source`].

mod http;
mod object_store;
mod sheets;

use std::future::Future;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::config::{Credentials, SourceConfig};
use crate::error::{LookupError, Result};

pub use http::HttpSource;
pub use object_store::{resolve_object_url, ObjectStoreSource};
pub use sheets::SheetsSource;

const USER_AGENT: &str = "helios/0.1 (solar irradiance lookup)";

/// Which backend a source talks to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SourceKind {
    Sheets,
    Http,
    ObjectStore,
}

impl std::fmt::Display for SourceKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SourceKind::Sheets => write!(f, "spreadsheet"),
            SourceKind::Http => write!(f, "http"),
            SourceKind::ObjectStore => write!(f, "object storage"),
        }
    }
}

/// Untyped content as it came off the wire.
#[derive(Debug, Clone, PartialEq)]
pub enum RawData {
    /// Delimited text, header row optional
    Delimited(Vec<u8>),
    /// Key-value rows. `rows[i][j]` belongs to `headers[j]`.
    Records {
        headers: Vec<String>,
        rows: Vec<Vec<serde_json::Value>>,
    },
}

impl RawData {
    pub fn is_empty(&self) -> bool {
        match self {
            RawData::Delimited(bytes) => bytes.iter().all(|b| b.is_ascii_whitespace()),
            RawData::Records { headers, rows } => headers.is_empty() && rows.is_empty(),
        }
    }
}

/// Capability to pull raw tabular content from somewhere.
pub trait FetchRaw {
    fn kind(&self) -> SourceKind;

    /// One outbound request per call; no caching.
    fn fetch_raw(&self) -> impl Future<Output = Result<RawData>> + Send;
}

/// The configured backend.
#[derive(Debug, Clone)]
pub enum Source {
    Sheets(SheetsSource),
    Http(HttpSource),
    ObjectStore(ObjectStoreSource),
}

impl Source {
    pub fn from_config(
        config: &SourceConfig,
        credentials: &Credentials,
        timeout: Duration,
    ) -> Result<Self> {
        let client = build_client(timeout)?;
        let source = match config {
            SourceConfig::Sheets {
                spreadsheet_id,
                worksheet,
            } => Source::Sheets(SheetsSource::new(
                client,
                spreadsheet_id,
                worksheet,
                credentials,
            )?),
            SourceConfig::Http { url } => Source::Http(HttpSource::new(client, url)?),
            SourceConfig::ObjectStore { url, region } => Source::ObjectStore(
                ObjectStoreSource::new(client, url, region.as_deref(), credentials)?,
            ),
        };
        Ok(source)
    }
}

impl FetchRaw for Source {
    fn kind(&self) -> SourceKind {
        match self {
            Source::Sheets(s) => s.kind(),
            Source::Http(s) => s.kind(),
            Source::ObjectStore(s) => s.kind(),
        }
    }

    async fn fetch_raw(&self) -> Result<RawData> {
        match self {
            Source::Sheets(s) => s.fetch_raw().await,
            Source::Http(s) => s.fetch_raw().await,
            Source::ObjectStore(s) => s.fetch_raw().await,
        }
    }
}

/// Shared client; the timeout is what turns a hung fetch into `SourceUnavailable`.
pub fn build_client(timeout: Duration) -> Result<reqwest::Client> {
    reqwest::Client::builder()
        .user_agent(USER_AGENT)
        .timeout(timeout)
        .build()
        .map_err(|e| LookupError::InvalidConfig(format!("failed to create HTTP client: {}", e)))
}
