//! Objects in S3, GCS or Azure Blob storage, fetched over HTTPS.

use std::io::Read;

use flate2::read::GzDecoder;
use reqwest::Client;
use tracing::debug;
use url::Url;

use super::http::get_bytes;
use super::{FetchRaw, RawData, SourceKind};
use crate::config::Credentials;
use crate::error::{LookupError, Result};

#[derive(Clone)]
pub struct ObjectStoreSource {
    client: Client,
    url: Url,
    token: Option<String>,
}

impl std::fmt::Debug for ObjectStoreSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ObjectStoreSource")
            .field("url", &self.url.as_str())
            .field("authenticated", &self.token.is_some())
            .finish()
    }
}

impl ObjectStoreSource {
    pub fn new(
        client: Client,
        url: &str,
        region: Option<&str>,
        credentials: &Credentials,
    ) -> Result<Self> {
        Ok(Self {
            client,
            url: resolve_object_url(url, region)?,
            token: credentials.object_store_token.clone(),
        })
    }
}

const GZIP_MAGIC: [u8; 2] = [0x1f, 0x8b];

/// Gzip is detected from the body, not the key: objects served with
/// `Content-Encoding: gzip` are already decoded by the client.
fn is_gzipped(body: &[u8]) -> bool {
    body.starts_with(&GZIP_MAGIC)
}

impl FetchRaw for ObjectStoreSource {
    fn kind(&self) -> SourceKind {
        SourceKind::ObjectStore
    }

    async fn fetch_raw(&self) -> Result<RawData> {
        let body = get_bytes(
            &self.client,
            self.url.clone(),
            self.token.as_deref(),
            self.kind(),
        )
        .await?;

        if !is_gzipped(&body) {
            return Ok(RawData::Delimited(body));
        }

        let mut decoded = Vec::new();
        GzDecoder::new(body.as_slice())
            .read_to_end(&mut decoded)
            .map_err(|e| LookupError::Parse(format!("failed to decompress {}: {}", self.url, e)))?;
        debug!("Decompressed {} -> {} bytes", body.len(), decoded.len());
        Ok(RawData::Delimited(decoded))
    }
}

/// Map `s3://`, `gs://` and `az://` object URIs to their public HTTPS endpoints.
///
/// `az://account/container/key` uses the first path segment as the container.
/// Plain `http(s)://` URLs pass through untouched.
pub fn resolve_object_url(uri: &str, region: Option<&str>) -> Result<Url> {
    let parsed = Url::parse(uri)
        .map_err(|e| LookupError::InvalidConfig(format!("bad object url '{}': {}", uri, e)))?;

    let bucket = parsed.host_str().unwrap_or_default();
    let key = parsed.path().trim_start_matches('/');

    let https = match parsed.scheme() {
        "http" | "https" => return Ok(parsed),
        "s3" => match region {
            Some(region) if region != "us-east-1" => {
                format!("https://{}.s3.{}.amazonaws.com/{}", bucket, region, key)
            }
            _ => format!("https://{}.s3.amazonaws.com/{}", bucket, key),
        },
        "gs" => format!("https://storage.googleapis.com/{}/{}", bucket, key),
        "az" => format!("https://{}.blob.core.windows.net/{}", bucket, key),
        other => {
            return Err(LookupError::InvalidConfig(format!(
                "unsupported object store scheme '{}'",
                other
            )))
        }
    };

    if bucket.is_empty() || key.is_empty() {
        return Err(LookupError::InvalidConfig(format!(
            "object url '{}' needs both a bucket and a key",
            uri
        )));
    }

    Url::parse(&https)
        .map_err(|e| LookupError::InvalidConfig(format!("bad object url '{}': {}", uri, e)))
}
