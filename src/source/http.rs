//! Static delimited file served over plain HTTP(S).

use reqwest::Client;
use tracing::{debug, warn};
use url::Url;

use super::{FetchRaw, RawData, SourceKind};
use crate::error::{LookupError, Result};

#[derive(Debug, Clone)]
pub struct HttpSource {
    client: Client,
    url: Url,
}

impl HttpSource {
    pub fn new(client: Client, url: &str) -> Result<Self> {
        let url = Url::parse(url)
            .map_err(|e| LookupError::InvalidConfig(format!("bad source url '{}': {}", url, e)))?;
        match url.scheme() {
            "http" | "https" => Ok(Self { client, url }),
            other => Err(LookupError::InvalidConfig(format!(
                "unsupported scheme '{}' for http source",
                other
            ))),
        }
    }
}

impl FetchRaw for HttpSource {
    fn kind(&self) -> SourceKind {
        SourceKind::Http
    }

    async fn fetch_raw(&self) -> Result<RawData> {
        let body = get_bytes(&self.client, self.url.clone(), None, self.kind()).await?;
        Ok(RawData::Delimited(body))
    }
}

/// GET a body, mapping transport failures and non-2xx statuses to `SourceUnavailable`.
pub(super) async fn get_bytes(
    client: &Client,
    url: Url,
    bearer: Option<&str>,
    kind: SourceKind,
) -> Result<Vec<u8>> {
    debug!("Fetching {} data from {}", kind, url);

    let mut request = client.get(url.clone());
    if let Some(token) = bearer {
        request = request.bearer_auth(token);
    }

    let response = request.send().await.map_err(|e| {
        warn!("{} request to {} failed: {}", kind, url, e);
        LookupError::unavailable(kind, e)
    })?;

    let status = response.status();
    if !status.is_success() {
        let text = response.text().await.unwrap_or_default();
        warn!("{} request to {} returned {}", kind, url, status);
        return Err(LookupError::unavailable(
            kind,
            format!("{} returned status {}: {}", url, status, snippet(&text)),
        ));
    }

    let bytes = response
        .bytes()
        .await
        .map_err(|e| LookupError::unavailable(kind, e))?;

    debug!("Fetched {} bytes from {}", bytes.len(), url);
    Ok(bytes.to_vec())
}

/// First line of an error body, capped so responses stay readable
fn snippet(text: &str) -> &str {
    let line = text.lines().next().unwrap_or("").trim();
    match line.char_indices().nth(200) {
        Some((idx, _)) => &line[..idx],
        None => line,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rejects_non_http_scheme() {
        let err = HttpSource::new(Client::new(), "ftp://example.com/data.csv").unwrap_err();
        assert!(matches!(err, LookupError::InvalidConfig(_)));
    }

    #[test]
    fn test_snippet_truncates() {
        let long = "x".repeat(500);
        assert_eq!(snippet(&long).len(), 200);
        assert_eq!(snippet("Internal error\nstack..."), "Internal error");
    }
}
