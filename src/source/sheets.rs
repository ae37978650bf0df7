//! Google Sheets worksheet read through the Sheets v4 values API.
//!
//! The first worksheet row is the header; every following row becomes one
//! record. Authentication is either an API key (public sheets) or a
//! pre-issued OAuth access token, both taken from [`Credentials`].

use reqwest::Client;
use serde::Deserialize;
use tracing::{debug, warn};
use url::Url;

use super::{FetchRaw, RawData, SourceKind};
use crate::config::Credentials;
use crate::error::{LookupError, Result};

const SHEETS_ENDPOINT: &str = "https://sheets.googleapis.com/v4/spreadsheets/";

#[derive(Debug, Clone)]
enum SheetsAuth {
    ApiKey(String),
    Bearer(String),
    Anonymous,
}

#[derive(Clone)]
pub struct SheetsSource {
    client: Client,
    endpoint: Url,
    spreadsheet_id: String,
    worksheet: String,
    auth: SheetsAuth,
}

impl std::fmt::Debug for SheetsSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SheetsSource")
            .field("spreadsheet_id", &self.spreadsheet_id)
            .field("worksheet", &self.worksheet)
            .finish_non_exhaustive()
    }
}

/// `spreadsheets.values.get` response
#[derive(Debug, Deserialize)]
struct ValueRange {
    #[serde(default)]
    values: Vec<Vec<serde_json::Value>>,
}

impl SheetsSource {
    pub fn new(
        client: Client,
        spreadsheet_id: &str,
        worksheet: &str,
        credentials: &Credentials,
    ) -> Result<Self> {
        if spreadsheet_id.trim().is_empty() {
            return Err(LookupError::InvalidConfig(
                "spreadsheet_id must not be empty".to_string(),
            ));
        }

        // An access token wins over an API key when both are set
        let auth = match (&credentials.google_access_token, &credentials.google_api_key) {
            (Some(token), _) => SheetsAuth::Bearer(token.clone()),
            (None, Some(key)) => SheetsAuth::ApiKey(key.clone()),
            (None, None) => {
                warn!("No Google credentials configured; only public sheets will be readable");
                SheetsAuth::Anonymous
            }
        };

        let endpoint = Url::parse(SHEETS_ENDPOINT)
            .map_err(|e| LookupError::InvalidConfig(e.to_string()))?;

        Ok(Self {
            client,
            endpoint,
            spreadsheet_id: spreadsheet_id.to_string(),
            worksheet: worksheet.to_string(),
            auth,
        })
    }

    /// Point at a different API root (must end in `/`)
    pub fn with_endpoint(mut self, endpoint: Url) -> Self {
        self.endpoint = endpoint;
        self
    }

    fn values_url(&self) -> Result<Url> {
        let mut url = self.endpoint.clone();
        url.path_segments_mut()
            .map_err(|_| LookupError::InvalidConfig("sheets endpoint cannot be a base".into()))?
            .pop_if_empty()
            .extend([self.spreadsheet_id.as_str(), "values", self.worksheet.as_str()]);
        url.query_pairs_mut()
            .append_pair("valueRenderOption", "UNFORMATTED_VALUE")
            .append_pair("majorDimension", "ROWS");
        if let SheetsAuth::ApiKey(key) = &self.auth {
            url.query_pairs_mut().append_pair("key", key);
        }
        Ok(url)
    }
}

impl FetchRaw for SheetsSource {
    fn kind(&self) -> SourceKind {
        SourceKind::Sheets
    }

    async fn fetch_raw(&self) -> Result<RawData> {
        let kind = self.kind();
        debug!(
            "Fetching worksheet '{}' of spreadsheet {}",
            self.worksheet, self.spreadsheet_id
        );

        let mut request = self.client.get(self.values_url()?);
        if let SheetsAuth::Bearer(token) = &self.auth {
            request = request.bearer_auth(token);
        }

        let response = request
            .send()
            .await
            .map_err(|e| LookupError::unavailable(kind, e.without_url()))?;

        let status = response.status();
        if !status.is_success() {
            let text = response.text().await.unwrap_or_default();
            warn!(
                "Sheets API returned {} for worksheet '{}'",
                status, self.worksheet
            );
            return Err(LookupError::unavailable(
                kind,
                format!(
                    "worksheet '{}' returned status {}: {}",
                    self.worksheet,
                    status,
                    text.trim()
                ),
            ));
        }

        let range: ValueRange = response
            .json()
            .await
            .map_err(|e| LookupError::Parse(e.without_url().to_string()))?;

        let raw = records_from_values(range.values);
        if let RawData::Records { rows, .. } = &raw {
            debug!("Fetched {} records from '{}'", rows.len(), self.worksheet);
        }
        Ok(raw)
    }
}

/// Split a values grid into header names and data rows.
fn records_from_values(mut values: Vec<Vec<serde_json::Value>>) -> RawData {
    if values.is_empty() {
        return RawData::Records {
            headers: Vec::new(),
            rows: Vec::new(),
        };
    }

    let headers = values
        .remove(0)
        .into_iter()
        .map(|cell| match cell {
            serde_json::Value::String(s) => s,
            other => other.to_string(),
        })
        .collect();

    // The API trims trailing empty rows; blank rows in the middle arrive as
    // `[]` and are kept so normalization zero-fills them
    RawData::Records {
        headers,
        rows: values,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn source(credentials: &Credentials) -> SheetsSource {
        SheetsSource::new(Client::new(), "sheet-id", "solardata_2shp", credentials).unwrap()
    }

    #[test]
    fn test_values_url_with_api_key() {
        let creds = Credentials {
            google_api_key: Some("abc".to_string()),
            ..Default::default()
        };
        let url = source(&creds).values_url().unwrap();
        assert_eq!(url.path(), "/v4/spreadsheets/sheet-id/values/solardata_2shp");
        assert!(url.query().unwrap().contains("key=abc"));
    }

    #[test]
    fn test_values_url_escapes_worksheet() {
        let src = SheetsSource::new(
            Client::new(),
            "sheet-id",
            "Solar Data/2",
            &Credentials::default(),
        )
        .unwrap();
        let url = src.values_url().unwrap();
        assert_eq!(
            url.path(),
            "/v4/spreadsheets/sheet-id/values/Solar%20Data%2F2"
        );
        assert!(!url.query().unwrap().contains("key="));
    }

    #[test]
    fn test_bearer_preferred_over_key() {
        let creds = Credentials {
            google_api_key: Some("abc".to_string()),
            google_access_token: Some("tok".to_string()),
            ..Default::default()
        };
        let src = source(&creds);
        assert!(matches!(src.auth, SheetsAuth::Bearer(_)));
        assert!(!src.values_url().unwrap().query().unwrap().contains("key="));
    }

    #[test]
    fn test_empty_spreadsheet_id_rejected() {
        let err = SheetsSource::new(Client::new(), " ", "ws", &Credentials::default());
        assert!(err.is_err());
    }

    #[test]
    fn test_records_from_values() {
        let values = vec![
            vec![json!("TEMP"), json!("GHI"), json!(2024)],
            vec![json!(25), json!("500"), json!(1)],
            vec![],
            vec![json!(30)],
        ];
        match records_from_values(values) {
            RawData::Records { headers, rows } => {
                assert_eq!(headers, vec!["TEMP", "GHI", "2024"]);
                assert_eq!(rows.len(), 3);
                assert!(rows[1].is_empty());
                assert_eq!(rows[2], vec![json!(30)]);
            }
            other => panic!("unexpected {:?}", other),
        }
    }

    #[test]
    fn test_records_from_no_values() {
        assert!(records_from_values(Vec::new()).is_empty());
    }
}
