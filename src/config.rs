//! Startup configuration: a TOML file for the source and loader, the
//! environment for credentials.

use anyhow::{Context, Result};
use serde::Deserialize;
use std::fs;
use std::path::Path;
use std::time::Duration;

use crate::error::LookupError;
use crate::loader::LoaderOptions;

const DEFAULT_WORKSHEET: &str = "solardata_2shp";

#[derive(Debug, Deserialize, Clone, PartialEq)]
pub struct Config {
    pub source: SourceConfig,
    #[serde(default)]
    pub loader: LoaderConfig,
}

/// Which backend to read from. Exactly one per deployment.
#[derive(Debug, Deserialize, Clone, PartialEq)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum SourceConfig {
    Sheets {
        spreadsheet_id: String,
        #[serde(default = "default_worksheet")]
        worksheet: String,
    },
    Http {
        url: String,
    },
    ObjectStore {
        url: String,
        /// S3 region; ignored for other stores
        region: Option<String>,
    },
}

#[derive(Debug, Deserialize, Clone, PartialEq)]
#[serde(default)]
pub struct LoaderConfig {
    pub drop_zero_coordinates: bool,
    pub headers: Option<Vec<String>>,
    pub delimiter: char,
    pub timeout_secs: u64,
}

impl Default for LoaderConfig {
    fn default() -> Self {
        Self {
            drop_zero_coordinates: false,
            headers: None,
            delimiter: ',',
            timeout_secs: 30,
        }
    }
}

fn default_worksheet() -> String {
    DEFAULT_WORKSHEET.to_string()
}

impl Config {
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = fs::read_to_string(path).context("Failed to read config file")?;
        let config: Config = toml::from_str(&content).context("Failed to parse config file")?;
        Ok(config)
    }

    /// Spreadsheet source from `HELIOS_SPREADSHEET_ID` / `HELIOS_WORKSHEET`,
    /// used when no config file is given.
    pub fn from_env() -> Result<Self> {
        let spreadsheet_id = std::env::var("HELIOS_SPREADSHEET_ID")
            .context("HELIOS_SPREADSHEET_ID must be set when no config file is given")?;
        let worksheet = std::env::var("HELIOS_WORKSHEET").unwrap_or_else(|_| default_worksheet());

        Ok(Self {
            source: SourceConfig::Sheets {
                spreadsheet_id,
                worksheet,
            },
            loader: LoaderConfig::default(),
        })
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.loader.timeout_secs.max(1))
    }

    pub fn loader_options(&self) -> std::result::Result<LoaderOptions, LookupError> {
        let delimiter = self.loader.delimiter;
        if !delimiter.is_ascii() {
            return Err(LookupError::InvalidConfig(format!(
                "delimiter '{}' must be a single ASCII character",
                delimiter
            )));
        }

        if let Some(headers) = &self.loader.headers {
            if headers.is_empty() {
                return Err(LookupError::InvalidConfig(
                    "headers, when given, must not be empty".to_string(),
                ));
            }
        }

        Ok(LoaderOptions {
            drop_zero_coordinates: self.loader.drop_zero_coordinates,
            headers: self.loader.headers.clone(),
            delimiter: delimiter as u8,
        })
    }
}

/// Secrets read once at startup and handed to the source constructor.
#[derive(Clone, Default)]
pub struct Credentials {
    /// `GOOGLE_API_KEY`
    pub google_api_key: Option<String>,
    /// `GOOGLE_ACCESS_TOKEN`
    pub google_access_token: Option<String>,
    /// `OBJECT_STORE_TOKEN`
    pub object_store_token: Option<String>,
}

impl Credentials {
    pub fn from_env() -> Self {
        Self {
            google_api_key: non_empty_var("GOOGLE_API_KEY"),
            google_access_token: non_empty_var("GOOGLE_ACCESS_TOKEN"),
            object_store_token: non_empty_var("OBJECT_STORE_TOKEN"),
        }
    }
}

impl std::fmt::Debug for Credentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let redact = |v: &Option<String>| v.as_ref().map(|_| "<redacted>");
        f.debug_struct("Credentials")
            .field("google_api_key", &redact(&self.google_api_key))
            .field("google_access_token", &redact(&self.google_access_token))
            .field("object_store_token", &redact(&self.object_store_token))
            .finish()
    }
}

fn non_empty_var(name: &str) -> Option<String> {
    std::env::var(name).ok().filter(|v| !v.trim().is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn load(toml: &str) -> Result<Config> {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(toml.as_bytes()).unwrap();
        Config::load_from_file(file.path())
    }

    #[test]
    fn test_sheets_config_defaults() {
        let config = load(
            r#"
            [source]
            kind = "sheets"
            spreadsheet_id = "abc123"
            "#,
        )
        .unwrap();

        assert_eq!(
            config.source,
            SourceConfig::Sheets {
                spreadsheet_id: "abc123".to_string(),
                worksheet: "solardata_2shp".to_string(),
            }
        );
        assert_eq!(config.loader, LoaderConfig::default());
        assert_eq!(config.timeout(), Duration::from_secs(30));
    }

    #[test]
    fn test_object_store_with_loader_section() {
        let config = load(
            r#"
            [source]
            kind = "object_store"
            url = "s3://solar/solar.csv"
            region = "eu-west-1"

            [loader]
            drop_zero_coordinates = true
            delimiter = ";"
            headers = ["TEMP", "GHI", "DNI", "DIF", "Latitude", "Longitude"]
            "#,
        )
        .unwrap();

        let options = config.loader_options().unwrap();
        assert!(options.drop_zero_coordinates);
        assert_eq!(options.delimiter, b';');
        assert_eq!(options.headers.as_ref().map(Vec::len), Some(6));
        assert!(matches!(
            config.source,
            SourceConfig::ObjectStore { region: Some(_), .. }
        ));
    }

    #[test]
    fn test_unknown_kind_rejected() {
        let err = load(
            r#"
            [source]
            kind = "ftp"
            url = "ftp://example.com"
            "#,
        );
        assert!(err.is_err());
    }

    #[test]
    fn test_non_ascii_delimiter_rejected() {
        let config = load(
            r#"
            [source]
            kind = "http"
            url = "https://example.com/solar.csv"

            [loader]
            delimiter = "§"
            "#,
        )
        .unwrap();
        assert!(config.loader_options().is_err());
    }

    #[test]
    fn test_credentials_debug_redacts() {
        let creds = Credentials {
            google_api_key: Some("secret-key".to_string()),
            ..Default::default()
        };
        let printed = format!("{:?}", creds);
        assert!(!printed.contains("secret-key"));
        assert!(printed.contains("<redacted>"));
    }
}
