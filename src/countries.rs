//! Country data: wire format, sources, and the once-per-session fetch.
//!
//! The upstream endpoint returns a JSON array of objects shaped like
//! `{ "name": { "common": "France" }, "capital": ["Paris"], "cca2": "FR" }`.
//! Any failure to obtain or decode that array degrades to an empty list.
use serde::Deserialize;
use std::fs;
use std::path::PathBuf;
use std::time::Duration;
use thiserror::Error;

/// Default countries endpoint, restricted to the fields the game reads
pub const DEFAULT_SOURCE_URL: &str = "https://restcountries.com/v3.1/all?fields=name,capital,cca2";

/// One country as the game sees it
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CountryRecord {
    pub name: String,
    pub capital: Option<String>,
    pub code: Option<String>,
}

#[cfg(test)]
impl CountryRecord {
    pub fn new(name: &str, capital: Option<&str>) -> Self {
        Self {
            name: name.to_string(),
            capital: capital.map(str::to_string),
            code: None,
        }
    }

    pub fn with_code(mut self, code: &str) -> Self {
        self.code = Some(code.to_string());
        self
    }
}

#[derive(Debug, Deserialize)]
struct WireCountry {
    name: WireName,
    #[serde(default)]
    capital: Option<Vec<String>>,
    #[serde(default)]
    cca2: Option<String>,
}

#[derive(Debug, Deserialize)]
struct WireName {
    common: String,
}

impl From<WireCountry> for CountryRecord {
    fn from(wire: WireCountry) -> Self {
        // Only the first listed capital is asked about
        let capital = wire
            .capital
            .and_then(|caps| caps.into_iter().next())
            .filter(|c| !c.trim().is_empty());

        Self {
            name: wire.name.common,
            capital,
            code: wire.cca2,
        }
    }
}

/// Reasons a source could not produce a country list
#[derive(Debug, Error)]
pub enum FetchError {
    #[error("Request to '{url}' failed: {source}")]
    Transport {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("Request to '{url}' returned HTTP {status}")]
    Status { url: String, status: u16 },

    #[error("Failed to read countries file '{path}': {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Malformed country data: {0}")]
    Decode(#[from] serde_json::Error),
}

/// Decodes the upstream JSON array into records.
pub fn parse_countries(json: &str) -> Result<Vec<CountryRecord>, FetchError> {
    let wire: Vec<WireCountry> = serde_json::from_str(json)?;
    Ok(wire.into_iter().map(CountryRecord::from).collect())
}

/// Somewhere country data can be loaded from
pub trait CountrySource {
    fn fetch(&self) -> Result<Vec<CountryRecord>, FetchError>;

    /// Human-readable origin, used in log lines
    fn describe(&self) -> String;
}

/// The countries HTTP endpoint
pub struct HttpSource {
    url: String,
    timeout: Duration,
}

impl HttpSource {
    pub fn new(url: &str, timeout: Duration) -> Self {
        Self {
            url: url.to_string(),
            timeout,
        }
    }
}

impl CountrySource for HttpSource {
    fn fetch(&self) -> Result<Vec<CountryRecord>, FetchError> {
        let transport = |source| FetchError::Transport {
            url: self.url.clone(),
            source,
        };

        let client = reqwest::blocking::Client::builder()
            .timeout(self.timeout)
            .build()
            .map_err(transport)?;

        let response = client.get(&self.url).send().map_err(transport)?;
        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::Status {
                url: self.url.clone(),
                status: status.as_u16(),
            });
        }

        let body = response.text().map_err(transport)?;
        parse_countries(&body)
    }

    fn describe(&self) -> String {
        self.url.clone()
    }
}

/// A local JSON file in the same shape as the HTTP response
pub struct FileSource {
    path: PathBuf,
}

impl FileSource {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

impl CountrySource for FileSource {
    fn fetch(&self) -> Result<Vec<CountryRecord>, FetchError> {
        let content = fs::read_to_string(&self.path).map_err(|e| FetchError::Read {
            path: self.path.clone(),
            source: e,
        })?;
        parse_countries(&content)
    }

    fn describe(&self) -> String {
        self.path.display().to_string()
    }
}

/// Loads the country list once. Never fails: any error yields an empty list.
pub fn fetch_all(source: &dyn CountrySource) -> Vec<CountryRecord> {
    match source.fetch() {
        Ok(countries) => {
            tracing::debug!(
                source = %source.describe(),
                count = countries.len(),
                "Loaded country data"
            );
            countries
        }
        Err(e) => {
            tracing::warn!(source = %source.describe(), error = %e, "No country data available");
            Vec::new()
        }
    }
}
