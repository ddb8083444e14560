//! Command-line flags and the optional TOML config file.
use crate::countries::DEFAULT_SOURCE_URL;
use crate::flags::DEFAULT_FLAG_BASE_URL;
use clap::Parser;
use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;
use thiserror::Error;

/// Guess the capital of a random country. Three wrong answers end the game.
#[derive(Debug, Default, Parser)]
#[command(name = "capital_quiz", version)]
pub struct Args {
    /// Countries endpoint to fetch from
    #[arg(long)]
    pub source_url: Option<String>,

    /// Read countries from a local JSON file instead of the network
    #[arg(long, conflicts_with = "source_url")]
    pub countries_file: Option<PathBuf>,

    /// Seed for reproducible rounds
    #[arg(long)]
    pub seed: Option<u64>,

    /// Config file (defaults to <config dir>/capital-quiz/config.toml)
    #[arg(long)]
    pub config: Option<PathBuf>,
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file '{path}': {source}")]
    ReadError {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse config file '{path}': {source}")]
    ParseError {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },

    #[error("Config validation failed: {message}")]
    ValidationError { message: String },
}

/// Contents of the config file. Every key is optional.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct Config {
    pub source_url: String,
    /// Timeout for the countries request, in seconds
    pub timeout_seconds: u64,
    pub flag_base_url: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            source_url: DEFAULT_SOURCE_URL.to_string(),
            timeout_seconds: 10,
            flag_base_url: DEFAULT_FLAG_BASE_URL.to_string(),
        }
    }
}

/// Where the country list comes from
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DataSource {
    Http { url: String, timeout: Duration },
    File(PathBuf),
}

/// Final settings after merging the file and the flags
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settings {
    pub source: DataSource,
    pub flag_base_url: String,
    pub seed: Option<u64>,
}

impl Config {
    pub fn config_path() -> PathBuf {
        let config_dir = dirs::config_dir().unwrap_or_else(|| PathBuf::from("."));
        config_dir.join("capital-quiz").join("config.toml")
    }

    /// Loads the config file at `path`.
    ///
    /// A missing file yields defaults unless `required` is set.
    pub fn load_from(path: &Path, required: bool) -> Result<Self, ConfigError> {
        if !required && !path.exists() {
            return Ok(Config::default());
        }

        let content = fs::read_to_string(path).map_err(|e| ConfigError::ReadError {
            path: path.to_path_buf(),
            source: e,
        })?;

        let config: Config = toml::from_str(&content).map_err(|e| ConfigError::ParseError {
            path: path.to_path_buf(),
            source: e,
        })?;

        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.timeout_seconds == 0 {
            return Err(ConfigError::ValidationError {
                message: "timeout_seconds must be greater than zero".to_string(),
            });
        }

        if !self.source_url.starts_with("http://") && !self.source_url.starts_with("https://") {
            return Err(ConfigError::ValidationError {
                message: format!("source_url '{}' is not an http(s) URL", self.source_url),
            });
        }

        if self.flag_base_url.trim().is_empty() {
            return Err(ConfigError::ValidationError {
                message: "flag_base_url must not be empty".to_string(),
            });
        }

        Ok(())
    }

    /// Merges flags over the file values. Flags win.
    pub fn resolve(mut self, args: &Args) -> Result<Settings, ConfigError> {
        if let Some(url) = &args.source_url {
            self.source_url = url.clone();
            self.validate()?;
        }

        let source = match &args.countries_file {
            Some(path) => DataSource::File(path.clone()),
            None => DataSource::Http {
                url: self.source_url,
                timeout: Duration::from_secs(self.timeout_seconds),
            },
        };

        Ok(Settings {
            source,
            flag_base_url: self.flag_base_url,
            seed: args.seed,
        })
    }
}

/// Reads flags, then the config file they point at, and merges the two.
pub fn load_settings(args: &Args) -> Result<Settings, ConfigError> {
    let config = match &args.config {
        Some(path) => Config::load_from(path, true)?,
        None => Config::load_from(&Config::config_path(), false)?,
    };
    config.resolve(args)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_partial_file_fills_defaults() {
        let config: Config = toml::from_str("timeout_seconds = 3").unwrap();
        assert_eq!(config.timeout_seconds, 3);
        assert_eq!(config.source_url, DEFAULT_SOURCE_URL);
        assert_eq!(config.flag_base_url, DEFAULT_FLAG_BASE_URL);
    }

    #[test]
    fn test_missing_optional_file_is_default() {
        let config = Config::load_from(Path::new("no/such/config.toml"), false).unwrap();
        assert_eq!(config, Config::default());
    }

    #[test]
    fn test_missing_required_file_is_an_error() {
        let err = Config::load_from(Path::new("no/such/config.toml"), true).unwrap_err();
        assert!(matches!(err, ConfigError::ReadError { .. }));
    }

    #[test]
    fn test_validation_rejects_zero_timeout() {
        let config = Config {
            timeout_seconds: 0,
            ..Config::default()
        };
        assert!(matches!(
            config.validate(),
            Err(ConfigError::ValidationError { .. })
        ));
    }

    #[test]
    fn test_flags_override_file() {
        let args = Args {
            source_url: Some("http://localhost:8080/all".to_string()),
            seed: Some(42),
            ..Args::default()
        };
        let settings = Config::default().resolve(&args).unwrap();
        assert_eq!(
            settings.source,
            DataSource::Http {
                url: "http://localhost:8080/all".to_string(),
                timeout: Duration::from_secs(10),
            }
        );
        assert_eq!(settings.seed, Some(42));
    }

    #[test]
    fn test_bad_source_url_flag_rejected() {
        let args = Args {
            source_url: Some("ftp://example.com".to_string()),
            ..Args::default()
        };
        assert!(Config::default().resolve(&args).is_err());
    }

    #[test]
    fn test_countries_file_selects_file_source() {
        let args = Args::try_parse_from(["capital_quiz", "--countries-file", "c.json"]).unwrap();
        let settings = Config::default().resolve(&args).unwrap();
        assert_eq!(settings.source, DataSource::File(PathBuf::from("c.json")));
    }

    #[test]
    fn test_countries_file_conflicts_with_url() {
        let parsed = Args::try_parse_from([
            "capital_quiz",
            "--countries-file",
            "c.json",
            "--source-url",
            "http://x",
        ]);
        assert!(parsed.is_err());
    }
}
