//! Front end configuration, read from an optional TOML file.
//!
//! ```toml
//! [api]
//! base_url = "https://esa.instech.no"
//! fleet_path = "api/fleets/random"
//! timeout_seconds = 10
//! ```
//!
//! `${VAR}` references in the file are replaced from the environment, and
//! `ANCHORAGE_API_BASE_URL` overrides the base url.
use std::{fs, path::Path, time::Duration};

use once_cell::sync::Lazy;
use regex::{Captures, Regex};
use serde::Deserialize;
use thiserror::Error;
use url::Url;

/// Environment variable that overrides `api.base_url`.
pub const BASE_URL_ENV: &str = "ANCHORAGE_API_BASE_URL";

/// Error returned when configuration cannot be loaded.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("could not read config file: {0}")]
    Io(#[from] std::io::Error),
    #[error("could not parse config file: {0}")]
    Toml(#[from] toml::de::Error),
    #[error("invalid fleet API url: {0}")]
    Url(#[from] url::ParseError),
}

/// Settings for the fleet API.
#[derive(Debug, Clone, Eq, PartialEq, Deserialize)]
#[serde(default)]
pub struct ApiConfig {
    /// Origin of the fleet API, optionally with a path prefix.
    pub base_url: String,
    /// Path of the random-fleet endpoint, relative to `base_url`.
    pub fleet_path: String,
    /// Request timeout.
    pub timeout_seconds: u64,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: "https://esa.instech.no".to_owned(),
            fleet_path: "api/fleets/random".to_owned(),
            timeout_seconds: 10,
        }
    }
}

/// Top level configuration.
#[derive(Debug, Clone, Default, Eq, PartialEq, Deserialize)]
#[serde(default)]
pub struct PuzzleConfig {
    pub api: ApiConfig,
}

impl PuzzleConfig {
    /// Load configuration from a TOML file.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let content = fs::read_to_string(path)?;
        Self::from_toml_str(&content)
    }

    /// Parse configuration from TOML text, substituting `${VAR}` references.
    pub fn from_toml_str(content: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(&substitute_env_vars(content))?)
    }

    /// Apply overrides from the environment.
    pub fn apply_env(&mut self) {
        if let Ok(base_url) = std::env::var(BASE_URL_ENV) {
            self.api.base_url = base_url;
        }
    }

    /// Request timeout for the fleet API.
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.api.timeout_seconds)
    }

    /// Resolve the full url of the random-fleet endpoint.
    ///
    /// The base is treated as a directory, so a path prefix in `base_url` is kept whether
    /// or not it ends in `/`.
    pub fn fleet_url(&self) -> Result<Url, ConfigError> {
        let mut base = self.api.base_url.clone();
        if !base.ends_with('/') {
            base.push('/');
        }
        let path = self.api.fleet_path.trim_start_matches('/');
        Ok(Url::parse(&base)?.join(path)?)
    }
}

/// Replace `${VAR}` with the value of the environment variable `VAR`. Unset variables
/// are left as written.
fn substitute_env_vars(content: &str) -> String {
    static VAR: Lazy<Regex> = Lazy::new(|| Regex::new(r"\$\{([^}]+)\}").unwrap());
    VAR.replace_all(content, |caps: &Captures| {
        std::env::var(&caps[1]).unwrap_or_else(|_| caps[0].to_owned())
    })
    .into_owned()
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use super::*;

    #[test]
    fn defaults_point_at_the_public_api() {
        let config = PuzzleConfig::default();
        assert_eq!(
            config.fleet_url().unwrap().as_str(),
            "https://esa.instech.no/api/fleets/random"
        );
        assert_eq!(config.timeout(), Duration::from_secs(10));
    }

    #[test]
    fn partial_toml_keeps_defaults() {
        let config = PuzzleConfig::from_toml_str("[api]\ntimeout_seconds = 3\n").unwrap();
        assert_eq!(config.api.timeout_seconds, 3);
        assert_eq!(config.api.base_url, ApiConfig::default().base_url);
        assert_eq!(PuzzleConfig::from_toml_str("").unwrap(), PuzzleConfig::default());
    }

    #[test]
    fn base_url_prefix_is_kept() {
        let mut config = PuzzleConfig::default();
        config.api.base_url = "http://localhost:8080/proxy".to_owned();
        config.api.fleet_path = "/fleets/random".to_owned();
        assert_eq!(
            config.fleet_url().unwrap().as_str(),
            "http://localhost:8080/proxy/fleets/random"
        );
        config.api.base_url = "http://localhost:8080/proxy/".to_owned();
        assert_eq!(
            config.fleet_url().unwrap().as_str(),
            "http://localhost:8080/proxy/fleets/random"
        );
    }

    #[test]
    fn invalid_base_url_is_an_error() {
        let mut config = PuzzleConfig::default();
        config.api.base_url = "not a url".to_owned();
        match config.fleet_url() {
            Err(ConfigError::Url(_)) => {}
            other => panic!("expected url error, got {:?}", other),
        }
    }

    #[test]
    fn env_vars_are_substituted() {
        std::env::set_var("ANCHORAGE_TEST_HOST", "http://fleet.test");
        let config = PuzzleConfig::from_toml_str(
            "[api]\nbase_url = \"${ANCHORAGE_TEST_HOST}\"\nfleet_path = \"${ANCHORAGE_TEST_UNSET}\"\n",
        )
        .unwrap();
        assert_eq!(config.api.base_url, "http://fleet.test");
        assert_eq!(config.api.fleet_path, "${ANCHORAGE_TEST_UNSET}");
    }

    #[test]
    fn reads_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "[api]\nbase_url = \"http://127.0.0.1:9000\"").unwrap();
        let config = PuzzleConfig::from_file(file.path()).unwrap();
        assert_eq!(
            config.fleet_url().unwrap().as_str(),
            "http://127.0.0.1:9000/api/fleets/random"
        );
    }

    #[test]
    fn bad_toml_is_an_error() {
        match PuzzleConfig::from_toml_str("[api\nbase_url = 1") {
            Err(ConfigError::Toml(_)) => {}
            other => panic!("expected toml error, got {:?}", other),
        }
    }
}
