//! Directions service configuration.

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

pub const DEFAULT_BASE_URL: &str = "https://maps.googleapis.com/maps/api/directions/json";

/// Where requests are sent.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum BaseUrl {
    /// Endpoint that gets the standard query string appended.
    Template(String),
    /// Fully formed URL used verbatim; no query parameters are appended.
    Opaque(String),
}

impl Default for BaseUrl {
    fn default() -> Self {
        BaseUrl::Template(DEFAULT_BASE_URL.to_string())
    }
}

#[derive(Debug, Clone)]
pub struct DirectionsConfig {
    pub base_url: BaseUrl,
    pub api_key: String,
    pub language: String,
    pub region: Option<String>,
    pub timeout_secs: u64,
}

impl Default for DirectionsConfig {
    fn default() -> Self {
        Self {
            base_url: BaseUrl::default(),
            api_key: String::new(),
            language: "en".to_string(),
            region: None,
            timeout_secs: 10,
        }
    }
}

impl DirectionsConfig {
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            ..Self::default()
        }
    }

    /// Reads `DIRECTIONS_*` variables from the process environment.
    ///
    /// `DIRECTIONS_API_KEY` is required; everything else falls back to the
    /// defaults.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    pub(crate) fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let api_key = lookup("DIRECTIONS_API_KEY")
            .filter(|key| !key.is_empty())
            .ok_or(ConfigError::MissingVar("DIRECTIONS_API_KEY"))?;

        let mut config = Self::new(api_key);
        if let Some(url) = lookup("DIRECTIONS_BASE_URL") {
            config.base_url = BaseUrl::Template(url);
        }
        if let Some(language) = lookup("DIRECTIONS_LANGUAGE") {
            config.language = language;
        }
        config.region = lookup("DIRECTIONS_REGION");
        if let Some(raw) = lookup("DIRECTIONS_TIMEOUT_SECS") {
            config.timeout_secs = raw.parse().map_err(|_| ConfigError::InvalidVar {
                name: "DIRECTIONS_TIMEOUT_SECS",
                value: raw.clone(),
            })?;
        }

        Ok(config)
    }
}
