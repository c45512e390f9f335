//! Client configuration.
//!
//! The API base URL is the only setting read from the environment.

use crate::error::ConfigError;

pub const BASE_URL_VAR: &str = "PROFILE_API_BASE_URL";
pub const DEFAULT_BASE_URL: &str = "http://localhost:3000";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientConfig {
    pub base_url: String,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
        }
    }
}

impl ClientConfig {
    /// Read `PROFILE_API_BASE_URL`, falling back to the local mock server.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_value(std::env::var(BASE_URL_VAR).ok())
    }

    fn from_value(value: Option<String>) -> Result<Self, ConfigError> {
        let Some(raw) = value else {
            return Ok(Self::default());
        };
        let base_url = raw.trim();
        if base_url.is_empty() {
            return Err(ConfigError::Empty { var: BASE_URL_VAR });
        }
        if !(base_url.starts_with("http://") || base_url.starts_with("https://")) {
            return Err(ConfigError::Scheme {
                var: BASE_URL_VAR,
                value: base_url.to_string(),
            });
        }
        Ok(Self {
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }
}
