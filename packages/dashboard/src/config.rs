//! Dashboard configuration loaded from TOML.
//!
//! A default configuration is embedded at compile time from
//! `config/dashboard.toml`. Hosts may load a different file with
//! [`DashboardConfig::load`] and override individual fields afterwards.

use std::path::Path;
use std::time::Duration;

use serde::Deserialize;

use crate::DashboardError;
use crate::query::ApiBase;

const EMBEDDED_CONFIG: &str = include_str!("../config/dashboard.toml");

/// Settings for reaching the crash data service.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct DashboardConfig {
    /// Base URL of the crash data service (e.g. `"http://127.0.0.1:8000"`).
    pub base_url: String,
    /// Per-request timeout in seconds.
    #[serde(default = "default_timeout_secs")]
    pub request_timeout_secs: u64,
    /// Heading shown above the map.
    #[serde(default = "default_title")]
    pub title: String,
}

const fn default_timeout_secs() -> u64 {
    30
}

fn default_title() -> String {
    "High Risk Intersections".to_string()
}

impl Default for DashboardConfig {
    fn default() -> Self {
        Self::embedded()
    }
}

impl DashboardConfig {
    /// Returns the configuration embedded in the binary.
    ///
    /// # Panics
    ///
    /// Panics if the embedded TOML is malformed (this is a compile-time
    /// guarantee since the file ships with the crate).
    #[must_use]
    pub fn embedded() -> Self {
        Self::from_toml_str(EMBEDDED_CONFIG)
            .unwrap_or_else(|e| panic!("Failed to parse embedded dashboard config: {e}"))
    }

    /// Parses a configuration from TOML text.
    ///
    /// # Errors
    ///
    /// Returns [`DashboardError::Config`] if the text is not a valid
    /// configuration.
    pub fn from_toml_str(text: &str) -> Result<Self, DashboardError> {
        Ok(toml::from_str(text)?)
    }

    /// Reads and parses the configuration file at `path`.
    ///
    /// # Errors
    ///
    /// Returns [`DashboardError`] if the file cannot be read or parsed.
    pub fn load(path: &Path) -> Result<Self, DashboardError> {
        log::debug!("Loading dashboard config from {}", path.display());
        let text = std::fs::read_to_string(path)?;
        Self::from_toml_str(&text)
    }

    /// Replaces the service base URL.
    #[must_use]
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    /// Per-request timeout.
    #[must_use]
    pub const fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }

    /// Parses [`Self::base_url`] into the service endpoints.
    ///
    /// # Errors
    ///
    /// Returns [`DashboardError::InvalidBaseUrl`] if the URL is unusable.
    pub fn api_base(&self) -> Result<ApiBase, DashboardError> {
        ApiBase::parse(&self.base_url)
    }
}
