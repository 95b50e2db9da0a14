//! Configuration data structures for geogate.
//!
//! These types map directly to TOML (also JSON / YAML) configuration files
//! and to `GEOGATE`-prefixed environment variables. They are intentionally
//! serde-friendly and include defaults so that minimal configs remain
//! concise; only the provider credential is mandatory.
use serde::{Deserialize, Serialize};

/// Deployment mode controlling error rendering and log formatting.
///
/// Production renders server errors as a generic message and logs as
/// JSON; development renders full diagnostics and logs pretty output.
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq, Default)]
#[serde(rename_all = "snake_case")]
pub enum RunMode {
    #[default]
    Development,
    Production,
}

/// Top-level application configuration.
#[derive(Debug, Serialize, Deserialize, Clone)]
#[serde(default)]
pub struct AppConfig {
    /// Port the gateway listens on.
    pub listen_port: u16,
    /// Deployment mode (see [`RunMode`]).
    pub mode: RunMode,
    /// Upstream geocoding provider settings.
    pub geocoder: GeocoderConfig,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            listen_port: 3000,
            mode: RunMode::default(),
            geocoder: GeocoderConfig::default(),
        }
    }
}

/// Settings for the outbound geocoding call.
#[derive(Debug, Serialize, Deserialize, Clone)]
#[serde(default)]
pub struct GeocoderConfig {
    /// Base endpoint of the provider's forward-geocoding API.
    pub endpoint: String,
    /// Provider credential. Required; never logged.
    pub api_key: String,
    /// Request timeout for the outbound call, in seconds.
    pub timeout_secs: u64,
}

impl Default for GeocoderConfig {
    fn default() -> Self {
        Self {
            endpoint: "https://api.opencagedata.com/geocode/v1/json".to_string(),
            api_key: String::new(),
            timeout_secs: 10,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = AppConfig::default();
        assert_eq!(config.listen_port, 3000);
        assert_eq!(config.mode, RunMode::Development);
        assert_eq!(config.geocoder.timeout_secs, 10);
        assert!(config.geocoder.api_key.is_empty());
    }

    #[test]
    fn test_mode_deserializes_snake_case() {
        let mode: RunMode = serde_json::from_str(r#""production""#).unwrap();
        assert_eq!(mode, RunMode::Production);
    }
}
