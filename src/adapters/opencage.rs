use async_trait::async_trait;
use eyre::{Context, Result};
use url::Url;

use crate::{
    config::models::GeocoderConfig,
    core::places::Places,
    ports::geocoder::{Geocoder, GeocoderError, GeocoderResult},
};

/// Fixed result cap requested from the provider.
const RESULT_LIMIT: &str = "20";

/// Geocoding adapter for the OpenCage forward-geocoding API.
///
/// Responsibilities:
/// * Builds the request URL from a fixed template (`q`, `key`, `limit`,
///   `no_annotations`)
/// * Performs the outbound GET with a client-level timeout
/// * Parses the raw body as JSON and passes it through untouched
///
/// The adapter never retries and never caches; both are extension points
/// that would layer on top of the [`Geocoder`] port, not inside it.
pub struct OpenCageAdapter {
    client: reqwest::Client,
    endpoint: Url,
    api_key: String,
}

impl OpenCageAdapter {
    /// Create a new adapter from configuration.
    ///
    /// Fails on an unparseable endpoint or an unconstructible client,
    /// both configuration errors surfaced at startup.
    pub fn new(config: &GeocoderConfig) -> Result<Self> {
        let endpoint = Url::parse(&config.endpoint)
            .with_context(|| format!("Invalid geocoder endpoint: {}", config.endpoint))?;

        let client = reqwest::Client::builder()
            .timeout(std::time::Duration::from_secs(config.timeout_secs))
            .user_agent(concat!("geogate/", env!("CARGO_PKG_VERSION")))
            .build()
            .context("Failed to build HTTP client for geocoder")?;

        tracing::info!(endpoint = %endpoint, "created OpenCage geocoding client");

        Ok(Self {
            client,
            endpoint,
            api_key: config.api_key.clone(),
        })
    }

    /// Build the upstream request URL. The credential rides along here and
    /// must never appear in logs.
    fn request_url(&self, query: &str) -> Url {
        let mut url = self.endpoint.clone();
        url.query_pairs_mut()
            .append_pair("q", query)
            .append_pair("key", &self.api_key)
            .append_pair("limit", RESULT_LIMIT)
            .append_pair("no_annotations", "1");
        url
    }

    /// Parse the provider's raw body.
    fn parse_places(body: &str) -> GeocoderResult<Places> {
        let value = serde_json::from_str(body).map_err(GeocoderError::Parse)?;
        Ok(Places::from_value(value))
    }
}

#[async_trait]
impl Geocoder for OpenCageAdapter {
    async fn fetch_places(&self, query: &str) -> GeocoderResult<Places> {
        let url = self.request_url(query);

        tracing::debug!(query, host = ?url.host_str(), "fetching places from provider");

        let response = self
            .client
            .get(url)
            .send()
            .await?
            .error_for_status()?;

        let body = response.text().await?;
        Self::parse_places(&body)
    }
}
