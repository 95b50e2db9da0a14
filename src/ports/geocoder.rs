use async_trait::async_trait;
use thiserror::Error;

use crate::core::places::Places;

/// Custom error type for geocoding operations
#[derive(Error, Debug)]
pub enum GeocoderError {
    /// The outbound call itself failed: connection, timeout, or a non-2xx
    /// status from the provider. The caller did nothing wrong.
    #[error("upstream request failed: {0}")]
    Upstream(#[from] reqwest::Error),

    /// The provider answered 2xx but the body was not well-formed JSON.
    /// An upstream contract violation, not a caller mistake.
    #[error("upstream returned a malformed payload: {0}")]
    Parse(#[source] serde_json::Error),
}

/// Result type alias for geocoding operations
pub type GeocoderResult<T> = Result<T, GeocoderError>;

/// Geocoder defines the port (interface) for fetching places from an
/// upstream geocoding provider.
///
/// Exactly one provider is wired today; the trait is the seam where
/// additional providers would plug in.
#[async_trait]
pub trait Geocoder: Send + Sync + 'static {
    /// Fetch places matching a free-text query.
    ///
    /// # Arguments
    /// * `query` - The search term, assumed non-empty by callers
    ///
    /// # Returns
    /// The provider's feature collection, unmodified, or an error
    async fn fetch_places(&self, query: &str) -> GeocoderResult<Places>;
}
