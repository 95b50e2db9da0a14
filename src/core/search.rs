//! Core search service.
//!
//! `SearchService` sits between the validation middleware and the
//! provider adapter. It applies exactly one piece of business policy,
//! the trivial-query throttle, and otherwise returns the provider's
//! payload verbatim. No I/O of its own, so it stays fast and easily
//! testable in isolation.
use std::sync::Arc;

use crate::{
    core::places::Places,
    ports::geocoder::{Geocoder, GeocoderResult},
};

/// Queries shorter than this never reach the provider. Not an error:
/// one- and two-character terms are too ambiguous to be worth an
/// upstream call, so they resolve to the empty collection locally.
const MIN_QUERY_LEN: usize = 3;

/// Orchestrates a search against the configured geocoding provider.
pub struct SearchService {
    geocoder: Arc<dyn Geocoder>,
}

impl SearchService {
    pub fn new(geocoder: Arc<dyn Geocoder>) -> Self {
        Self { geocoder }
    }

    /// Search for places matching `query`.
    ///
    /// Callers guarantee a non-empty query; the upstream validation
    /// middleware enforces that before this service is reached.
    pub async fn search(&self, query: &str) -> GeocoderResult<Places> {
        if query.chars().count() < MIN_QUERY_LEN {
            tracing::debug!(query, "query below minimum length, skipping provider");
            return Ok(Places::empty());
        }
        self.geocoder.fetch_places(query).await
    }
}
