//! The provider payload, passed through unmodified.
use serde::{Deserialize, Serialize};

/// A geocoding result in the upstream provider's schema.
///
/// The gateway treats this as opaque: beyond a successful JSON parse it
/// never validates or transforms the internal shape.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Places(serde_json::Value);

impl Places {
    pub fn from_value(value: serde_json::Value) -> Self {
        Self(value)
    }

    /// The canonical empty feature collection, returned for trivial
    /// queries without consulting the provider.
    pub fn empty() -> Self {
        Self(serde_json::json!({
            "type": "FeatureCollection",
            "features": [],
        }))
    }

    pub fn into_value(self) -> serde_json::Value {
        self.0
    }
}
