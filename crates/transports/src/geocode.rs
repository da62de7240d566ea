//! Address geocoding for location scouting and weather lookups.
//!
//! [`GeocodeClient`] resolves a free-text address to a coordinate through an
//! Open-Meteo-style geocoding API. An empty address is a precondition
//! failure reported before any network call.

use std::time::Duration;

use serde::Deserialize;

use crate::error::TransportError;

/// HTTP request timeout for a single lookup.
const REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

/// Default geocoding API base URL.
const DEFAULT_API_BASE: &str = "https://geocoding-api.open-meteo.com";

// ---------------------------------------------------------------------------
// Coordinate
// ---------------------------------------------------------------------------

/// A resolved geographic coordinate.
#[derive(Debug, Clone, Copy, PartialEq, serde::Serialize, Deserialize)]
pub struct Coordinate {
    pub latitude: f64,
    pub longitude: f64,
}

#[derive(Debug, Default, Deserialize)]
struct GeocodeResponse {
    #[serde(default)]
    results: Vec<Coordinate>,
}

// ---------------------------------------------------------------------------
// GeocodeClient
// ---------------------------------------------------------------------------

/// Geocoding API client.
pub struct GeocodeClient {
    client: reqwest::Client,
    api_base: String,
}

impl GeocodeClient {
    /// Create a client against the public geocoding API.
    pub fn new() -> Self {
        Self::with_api_base(DEFAULT_API_BASE)
    }

    /// Create a client against a specific base URL (for tests).
    pub fn with_api_base(api_base: impl Into<String>) -> Self {
        let client = reqwest::Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()
            .expect("Failed to build reqwest HTTP client");
        Self {
            client,
            api_base: api_base.into(),
        }
    }

    /// Resolve an address to a coordinate.
    ///
    /// A blank address fails with [`TransportError::InvalidInput`] before
    /// any network call; an empty result set fails with
    /// [`TransportError::MissingData`].
    pub async fn geocode(&self, address: &str) -> Result<Coordinate, TransportError> {
        let address = address.trim();
        if address.is_empty() {
            return Err(TransportError::InvalidInput(
                "address is empty".to_string(),
            ));
        }

        let response = self
            .client
            .get(format!("{}/v1/search", self.api_base))
            .query(&[("name", address), ("count", "1"), ("format", "json")])
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(TransportError::Api {
                service: "Geocoding",
                status: response.status().as_u16(),
                message: response.text().await.unwrap_or_default(),
            });
        }

        let body: GeocodeResponse = response.json().await?;
        body.results.into_iter().next().ok_or_else(|| {
            TransportError::MissingData(format!("no geocoding results for {address:?}"))
        })
    }
}

impl Default for GeocodeClient {
    fn default() -> Self {
        Self::new()
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn blank_address_fails_before_network() {
        // Unroutable base URL: reaching the network would error differently.
        let client = GeocodeClient::with_api_base("http://127.0.0.1:1");
        let err = client.geocode("   ").await.unwrap_err();
        assert!(matches!(err, TransportError::InvalidInput(_)));
    }

    #[test]
    fn response_parses_first_result() {
        let json = serde_json::json!({
            "results": [
                {"latitude": 34.05, "longitude": -118.24},
                {"latitude": 40.71, "longitude": -74.00}
            ]
        });
        let body: GeocodeResponse = serde_json::from_value(json).unwrap();
        assert_eq!(
            body.results[0],
            Coordinate {
                latitude: 34.05,
                longitude: -118.24
            }
        );
    }

    #[test]
    fn empty_results_parse_to_empty_vec() {
        let body: GeocodeResponse = serde_json::from_value(serde_json::json!({})).unwrap();
        assert!(body.results.is_empty());
    }
}
